//! Plain-text output for the terminal.

use projecthub::domain::{
    board::StatusBoard,
    models::{BillingType, Client, Contractor, SubTask, WorkItem},
    money::format_money,
    services::WorkItemView,
    valuation::Valuation,
};

/// Left-aligned columns sized to their widest cell.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}

fn contractor_name(contractors: &[Contractor], id: &str) -> String {
    contractors
        .iter()
        .find(|c| c.id.as_str() == id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("{id} (missing)"))
}

pub fn clients(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients yet.".to_string();
    }
    table(
        &["ID", "NAME", "COMPANY", "EMAIL", "PHONE"],
        clients
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.full_name(),
                    c.company.clone(),
                    c.email.clone(),
                    c.phone.clone(),
                ]
            })
            .collect(),
    )
}

pub fn client(client: &Client) -> String {
    format!(
        "{}\n  id:      {}\n  company: {}\n  email:   {}\n  phone:   {}",
        client.full_name(),
        client.id,
        client.company,
        client.email,
        client.phone
    )
}

fn rate(contractor: &Contractor) -> String {
    format!("{}/hr", format_money(contractor.rate, contractor.currency()))
}

pub fn contractors(contractors: &[Contractor]) -> String {
    if contractors.is_empty() {
        return "No contractors yet.".to_string();
    }
    table(
        &["ID", "NAME", "SKILLS", "RATE", "EMAIL"],
        contractors
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.skills.join(", "),
                    rate(c),
                    c.email.clone(),
                ]
            })
            .collect(),
    )
}

pub fn contractor(contractor: &Contractor) -> String {
    format!(
        "{}\n  id:     {}\n  email:  {}\n  skills: {}\n  rate:   {}",
        contractor.name,
        contractor.id,
        contractor.email,
        contractor.skills.join(", "),
        rate(contractor)
    )
}

pub fn skills(skills: &[String]) -> String {
    if skills.is_empty() {
        return "The skill catalog is empty.".to_string();
    }
    skills.join("\n")
}

pub fn work_items(views: &[WorkItemView], currency: &str) -> String {
    if views.is_empty() {
        return "Nothing here yet.".to_string();
    }
    table(
        &["ID", "NAME", "CLIENT", "STATUS", "VALUE", "NET", "TEAM"],
        views
            .iter()
            .map(|v| {
                let name = match &v.parent_name {
                    Some(parent) => format!("{} (under {parent})", v.item.name),
                    None => v.item.name.clone(),
                };
                vec![
                    v.item.id.to_string(),
                    name,
                    v.client_name.clone(),
                    v.item.status.to_string(),
                    format_money(v.item.declared_value, currency),
                    format_money(v.valuation.net_value, currency),
                    v.team.join(", "),
                ]
            })
            .collect(),
    )
}

pub fn valuation(valuation: &Valuation, currency: &str) -> String {
    format!(
        "value {} - cost {} = net {}",
        format_money(valuation.declared_value, currency),
        format_money(valuation.total_cost, currency),
        format_money(valuation.net_value, currency)
    )
}

pub fn work_item(view: &WorkItemView, contractors: &[Contractor], currency: &str) -> String {
    let item = &view.item;
    let mut out = vec![
        item.name.clone(),
        format!("  id:      {}", item.id),
        format!("  client:  {}", view.client_name),
        format!("  status:  {}", item.status),
    ];
    if let Some(parent) = &view.parent_name {
        out.push(format!("  parent:  {parent}"));
    }
    if let Some(created_at) = item.created_at {
        out.push(format!("  created: {}", created_at.date()));
    }
    if let Some(description) = &item.description {
        out.push(format!("  {description}"));
    }
    out.push(format!("  {}", valuation(&view.valuation, currency)));

    if !item.assignments.is_empty() {
        out.push(String::new());
        out.push(table(
            &["CONTRACTOR", "BILLING", "HOURS", "FIXED", "COST"],
            item.assignments
                .iter()
                .zip(&view.valuation.costs)
                .map(|(assignment, cost)| {
                    let active = |billing: BillingType, text: String| {
                        if assignment.billing_type == billing {
                            text
                        } else {
                            format!("({text})")
                        }
                    };
                    vec![
                        contractor_name(contractors, assignment.contractor_id.as_str()),
                        assignment.billing_type.to_string(),
                        active(BillingType::Hourly, assignment.hours.normalize().to_string()),
                        active(
                            BillingType::Fixed,
                            format_money(assignment.fixed_amount, currency),
                        ),
                        format_money(cost.cost, currency),
                    ]
                })
                .collect(),
        ));
    }

    if !item.sub_tasks.is_empty() {
        out.push(String::new());
        out.push(sub_tasks(item, contractors));
    }
    out.join("\n")
}

fn sub_task_line(sub_task: &SubTask, contractors: &[Contractor]) -> String {
    let mark = if sub_task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] {}  {}", sub_task.id, sub_task.name);
    if let Some(id) = &sub_task.contractor_id {
        line.push_str(&format!(" @{}", contractor_name(contractors, id.as_str())));
    }
    if let Some(description) = &sub_task.description {
        line.push_str(&format!(" - {description}"));
    }
    line
}

pub fn sub_tasks(item: &WorkItem, contractors: &[Contractor]) -> String {
    let (done, total) = item.sub_tasks.progress();
    let mut out = vec![format!("Sub-tasks {done}/{total}")];
    out.extend(
        item.sub_tasks
            .iter()
            .map(|s| sub_task_line(s, contractors)),
    );
    out.join("\n")
}

pub fn board(board: &StatusBoard, currency: &str) -> String {
    board
        .columns()
        .iter()
        .map(|column| {
            let mut out = vec![format!(
                "{} ({}) {}",
                column.status,
                column.len(),
                format_money(column.total, currency)
            )];
            out.extend(column.cards.iter().map(|card| {
                let value = match card.net_value {
                    Some(net) => format!("net {}", format_money(net, currency)),
                    None => format!("value {}", format_money(card.declared_value, currency)),
                };
                format!("  {}  {}  {value}", card.id, card.name)
            }));
            out.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use projecthub::domain::{
        board::BoardCard,
        models::{ClientId, ContractorId},
        valuation::value_work_item,
    };
    use rust_decimal_macros::dec;

    fn kim() -> Contractor {
        Contractor {
            id: ContractorId::new("k1"),
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            skills: vec!["Rust".to_string(), "Go".to_string()],
            rate: dec!(75),
            currency: None,
        }
    }

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let out = table(
            &["A", "B"],
            vec![vec!["long".to_string(), "x".to_string()]],
        );
        assert_eq!(out, "A     B\nlong  x");
    }

    #[test]
    fn contractor_rate_is_formatted_per_hour() {
        let out = contractors(&[kim()]);
        assert!(out.contains("$75.00/hr"));
        assert!(out.contains("Rust, Go"));
    }

    #[test]
    fn work_item_detail_shows_cost_breakdown() {
        let mut item = WorkItem::new("Portal", ClientId::new("c1"), dec!(1000));
        item.assignments
            .update_hours(&ContractorId::new("k1"), dec!(4))
            .unwrap();
        item.sub_tasks.add("Wireframes", None, None);
        let view = WorkItemView {
            valuation: value_work_item(&item, &[kim()]).unwrap(),
            item,
            client_name: "Ada Lovelace".to_string(),
            team: vec!["Kim".to_string()],
            parent_name: None,
        };

        let out = work_item(&view, &[kim()], "USD");
        assert!(out.contains("value $1,000.00 - cost $300.00 = net $700.00"));
        assert!(out.contains("Sub-tasks 0/1"));
        assert!(out.contains("($0.00)"));
    }

    #[test]
    fn board_lists_every_column() {
        let item = WorkItem::new("Portal", ClientId::new("c1"), dec!(250));
        let board = StatusBoard::build(vec![BoardCard::new(&item, None)]).unwrap();
        let out = super::board(&board, "USD");

        assert!(out.starts_with("Planning (1) $250.00"));
        assert!(out.contains("In Progress (0) $0.00"));
        assert!(out.contains("Completed (0) $0.00"));
        assert!(out.contains("value $250.00"));
    }
}

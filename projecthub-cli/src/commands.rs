use anyhow::{Context, Result};
use projecthub::{
    domain::{
        assignments::AssignmentOutcome,
        models::{ClientId, ContractorId, SubTask, SubTaskId, WorkItemId, WorkItemKind},
        ports::outbound::KeyValueStore,
        validation::{ClientDraft, ContractorDraft, WorkItemDraft},
    },
    HubError, ProjectHub,
};

use crate::cli::{
    Cli, ClientCommand, Commands, ContractorCommand, SkillCommand, SubTaskCommand,
    WorkItemCommand,
};
use crate::config::HubConfig;
use crate::render;

pub fn run(cli: Cli, config: HubConfig) -> Result<()> {
    if let Commands::ConfigPath = cli.command {
        let path = HubConfig::config_path()?;
        if !path.exists() {
            config.save_to(&path)?;
        }
        println!("{}", path.display());
        return Ok(());
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.data_dir()?,
    };
    let hub = ProjectHub::open(&data_dir, config.billing_switch_policy)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

    let output = execute(&hub, cli.command, &config.currency)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Run one command against `hub` and return what should be printed.
pub fn execute<S: KeyValueStore>(
    hub: &ProjectHub<S>,
    command: Commands,
    currency: &str,
) -> Result<String> {
    match command {
        Commands::Login { username } => {
            let username = hub.session.login(&username)?;
            return Ok(format!("Logged in as {username}"));
        }
        Commands::Logout => {
            hub.session.logout()?;
            return Ok("Logged out".to_string());
        }
        Commands::Whoami => {
            return Ok(hub
                .session
                .current_user()?
                .unwrap_or_else(|| "Not logged in".to_string()));
        }
        Commands::ConfigPath => {
            return Ok(HubConfig::config_path()?.display().to_string());
        }
        _ => {}
    }

    let user = hub.session.require_user()?;
    tracing::debug!(%user, "running command");

    match command {
        Commands::Client { command } => client(hub, command),
        Commands::Contractor { command } => contractor(hub, command),
        Commands::Skill { command } => skill(hub, command),
        Commands::Project { command } => work_item(hub, WorkItemKind::Project, command, currency),
        Commands::Task { command } => work_item(hub, WorkItemKind::Task, command, currency),
        Commands::Subtask { command } => sub_task(hub, command),
        Commands::Board { target } => Ok(render::board(
            &hub.work_items.board(target.kind())?,
            currency,
        )),
        Commands::Login { .. } | Commands::Logout | Commands::Whoami | Commands::ConfigPath => {
            Ok(String::new())
        }
    }
}

fn client<S: KeyValueStore>(hub: &ProjectHub<S>, command: ClientCommand) -> Result<String> {
    let directory = &hub.directory;
    match command {
        ClientCommand::Add(args) => {
            let client = directory.add_client(ClientDraft {
                first_name: args.first_name,
                last_name: args.last_name,
                company: args.company,
                email: args.email,
                phone: args.phone,
            })?;
            Ok(format!("Added client {} ({})", client.full_name(), client.id))
        }
        ClientCommand::List => Ok(render::clients(&directory.list_clients()?)),
        ClientCommand::Show { id } => Ok(render::client(&directory.get_client(&id.into())?)),
        ClientCommand::Edit { id, fields } => {
            let id = ClientId::new(id);
            let current = directory.get_client(&id)?;
            let client = directory.update_client(
                &id,
                ClientDraft {
                    first_name: fields.first_name.unwrap_or(current.first_name),
                    last_name: fields.last_name.unwrap_or(current.last_name),
                    company: fields.company.unwrap_or(current.company),
                    email: fields.email.unwrap_or(current.email),
                    phone: fields.phone.unwrap_or(current.phone),
                },
            )?;
            Ok(render::client(&client))
        }
        ClientCommand::Delete { id } => {
            directory.delete_client(&id.clone().into())?;
            Ok(format!("Deleted client {id}"))
        }
    }
}

fn contractor<S: KeyValueStore>(
    hub: &ProjectHub<S>,
    command: ContractorCommand,
) -> Result<String> {
    let directory = &hub.directory;
    match command {
        ContractorCommand::Add(args) => {
            let contractor = directory.add_contractor(ContractorDraft {
                name: args.name,
                email: args.email,
                skills: args.skills,
                rate: args.rate,
                currency: args.currency,
            })?;
            Ok(format!("Added contractor {} ({})", contractor.label(), contractor.id))
        }
        ContractorCommand::List => Ok(render::contractors(&directory.list_contractors()?)),
        ContractorCommand::Show { id } => Ok(render::contractor(
            &directory.get_contractor(&id.into())?,
        )),
        ContractorCommand::Edit { id, fields } => {
            let id = ContractorId::new(id);
            let current = directory.get_contractor(&id)?;
            let skills = if fields.skills.is_empty() {
                current.skills
            } else {
                fields.skills
            };
            let contractor = directory.update_contractor(
                &id,
                ContractorDraft {
                    name: fields.name.unwrap_or(current.name),
                    email: fields.email.unwrap_or(current.email),
                    skills,
                    rate: fields.rate.unwrap_or_else(|| current.rate.to_string()),
                    currency: fields.currency.or(current.currency),
                },
            )?;
            Ok(render::contractor(&contractor))
        }
        ContractorCommand::Delete { id } => {
            directory.delete_contractor(&id.clone().into())?;
            Ok(format!("Deleted contractor {id}"))
        }
    }
}

fn skill<S: KeyValueStore>(hub: &ProjectHub<S>, command: SkillCommand) -> Result<String> {
    let skills = match command {
        SkillCommand::Add { skill } => hub.directory.add_skill(&skill)?,
        SkillCommand::List => hub.directory.skills()?,
        SkillCommand::Remove { skill } => hub.directory.remove_skill(&skill)?,
    };
    Ok(render::skills(&skills))
}

fn work_item<S: KeyValueStore>(
    hub: &ProjectHub<S>,
    kind: WorkItemKind,
    command: WorkItemCommand,
    currency: &str,
) -> Result<String> {
    let service = &hub.work_items;
    let valuation = |valuation| render::valuation(&valuation, currency);

    match command {
        WorkItemCommand::New(args) => {
            let item = service.create(
                kind,
                WorkItemDraft {
                    name: args.name,
                    client_id: args.client,
                    value: args.value,
                    status: args.status,
                    description: args.description,
                    parent_id: args.parent,
                },
            )?;
            Ok(format!("Created {kind} {} ({})", item.name, item.id))
        }
        WorkItemCommand::List => Ok(render::work_items(&service.list(kind)?, currency)),
        WorkItemCommand::Show { id } => {
            let view = service.detail(kind, &id.into())?;
            let contractors = hub.directory.list_contractors()?;
            Ok(render::work_item(&view, &contractors, currency))
        }
        WorkItemCommand::Edit { id, fields } => {
            let id = WorkItemId::new(id);
            let current = service.get(kind, &id)?;
            let parent_id = if fields.no_parent {
                None
            } else {
                fields
                    .parent
                    .or_else(|| current.parent_id.map(|p| p.to_string()))
            };
            let item = service.edit(
                kind,
                &id,
                WorkItemDraft {
                    name: fields.name.unwrap_or(current.name),
                    client_id: fields
                        .client
                        .unwrap_or_else(|| current.client_id.to_string()),
                    value: fields
                        .value
                        .unwrap_or_else(|| current.declared_value.to_string()),
                    status: fields.status.or(Some(current.status)),
                    description: fields.description.or(current.description),
                    parent_id,
                },
            )?;
            Ok(format!("Updated {kind} {} ({})", item.name, item.id))
        }
        WorkItemCommand::Delete { id } => {
            service.delete(kind, &id.clone().into())?;
            Ok(format!("Deleted {kind} {id}"))
        }
        WorkItemCommand::Move { id, status } => {
            let previous = service.move_to_status(kind, &id.clone().into(), status)?;
            Ok(format!("Moved {kind} {id}: {previous} -> {status}"))
        }
        WorkItemCommand::Assign { id, contractor } => {
            let (outcome, result) =
                service.add_contractor(kind, &id.into(), &contractor.clone().into())?;
            Ok(match outcome {
                AssignmentOutcome::Added => valuation(result),
                AssignmentOutcome::AlreadyAssigned => {
                    format!("Contractor {contractor} is already assigned")
                }
            })
        }
        WorkItemCommand::Unassign { id, contractor } => Ok(valuation(
            service.remove_contractor(kind, &id.into(), &contractor.into())?,
        )),
        WorkItemCommand::Hours {
            id,
            contractor,
            hours,
        } => Ok(valuation(service.update_hours(
            kind,
            &id.into(),
            &contractor.into(),
            hours,
        )?)),
        WorkItemCommand::Billing {
            id,
            contractor,
            billing_type,
        } => Ok(valuation(service.update_billing_type(
            kind,
            &id.into(),
            &contractor.into(),
            billing_type,
        )?)),
        WorkItemCommand::Fixed {
            id,
            contractor,
            amount,
        } => Ok(valuation(service.update_fixed_amount(
            kind,
            &id.into(),
            &contractor.into(),
            amount,
        )?)),
    }
}

fn sub_task<S: KeyValueStore>(hub: &ProjectHub<S>, command: SubTaskCommand) -> Result<String> {
    let service = &hub.work_items;
    let kind = WorkItemKind::Task;

    match command {
        SubTaskCommand::Add {
            task,
            name,
            description,
            contractor,
        } => {
            let sub_task = service.add_sub_task(
                kind,
                &task.into(),
                &name,
                description,
                contractor.map(ContractorId::new),
            )?;
            Ok(format!("Added sub-task {} ({})", sub_task.name, sub_task.id))
        }
        SubTaskCommand::List { task } => {
            let item = service.get(kind, &task.into())?;
            let contractors = hub.directory.list_contractors()?;
            Ok(render::sub_tasks(&item, &contractors))
        }
        SubTaskCommand::Edit {
            task,
            sub_task,
            name,
            description,
            contractor,
            unassign,
        } => {
            let task = WorkItemId::new(task);
            let sub_task = SubTaskId::new(sub_task);
            let current = service
                .get(kind, &task)?
                .sub_tasks
                .get(&sub_task)
                .cloned()
                .ok_or_else(|| HubError::not_found("sub-task", &sub_task))?;
            let contractor_id = if unassign {
                None
            } else {
                contractor.map(ContractorId::new).or(current.contractor_id)
            };
            service.update_sub_task(
                kind,
                &task,
                SubTask {
                    name: name.unwrap_or(current.name),
                    description: description.or(current.description),
                    contractor_id,
                    ..current
                },
            )?;
            Ok(format!("Updated sub-task {sub_task}"))
        }
        SubTaskCommand::Toggle { task, sub_task } => {
            let completed = service.toggle_sub_task(kind, &task.into(), &sub_task.clone().into())?;
            let state = if completed { "done" } else { "open" };
            Ok(format!("Sub-task {sub_task} is {state}"))
        }
        SubTaskCommand::Remove { task, sub_task } => {
            let removed = service.remove_sub_task(kind, &task.into(), &sub_task.into())?;
            Ok(format!("Removed sub-task {}", removed.name))
        }
    }
}

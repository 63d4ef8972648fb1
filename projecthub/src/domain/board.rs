//! Kanban view of work items grouped by status.

use itertools::Itertools;
use rust_decimal::Decimal;

use super::models::{ClientId, WorkItem, WorkItemId, WorkItemStatus};
use super::money::{checked_sum, AmountOverflow};

/// A work item as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCard {
    pub id: WorkItemId,
    pub name: String,
    pub client_id: ClientId,
    pub status: WorkItemStatus,
    pub declared_value: Decimal,
    /// `None` when the item has not been costed yet.
    pub net_value: Option<Decimal>,
}

impl BoardCard {
    pub fn new(item: &WorkItem, net_value: Option<Decimal>) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            client_id: item.client_id.clone(),
            status: item.status,
            declared_value: item.declared_value,
            net_value,
        }
    }

    /// Value the card contributes to its column: net value, or declared value
    /// when the item has not been costed.
    pub fn board_value(&self) -> Decimal {
        self.net_value.unwrap_or(self.declared_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub status: WorkItemStatus,
    pub cards: Vec<BoardCard>,
    pub total: Decimal,
}

impl BoardColumn {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// All status columns, in lifecycle order. Empty columns are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    columns: Vec<BoardColumn>,
}

impl StatusBoard {
    pub fn build(cards: impl IntoIterator<Item = BoardCard>) -> Result<Self, AmountOverflow> {
        let mut by_status = cards.into_iter().into_group_map_by(|card| card.status);

        let columns = WorkItemStatus::ALL
            .into_iter()
            .map(|status| -> Result<BoardColumn, AmountOverflow> {
                let cards = by_status.remove(&status).unwrap_or_default();
                Ok(BoardColumn {
                    status,
                    total: checked_sum(cards.iter().map(BoardCard::board_value))?,
                    cards,
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    pub fn column(&self, status: WorkItemStatus) -> &BoardColumn {
        // Every status has a column, see `build`.
        self.columns
            .iter()
            .find(|c| c.status == status)
            .unwrap_or(&self.columns[0])
    }
}

/// Sum of board values over the cards in `status`.
pub fn column_total(
    cards: &[BoardCard],
    status: WorkItemStatus,
) -> Result<Decimal, AmountOverflow> {
    checked_sum(
        cards
            .iter()
            .filter(|card| card.status == status)
            .map(BoardCard::board_value),
    )
}

/// Move a work item to `status`, whatever its current status.
///
/// Returns the previous status, or `None` if no item has that id. Nothing
/// besides the status field changes.
pub fn move_to_status(
    items: &mut [WorkItem],
    id: &WorkItemId,
    status: WorkItemStatus,
) -> Option<WorkItemStatus> {
    let item = items.iter_mut().find(|item| &item.id == id)?;
    let previous = item.status;
    item.status = status;
    Some(previous)
}

//! Net value of a work item: declared value minus contractor cost.
//!
//! Everything here is a pure function of its inputs and is re-run on every
//! read, so the net value never drifts from the assignments it is derived from.

use rust_decimal::Decimal;

use super::models::{BillingType, Contractor, ContractorAssignment, ContractorId, WorkItem};
use super::money::{checked_sum, AmountOverflow};

/// Cost of a single assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCost {
    pub contractor_id: ContractorId,
    pub billing_type: BillingType,
    pub cost: Decimal,
    /// False when the contractor is missing from the roster; `cost` is then zero.
    pub resolved: bool,
}

/// Full breakdown of a work item's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valuation {
    pub declared_value: Decimal,
    pub costs: Vec<AssignmentCost>,
    pub total_cost: Decimal,
    /// May be negative: the item is running at a loss.
    pub net_value: Decimal,
}

impl Valuation {
    /// Contractors referenced by assignments but absent from the roster.
    pub fn missing_contractors(&self) -> Vec<&ContractorId> {
        self.costs
            .iter()
            .filter(|c| !c.resolved)
            .map(|c| &c.contractor_id)
            .collect()
    }
}

/// Cost of one assignment, or `None` if its contractor is not in the roster.
pub fn assignment_cost(
    assignment: &ContractorAssignment,
    contractors: &[Contractor],
) -> Result<Option<Decimal>, AmountOverflow> {
    let Some(contractor) = contractors
        .iter()
        .find(|c| c.id == assignment.contractor_id)
    else {
        return Ok(None);
    };

    let cost = match assignment.billing_type {
        BillingType::Fixed => assignment.fixed_amount,
        BillingType::Hourly => contractor
            .rate
            .checked_mul(assignment.hours)
            .ok_or(AmountOverflow)?,
    };
    Ok(Some(cost))
}

/// Value `assignments` against `declared_value`. Fails if any product or sum
/// does not fit in a [`Decimal`].
pub fn value_assignments(
    declared_value: Decimal,
    assignments: &[ContractorAssignment],
    contractors: &[Contractor],
) -> Result<Valuation, AmountOverflow> {
    let costs = assignments
        .iter()
        .map(|assignment| -> Result<AssignmentCost, AmountOverflow> {
            let cost = assignment_cost(assignment, contractors)?;
            if cost.is_none() {
                tracing::warn!(
                    contractor_id = %assignment.contractor_id,
                    "assignment references unknown contractor, counting it as zero cost"
                );
            }
            Ok(AssignmentCost {
                contractor_id: assignment.contractor_id.clone(),
                billing_type: assignment.billing_type,
                cost: cost.unwrap_or(Decimal::ZERO),
                resolved: cost.is_some(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_cost = checked_sum(costs.iter().map(|c| c.cost))?;
    let net_value = declared_value
        .checked_sub(total_cost)
        .ok_or(AmountOverflow)?;

    Ok(Valuation {
        declared_value,
        costs,
        total_cost,
        net_value,
    })
}

pub fn compute_net_value(
    declared_value: Decimal,
    assignments: &[ContractorAssignment],
    contractors: &[Contractor],
) -> Result<Decimal, AmountOverflow> {
    Ok(value_assignments(declared_value, assignments, contractors)?.net_value)
}

pub fn value_work_item(
    item: &WorkItem,
    contractors: &[Contractor],
) -> Result<Valuation, AmountOverflow> {
    value_assignments(item.declared_value, item.assignments.as_slice(), contractors)
}

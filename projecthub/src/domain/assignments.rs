//! Contractor assignment operations on a work item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{Assignments, BillingType, ContractorAssignment, ContractorId};

#[derive(Debug, Error, PartialEq)]
pub enum AssignmentError {
    #[error("contractor {0} is not assigned to this work item")]
    NotAssigned(ContractorId),
    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },
}

/// Result of [`Assignments::add_contractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Added,
    AlreadyAssigned,
}

/// What happens to the figure that stops counting when the billing type changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingSwitchPolicy {
    /// Keep hours and fixed amount as they were.
    #[default]
    Preserve,
    /// Zero the field the new billing type does not use.
    ClearInactive,
}

fn non_negative(field: &'static str, value: Decimal) -> Result<Decimal, AssignmentError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AssignmentError::Negative { field, value });
    }
    Ok(value)
}

impl Assignments {
    pub fn iter(&self) -> impl Iterator<Item = &ContractorAssignment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ContractorAssignment] {
        &self.0
    }

    pub fn get(&self, contractor_id: &ContractorId) -> Option<&ContractorAssignment> {
        self.0.iter().find(|a| &a.contractor_id == contractor_id)
    }

    pub fn contains(&self, contractor_id: &ContractorId) -> bool {
        self.get(contractor_id).is_some()
    }

    /// Ids of the assigned contractors, in assignment order.
    pub fn contractor_ids(&self) -> Vec<&ContractorId> {
        self.0.iter().map(|a| &a.contractor_id).collect()
    }

    fn get_mut(&mut self, contractor_id: &ContractorId) -> Option<&mut ContractorAssignment> {
        self.0.iter_mut().find(|a| &a.contractor_id == contractor_id)
    }

    /// Assign a contractor with zero hours, hourly billing and no fixed amount.
    pub fn add_contractor(&mut self, contractor_id: ContractorId) -> AssignmentOutcome {
        if self.contains(&contractor_id) {
            return AssignmentOutcome::AlreadyAssigned;
        }
        self.0.push(ContractorAssignment::new(contractor_id));
        AssignmentOutcome::Added
    }

    /// Drop the contractor's assignment. Returns whether one existed.
    pub fn remove_contractor(&mut self, contractor_id: &ContractorId) -> bool {
        let before = self.0.len();
        self.0.retain(|a| &a.contractor_id != contractor_id);
        self.0.len() != before
    }

    /// Set hours, creating an hourly assignment if the contractor has none yet.
    pub fn update_hours(
        &mut self,
        contractor_id: &ContractorId,
        hours: Decimal,
    ) -> Result<(), AssignmentError> {
        let hours = non_negative("hours", hours)?;
        match self.get_mut(contractor_id) {
            Some(assignment) => assignment.hours = hours,
            None => {
                tracing::debug!(%contractor_id, "hours set before assignment, assigning now");
                let mut assignment = ContractorAssignment::new(contractor_id.clone());
                assignment.hours = hours;
                self.0.push(assignment);
            }
        }
        Ok(())
    }

    pub fn update_billing_type(
        &mut self,
        contractor_id: &ContractorId,
        billing_type: BillingType,
        policy: BillingSwitchPolicy,
    ) -> Result<(), AssignmentError> {
        let assignment = self
            .get_mut(contractor_id)
            .ok_or_else(|| AssignmentError::NotAssigned(contractor_id.clone()))?;

        assignment.billing_type = billing_type;
        if policy == BillingSwitchPolicy::ClearInactive {
            match billing_type {
                BillingType::Hourly => assignment.fixed_amount = Decimal::ZERO,
                BillingType::Fixed => assignment.hours = Decimal::ZERO,
            }
        }
        Ok(())
    }

    pub fn update_fixed_amount(
        &mut self,
        contractor_id: &ContractorId,
        amount: Decimal,
    ) -> Result<(), AssignmentError> {
        let amount = non_negative("fixed amount", amount)?;
        let assignment = self
            .get_mut(contractor_id)
            .ok_or_else(|| AssignmentError::NotAssigned(contractor_id.clone()))?;
        assignment.fixed_amount = amount;
        Ok(())
    }
}

impl From<Vec<ContractorAssignment>> for Assignments {
    fn from(assignments: Vec<ContractorAssignment>) -> Self {
        Self(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn id(raw: &str) -> ContractorId {
        ContractorId::new(raw)
    }

    #[test]
    fn add_contractor_uses_hourly_defaults() {
        let mut assignments = Assignments::default();
        assert_eq!(assignments.add_contractor(id("k1")), AssignmentOutcome::Added);

        let a = assignments.get(&id("k1")).unwrap();
        assert_eq!(a.hours, Decimal::ZERO);
        assert_eq!(a.billing_type, BillingType::Hourly);
        assert_eq!(a.fixed_amount, Decimal::ZERO);
    }

    #[test]
    fn add_contractor_twice_keeps_one_assignment() {
        let mut assignments = Assignments::default();
        assignments.add_contractor(id("k1"));
        assignments.update_hours(&id("k1"), dec!(3)).unwrap();

        assert_eq!(
            assignments.add_contractor(id("k1")),
            AssignmentOutcome::AlreadyAssigned
        );
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments.get(&id("k1")).unwrap().hours, dec!(3));
    }

    #[test]
    fn add_then_remove_restores_previous_list() {
        let mut assignments = Assignments::default();
        assignments.add_contractor(id("k1"));
        let before = assignments.clone();

        assignments.add_contractor(id("k2"));
        assert!(assignments.remove_contractor(&id("k2")));
        assert_eq!(assignments, before);
        assert_eq!(assignments.contractor_ids(), vec![&id("k1")]);
    }

    #[test]
    fn remove_unknown_contractor_reports_nothing_removed() {
        let mut assignments = Assignments::default();
        assert!(!assignments.remove_contractor(&id("ghost")));
    }

    #[test]
    fn update_hours_synthesizes_missing_assignment() {
        let mut assignments = Assignments::default();
        assignments.update_hours(&id("k9"), dec!(2.5)).unwrap();

        let a = assignments.get(&id("k9")).unwrap();
        assert_eq!(a.hours, dec!(2.5));
        assert_eq!(a.billing_type, BillingType::Hourly);
    }

    #[test]
    fn negative_figures_are_rejected() {
        let mut assignments = Assignments::default();
        assignments.add_contractor(id("k1"));

        assert_eq!(
            assignments.update_hours(&id("k1"), dec!(-1)),
            Err(AssignmentError::Negative {
                field: "hours",
                value: dec!(-1)
            })
        );
        assert!(assignments.update_fixed_amount(&id("k1"), dec!(-10)).is_err());
    }

    #[test]
    fn billing_switch_preserves_inactive_field_by_default() {
        let mut assignments = Assignments::default();
        assignments.add_contractor(id("k1"));
        assignments.update_hours(&id("k1"), dec!(4)).unwrap();
        assignments.update_fixed_amount(&id("k1"), dec!(500)).unwrap();

        assignments
            .update_billing_type(&id("k1"), BillingType::Fixed, BillingSwitchPolicy::Preserve)
            .unwrap();
        let a = assignments.get(&id("k1")).unwrap();
        assert_eq!(a.billing_type, BillingType::Fixed);
        assert_eq!(a.hours, dec!(4));
        assert_eq!(a.fixed_amount, dec!(500));
    }

    #[test]
    fn billing_switch_can_clear_inactive_field() {
        let mut assignments = Assignments::default();
        assignments.add_contractor(id("k1"));
        assignments.update_hours(&id("k1"), dec!(4)).unwrap();
        assignments.update_fixed_amount(&id("k1"), dec!(500)).unwrap();

        assignments
            .update_billing_type(
                &id("k1"),
                BillingType::Fixed,
                BillingSwitchPolicy::ClearInactive,
            )
            .unwrap();
        let a = assignments.get(&id("k1")).unwrap();
        assert_eq!(a.hours, Decimal::ZERO);
        assert_eq!(a.fixed_amount, dec!(500));
    }

    #[test]
    fn billing_and_fixed_updates_require_an_assignment() {
        let mut assignments = Assignments::default();
        assert_eq!(
            assignments.update_billing_type(
                &id("k1"),
                BillingType::Fixed,
                BillingSwitchPolicy::Preserve
            ),
            Err(AssignmentError::NotAssigned(id("k1")))
        );
        assert_eq!(
            assignments.update_fixed_amount(&id("k1"), dec!(1)),
            Err(AssignmentError::NotAssigned(id("k1")))
        );
    }
}

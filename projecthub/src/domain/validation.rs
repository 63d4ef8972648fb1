//! Field-level validation of user input before it becomes a stored record.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use super::models::{Client, ClientId, Contractor, ContractorId, WorkItemId, WorkItemStatus};
use super::money::{parse_amount, parse_rate};

/// A problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid input ({})", summary(.fields))]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

fn summary(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// `Ok(value)` if no errors were collected.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Checks the shape `local@domain.tld`: one `@`, a non-blank local part, and a
/// domain with an inner dot.
fn email_problem(value: &str) -> Option<&'static str> {
    let Some((local, domain)) = value.split_once('@') else {
        return Some("Invalid email address");
    };
    if domain.contains('@') {
        return Some("Invalid email address: more than one '@'");
    }
    if local.trim().is_empty() {
        return Some("Invalid email address: missing local part");
    }
    if domain.trim().is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Some("Invalid email address: invalid domain");
    }
    None
}

fn require_min_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
) {
    if value.trim().chars().count() < min {
        errors.push(field, format!("{label} must be at least {min} characters"));
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Client form input.
#[derive(Debug, Clone, Default)]
pub struct ClientDraft {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
}

impl ClientDraft {
    pub fn into_client(self, id: ClientId) -> Result<Client, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require_min_len(&mut errors, "firstName", "First name", &self.first_name, 2);
        require_min_len(&mut errors, "lastName", "Last name", &self.last_name, 2);
        require_min_len(&mut errors, "company", "Company", &self.company, 2);
        if let Some(problem) = email_problem(self.email.trim()) {
            errors.push("email", problem);
        }
        require_min_len(&mut errors, "phone", "Phone number", &self.phone, 10);

        errors.into_result(Client {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            company: self.company.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}

/// Contractor form input. The rate is free text such as `"$75/hr"`.
#[derive(Debug, Clone, Default)]
pub struct ContractorDraft {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub rate: String,
    pub currency: Option<String>,
}

impl ContractorDraft {
    pub fn into_contractor(self, id: ContractorId) -> Result<Contractor, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }
        if let Some(problem) = email_problem(self.email.trim()) {
            errors.push("email", problem);
        }

        let mut skills: Vec<String> = Vec::new();
        for skill in self.skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !skills.iter().any(|s| s == skill) {
                skills.push(skill.to_string());
            }
        }
        if skills.is_empty() {
            errors.push("skills", "At least one skill is required");
        }

        let rate = match parse_rate(&self.rate) {
            Some(rate) if rate > Decimal::ZERO => rate,
            Some(_) => {
                errors.push("rate", "Rate must be greater than zero");
                Decimal::ZERO
            }
            None => {
                errors.push("rate", "Rate is required");
                Decimal::ZERO
            }
        };

        let currency = non_blank(self.currency).map(|c| c.to_ascii_uppercase());
        if let Some(code) = &currency {
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                errors.push("currency", "Currency must be a three-letter code");
            }
        }

        errors.into_result(Contractor {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            skills,
            rate,
            currency,
        })
    }
}

/// Project or task form input.
#[derive(Debug, Clone, Default)]
pub struct WorkItemDraft {
    pub name: String,
    pub client_id: String,
    /// Declared value as typed, e.g. `"15000"` or `"15,000.00"`.
    pub value: String,
    pub status: Option<WorkItemStatus>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

/// A [`WorkItemDraft`] whose fields passed validation. Reference checks
/// (client exists, parent is a valid task) happen where storage is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItemFields {
    pub name: String,
    pub client_id: ClientId,
    pub declared_value: Decimal,
    pub status: Option<WorkItemStatus>,
    pub description: Option<String>,
    pub parent_id: Option<WorkItemId>,
}

impl WorkItemDraft {
    pub fn validate(self) -> Result<WorkItemFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }
        if self.client_id.trim().is_empty() {
            errors.push("clientId", "Client is required");
        }

        let declared_value = if self.value.trim().is_empty() {
            errors.push("value", "Value is required");
            Decimal::ZERO
        } else {
            match parse_amount(&self.value) {
                Some(v) if v.is_sign_negative() && !v.is_zero() => {
                    errors.push("value", "Value cannot be negative");
                    Decimal::ZERO
                }
                Some(v) => v,
                None => {
                    errors.push("value", "Value must be a number");
                    Decimal::ZERO
                }
            }
        };

        errors.into_result(WorkItemFields {
            name: self.name.trim().to_string(),
            client_id: ClientId::new(self.client_id.trim()),
            declared_value,
            status: self.status,
            description: non_blank(self.description),
            parent_id: non_blank(self.parent_id).map(WorkItemId::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client_draft() -> ClientDraft {
        ClientDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            company: "Analytical Engines".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-123-4567".to_string(),
        }
    }

    fn contractor_draft() -> ContractorDraft {
        ContractorDraft {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            skills: vec!["Frontend".to_string()],
            rate: "$75/hr".to_string(),
            currency: None,
        }
    }

    #[test]
    fn valid_client_is_accepted_and_trimmed() {
        let draft = ClientDraft {
            first_name: "  Ada ".to_string(),
            ..client_draft()
        };
        let client = draft.into_client(ClientId::new("c1")).unwrap();
        assert_eq!(client.first_name, "Ada");
        assert_eq!(client.full_name(), "Ada Lovelace");
    }

    #[test]
    fn client_errors_are_collected_per_field() {
        let draft = ClientDraft {
            first_name: "A".to_string(),
            company: String::new(),
            phone: "12345".to_string(),
            ..client_draft()
        };
        let errors = draft.into_client(ClientId::new("c1")).unwrap_err();
        assert!(errors.has("firstName"));
        assert!(errors.has("company"));
        assert!(errors.has("phone"));
        assert!(!errors.has("lastName"));
        assert_eq!(errors.fields().len(), 3);
    }

    #[test]
    fn phone_length_counts_characters() {
        for phone in ["555-123-45", "(555) 0123", "+44 20 7946 0958"] {
            let draft = ClientDraft {
                phone: phone.to_string(),
                ..client_draft()
            };
            assert!(draft.into_client(ClientId::new("c1")).is_ok(), "{phone:?}");
        }

        let draft = ClientDraft {
            phone: "  555-1234  ".to_string(),
            ..client_draft()
        };
        assert!(draft.into_client(ClientId::new("c1")).unwrap_err().has("phone"));
    }

    #[test]
    fn email_shapes() {
        assert_eq!(email_problem("test@example.com"), None);
        assert!(email_problem("testexample.com").is_some());
        assert!(email_problem("test@@example.com").is_some());
        assert!(email_problem("@example.com").is_some());
        assert!(email_problem("test@").is_some());
        assert!(email_problem("test@example").is_some());
        assert!(email_problem("test@.example.com").is_some());
    }

    #[test]
    fn contractor_rate_is_parsed_at_the_boundary() {
        let contractor = contractor_draft()
            .into_contractor(ContractorId::new("k1"))
            .unwrap();
        assert_eq!(contractor.rate, dec!(75));
        assert_eq!(contractor.currency, None);
    }

    #[test]
    fn contractor_rate_must_be_positive() {
        for rate in ["", "free", "$0.00"] {
            let draft = ContractorDraft {
                rate: rate.to_string(),
                ..contractor_draft()
            };
            let errors = draft.into_contractor(ContractorId::new("k1")).unwrap_err();
            assert!(errors.has("rate"), "rate {rate:?} should be rejected");
        }
    }

    #[test]
    fn contractor_skills_are_deduplicated_and_required() {
        let draft = ContractorDraft {
            skills: vec!["Rust".into(), " Rust ".into(), "Go".into()],
            currency: Some("eur".to_string()),
            ..contractor_draft()
        };
        let contractor = draft.into_contractor(ContractorId::new("k1")).unwrap();
        assert_eq!(contractor.skills, vec!["Rust".to_string(), "Go".to_string()]);
        assert_eq!(contractor.currency.as_deref(), Some("EUR"));

        let draft = ContractorDraft {
            skills: vec!["  ".into()],
            currency: Some("euro".to_string()),
            ..contractor_draft()
        };
        let errors = draft.into_contractor(ContractorId::new("k1")).unwrap_err();
        assert!(errors.has("skills"));
        assert!(errors.has("currency"));
    }

    #[test]
    fn work_item_value_must_be_a_non_negative_number() {
        let base = WorkItemDraft {
            name: "Website".to_string(),
            client_id: "c1".to_string(),
            value: "15,000".to_string(),
            ..Default::default()
        };
        let fields = base.clone().validate().unwrap();
        assert_eq!(fields.declared_value, dec!(15000));
        assert_eq!(fields.parent_id, None);

        for bad in ["", "abc", "-1"] {
            let draft = WorkItemDraft {
                value: bad.to_string(),
                ..base.clone()
            };
            assert!(draft.validate().unwrap_err().has("value"));
        }
    }

    #[test]
    fn work_item_requires_name_and_client() {
        let errors = WorkItemDraft {
            value: "10".to_string(),
            parent_id: Some("  ".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("clientId"));
        assert_eq!(
            errors.to_string(),
            "invalid input (name: Name is required; clientId: Client is required)"
        );
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_customers::Customer;

use super::{Criterion, Predicate, contains_ci, needle};

/// Customer filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
    /// Case-insensitive substring of the email.
    pub email_contains: Option<String>,
    /// Created at or after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Created at or before this instant.
    pub created_before: Option<DateTime<Utc>>,
    /// Phone starts with this prefix (e.g. `+1`).
    pub phone_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerCriterion {
    NameContains(String),
    EmailContains(String),
    CreatedAfter(DateTime<Utc>),
    CreatedBefore(DateTime<Utc>),
    PhonePrefix(String),
}

impl CustomerFilter {
    pub fn predicate(&self) -> Predicate<CustomerCriterion> {
        let mut p = Predicate::all();
        if let Some(n) = needle(&self.name_contains) {
            p = p.and(CustomerCriterion::NameContains(n));
        }
        if let Some(n) = needle(&self.email_contains) {
            p = p.and(CustomerCriterion::EmailContains(n));
        }
        if let Some(at) = self.created_after {
            p = p.and(CustomerCriterion::CreatedAfter(at));
        }
        if let Some(at) = self.created_before {
            p = p.and(CustomerCriterion::CreatedBefore(at));
        }
        if let Some(prefix) = self.phone_prefix.as_ref().filter(|s| !s.is_empty()) {
            p = p.and(CustomerCriterion::PhonePrefix(prefix.clone()));
        }
        p
    }
}

impl Criterion<Customer> for CustomerCriterion {
    fn matches(&self, c: &Customer) -> bool {
        match self {
            CustomerCriterion::NameContains(n) => contains_ci(&c.name, n),
            CustomerCriterion::EmailContains(n) => contains_ci(&c.email, n),
            CustomerCriterion::CreatedAfter(at) => c.created_at >= *at,
            CustomerCriterion::CreatedBefore(at) => c.created_at <= *at,
            CustomerCriterion::PhonePrefix(prefix) => c
                .phone
                .as_deref()
                .is_some_and(|phone| phone.starts_with(prefix.as_str())),
        }
    }
}

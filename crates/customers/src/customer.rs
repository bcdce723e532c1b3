use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_core::validation::{validate_email, validate_name, validate_phone};
use crm_core::{CrmError, CustomerId};

/// A customer record.
///
/// Email is unique across all customers; the store enforces this at insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer (single or bulk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Trim surrounding whitespace and collapse an empty phone to `None`.
    pub fn normalized(&self) -> Self {
        let phone = self
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone,
        }
    }

    /// Field-level validation. Uniqueness of `email` is checked by the store.
    pub fn validate(&self) -> Result<(), CrmError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }

    /// Build the record the store will persist.
    pub fn into_customer(self, id: CustomerId, created_at: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            created_at,
        }
    }
}

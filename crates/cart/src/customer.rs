//! Persisted checkout form fields.
//!
//! Whatever the customer typed into the order form is saved field by field
//! so it can be prefilled on the next visit. Checkout never clears it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{CUSTOMER_STORAGE_KEY, KeyValueStore, StorageError};

/// Errors that can occur when parsing a [`CustomerField`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid customer field: {0}")]
pub struct CustomerFieldError(pub String);

/// A persisted order-form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Address,
    Birthday,
    DiscountCode,
}

impl CustomerField {
    /// All persisted fields, in form order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::Birthday,
        Self::DiscountCode,
    ];

    /// Form field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Birthday => "birthday",
            Self::DiscountCode => "discount_code",
        }
    }
}

impl std::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustomerField {
    type Err = CustomerFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CustomerFieldError(s.to_owned()))
    }
}

/// Saved form values keyed by field name.
///
/// Unknown keys found in storage are kept so they survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerFields(BTreeMap<String, String>);

impl CustomerFields {
    /// The saved value of `field`, if any.
    #[must_use]
    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.0.get(field.as_str()).map(String::as_str)
    }

    /// The saved value of `field`, or `""` as an untouched form input would read.
    #[must_use]
    pub fn value(&self, field: CustomerField) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// The saved value of `field` when it is non-empty.
    #[must_use]
    pub fn non_empty(&self, field: CustomerField) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    /// Set `field` to `value`.
    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        self.0.insert(field.as_str().to_owned(), value.into());
    }

    /// Whether nothing has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Saved `(field name, value)` pairs, including unknown keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Persistence for [`CustomerFields`].
#[derive(Debug, Clone)]
pub struct CustomerStore<S> {
    storage: S,
}

impl<S: KeyValueStore> CustomerStore<S> {
    /// Create a customer store over `storage`.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load saved fields. Missing or unreadable data yields no fields.
    pub fn load(&self) -> CustomerFields {
        let raw = match self.storage.get_item(CUSTOMER_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CustomerFields::default(),
            Err(e) => {
                warn!(error = %e, "failed to read saved customer fields");
                return CustomerFields::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!(error = %e, "saved customer fields are not a string map, ignoring");
            CustomerFields::default()
        })
    }

    /// Save a single field, keeping the others.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields cannot be written to storage.
    pub fn set_field(
        &self,
        field: CustomerField,
        value: impl Into<String>,
    ) -> Result<CustomerFields, StorageError> {
        let mut fields = self.load();
        fields.set(field, value);
        self.storage
            .set_item(CUSTOMER_STORAGE_KEY, &serde_json::to_string(&fields)?)?;
        Ok(fields)
    }

    /// Forget all saved fields.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(CUSTOMER_STORAGE_KEY)
    }
}

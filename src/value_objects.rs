// Copyright 2025 Cowboy AI, LLC.

//! Domain value objects (invariants)
//!
//! Value Objects are immutable, compared by value, and updated by replacement.
//! Construction is the only place validation happens; once a value exists it
//! is known to be well-formed.

use crate::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length accepted for a [`Name`]
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length accepted for a [`Description`]
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A non-empty, trimmed display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Name(String);

impl Name {
    /// Construct a name, trimming surrounding whitespace
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "Name must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "Name must not exceed {MAX_NAME_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The validated name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Free-form descriptive text attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Description(String);

impl Description {
    /// Construct a description, trimming surrounding whitespace
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "Description must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::ValidationError(format!(
                "Description must not exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Lift an optional raw string; blank input collapses to `None`
    pub fn opt(value: Option<String>) -> DomainResult<Option<Self>> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(Some(Self::new(v)?)),
            _ => Ok(None),
        }
    }

    /// The validated text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive monetary amount
///
/// Balances may be zero, but every recorded operation (expense, income,
/// transfer) moves a positive amount; the sign lives in the operation type,
/// never in the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Amount(Decimal);

impl Amount {
    /// Construct an amount; zero or negative values are rejected
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::ValidationError(format!(
                "Amount must be greater than zero, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// The underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structurally valid email address
///
/// This is deliberately a shape check (one `@`, non-empty local and domain
/// parts, a dot in the domain, no whitespace), not RFC 5322 validation;
/// deliverability is the mail collaborator's problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Email(String);

impl Email {
    /// Construct an email address
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::ValidationError(
                "Email must not contain whitespace".to_string(),
            ));
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(DomainError::ValidationError(format!(
                "Malformed email address: {trimmed}"
            )));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::ValidationError(format!(
                "Malformed email address: {trimmed}"
            )));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(DomainError::ValidationError(format!(
                "Malformed email domain: {domain}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The validated address
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Invocation identifiers
//!
//! Every dispatch gets a time-ordered [`InvocationId`] so log lines emitted by
//! the router, middleware and handlers of one command can be correlated.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A unique, time-ordered invocation identifier based on UUID v7.
///
/// # Example
/// ```rust,ignore
/// let id = InvocationId::new();
/// println!("Invocation: {}", id); // inv_01234567-89ab-7cde-8f01-234567890abc
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Create a new invocation ID using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an invocation ID, with or without the `inv_` prefix.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let uuid_str = s.strip_prefix("inv_").unwrap_or(s);
        Uuid::parse_str(uuid_str).map(Self)
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inv_{}", self.0)
    }
}

impl From<Uuid> for InvocationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

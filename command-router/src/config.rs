//! Configuration module for the command router.
//!
//! This module provides the [`RouterConfig`] struct for customizing dispatch behavior.
//!
//! # Example
//! ```rust,ignore
//! use command_router::RouterConfig;
//!
//! let config = RouterConfig {
//!     max_tokens: 256,
//!     strict_middleware: true,
//!     report_validation_errors: true,
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Host configuration for registration and dispatch.
///
/// All fields have defaults that reproduce the lenient behavior of a plain
/// command dispatcher. Use [`RouterConfig::default()`] to get them.
///
/// # Fields
///
/// * `max_tokens` - Maximum number of argv tokens accepted by a single
///   dispatch. Longer inputs are rejected with a `TooManyTokens` validation
///   error before any route is tried. Default: 1024.
///
/// * `strict_middleware` - When true, mounting a route with a middleware name
///   that is not registered fails with `UnknownMiddleware`. When false the
///   name is logged at warn level and skipped. Default: false.
///
/// * `report_validation_errors` - Write validation error messages to the
///   bound error output. Default: true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Maximum argv length per dispatch (default: 1024)
    pub max_tokens: usize,
    /// Reject unknown named middleware at registration (default: false)
    pub strict_middleware: bool,
    /// Print validation errors to the error output (default: true)
    pub report_validation_errors: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            strict_middleware: false,
            report_validation_errors: true,
        }
    }
}

impl RouterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of tokens accepted per dispatch.
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = RouterConfig::new().with_max_tokens(64);
    /// ```
    pub fn with_max_tokens(mut self, limit: usize) -> Self {
        self.max_tokens = limit;
        self
    }

    /// Enable or disable strict middleware lookup.
    pub fn with_strict_middleware(mut self, strict: bool) -> Self {
        self.strict_middleware = strict;
        self
    }

    /// Enable or disable printing of validation errors.
    pub fn with_validation_reporting(mut self, enabled: bool) -> Self {
        self.report_validation_errors = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}

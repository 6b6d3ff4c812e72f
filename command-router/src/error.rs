//! Error types for command routing
//!
//! This module provides type-safe error handling for declaration, matching,
//! validation and execution of commands.
//!
//! # Error Codes
//!
//! Error codes are represented by the [`CliErrorCode`] enum. Codes fall into
//! three families: declaration errors (raised while registering routes),
//! validation errors (raised when a structurally matched invocation is
//! rejected) and runtime errors (raised by handlers, middleware or context
//! lookups). When serialized, codes are converted to SCREAMING_SNAKE_CASE.
//!
//! # Example
//! ```rust,ignore
//! use command_router::{CliError, CliErrorCode};
//!
//! let error = CliError::new(CliErrorCode::MissingArgument, "Missing required argument 'env'");
//! let error = CliError::missing_argument("env"); // Convenience method
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type-safe error codes for command routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CliErrorCode {
    // Declaration errors
    /// The declaration string or builder call violates the grammar or ordering rules
    InvalidDeclaration,
    /// A declaration references a resolver name that is not registered
    UnknownResolver,
    /// A route is mounted with a named middleware that is not registered
    UnknownMiddleware,

    // Validation errors
    /// Fewer positional arguments than required
    MissingArgument,
    /// More positional arguments than declared
    UnexpectedArgument,
    /// A resolver rejected a raw value
    InvalidValue,
    /// An option was supplied that the route does not declare
    UnknownOption,
    /// A required option was not supplied
    MissingOption,
    /// A non-repeatable option was supplied more than once
    RepeatedOption,
    /// An option instance carries the wrong number of parameters
    InvalidOptionParameters,
    /// The argument vector exceeds the configured token limit
    TooManyTokens,

    // Runtime errors
    /// A context lookup referenced an undeclared name
    UnknownName,
    /// A matched route has no handler attached
    MissingHandler,
    /// A handler or middleware failed
    HandlerFailure,
    /// Reading input or writing output failed
    IoError,
    /// A resolved value could not be converted to the requested type
    SerializationError,
    /// An unexpected internal error occurred
    InternalError,
}

impl CliErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDeclaration => "INVALID_DECLARATION",
            Self::UnknownResolver => "UNKNOWN_RESOLVER",
            Self::UnknownMiddleware => "UNKNOWN_MIDDLEWARE",
            Self::MissingArgument => "MISSING_ARGUMENT",
            Self::UnexpectedArgument => "UNEXPECTED_ARGUMENT",
            Self::InvalidValue => "INVALID_VALUE",
            Self::UnknownOption => "UNKNOWN_OPTION",
            Self::MissingOption => "MISSING_OPTION",
            Self::RepeatedOption => "REPEATED_OPTION",
            Self::InvalidOptionParameters => "INVALID_OPTION_PARAMETERS",
            Self::TooManyTokens => "TOO_MANY_TOKENS",
            Self::UnknownName => "UNKNOWN_NAME",
            Self::MissingHandler => "MISSING_HANDLER",
            Self::HandlerFailure => "HANDLER_FAILURE",
            Self::IoError => "IO_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this code is raised while registering routes.
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDeclaration | Self::UnknownResolver | Self::UnknownMiddleware
        )
    }

    /// Returns true if this code rejects a structurally matched invocation.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument
                | Self::UnexpectedArgument
                | Self::InvalidValue
                | Self::UnknownOption
                | Self::MissingOption
                | Self::RepeatedOption
                | Self::InvalidOptionParameters
                | Self::TooManyTokens
        )
    }
}

impl fmt::Display for CliErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Command routing error with type-safe code and message.
///
/// # Example
/// ```rust,ignore
/// use command_router::{CliError, CliErrorCode};
///
/// let error = CliError::new(CliErrorCode::HandlerFailure, "deploy failed")
///     .with_details(serde_json::json!({"env": "prod"}))
///     .with_cause("connection refused");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct CliError {
    /// Type-safe error code
    pub code: CliErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (JSON value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Optional cause for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl CliError {
    /// Create a new error with code and message.
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Add a cause string for debugging.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns true if this error was raised while registering routes.
    pub fn is_declaration_error(&self) -> bool {
        self.code.is_declaration_error()
    }

    /// Returns true if this error rejected a matched invocation.
    pub fn is_validation_error(&self) -> bool {
        self.code.is_validation_error()
    }

    // Declaration constructors

    /// Create an INVALID_DECLARATION error.
    pub fn declaration(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidDeclaration, message)
    }

    /// Create an UNKNOWN_RESOLVER error.
    pub fn unknown_resolver(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownResolver,
            format!("Unknown resolver '{}'", name),
        )
    }

    /// Create an UNKNOWN_MIDDLEWARE error.
    pub fn unknown_middleware(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownMiddleware,
            format!("Middleware '{}' not found", name),
        )
    }

    // Validation constructors

    /// Create a MISSING_ARGUMENT error.
    pub fn missing_argument(name: &str) -> Self {
        Self::new(
            CliErrorCode::MissingArgument,
            format!("Missing required argument '{}'", name),
        )
        .with_details(serde_json::json!({ "argument": name }))
    }

    /// Create an UNEXPECTED_ARGUMENT error.
    pub fn unexpected_argument(raw: &str) -> Self {
        Self::new(
            CliErrorCode::UnexpectedArgument,
            format!("Unexpected argument: {}", raw),
        )
        .with_details(serde_json::json!({ "value": raw }))
    }

    /// Create an INVALID_VALUE error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidValue, message)
    }

    /// Create an UNKNOWN_OPTION error.
    pub fn unknown_option(display_name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownOption,
            format!("Unknown option '{}'", display_name),
        )
    }

    /// Create a MISSING_OPTION error.
    pub fn missing_option(display_name: &str) -> Self {
        Self::new(
            CliErrorCode::MissingOption,
            format!("Missing required option '{}'", display_name),
        )
    }

    /// Create a REPEATED_OPTION error.
    pub fn repeated_option(display_name: &str) -> Self {
        Self::new(
            CliErrorCode::RepeatedOption,
            format!("Option '{}' can only be specified once", display_name),
        )
    }

    /// Create an INVALID_OPTION_PARAMETERS error.
    pub fn option_parameters(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidOptionParameters, message)
    }

    /// Create a TOO_MANY_TOKENS error.
    pub fn too_many_tokens(count: usize, limit: usize) -> Self {
        Self::new(
            CliErrorCode::TooManyTokens,
            format!("Too many arguments: {} given, at most {} allowed", count, limit),
        )
    }

    // Runtime constructors

    /// Create an UNKNOWN_NAME error.
    pub fn unknown_name(kind: &str, name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownName,
            format!("Unknown {} '{}'", kind, name),
        )
    }

    /// Create a MISSING_HANDLER error.
    pub fn missing_handler(route: &str) -> Self {
        Self::new(
            CliErrorCode::MissingHandler,
            format!("Route '{}' has no handler", route),
        )
    }

    /// Create a HANDLER_FAILURE error.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::HandlerFailure, message)
    }

    /// Create a SERIALIZATION_ERROR error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SerializationError, message)
    }

    /// Create an INTERNAL_ERROR error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::new(CliErrorCode::IoError, format!("IO error: {}", err))
    }
}

/// Result type alias for command routing operations.
pub type CliResult<T> = Result<T, CliError>;

//! Property-based tests for error handling
//!
//! These tests check error serialization, code classification and the
//! conversions from foreign error types.

use crate::{CliError, CliErrorCode};
use proptest::prelude::*;

/// Strategy to generate arbitrary CliErrorCode values
fn arb_error_code() -> impl Strategy<Value = CliErrorCode> {
    prop_oneof![
        Just(CliErrorCode::InvalidDeclaration),
        Just(CliErrorCode::UnknownResolver),
        Just(CliErrorCode::UnknownMiddleware),
        Just(CliErrorCode::MissingArgument),
        Just(CliErrorCode::UnexpectedArgument),
        Just(CliErrorCode::InvalidValue),
        Just(CliErrorCode::UnknownOption),
        Just(CliErrorCode::MissingOption),
        Just(CliErrorCode::RepeatedOption),
        Just(CliErrorCode::InvalidOptionParameters),
        Just(CliErrorCode::TooManyTokens),
        Just(CliErrorCode::UnknownName),
        Just(CliErrorCode::MissingHandler),
        Just(CliErrorCode::HandlerFailure),
        Just(CliErrorCode::IoError),
        Just(CliErrorCode::SerializationError),
        Just(CliErrorCode::InternalError),
    ]
}

/// Strategy to generate arbitrary CliError values
fn arb_cli_error() -> impl Strategy<Value = CliError> {
    (
        arb_error_code(),
        ".*",
        proptest::option::of(any::<String>()),
    )
        .prop_map(|(code, message, cause)| {
            let mut error = CliError::new(code, message);
            if let Some(c) = cause {
                error = error.with_cause(c);
            }
            error
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Serialized errors always carry code and message and deserialize back.
    #[test]
    fn prop_error_serialization_roundtrip(error in arb_cli_error()) {
        let json = serde_json::to_value(&error).expect("Failed to serialize error");

        prop_assert!(json.get("code").is_some(), "Serialized error must have 'code' field");
        prop_assert!(json.get("message").is_some(), "Serialized error must have 'message' field");

        let restored: CliError = serde_json::from_value(json)
            .expect("Failed to deserialize error");

        prop_assert_eq!(error.code, restored.code);
        prop_assert_eq!(error.message, restored.message);
        prop_assert_eq!(error.cause, restored.cause);
    }

    /// Codes serialize to their SCREAMING_SNAKE_CASE name.
    #[test]
    fn prop_error_code_serializes_to_screaming_snake_case(code in arb_error_code()) {
        let json = serde_json::to_value(code).expect("Failed to serialize code");
        let code_str = json.as_str().expect("Code should be a string");

        prop_assert!(
            code_str.chars().all(|c| c.is_uppercase() || c == '_'),
            "Error code '{}' should be SCREAMING_SNAKE_CASE", code_str
        );
        prop_assert_eq!(code_str, code.as_str());
    }

    /// No code is both a declaration and a validation error.
    #[test]
    fn prop_error_families_are_disjoint(code in arb_error_code()) {
        prop_assert!(!(code.is_declaration_error() && code.is_validation_error()));
    }

    /// Display is `[CODE] message`.
    #[test]
    fn prop_error_display_format(code in arb_error_code(), message in "[a-zA-Z0-9 ]{0,40}") {
        let error = CliError::new(code, message.clone());
        prop_assert_eq!(error.to_string(), format!("[{}] {}", code.as_str(), message));
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_error_with_details_serializes() {
        let error = CliError::missing_argument("env");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["code"], "MISSING_ARGUMENT");
        assert_eq!(json["message"], "Missing required argument 'env'");
        assert_eq!(json["details"]["argument"], "env");
        assert!(json.get("cause").is_none());
    }

    #[test]
    fn test_error_display_format() {
        let error = CliError::unknown_option("--what");
        assert_eq!(format!("{}", error), "[UNKNOWN_OPTION] Unknown option '--what'");
    }

    #[test]
    fn test_error_code_classification() {
        assert!(CliErrorCode::InvalidDeclaration.is_declaration_error());
        assert!(CliErrorCode::UnknownResolver.is_declaration_error());
        assert!(!CliErrorCode::MissingArgument.is_declaration_error());

        assert!(CliErrorCode::MissingArgument.is_validation_error());
        assert!(CliErrorCode::TooManyTokens.is_validation_error());
        assert!(!CliErrorCode::HandlerFailure.is_validation_error());
        assert!(!CliErrorCode::UnknownName.is_validation_error());
    }

    #[test]
    fn test_conversions() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(CliError::from(json_err).code, CliErrorCode::SerializationError);

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = CliError::from(io_err);
        assert_eq!(err.code, CliErrorCode::IoError);
        assert!(err.message.contains("closed"));
    }

    #[test]
    fn test_too_many_tokens_message() {
        let err = CliError::too_many_tokens(3, 2);
        assert_eq!(err.message, "Too many arguments: 3 given, at most 2 allowed");
        assert!(err.is_validation_error());
    }
}

//! Validation and context accessor tests

use super::{route, tokens};
use crate::declaration::compile;
use crate::matcher::match_route;
use crate::resolver::{Resolver, Resolvers};
use crate::validator::validate;
use crate::{CliError, CliErrorCode, CommandContext};
use proptest::prelude::*;
use serde_json::Value;

fn context(line: &str, args: &[&str]) -> CommandContext {
    let route = route(line);
    let parsed = match_route(&route, &tokens(args)).expect("route should match");
    validate(&route, parsed).expect("invocation should validate")
}

fn rejection(line: &str, args: &[&str]) -> CliError {
    let route = route(line);
    let parsed = match_route(&route, &tokens(args)).expect("route should match");
    validate(&route, parsed).expect_err("invocation should be rejected")
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn test_deploy_example() {
    let ctx = context("deploy <env> --tag {value}", &["deploy", "prod", "--tag", "v1"]);

    assert_eq!(ctx.arg::<String>("env").unwrap(), "prod");
    assert_eq!(ctx.option_count("tag").unwrap(), 1);
    assert_eq!(ctx.option("tag").unwrap().get::<String>("value").unwrap(), "v1");
    assert_eq!(ctx.option_value::<String>("tag", "value").unwrap(), "v1");
}

#[test]
fn test_missing_required_argument() {
    let err = rejection("deploy <env> --tag {value}", &["deploy"]);
    assert_eq!(err.code, CliErrorCode::MissingArgument);
    assert_eq!(err.message, "Missing required argument 'env'");
    assert!(err.is_validation_error());
}

#[test]
fn test_first_missing_argument_is_named() {
    let err = rejection("mv <src> <dst> [mode]", &["mv", "a"]);
    assert_eq!(err.message, "Missing required argument 'dst'");
}

#[test]
fn test_unexpected_argument() {
    let err = rejection("deploy <env>", &["deploy", "prod", "extra", "more"]);
    assert_eq!(err.code, CliErrorCode::UnexpectedArgument);
    assert_eq!(err.message, "Unexpected argument: extra");
}

#[test]
fn test_argument_resolver_failure() {
    let err = rejection("add <a:int>", &["add", "x"]);
    assert_eq!(err.code, CliErrorCode::InvalidValue);
    assert_eq!(err.message, "Invalid argument value for argument 'a': x");
}

#[test]
fn test_panicking_argument_resolver_is_invalid_value() {
    let resolvers = Resolvers::default().with(Resolver::new("byte", |raw: &str| {
        let n: u8 = raw.parse().unwrap();
        Ok::<_, String>(Value::from(n))
    }));
    let route = compile("run <n:byte>", &resolvers).expect("compiles");
    let parsed = match_route(&route, &tokens(&["run", "x"])).expect("matches");

    let err = validate(&route, parsed).expect_err("should be rejected");
    assert_eq!(err.code, CliErrorCode::InvalidValue);
    assert_eq!(err.message, "Invalid argument value for argument 'n': x");
}

#[test]
fn test_resolved_argument_types() {
    let ctx = context("calc <a:int> <b:float> <c:bool>", &["calc", "7", "2.5", "true"]);
    assert_eq!(ctx.arg::<i64>("a").unwrap(), 7);
    assert_eq!(ctx.arg::<f64>("b").unwrap(), 2.5);
    assert!(ctx.arg::<bool>("c").unwrap());
}

#[test]
fn test_unresolved_arguments_stay_strings() {
    let ctx = context("echo <text>", &["echo", "42"]);
    assert_eq!(ctx.arg::<String>("text").unwrap(), "42");
    assert_eq!(ctx.raw_arg("text").unwrap(), &serde_json::json!("42"));
}

#[test]
fn test_absent_optional_argument_is_none() {
    let ctx = context("copy <src> [dst]", &["copy", "a"]);
    assert_eq!(ctx.arg::<Option<String>>("dst").unwrap(), None);
    assert!(!ctx.has_arg("dst"));
    assert!(ctx.has_arg("src"));
}

#[test]
fn test_empty_vararg_is_bound() {
    let ctx = context("cat [files...]", &["cat"]);
    assert!(ctx.var_arg::<String>("files").unwrap().is_empty());
}

#[test]
fn test_vararg_collects_resolved_values() {
    let ctx = context("sum <first:int> <rest:int...>", &["sum", "1", "2", "3"]);
    assert_eq!(ctx.arg::<i64>("first").unwrap(), 1);
    assert_eq!(ctx.var_arg::<i64>("rest").unwrap(), vec![2, 3]);
}

#[test]
fn test_vararg_resolver_failure_names_vararg() {
    let err = rejection("sum <n:int...>", &["sum", "1", "two"]);
    assert_eq!(err.message, "Invalid argument value for argument 'n': two");
}

#[test]
fn test_var_arg_on_plain_argument_fails() {
    let ctx = context("echo <text>", &["echo", "hi"]);
    assert_eq!(
        ctx.var_arg::<String>("text").unwrap_err().code,
        CliErrorCode::UnknownName
    );
}

// =============================================================================
// Segment parameters
// =============================================================================

#[test]
fn test_dynamic_segment_parameter() {
    let ctx = context("user get {id:uint}", &["user", "get", "42"]);
    assert_eq!(ctx.param::<u64>("id").unwrap(), 42);
    assert_eq!(ctx.param::<String>("nope").unwrap_err().code, CliErrorCode::UnknownName);
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_repeatable_option_instances() {
    let ctx = context("--inc[] {n}", &["--inc", "1", "--inc", "2"]);
    let instances = ctx.options("inc").unwrap();

    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].get::<String>("n").unwrap(), "1");
    assert_eq!(instances[1].get::<String>("n").unwrap(), "2");
    assert_eq!(ctx.option_at("inc", 1).unwrap().get::<String>("n").unwrap(), "2");
    assert!(ctx.option_at("inc", 2).is_err());
}

#[test]
fn test_non_repeatable_option_twice() {
    let err = rejection("deploy <env> --tag {value}", &["deploy", "prod", "--tag", "a", "--tag", "b"]);
    assert_eq!(err.code, CliErrorCode::RepeatedOption);
    assert_eq!(err.message, "Option '--tag' can only be specified once");
}

#[test]
fn test_unknown_options() {
    let long = rejection("run", &["run", "--what"]);
    assert_eq!(long.code, CliErrorCode::UnknownOption);
    assert_eq!(long.message, "Unknown option '--what'");

    let short = rejection("run", &["run", "-x"]);
    assert_eq!(short.message, "Unknown option '-x'");
}

#[test]
fn test_missing_required_option() {
    let err = rejection("run --name! {n}", &["run"]);
    assert_eq!(err.code, CliErrorCode::MissingOption);
    assert_eq!(err.message, "Missing required option '--name'");
}

#[test]
fn test_flag_with_value_rejected() {
    let err = rejection("run --force", &["run", "--force=yes"]);
    assert_eq!(err.code, CliErrorCode::InvalidOptionParameters);
    assert_eq!(err.message, "The option '--force' does not allow any parameters, given 'yes'");
}

#[test]
fn test_missing_option_parameter() {
    let err = rejection("run --pair {a} {b}", &["run", "--pair", "x"]);
    assert_eq!(err.code, CliErrorCode::InvalidOptionParameters);
    assert_eq!(err.message, "Option '--pair' is missing the required parameter #1 ('b')");
    assert!(err.is_validation_error());
}

#[test]
fn test_option_parameter_resolver_failure() {
    let err = rejection("run --count {n:int}", &["run", "--count", "abc"]);
    assert_eq!(err.code, CliErrorCode::InvalidValue);
    assert_eq!(err.message, "Parameter #0 ('n') of option '--count' has invalid value: abc");
}

#[test]
fn test_short_chain_flags() {
    let ctx = context("-abz {x}", &["-abz", "val"]);

    assert!(ctx.has_option("a"));
    assert!(ctx.has_option("b"));
    assert_eq!(ctx.option_count("a").unwrap(), 1);
    assert_eq!(ctx.option_value::<String>("z", "x").unwrap(), "val");
}

#[test]
fn test_declared_but_absent_option() {
    let ctx = context("run --force --level {n:int}", &["run", "--level", "3"]);

    assert!(!ctx.has_option("force"));
    assert_eq!(ctx.option_count("force").unwrap(), 0);
    assert!(ctx.options("force").unwrap().is_empty());
    assert_eq!(ctx.option("force").unwrap_err().code, CliErrorCode::UnknownName);
    assert_eq!(ctx.option_value::<i64>("level", "n").unwrap(), 3);
}

#[test]
fn test_option_lookup_ignores_case() {
    let ctx = context("run --Verbose", &["run", "--VERBOSE"]);
    assert!(ctx.has_option("verbose"));
    assert!(ctx.has_option("VERBOSE"));
}

#[test]
fn test_undeclared_option_lookup() {
    let ctx = context("run", &["run"]);
    assert!(!ctx.has_option("nope"));
    assert_eq!(ctx.option_count("nope").unwrap_err().code, CliErrorCode::UnknownName);
}

// =============================================================================
// Accessor errors
// =============================================================================

#[test]
fn test_unknown_argument_lookup() {
    let ctx = context("deploy <env>", &["deploy", "prod"]);
    let err = ctx.arg::<String>("nope").unwrap_err();
    assert_eq!(err.code, CliErrorCode::UnknownName);
    assert_eq!(err.message, "Unknown argument 'nope'");
}

#[test]
fn test_wrong_type_lookup() {
    let ctx = context("deploy <env>", &["deploy", "prod"]);
    assert_eq!(
        ctx.arg::<u64>("env").unwrap_err().code,
        CliErrorCode::SerializationError
    );
}

#[test]
fn test_attributes() {
    let mut ctx = context("run", &["run"]);
    ctx.set_attr("user", "alice".to_string()).set_attr("count", 1u32);

    assert_eq!(ctx.attr::<String>("user").map(String::as_str), Some("alice"));
    assert!(ctx.attr::<u64>("count").is_none());
    if let Some(count) = ctx.attr_mut::<u32>("count") {
        *count += 1;
    }
    assert_eq!(ctx.remove_attr::<u32>("count"), Some(2));
    assert!(ctx.attr::<u32>("count").is_none());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A vararg after required arguments receives every surplus token.
    #[test]
    fn prop_vararg_collects_surplus(
        head in "[a-z]{1,8}",
        rest in prop::collection::vec("[a-z0-9]{1,8}", 0..12),
    ) {
        let mut argv = vec!["cat".to_string(), head.clone()];
        argv.extend(rest.iter().cloned());
        let route = route("cat <head> [rest...]");
        let parsed = match_route(&route, &argv).expect("matches");
        let ctx = validate(&route, parsed).expect("validates");

        prop_assert_eq!(ctx.arg::<String>("head").unwrap(), head);
        prop_assert_eq!(ctx.var_arg::<String>("rest").unwrap(), rest);
    }

    /// Argument counts outside the declared range are always rejected.
    #[test]
    fn prop_arity_enforced(count in 0usize..6) {
        let mut argv = vec!["pair".to_string()];
        argv.extend((0..count).map(|i| i.to_string()));
        let route = route("pair <a> <b> [c]");
        let parsed = match_route(&route, &argv).expect("matches");
        let result = validate(&route, parsed);

        if (2..=3).contains(&count) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err_and(|e| e.is_validation_error()));
        }
    }
}

//! Router tests
//!
//! The first structural match is committed; validation errors never fall
//! through to later routes.

use super::{route, tokens};
use crate::middleware::{Flow, from_fn};
use crate::router::{RouteMatch, Router};
use crate::{CliErrorCode, CommandContext};

fn router(lines: &[&str]) -> Router {
    let mut router = Router::new();
    for line in lines {
        router.register(route(line).handler(from_fn(|_ctx: &mut CommandContext| Ok(Flow::Continue))));
    }
    router
}

fn matched_route(router: &Router, args: &[&str]) -> String {
    match router.match_tokens(&tokens(args)).expect("should validate") {
        RouteMatch::Matched { route, .. } => route.to_string(),
        RouteMatch::Unmatched => panic!("expected a match for {:?}", args),
    }
}

#[test]
fn test_registration_order_is_kept() {
    let router = router(&["a", "b", "c"]);
    assert_eq!(router.len(), 3);
    assert!(!router.is_empty());
    let names: Vec<String> = router.routes().iter().map(|r| r.to_string()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_first_structural_match_wins() {
    let router = router(&["get {id:int}", "get {name}"]);

    assert_eq!(matched_route(&router, &["get", "5"]), "get {id:int}");
    assert_eq!(matched_route(&router, &["get", "bob"]), "get {name}");
}

#[test]
fn test_general_route_registered_first_shadows_specific() {
    let router = router(&["get {name}", "get {id:int}"]);
    assert_eq!(matched_route(&router, &["get", "5"]), "get {name}");
}

#[test]
fn test_validation_error_does_not_fall_through() {
    let router = router(&["copy <src>", "copy <src> <dst>"]);

    let err = router.match_tokens(&tokens(&["copy", "a", "b"])).unwrap_err();
    assert_eq!(err.code, CliErrorCode::UnexpectedArgument);
}

#[test]
fn test_unmatched() {
    let router = router(&["deploy <env>", "user list"]);
    let result = router.match_tokens(&tokens(&["nothing"])).unwrap();
    assert!(!result.is_matched());
    assert!(matches!(result, RouteMatch::Unmatched));
}

#[test]
fn test_empty_router_never_matches() {
    let router = Router::new();
    assert!(router.is_empty());
    assert!(!router.match_tokens(&tokens(&["x"])).unwrap().is_matched());
}

#[test]
fn test_match_then_execute() {
    let mut router = Router::new();
    router.register(route("echo <text>").handler(from_fn(|ctx: &mut CommandContext| {
        let text: String = ctx.arg("text")?;
        Ok(if text == "stop" { Flow::Stop(false) } else { Flow::Continue })
    })));

    for (arg, expected) in [("go", true), ("stop", false)] {
        match router.match_tokens(&tokens(&["echo", arg])).unwrap() {
            RouteMatch::Matched { route, mut context } => {
                assert_eq!(router.execute(route, &mut context).unwrap(), expected);
            }
            RouteMatch::Unmatched => panic!("echo should match"),
        }
    }
}

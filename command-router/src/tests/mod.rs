//! Test module for command-router
//!
//! Unit and property-based tests (proptest) covering declaration
//! compilation, matching, validation, the execution pipeline and the host
//! dispatcher.



#[cfg(test)]
pub mod error_tests;



#[cfg(test)]
pub mod router_tests;

#[cfg(test)]
pub mod validator_tests;

use crate::resolver::Resolvers;
use crate::route::RouteDefinition;

/// Compile a declaration with the built-in resolvers.
pub(crate) fn route(line: &str) -> RouteDefinition {
    crate::compile(line, &Resolvers::default()).expect("declaration should compile")
}

/// Owned argv tokens.
pub(crate) fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

//! Structural matching of argv tokens against one route
//!
//! Matching is a cheap filter used for route selection. It walks the tokens
//! once, left to right, consuming option parameters as it goes, and checks
//! only the segments. Argument and option arity is left to the validator.

use crate::declaration::{is_long_option, is_short_option};
use crate::route::{RouteDefinition, Segment};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

/// Raw option occurrences, in order of first appearance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawOption {
    /// Lowercased option name
    pub name: String,
    /// One entry per occurrence, each holding the raw parameter values
    pub instances: Vec<Vec<String>>,
}

/// Unvalidated outcome of a structural match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseResult {
    /// Free positional tokens left after the segments, in order
    pub arguments: Vec<String>,
    /// Resolved dynamic segment values
    pub parameters: HashMap<String, Value>,
    pub options: Vec<RawOption>,
}

impl ParseResult {
    /// Raw occurrences of an option, looked up case-insensitively.
    pub fn option(&self, name: &str) -> Option<&RawOption> {
        let name = name.to_lowercase();
        self.options.iter().find(|o| o.name == name)
    }

    fn push_option(&mut self, name: &str, values: Vec<String>) {
        let name = name.to_lowercase();
        match self.options.iter_mut().find(|o| o.name == name) {
            Some(existing) => existing.instances.push(values),
            None => self.options.push(RawOption {
                name,
                instances: vec![values],
            }),
        }
    }
}

/// Try to match `tokens` against `route`.
///
/// Returns `None` when a literal segment differs, a dynamic segment's
/// resolver rejects its token, or segments remain unconsumed. Never fails
/// otherwise.
pub fn match_route(route: &RouteDefinition, tokens: &[String]) -> Option<ParseResult> {
    let mut queue: VecDeque<&str> = tokens.iter().map(String::as_str).collect();
    let mut result = ParseResult::default();
    let mut next_segment = 0;

    while let Some(token) = queue.pop_front() {
        if is_short_option(token) {
            let chain: Vec<char> = token[1..].chars().collect();
            let (last, flags) = chain.split_last()?;
            for flag in flags {
                result.push_option(&flag.to_string(), Vec::new());
            }
            let name = last.to_string();
            let values = take_parameters(route, &name, &mut queue);
            result.push_option(&name, values);
        } else if is_long_option(token) {
            let body = &token[2..];
            match body.split_once('=') {
                Some((name, value)) => result.push_option(name, vec![value.to_string()]),
                None => {
                    let values = take_parameters(route, body, &mut queue);
                    result.push_option(body, values);
                }
            }
        } else if let Some(segment) = route.segments().get(next_segment) {
            match segment {
                Segment::Literal(name) => {
                    if name.to_lowercase() != token.to_lowercase() {
                        return None;
                    }
                }
                Segment::Dynamic { name, resolver } => {
                    let value = resolver.resolve(token).ok()?;
                    result.parameters.insert(name.clone(), value);
                }
            }
            next_segment += 1;
        } else {
            result.arguments.push(token.to_string());
        }
    }

    if next_segment < route.segments().len() {
        return None;
    }
    Some(result)
}

/// Pops as many tokens as the declared option has parameters. Unknown
/// options take none; the validator reports them.
fn take_parameters(route: &RouteDefinition, name: &str, queue: &mut VecDeque<&str>) -> Vec<String> {
    let wanted = route.find_option(name).map_or(0, |o| o.parameters.len());
    let mut values = Vec::with_capacity(wanted);
    while values.len() < wanted {
        match queue.pop_front() {
            Some(token) => values.push(token.to_string()),
            None => break,
        }
    }
    values
}

//! Route definitions
//!
//! A [`RouteDefinition`] describes one command: its ordered segments, its
//! ordered positional arguments, its options, the handler and two ordered
//! middleware lists. Routes are usually compiled from a declaration string
//! (see [`crate::declaration`]) but can be assembled directly with the
//! builder methods, which enforce the same ordering rules.
//!
//! # Example
//!
//! ```rust,ignore
//! let route = RouteDefinition::new()
//!     .segment("deploy")?
//!     .arg("env", true, None)?
//!     .option(RouteOption::new("tag").param("value", None)?)?
//!     .handler(from_fn(deploy));
//! ```

use crate::middleware::{HandlerFn, MiddlewareFn};
use crate::resolver::{IDENTITY, Resolver};
use crate::{CliError, CliResult};
use std::fmt;

/// A positional path component that precedes free arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the token, compared case-insensitively
    Literal(String),
    /// Resolves the token into a named parameter
    Dynamic { name: String, resolver: Resolver },
}

impl Segment {
    /// The literal text or the parameter name.
    pub fn name(&self) -> &str {
        match self {
            Self::Literal(name) => name,
            Self::Dynamic { name, .. } => name,
        }
    }

    /// Returns true for dynamic segments.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }
}

/// A named positional argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub required: bool,
    /// Collects every remaining positional token
    pub vararg: bool,
    pub resolver: Option<Resolver>,
}

/// One positional parameter of an option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionParameter {
    pub name: String,
    pub resolver: Option<Resolver>,
}

/// A named option with its ordered parameters.
///
/// Single-character names are short options (`-v`), longer names are long
/// options (`--verbose`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteOption {
    pub name: String,
    pub required: bool,
    pub repeatable: bool,
    pub parameters: Vec<OptionParameter>,
}

impl RouteOption {
    /// Create an optional, non-repeatable option without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            repeatable: false,
            parameters: Vec::new(),
        }
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allow the option to be supplied more than once.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Append a parameter.
    pub fn param(mut self, name: impl Into<String>, resolver: Option<Resolver>) -> CliResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CliError::declaration("Option parameter name can not be empty"));
        }
        if self.parameters.iter().any(|p| p.name == name) {
            return Err(CliError::declaration(format!(
                "Option parameter '{}' already exists",
                name
            )));
        }
        self.parameters.push(OptionParameter { name, resolver });
        Ok(self)
    }

    /// The option as typed on the command line (`-v` or `--verbose`).
    pub fn display_name(&self) -> String {
        display_option_name(&self.name)
    }

    /// Returns true if this option takes no parameters.
    pub fn is_flag(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Render an option name as typed on the command line.
pub fn display_option_name(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{}", name)
    } else {
        format!("--{}", name)
    }
}

/// A fully described command route.
#[derive(Clone, Default)]
pub struct RouteDefinition {
    segments: Vec<Segment>,
    arguments: Vec<Argument>,
    options: Vec<RouteOption>,
    handler: Option<HandlerFn>,
    before: Vec<MiddlewareFn>,
    after: Vec<MiddlewareFn>,
}

impl RouteDefinition {
    /// Create an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal segment.
    pub fn segment(mut self, name: impl Into<String>) -> CliResult<Self> {
        let name = name.into();
        self.check_segment_position(&name)?;
        self.segments.push(Segment::Literal(name));
        Ok(self)
    }

    /// Append a dynamic segment resolved by `resolver`.
    pub fn dynamic_segment(mut self, name: impl Into<String>, resolver: Resolver) -> CliResult<Self> {
        let name = name.into();
        self.check_segment_position(&name)?;
        if name.is_empty() {
            return Err(CliError::declaration("Name of dynamic segment can not be empty"));
        }
        if self
            .segments
            .iter()
            .any(|s| s.is_dynamic() && s.name() == name)
        {
            return Err(CliError::declaration(format!(
                "Dynamic segment '{}' already exists",
                name
            )));
        }
        self.segments.push(Segment::Dynamic { name, resolver });
        Ok(self)
    }

    /// Append a positional argument.
    pub fn arg(self, name: impl Into<String>, required: bool, resolver: Option<Resolver>) -> CliResult<Self> {
        self.push_argument(name.into(), required, false, resolver)
    }

    /// Append the trailing vararg argument.
    pub fn var_arg(self, name: impl Into<String>, required: bool, resolver: Option<Resolver>) -> CliResult<Self> {
        self.push_argument(name.into(), required, true, resolver)
    }

    /// Add an option without parameters.
    pub fn flag(self, name: impl Into<String>) -> CliResult<Self> {
        self.option(RouteOption::new(name))
    }

    /// Add an option.
    pub fn option(mut self, option: RouteOption) -> CliResult<Self> {
        if option.name.is_empty() {
            return Err(CliError::declaration("Option name can not be empty"));
        }
        if self.find_option(&option.name).is_some() {
            return Err(CliError::declaration(format!(
                "Option '{}' already exists (use repeatable options instead)",
                option.display_name()
            )));
        }
        self.options.push(option);
        Ok(self)
    }

    /// Set the handler.
    pub fn handler(mut self, handler: HandlerFn) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Append a before-handler middleware.
    pub fn before(mut self, middleware: MiddlewareFn) -> Self {
        self.before.push(middleware);
        self
    }

    /// Append an after-handler middleware.
    pub fn after(mut self, middleware: MiddlewareFn) -> Self {
        self.after.push(middleware);
        self
    }

    /// Append a before-handler middleware in place.
    pub fn push_before(&mut self, middleware: MiddlewareFn) {
        self.before.push(middleware);
    }

    /// Append an after-handler middleware in place.
    pub fn push_after(&mut self, middleware: MiddlewareFn) {
        self.after.push(middleware);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn options(&self) -> &[RouteOption] {
        &self.options
    }

    pub fn get_handler(&self) -> Option<&HandlerFn> {
        self.handler.as_ref()
    }

    pub fn before_middleware(&self) -> &[MiddlewareFn] {
        &self.before
    }

    pub fn after_middleware(&self) -> &[MiddlewareFn] {
        &self.after
    }

    /// Find a declared option by name, ignoring case.
    pub fn find_option(&self, name: &str) -> Option<&RouteOption> {
        let name = name.to_lowercase();
        self.options.iter().find(|o| o.name.to_lowercase() == name)
    }

    /// Number of positional arguments that must be supplied.
    pub fn min_arguments(&self) -> usize {
        self.arguments.iter().filter(|a| a.required).count()
    }

    /// Maximum number of positional arguments, `None` when a vararg is declared.
    pub fn max_arguments(&self) -> Option<usize> {
        if self.arguments.iter().any(|a| a.vararg) {
            None
        } else {
            Some(self.arguments.len())
        }
    }

    fn check_segment_position(&self, name: &str) -> CliResult<()> {
        if !self.arguments.is_empty() {
            return Err(CliError::declaration(format!(
                "Can not add segment '{}' after arguments",
                name
            )));
        }
        Ok(())
    }

    fn push_argument(
        mut self,
        name: String,
        required: bool,
        vararg: bool,
        resolver: Option<Resolver>,
    ) -> CliResult<Self> {
        if name.is_empty() {
            return Err(CliError::declaration("Argument name can not be empty"));
        }
        if self.arguments.iter().any(|a| a.name == name) {
            return Err(CliError::declaration(format!(
                "Argument '{}' already exists",
                name
            )));
        }
        if let Some(previous) = self.arguments.last() {
            if previous.vararg {
                return Err(CliError::declaration(format!(
                    "Can not add argument '{}' after vararg '{}'",
                    name, previous.name
                )));
            }
            if required && !previous.required {
                return Err(CliError::declaration(format!(
                    "Can not add required argument '{}' after optional argument '{}'",
                    name, previous.name
                )));
            }
        }
        self.arguments.push(Argument {
            name,
            required,
            vararg,
            resolver,
        });
        Ok(self)
    }
}

// Structural equality: handlers and middleware are not compared.
impl PartialEq for RouteDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
            && self.arguments == other.arguments
            && self.options == other.options
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("segments", &self.segments)
            .field("arguments", &self.arguments)
            .field("options", &self.options)
            .field("has_handler", &self.handler.is_some())
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

/// Renders the route back into declaration syntax.
impl fmt::Display for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(name) => parts.push(name.clone()),
                Segment::Dynamic { name, resolver } => {
                    if resolver.name() == IDENTITY {
                        parts.push(format!("{{{}}}", name))
                    } else {
                        parts.push(format!("{{{}:{}}}", name, resolver.name()))
                    }
                }
            }
        }
        for argument in &self.arguments {
            let (open, close) = if argument.required { ('<', '>') } else { ('[', ']') };
            let vararg = if argument.vararg { "..." } else { "" };
            parts.push(format!(
                "{}{}{}{}",
                open,
                qualified(&argument.name, argument.resolver.as_ref()),
                vararg,
                close
            ));
        }
        for option in &self.options {
            let mut rendered = option.display_name();
            if option.repeatable {
                rendered.push_str("[]");
            }
            if option.required {
                rendered.push('!');
            }
            parts.push(rendered);
            for parameter in &option.parameters {
                parts.push(format!(
                    "{{{}}}",
                    qualified(&parameter.name, parameter.resolver.as_ref())
                ));
            }
        }
        write!(f, "{}", parts.join(" "))
    }
}

fn qualified(name: &str, resolver: Option<&Resolver>) -> String {
    match resolver {
        Some(r) => format!("{}:{}", name, r.name()),
        None => name.to_string(),
    }
}

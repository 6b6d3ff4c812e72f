//! Declaration grammar
//!
//! Compiles the compact textual route syntax into a [`RouteDefinition`].
//! A declaration is split on whitespace and each token is classified on its
//! own, in source order:
//!
//! | Token                      | Meaning                                           |
//! |----------------------------|---------------------------------------------------|
//! | `name`                     | literal segment                                   |
//! | `{name}` / `{name:res}`    | dynamic segment (default resolver `string`)       |
//! | `<name>` / `[name]`        | required / optional argument                      |
//! | `<name...>` / `<...name>`  | vararg argument, also `<name:res...>`             |
//! | `-x`, `-xyz`               | short option; all but the last char are flags     |
//! | `--name`                   | long option                                       |
//! | `!` / `[]` suffix          | required / repeatable option, either order        |
//! | `{param}` after an option  | option parameter, also `{param:res}`              |
//!
//! Segments must come first, arguments before options. A *prefix* fragment
//! only carries segments and is composed with full declarations by
//! concatenation.
//!
//! # Example
//!
//! ```rust,ignore
//! let resolvers = Resolvers::default();
//! let route = Declaration::parse("deploy {region} <env> -vf --tag[] {value}")?
//!     .compile(&resolvers)?;
//! ```

use crate::resolver::{IDENTITY, Resolver, Resolvers};
use crate::route::{RouteDefinition, RouteOption};
use crate::{CliError, CliResult};

#[derive(Clone, Debug, PartialEq, Eq)]
struct SegmentDecl {
    name: String,
    /// `None` for literal segments
    resolver: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ArgumentDecl {
    name: String,
    required: bool,
    vararg: bool,
    resolver: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ParamDecl {
    name: String,
    resolver: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OptionDecl {
    name: String,
    required: bool,
    repeatable: bool,
    params: Vec<ParamDecl>,
}

impl OptionDecl {
    fn flag(name: String) -> Self {
        Self {
            name,
            required: false,
            repeatable: false,
            params: Vec::new(),
        }
    }
}

/// A parsed, not yet compiled declaration.
///
/// Parsing only checks the grammar; resolver names are looked up by
/// [`Declaration::compile`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declaration {
    segments: Vec<SegmentDecl>,
    arguments: Vec<ArgumentDecl>,
    options: Vec<OptionDecl>,
}

impl Declaration {
    /// Parse a full declaration.
    pub fn parse(line: &str) -> CliResult<Self> {
        let mut declaration = Self::default();
        declaration.parse_fragment(line, false)?;
        Ok(declaration)
    }

    /// Parse a prefix fragment. Only segments are allowed.
    pub fn parse_prefix(line: &str) -> CliResult<Self> {
        let mut declaration = Self::default();
        declaration.parse_fragment(line, true)?;
        Ok(declaration)
    }

    /// Compose this fragment with a following one.
    ///
    /// Lists are concatenated in order. Fails when `next` would place a
    /// segment after an argument or option, or an argument after an option.
    pub fn then(mut self, next: Declaration) -> CliResult<Self> {
        let started = !self.arguments.is_empty() || !self.options.is_empty();
        if started && !next.segments.is_empty() {
            return Err(ordering_error());
        }
        if !self.options.is_empty() && !next.arguments.is_empty() {
            return Err(CliError::declaration(
                "Arguments must be specified before options",
            ));
        }
        self.segments.extend(next.segments);
        self.arguments.extend(next.arguments);
        self.options.extend(next.options);
        Ok(self)
    }

    /// Parse `line` as a full declaration and append it to this fragment.
    pub fn extend(&self, line: &str) -> CliResult<Self> {
        self.clone().then(Self::parse(line)?)
    }

    /// Returns true if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.arguments.is_empty() && self.options.is_empty()
    }

    /// Compile into a route, resolving every referenced resolver name.
    pub fn compile(&self, resolvers: &Resolvers) -> CliResult<RouteDefinition> {
        let lookup = |name: &str| -> CliResult<Resolver> {
            resolvers
                .get(name)
                .cloned()
                .ok_or_else(|| CliError::unknown_resolver(name))
        };

        let mut route = RouteDefinition::new();
        for segment in &self.segments {
            route = match &segment.resolver {
                None => route.segment(segment.name.clone())?,
                Some(resolver) => {
                    route.dynamic_segment(segment.name.clone(), lookup(resolver.as_str())?)?
                }
            };
        }
        for argument in &self.arguments {
            let resolver = argument.resolver.as_deref().map(lookup).transpose()?;
            route = if argument.vararg {
                route.var_arg(argument.name.clone(), argument.required, resolver)?
            } else {
                route.arg(argument.name.clone(), argument.required, resolver)?
            };
        }
        for option in &self.options {
            let mut compiled = RouteOption::new(option.name.clone());
            compiled.required = option.required;
            compiled.repeatable = option.repeatable;
            for param in &option.params {
                let resolver = param.resolver.as_deref().map(lookup).transpose()?;
                compiled = compiled.param(param.name.clone(), resolver)?;
            }
            route = route.option(compiled)?;
        }
        Ok(route)
    }

    fn parse_fragment(&mut self, line: &str, prefix: bool) -> CliResult<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut args_started = false;
        let mut options_started = false;
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if token.starts_with('{') {
                if args_started || options_started {
                    return Err(ordering_error());
                }
                self.parse_dynamic_segment(token)?;
            } else if token.starts_with('<') || token.starts_with('[') {
                if prefix {
                    return Err(CliError::declaration(
                        "Arguments are not allowed in prefixes",
                    ));
                }
                if options_started {
                    return Err(CliError::declaration(
                        "Arguments must be specified before options",
                    ));
                }
                args_started = true;
                self.parse_argument(token)?;
            } else if is_short_option(token) {
                if prefix {
                    return Err(CliError::declaration("Options are not allowed in prefixes"));
                }
                args_started = true;
                options_started = true;
                let mut chain: Vec<char> = token[1..].chars().collect();
                // Every char followed by a letter is a plain flag; the tail
                // (last letter plus any suffixes) is the option being declared.
                while chain.len() > 1 && chain[1].is_alphabetic() {
                    let flag = chain.remove(0);
                    self.options.push(OptionDecl::flag(flag.to_string()));
                }
                let tail: String = chain.into_iter().collect();
                i = self.parse_option(&tokens, i, &tail)?;
            } else if is_long_option(token) {
                if prefix {
                    return Err(CliError::declaration("Options are not allowed in prefixes"));
                }
                args_started = true;
                options_started = true;
                i = self.parse_option(&tokens, i, &token[2..])?;
            } else {
                if args_started || options_started {
                    return Err(ordering_error());
                }
                self.segments.push(SegmentDecl {
                    name: token.to_string(),
                    resolver: None,
                });
            }
            i += 1;
        }
        Ok(())
    }

    fn parse_dynamic_segment(&mut self, token: &str) -> CliResult<()> {
        let inner = braced(token, '{', '}')
            .ok_or_else(|| CliError::declaration(format!("Invalid dynamic segment: {}", token)))?;
        let (name, resolver) = match inner.split_once(':') {
            Some((name, resolver)) => (name, resolver),
            None => (inner, IDENTITY),
        };
        if name.is_empty() {
            return Err(CliError::declaration("Name of dynamic segment can not be empty"));
        }
        self.segments.push(SegmentDecl {
            name: name.to_string(),
            resolver: Some(resolver.to_string()),
        });
        Ok(())
    }

    fn parse_argument(&mut self, token: &str) -> CliResult<()> {
        let required = token.starts_with('<');
        let close = if required { '>' } else { ']' };
        let open = if required { '<' } else { '[' };
        let mut inner = braced(token, open, close)
            .ok_or_else(|| CliError::declaration(format!("Invalid argument: {}", token)))?;

        let mut vararg = false;
        if let Some(rest) = inner.strip_prefix("...") {
            vararg = true;
            inner = rest;
        } else if let Some(rest) = inner.strip_suffix("...") {
            vararg = true;
            inner = rest;
        }
        let (mut name, resolver) = match inner.split_once(':') {
            Some((name, resolver)) => (name, Some(resolver.to_string())),
            None => (inner, None),
        };
        // `<name...:res>` and `<...name:res>` once the qualifier is gone
        if !vararg {
            if let Some(rest) = name.strip_suffix("...") {
                vararg = true;
                name = rest;
            } else if let Some(rest) = name.strip_prefix("...") {
                vararg = true;
                name = rest;
            }
        }
        if name.is_empty() {
            return Err(CliError::declaration("Argument name can not be empty"));
        }
        self.arguments.push(ArgumentDecl {
            name: name.to_string(),
            required,
            vararg,
            resolver,
        });
        Ok(())
    }

    /// Parses an option name with suffixes plus its trailing parameter
    /// tokens. Returns the index of the last consumed token.
    fn parse_option(&mut self, tokens: &[&str], mut i: usize, raw: &str) -> CliResult<usize> {
        let mut name = raw;
        let mut required = false;
        let mut repeatable = false;
        if let Some(rest) = name.strip_suffix('!') {
            required = true;
            name = rest;
        }
        if let Some(rest) = name.strip_suffix("[]") {
            repeatable = true;
            name = rest;
        }
        if !required {
            if let Some(rest) = name.strip_suffix('!') {
                required = true;
                name = rest;
            }
        }
        if name.is_empty() {
            return Err(CliError::declaration("Option name can not be empty"));
        }

        let mut params = Vec::new();
        while i + 1 < tokens.len() && tokens[i + 1].starts_with('{') {
            i += 1;
            let token = tokens[i];
            let inner = braced(token, '{', '}').ok_or_else(|| {
                CliError::declaration(format!(
                    "Invalid option parameter (option: {}): {}",
                    name, token
                ))
            })?;
            let (param, resolver) = match inner.split_once(':') {
                Some((param, resolver)) => (param, Some(resolver.to_string())),
                None => (inner, None),
            };
            if param.is_empty() {
                return Err(CliError::declaration("Option parameter name can not be empty"));
            }
            params.push(ParamDecl {
                name: param.to_string(),
                resolver,
            });
        }

        self.options.push(OptionDecl {
            name: name.to_string(),
            required,
            repeatable,
            params,
        });
        Ok(i)
    }
}

/// Parse and compile a full declaration in one step.
pub fn compile(line: &str, resolvers: &Resolvers) -> CliResult<RouteDefinition> {
    Declaration::parse(line)?.compile(resolvers)
}

/// `-x...`: one dash, at least two chars, second char not a dash.
pub(crate) fn is_short_option(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'-' && bytes[1] != b'-'
}

/// `--xyz`: two dashes, at least three chars, third char not a dash.
pub(crate) fn is_long_option(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 3 && token.starts_with("--") && bytes[2] != b'-'
}

fn braced(token: &str, open: char, close: char) -> Option<&str> {
    token.strip_prefix(open)?.strip_suffix(close)
}

fn ordering_error() -> CliError {
    CliError::declaration("Segments must be specified before arguments and options")
}

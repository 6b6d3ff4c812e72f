//! # Command Router
//!
//! A declarative command line routing engine.
//!
//! ## Overview
//!
//! Commands are declared with a compact grammar, compiled into route
//! definitions and dispatched from the raw argument vector:
//! - **Grammar compiler** turning `deploy {region} <env> --tag {value}` into a route
//! - **Matcher** selecting a route structurally, without checking arity
//! - **Validator** binding arguments and options and running resolvers
//! - **Pipeline** running before-middleware, handler and after-middleware
//! - **Host dispatcher** wiring reporters, named middleware and providers
//!
//! ## Architecture
//!
//! ```text
//! argv ──► Router ──► Matcher ──► Validator ──► CommandContext
//!            │   (first structural        │
//!            │    match is committed)     ▼
//!            │                     Pipeline: before* → handler → after*
//!            ▼
//!       not-found reporter          errors ──► exception reporter
//! ```
//!
//! ## Declaration Grammar
//!
//! | Token                     | Meaning                                   |
//! |---------------------------|-------------------------------------------|
//! | `name`                    | literal segment                           |
//! | `{name}` `{name:resolver}`| dynamic segment                           |
//! | `<name>` `[name]`         | required / optional argument              |
//! | `<name...>` `[...name]`   | vararg argument                           |
//! | `<name:resolver>`         | argument with resolver                    |
//! | `-v` `-abc`               | short option, or chain of flags + option  |
//! | `--name`                  | long option                               |
//! | `!` `[]` suffix           | required / repeatable option              |
//! | `{param}` after an option | option parameter                          |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use command_router::prelude::*;
//!
//! fn deploy(ctx: &mut CommandContext) -> CliResult<Flow> {
//!     let env: String = ctx.arg("env")?;
//!     let tag: Option<String> = if ctx.has_option("tag") {
//!         Some(ctx.option_value("tag", "value")?)
//!     } else {
//!         None
//!     };
//!     ctx.print(&format!("deploying {} ({:?})", env, tag));
//!     Ok(Flow::Continue)
//! }
//!
//! let cli = Cli::new().route("deploy <env> --tag {value}", from_fn(deploy), &[])?;
//! let success = cli.execute(std::env::args().skip(1));
//! ```
//!
//! ## Routing Order
//!
//! Routes are tried in registration order and the first structural match is
//! final. Validation errors on that route do not fall back to later routes,
//! so register specific routes before general ones.

mod cli;
mod config;
mod context;
pub mod declaration;
mod error;
pub mod handler;
mod invocation;
pub mod io;
pub mod matcher;
pub mod middleware;
pub mod pipeline;
pub mod provider;
pub mod resolver;
pub mod route;
mod router;
pub mod validator;

#[cfg(test)]
mod tests;

// Public API
pub use cli::{Cli, Scope};
pub use config::RouterConfig;
pub use context::{CommandContext, OptionValues};
pub use declaration::{Declaration, compile};
pub use error::{CliError, CliErrorCode, CliResult};
pub use handler::{DefaultExceptionHandler, DefaultNotFoundHandler, ExceptionHandler, NotFoundHandler};
pub use invocation::InvocationId;
pub use io::{Input, MemoryInput, MemoryOutput, Output, StdInput, StdOutput};
pub use matcher::{ParseResult, RawOption, match_route};
pub use middleware::{Flow, HandlerFn, Middleware, MiddlewareFn, MiddlewareRegistry, from_fn, from_middleware};
pub use provider::Providers;
pub use resolver::{Resolver, Resolvers};
pub use route::{Argument, OptionParameter, RouteDefinition, RouteOption, Segment};
pub use router::{RouteMatch, Router};
pub use validator::validate;

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use command_router::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Cli, CliError, CliErrorCode, CliResult, CommandContext, Declaration, Flow, HandlerFn,
        Input, InvocationId, MemoryInput, MemoryOutput, Middleware, MiddlewareFn, Output,
        Providers, Resolver, Resolvers, RouteDefinition, RouteMatch, RouteOption, Router,
        RouterConfig, Scope, from_fn, from_middleware,
    };
}

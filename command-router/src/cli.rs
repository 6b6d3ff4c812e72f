//! Host dispatcher
//!
//! [`Cli`] owns the router together with everything a dispatch needs around
//! it: the resolver registry used to compile declarations, named
//! middleware, the provider chain, the not-found and exception reporters,
//! and the configuration.
//!
//! # Example
//! ```rust,ignore
//! let cli = Cli::new()
//!     .middleware("auth", from_fn(require_admin))
//!     .route("deploy <env> --tag {value}", from_fn(deploy), &["auth"])?
//!     .scope("user", |scope| {
//!         scope
//!             .route("list", from_fn(list_users), &[])?
//!             .route("get {id:uint}", from_fn(get_user), &[])
//!     })?;
//!
//! let success = cli.execute(std::env::args().skip(1));
//! ```

use crate::declaration::Declaration;
use crate::handler::{DefaultExceptionHandler, DefaultNotFoundHandler, ExceptionHandler, NotFoundHandler};
use crate::invocation::InvocationId;
use crate::io::{Input, Output, StdInput, StdOutput};
use crate::middleware::{HandlerFn, MiddlewareFn, MiddlewareRegistry};
use crate::provider::Providers;
use crate::resolver::{Resolver, Resolvers};
use crate::route::RouteDefinition;
use crate::router::{RouteMatch, Router};
use crate::{CliError, CliResult, RouterConfig};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, debug_span, error, warn};

/// Command line host: registration plus dispatch.
pub struct Cli {
    router: Router,
    resolvers: Resolvers,
    middleware: MiddlewareRegistry,
    providers: Providers,
    not_found: Arc<dyn NotFoundHandler>,
    exception_handler: Arc<dyn ExceptionHandler>,
    config: RouterConfig,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Create a host with the built-in resolvers and default reporters.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            resolvers: Resolvers::default(),
            middleware: MiddlewareRegistry::new(),
            providers: Providers::new(),
            not_found: Arc::new(DefaultNotFoundHandler),
            exception_handler: Arc::new(DefaultExceptionHandler),
            config: RouterConfig::default(),
        }
    }

    // Setup

    /// Replace the configuration.
    pub fn config(mut self, config: RouterConfig) -> CliResult<Self> {
        config.validate().map_err(CliError::internal)?;
        self.config = config;
        Ok(self)
    }

    /// Register a resolver. Only affects routes registered afterwards.
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolvers.insert(resolver);
        self
    }

    /// Register a named middleware that runs before the handler.
    pub fn middleware(mut self, name: impl Into<String>, middleware: MiddlewareFn) -> Self {
        self.middleware.insert_before(name, middleware);
        self
    }

    /// Register a named middleware that runs after the handler.
    pub fn after_middleware(mut self, name: impl Into<String>, middleware: MiddlewareFn) -> Self {
        self.middleware.insert_after(name, middleware);
        self
    }

    /// Make a shared value available through `ctx.provide::<T>()`.
    pub fn provide<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.providers = self.providers.value(value);
        self
    }

    /// Append a provider chain after the registered providers.
    pub fn providers(mut self, providers: Providers) -> Self {
        self.providers.extend(&providers);
        self
    }

    /// Replace the not-found reporter.
    pub fn not_found<H: NotFoundHandler>(mut self, handler: H) -> Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Replace the exception reporter.
    pub fn exception_handler<H: ExceptionHandler>(mut self, handler: H) -> Self {
        self.exception_handler = Arc::new(handler);
        self
    }

    // Registration

    /// Compile `declaration` and register it with `handler` and the named
    /// middleware.
    pub fn route(self, declaration: &str, handler: HandlerFn, middleware: &[&str]) -> CliResult<Self> {
        let declaration = Declaration::parse(declaration)?;
        self.route_declaration(&declaration, handler, middleware)
    }

    /// Register an already parsed declaration.
    pub fn route_declaration(
        mut self,
        declaration: &Declaration,
        handler: HandlerFn,
        middleware: &[&str],
    ) -> CliResult<Self> {
        let mut route = declaration.compile(&self.resolvers)?.handler(handler);
        for name in middleware {
            self.mount_middleware(&mut route, name)?;
        }
        self.router.register(route);
        Ok(self)
    }

    /// Register a route built by hand.
    pub fn route_definition(mut self, route: RouteDefinition) -> Self {
        self.router.register(route);
        self
    }

    /// Register routes under a common prefix.
    ///
    /// `prefix` may only contain segments.
    pub fn scope<F>(self, prefix: &str, f: F) -> CliResult<Self>
    where
        F: FnOnce(Scope) -> CliResult<Scope>,
    {
        let scope = Scope {
            cli: self,
            prefix: Declaration::parse_prefix(prefix)?,
            middleware: Vec::new(),
        };
        Ok(f(scope)?.cli)
    }

    fn mount_middleware(&self, route: &mut RouteDefinition, name: &str) -> CliResult<()> {
        let before = self.middleware.before(name);
        let after = self.middleware.after(name);
        if before.is_none() && after.is_none() {
            if self.config.strict_middleware {
                return Err(CliError::unknown_middleware(name));
            }
            warn!(middleware = name, route = %route, "Middleware not found, skipping");
            return Ok(());
        }
        if let Some(before) = before {
            route.push_before(before.clone());
        }
        if let Some(after) = after {
            route.push_after(after.clone());
        }
        Ok(())
    }

    // Dispatch

    /// Dispatch `args` using the process stdin and stdout.
    pub fn execute<I, S>(&self, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute_with(args, Box::new(StdInput), Box::new(StdOutput))
    }

    /// Dispatch `args` with the given input and output.
    ///
    /// Returns the success value of the pipeline; `false` when no route
    /// matched, validation failed, or a step returned an error.
    pub fn execute_with<I, S>(&self, args: I, mut input: Box<dyn Input>, mut output: Box<dyn Output>) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let id = InvocationId::new();
        let span = debug_span!("dispatch", invocation = %id);
        let _enter = span.enter();

        if args.len() > self.config.max_tokens {
            let err = CliError::too_many_tokens(args.len(), self.config.max_tokens);
            self.report_validation(&err, output.as_mut());
            return false;
        }

        let (route, mut context) = match self.router.match_tokens(&args) {
            Ok(RouteMatch::Matched { route, context }) => (route, context),
            Ok(RouteMatch::Unmatched) => {
                if let Err(e) = self
                    .not_found
                    .handle_not_found(&args, input.as_mut(), output.as_mut())
                {
                    error!(error = %e, "not-found handler failed");
                    output.report(&e);
                }
                return false;
            }
            Err(e) => {
                self.report_validation(&e, output.as_mut());
                return false;
            }
        };

        context.set_invocation_id(id);
        context.bind_input(input);
        context.bind_output(output);
        context.bind_providers(self.providers.clone());

        match self.router.execute(route, &mut context) {
            Ok(success) => {
                debug!(success, "command finished");
                success
            }
            Err(e) => {
                debug!(error = %e, "command failed");
                if let Err(reporter_error) = self.exception_handler.handle_exception(&mut context, &e) {
                    error!(error = %reporter_error, "exception handler failed");
                    context.error("Error in exception handler");
                    if let Some(output) = context.output() {
                        output.report(&reporter_error);
                    }
                }
                false
            }
        }
    }

    fn report_validation(&self, err: &CliError, output: &mut dyn Output) {
        debug!(error = %err, "validation failed");
        if self.config.report_validation_errors {
            output.error(&err.message);
        }
    }

    // Introspection

    /// Registered routes rendered back to declaration syntax.
    pub fn routes(&self) -> Vec<String> {
        self.router.routes().iter().map(ToString::to_string).collect()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    pub fn get_config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Registration scope created by [`Cli::scope`].
///
/// Every route registered through the scope is prefixed with the scope's
/// segments and runs the scope's middleware before its own.
pub struct Scope {
    cli: Cli,
    prefix: Declaration,
    middleware: Vec<String>,
}

impl Scope {
    /// Add named middleware to every route registered afterwards.
    pub fn with(mut self, middleware: &[&str]) -> Self {
        self.middleware.extend(middleware.iter().map(|name| name.to_string()));
        self
    }

    /// Register a route below the scope's prefix.
    pub fn route(self, declaration: &str, handler: HandlerFn, middleware: &[&str]) -> CliResult<Self> {
        let Scope {
            cli,
            prefix,
            middleware: inherited,
        } = self;
        let full = prefix.extend(declaration)?;
        let names: Vec<&str> = inherited
            .iter()
            .map(String::as_str)
            .chain(middleware.iter().copied())
            .collect();
        let cli = cli.route_declaration(&full, handler, &names)?;
        Ok(Scope {
            cli,
            prefix,
            middleware: inherited,
        })
    }

    /// Open a nested scope.
    pub fn scope<F>(self, prefix: &str, f: F) -> CliResult<Self>
    where
        F: FnOnce(Scope) -> CliResult<Scope>,
    {
        let nested = Scope {
            cli: self.cli,
            prefix: self.prefix.clone().then(Declaration::parse_prefix(prefix)?)?,
            middleware: self.middleware.clone(),
        };
        let cli = f(nested)?.cli;
        Ok(Scope {
            cli,
            prefix: self.prefix,
            middleware: self.middleware,
        })
    }
}

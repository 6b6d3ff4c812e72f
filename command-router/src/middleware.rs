//! Handler and middleware support for command execution

use crate::{CliResult, CommandContext};
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of one pipeline step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Run the next step
    Continue,
    /// Stop the pipeline and report the given success value
    Stop(bool),
}

impl Flow {
    /// Shorthand for `Flow::Stop(true)`.
    pub fn done() -> Self {
        Self::Stop(true)
    }

    /// Shorthand for `Flow::Stop(false)`.
    pub fn fail() -> Self {
        Self::Stop(false)
    }

    /// Returns true if this step stops the pipeline.
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Self::Continue
    }
}

/// Handler function type.
///
/// Handlers and middleware share one signature; the only difference is
/// where they sit in the pipeline.
pub type HandlerFn = Arc<dyn Fn(&mut CommandContext) -> CliResult<Flow> + Send + Sync>;

/// Middleware function type
pub type MiddlewareFn = HandlerFn;

/// Trait for implementing custom middleware
pub trait Middleware: Send + Sync {
    /// Process the invocation, returning whether the pipeline continues
    fn handle(&self, ctx: &mut CommandContext) -> CliResult<Flow>;
}

/// Create a handler or middleware from a function.
///
/// Any function returning a value convertible to [`Flow`] is accepted, so
/// handlers that never stop early can simply return `Ok(())`.
///
/// # Example
/// ```rust,ignore
/// fn audit(ctx: &mut CommandContext) -> CliResult<()> {
///     tracing::info!(invocation = %ctx.invocation_id(), "command started");
///     Ok(())
/// }
///
/// let mw = from_fn(audit);
/// ```
pub fn from_fn<F, R>(f: F) -> HandlerFn
where
    F: Fn(&mut CommandContext) -> CliResult<R> + Send + Sync + 'static,
    R: Into<Flow>,
{
    Arc::new(move |ctx: &mut CommandContext| f(ctx).map(Into::into))
}

/// Wrap a [`Middleware`] implementation as a function.
pub fn from_middleware<M>(middleware: M) -> MiddlewareFn
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: &mut CommandContext| middleware.handle(ctx))
}

/// Named middleware, split into before and after phases.
///
/// A single name may register a before step, an after step, or both.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    before: HashMap<String, MiddlewareFn>,
    after: HashMap<String, MiddlewareFn>,
}

impl MiddlewareRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a before-handler middleware under a name.
    pub fn insert_before(&mut self, name: impl Into<String>, middleware: MiddlewareFn) {
        self.before.insert(name.into(), middleware);
    }

    /// Register an after-handler middleware under a name.
    pub fn insert_after(&mut self, name: impl Into<String>, middleware: MiddlewareFn) {
        self.after.insert(name.into(), middleware);
    }

    /// Look up the before-handler middleware for a name.
    pub fn before(&self, name: &str) -> Option<&MiddlewareFn> {
        self.before.get(name)
    }

    /// Look up the after-handler middleware for a name.
    pub fn after(&self, name: &str) -> Option<&MiddlewareFn> {
        self.after.get(name)
    }

    /// Check if a name is registered in either phase.
    pub fn contains(&self, name: &str) -> bool {
        self.before.contains_key(name) || self.after.contains_key(name)
    }
}

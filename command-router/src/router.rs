//! Ordered route registry
//!
//! Routes are tried in registration order. The first route that matches
//! structurally is committed to: its validation result is final, and a
//! validation error does not fall through to later routes. Register more
//! specific routes before more general ones.

use crate::matcher::match_route;
use crate::pipeline;
use crate::route::RouteDefinition;
use crate::validator::validate;
use crate::{CliResult, CommandContext};
use tracing::{debug, trace};

/// Outcome of [`Router::match_tokens`].
#[derive(Debug)]
pub enum RouteMatch<'a> {
    /// A route matched and validated
    Matched {
        route: &'a RouteDefinition,
        context: CommandContext,
    },
    /// No route matched structurally
    Unmatched,
}

impl RouteMatch<'_> {
    /// Returns true if a route matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Router holding routes in registration order
///
/// # Example
/// ```rust,ignore
/// let mut router = Router::new();
/// router.register(compile("deploy <env>", &resolvers)?.handler(from_fn(deploy)));
///
/// if let RouteMatch::Matched { route, mut context } = router.match_tokens(&args)? {
///     let success = router.execute(route, &mut context)?;
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Router {
    routes: Vec<RouteDefinition>,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route.
    pub fn register(&mut self, route: RouteDefinition) -> &mut Self {
        debug!(route = %route, index = self.routes.len(), "registered route");
        self.routes.push(route);
        self
    }

    /// Find the first route matching `tokens` and validate against it.
    ///
    /// Returns an error only when the committed route fails validation.
    pub fn match_tokens(&self, tokens: &[String]) -> CliResult<RouteMatch<'_>> {
        for (index, route) in self.routes.iter().enumerate() {
            trace!(index, route = %route, "trying route");
            let Some(parsed) = match_route(route, tokens) else {
                continue;
            };
            debug!(index, route = %route, "route matched");
            let context = validate(route, parsed)?;
            return Ok(RouteMatch::Matched { route, context });
        }
        debug!(tokens = tokens.len(), "no route matched");
        Ok(RouteMatch::Unmatched)
    }

    /// Run the pipeline of a matched route.
    pub fn execute(&self, route: &RouteDefinition, context: &mut CommandContext) -> CliResult<bool> {
        pipeline::execute(route, context)
    }

    /// Registered routes, in order.
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

//! Execution pipeline
//!
//! Runs the before-middleware, the handler and the after-middleware of a
//! route in order against one context. A step returning [`Flow::Stop`] ends
//! the pipeline with its value; errors propagate to the caller unchanged.

use crate::middleware::{Flow, MiddlewareFn};
use crate::route::RouteDefinition;
use crate::{CliError, CliResult, CommandContext};
use tracing::trace;

/// Execute `route` against `ctx`, returning the success value.
pub fn execute(route: &RouteDefinition, ctx: &mut CommandContext) -> CliResult<bool> {
    let handler = route
        .get_handler()
        .ok_or_else(|| CliError::missing_handler(&route.to_string()))?;

    if let Some(success) = run_all("before", route.before_middleware(), ctx)? {
        return Ok(success);
    }

    trace!(route = %route, "running handler");
    if let Flow::Stop(success) = handler(ctx)? {
        return Ok(success);
    }

    if let Some(success) = run_all("after", route.after_middleware(), ctx)? {
        return Ok(success);
    }
    Ok(true)
}

/// Run middleware in order, returning the value of the first stop.
fn run_all(
    phase: &'static str,
    steps: &[MiddlewareFn],
    ctx: &mut CommandContext,
) -> CliResult<Option<bool>> {
    for (index, step) in steps.iter().enumerate() {
        if let Flow::Stop(success) = step(ctx)? {
            trace!(phase, index, success, "pipeline stopped by middleware");
            return Ok(Some(success));
        }
    }
    Ok(None)
}

//! Not-found and exception reporters used by the host dispatcher

use crate::io::{Input, Output};
use crate::{CliError, CliResult, CommandContext};

/// Called when no route matches the given arguments.
///
/// Automatically implemented for functions with the signature
/// `fn(&[String], &mut dyn Input, &mut dyn Output) -> CliResult<()>`.
pub trait NotFoundHandler: Send + Sync + 'static {
    fn handle_not_found(
        &self,
        args: &[String],
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> CliResult<()>;
}

impl<F> NotFoundHandler for F
where
    F: Fn(&[String], &mut dyn Input, &mut dyn Output) -> CliResult<()> + Send + Sync + 'static,
{
    fn handle_not_found(
        &self,
        args: &[String],
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> CliResult<()> {
        (self)(args, input, output)
    }
}

/// Called when a handler or middleware returns an error.
///
/// Automatically implemented for functions with the signature
/// `fn(&mut CommandContext, &CliError) -> CliResult<()>`.
pub trait ExceptionHandler: Send + Sync + 'static {
    fn handle_exception(&self, ctx: &mut CommandContext, error: &CliError) -> CliResult<()>;
}

impl<F> ExceptionHandler for F
where
    F: Fn(&mut CommandContext, &CliError) -> CliResult<()> + Send + Sync + 'static,
{
    fn handle_exception(&self, ctx: &mut CommandContext, error: &CliError) -> CliResult<()> {
        (self)(ctx, error)
    }
}

/// Prints `Command not found!` to the error output.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNotFoundHandler;

impl NotFoundHandler for DefaultNotFoundHandler {
    fn handle_not_found(
        &self,
        _args: &[String],
        _input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> CliResult<()> {
        output.error("Command not found!");
        Ok(())
    }
}

/// Prints a generic notice followed by the error and its cause.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExceptionHandler;

impl ExceptionHandler for DefaultExceptionHandler {
    fn handle_exception(&self, ctx: &mut CommandContext, error: &CliError) -> CliResult<()> {
        ctx.error("Unhandled exception during execution of command!");
        if let Some(output) = ctx.output() {
            output.report(error);
        }
        Ok(())
    }
}

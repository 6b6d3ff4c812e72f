//! User directory CLI

mod app;

use command_router::RouterConfig;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let strict = std::env::var("DEMO_STRICT_MIDDLEWARE").is_ok_and(|v| v == "1");
    let config = RouterConfig::new().with_strict_middleware(strict);

    let cli = match app::create_cli(config) {
        Ok(cli) => cli,
        Err(e) => {
            tracing::error!(error = %e, "failed to register commands");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.execute(std::env::args().skip(1)) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

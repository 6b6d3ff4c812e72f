//! Command handlers
//!
//! Registers the `userdir` commands on a [`Cli`].

use super::{AppContext, HealthResponse, User};
use command_router::prelude::*;
use std::time::Instant;

const STARTED_AT: &str = "started_at";

/// Declarations of every registered command, listed by `help`.
pub struct CommandList(pub Vec<String>);

/// Build the `userdir` command line.
pub fn create_cli(config: RouterConfig) -> CliResult<Cli> {
    let cli = Cli::new()
        .config(config)?
        .provide(AppContext::new())
        .middleware("log", from_fn(log_start))
        .after_middleware("log", from_fn(log_finish))
        .middleware("confirm", from_fn(confirm))
        .not_found(unknown_command)
        .route("health", from_fn(health), &[])?
        .route("help", from_fn(help), &[])?
        .route("greet <names...>", from_fn(greet), &[])?
        .scope("user", |scope| {
            scope
                .with(&["log"])
                .route("list --json --admins", from_fn(list_users), &[])?
                .route("get {id:uint} --json", from_fn(get_user), &[])?
                .route("create <name> <email> --admin", from_fn(create_user), &[])?
                .route(
                    "update {id:uint} --name {name} --email {email}",
                    from_fn(update_user),
                    &[],
                )?
                .route("delete {id:uint} --yes", from_fn(delete_user), &["confirm"])?
                .route("count", from_fn(count_users), &[])
        })?;

    let commands = cli.routes();
    Ok(cli.provide(CommandList(commands)))
}

// =============================================================================
// Middleware
// =============================================================================

fn log_start(ctx: &mut CommandContext) -> CliResult<()> {
    tracing::debug!(invocation = %ctx.invocation_id(), "user command started");
    ctx.set_attr(STARTED_AT, Instant::now());
    Ok(())
}

fn log_finish(ctx: &mut CommandContext) -> CliResult<()> {
    if let Some(started) = ctx.attr::<Instant>(STARTED_AT) {
        tracing::debug!(
            invocation = %ctx.invocation_id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "user command finished"
        );
    }
    Ok(())
}

/// Ask before destructive commands unless `--yes` was given.
fn confirm(ctx: &mut CommandContext) -> CliResult<Flow> {
    if ctx.has_option("yes") {
        return Ok(Flow::Continue);
    }

    let id: u64 = ctx.param("id")?;
    ctx.print(&format!("Delete user {}? [y/N]", id));
    let answer = ctx.read_line()?.unwrap_or_default();
    if answer.trim().eq_ignore_ascii_case("y") {
        Ok(Flow::Continue)
    } else {
        Ok(ctx.fail("Aborted"))
    }
}

fn unknown_command(args: &[String], _input: &mut dyn Input, output: &mut dyn Output) -> CliResult<()> {
    if args.is_empty() {
        output.error("No command given, try 'help'");
    } else {
        output.error(&format!("Unknown command '{}', try 'help'", args.join(" ")));
    }
    Ok(())
}

// =============================================================================
// General commands
// =============================================================================

fn health(ctx: &mut CommandContext) -> CliResult<()> {
    let app = ctx.provide::<AppContext>()?;
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        users: app.db.count_users(),
    };
    ctx.print(&serde_json::to_string(&response)?);
    Ok(())
}

fn help(ctx: &mut CommandContext) -> CliResult<()> {
    let commands = ctx.provide::<CommandList>()?;
    ctx.print("Commands:");
    for command in &commands.0 {
        ctx.print(&format!("  {}", command));
    }
    Ok(())
}

fn greet(ctx: &mut CommandContext) -> CliResult<()> {
    let names: Vec<String> = ctx.var_arg("names")?;
    ctx.print(&format!("Hello, {}!", names.join(" and ")));
    Ok(())
}

// =============================================================================
// User commands
// =============================================================================

fn print_users(ctx: &mut CommandContext, users: &[User], json: bool) -> CliResult<()> {
    if json {
        ctx.print(&serde_json::to_string_pretty(users)?);
    } else {
        for user in users {
            ctx.print(&user.to_string());
        }
    }
    Ok(())
}

fn list_users(ctx: &mut CommandContext) -> CliResult<()> {
    let app = ctx.provide::<AppContext>()?;
    let mut users = app.db.list_users();
    if ctx.has_option("admins") {
        users.retain(|u| u.admin);
    }
    let json = ctx.has_option("json");
    print_users(ctx, &users, json)
}

fn get_user(ctx: &mut CommandContext) -> CliResult<Flow> {
    let app = ctx.provide::<AppContext>()?;
    let id: u64 = ctx.param("id")?;

    let Some(user) = app.db.get_user(id) else {
        return Ok(ctx.fail(&format!("User {} not found", id)));
    };

    if ctx.has_option("json") {
        ctx.print(&serde_json::to_string_pretty(&user)?);
    } else {
        ctx.print(&user.to_string());
    }
    Ok(Flow::Continue)
}

fn create_user(ctx: &mut CommandContext) -> CliResult<Flow> {
    let app = ctx.provide::<AppContext>()?;
    let name: String = ctx.arg("name")?;
    let email: String = ctx.arg("email")?;

    if name.trim().is_empty() {
        return Ok(ctx.fail("Name cannot be empty"));
    }
    if !email.contains('@') {
        return Ok(ctx.fail(&format!("Invalid email '{}'", email)));
    }

    let user = app
        .db
        .create_user(name.trim(), &email, ctx.has_option("admin"))
        .ok_or_else(|| CliError::internal("User store unavailable"))?;

    tracing::info!(id = user.id, "user created");
    ctx.print(&format!("Created {}", user));
    Ok(Flow::Continue)
}

fn update_user(ctx: &mut CommandContext) -> CliResult<Flow> {
    let app = ctx.provide::<AppContext>()?;
    let id: u64 = ctx.param("id")?;

    let name: Option<String> = if ctx.has_option("name") {
        Some(ctx.option_value("name", "name")?)
    } else {
        None
    };
    let email: Option<String> = if ctx.has_option("email") {
        Some(ctx.option_value("email", "email")?)
    } else {
        None
    };

    if name.is_none() && email.is_none() {
        return Ok(ctx.fail("Nothing to update, pass --name or --email"));
    }
    if let Some(e) = &email {
        if !e.contains('@') {
            return Ok(ctx.fail(&format!("Invalid email '{}'", e)));
        }
    }

    match app.db.update_user(id, name.as_deref(), email.as_deref()) {
        Some(user) => {
            ctx.print(&format!("Updated {}", user));
            Ok(Flow::Continue)
        }
        None => Ok(ctx.fail(&format!("User {} not found", id))),
    }
}

fn delete_user(ctx: &mut CommandContext) -> CliResult<Flow> {
    let app = ctx.provide::<AppContext>()?;
    let id: u64 = ctx.param("id")?;

    if app.db.delete_user(id) {
        tracing::info!(id, "user deleted");
        ctx.print(&format!("Deleted user {}", id));
        Ok(Flow::Continue)
    } else {
        Ok(ctx.fail(&format!("User {} not found", id)))
    }
}

fn count_users(ctx: &mut CommandContext) -> CliResult<()> {
    let app = ctx.provide::<AppContext>()?;
    let count = app.db.count_users();
    ctx.print(&count.to_string());
    Ok(())
}

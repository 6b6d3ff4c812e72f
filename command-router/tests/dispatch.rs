//! End-to-end dispatch through the public API

use command_router::prelude::*;
use std::sync::Mutex;

#[derive(Default)]
struct Inventory {
    items: Mutex<Vec<(String, u64)>>,
}

fn add(ctx: &mut CommandContext) -> CliResult<Flow> {
    let inventory = ctx.provide::<Inventory>()?;
    let name: String = ctx.arg("name")?;
    let count: Option<u64> = ctx.arg("count")?;
    let tags = ctx.option_count("tag")?;

    inventory
        .items
        .lock()
        .map_err(|_| CliError::internal("inventory poisoned"))?
        .push((name.clone(), count.unwrap_or(1)));
    ctx.print(&format!("added {} x{} ({} tags)", name, count.unwrap_or(1), tags));
    Ok(Flow::Continue)
}

fn list(ctx: &mut CommandContext) -> CliResult<Flow> {
    let inventory = ctx.provide::<Inventory>()?;
    let items = inventory
        .items
        .lock()
        .map_err(|_| CliError::internal("inventory poisoned"))?
        .clone();
    if items.is_empty() {
        ctx.warn("inventory is empty");
        return Ok(ctx.done());
    }
    for (name, count) in items {
        ctx.print(&format!("{}: {}", name, count));
    }
    Ok(Flow::Continue)
}

fn cli() -> Cli {
    Cli::new()
        .provide(Inventory::default())
        .scope("inv", |scope| {
            scope
                .route("add <name> [count:uint] --tag[] {value}", from_fn(add), &[])?
                .route("list", from_fn(list), &[])
        })
        .expect("routes register")
}

fn dispatch(cli: &Cli, args: &[&str]) -> (bool, MemoryOutput) {
    let output = MemoryOutput::new();
    let success = cli.execute_with(
        args.iter().copied(),
        Box::new(MemoryInput::default()),
        Box::new(output.clone()),
    );
    (success, output)
}

#[test]
fn inventory_round_trip() {
    let cli = cli();

    let (ok, out) = dispatch(&cli, &["inv", "list"]);
    assert!(ok);
    assert_eq!(out.warnings(), vec!["inventory is empty"]);

    let (ok, out) = dispatch(&cli, &["inv", "add", "apple", "3", "--tag", "fruit", "--tag", "red"]);
    assert!(ok);
    assert_eq!(out.printed(), vec!["added apple x3 (2 tags)"]);

    let (ok, _) = dispatch(&cli, &["INV", "ADD", "pear"]);
    assert!(ok);

    let (ok, out) = dispatch(&cli, &["inv", "list"]);
    assert!(ok);
    assert_eq!(out.printed(), vec!["apple: 3", "pear: 1"]);
}

#[test]
fn invalid_count_is_a_validation_error() {
    let (ok, out) = dispatch(&cli(), &["inv", "add", "apple", "many"]);
    assert!(!ok);
    assert_eq!(
        out.errors(),
        vec!["Invalid argument value for argument 'count': many"]
    );
}

#[test]
fn unknown_command_is_not_found() {
    let (ok, out) = dispatch(&cli(), &["inv", "remove", "apple"]);
    assert!(!ok);
    assert_eq!(out.errors(), vec!["Command not found!"]);
}

#[test]
fn routes_render_declarations() {
    assert_eq!(
        cli().routes(),
        vec!["inv add <name> [count:uint] --tag[] {value}", "inv list"]
    );
}

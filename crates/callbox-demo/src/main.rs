//! Callbox demo - the tutorial client, run in-process.
//!
//! This binary plays the role of the excluded start-up and transport
//! collaborators: it builds the store, registers the user procedures,
//! and drives the classic create / list / get-by-id call sequence
//! through the dispatcher.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use callbox::{user_procedures, Dispatcher, MemoryStore, ProcedureKind, Registry, UserStore};

#[derive(Parser, Debug)]
#[command(name = "callbox-demo")]
#[command(about = "Tutorial client for the callbox procedure registry")]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Name for the user created by the demo sequence
    #[arg(long, default_value = "sachinraja")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting callbox demo");

    // Start-up phase: build the store and register every procedure
    // before the dispatcher is shared.
    let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
    let mut registry = Registry::new();
    for def in user_procedures(store) {
        registry.register(def)?;
    }

    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();
    info!("Registered procedures: {}", names.join(", "));

    let dispatcher = Dispatcher::new(Arc::new(registry));

    // The tutorial call sequence.
    let created = dispatcher
        .invoke(
            "user.create",
            ProcedureKind::Mutation,
            json!({"name": args.name}),
        )
        .await?;
    info!("user.create -> {}", created);

    let listed = dispatcher
        .invoke("user.list", ProcedureKind::Query, Value::Null)
        .await?;
    info!("user.list -> {}", listed);

    let id = created["id"].clone();
    let fetched = dispatcher
        .invoke("user.byId", ProcedureKind::Query, id)
        .await?;
    info!("user.byId -> {}", fetched);

    // A miss surfaces as a typed error; show the code a transport
    // would hand back to its caller.
    match dispatcher
        .invoke("user.byId", ProcedureKind::Query, json!("999"))
        .await
    {
        Ok(value) => info!("user.byId(999) -> {}", value),
        Err(e) => warn!(
            "user.byId(999) failed (rpc code {}): {}",
            e.to_rpc_error_code(),
            e
        ),
    }

    info!("Demo sequence complete");

    Ok(())
}

//! courseveil: anonymous course-feedback attestation service
//!
//! Course administrators register courses and share the derived course
//! hash; respondents get a one-time keypair bound to a long-lived session
//! cookie and sign their key's digest to prove a submission came from an
//! issued key, without revealing which one.
//!
//! Usage:
//!   courseveil-server --port 8000 --database courses.json

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ipnet::IpNet;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use courseveil_server::{build_router, Allowlist, AppState};
use courseveil_store::{CourseStore, JsonFileStore, MemoryStore};

#[derive(Parser, Debug)]
#[command(name = "courseveil-server")]
#[command(about = "Anonymous course-feedback attestation service")]
struct Args {
    /// Port to listen on (TCP/HTTP)
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Path to the course database file; courses stay in memory if omitted
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// CIDR networks allowed to register courses (repeatable); defaults to
    /// loopback plus the campus admin ranges
    #[arg(long = "allow", value_name = "CIDR")]
    allow: Vec<IpNet>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("courseveil starting...");

    let store: Arc<dyn CourseStore> = match &args.database {
        Some(path) => Arc::new(
            JsonFileStore::open(path)
                .with_context(|| format!("failed to open course database {}", path.display()))?,
        ),
        None => {
            info!("no database path given, courses are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let allowlist = if args.allow.is_empty() {
        Allowlist::default_networks()
    } else {
        Allowlist::new(args.allow.clone())
    };

    let state = Arc::new(AppState::new(store, allowlist));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("failed to bind port {}", args.port))?;
    info!("listening on port {}", args.port);

    println!("\n========================================");
    println!("  courseveil running");
    println!("========================================");
    println!("  HTTP Port: {}", args.port);
    match &args.database {
        Some(path) => println!("  Database:  {}", path.display()),
        None => println!("  Database:  in-memory"),
    }
    println!("========================================\n");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP server failed")?;

    Ok(())
}

//! filedepot: a chunked file-transfer server
//!
//! Clients speak a delimiter-framed text protocol over TCP:
//! - `UPLOAD_CHUNK <filename> <base64-payload> <offset>`
//! - `GET <filename>`
//! - `LIST`
//!
//! Two interchangeable runtimes serve connections:
//! - prefork: worker processes accepting from a shared listening socket
//! - threadpool: a single accept loop feeding a fixed set of worker threads

use filedepot::config::Config;
use filedepot::protocol::handler::FileProtocol;
use filedepot::runtime;
use filedepot::storage::FileStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        runtime = ?config.runtime,
        workers = config.workers,
        root = %config.root.display(),
        "Starting filedepot server"
    );

    let store = FileStore::open(config.root.clone())?;
    let dispatcher = Arc::new(FileProtocol::new(store));

    runtime::run(&config, dispatcher)?;
    Ok(())
}

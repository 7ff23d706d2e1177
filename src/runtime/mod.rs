//! Connection-serving runtime.
//!
//! Two interchangeable worker-pool strategies, sharing the listener,
//! frame codec, and session loop:
//! - `prefork`: worker processes accepting from the shared listening socket
//! - `threadpool`: a single accept loop feeding a fixed set of worker threads
//!
//! Both hand each accepted connection to exactly one session, run it to
//! completion, then make the execution unit available for the next
//! connection. Parallelism comes only from OS processes or threads;
//! every I/O call blocks its unit for the call's duration.

pub mod frame;
pub mod listener;
pub mod prefork;
pub mod session;
pub mod threadpool;

pub use frame::{FrameBuffer, DELIMITER};
pub use session::serve_connection;

use crate::config::{Config, RuntimeType};
use std::io;
use std::sync::Arc;
use tracing::info;

/// One decoded request in, one response document out.
///
/// Runs synchronously on the execution unit that owns the connection;
/// implementations provide no concurrency of their own. The core passes
/// request text through without interpreting it.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, request: &str) -> String;
}

/// Bind the listener and serve with the configured worker-pool strategy.
///
/// Only returns on a fatal startup error or, for the prefork strategy,
/// once every worker process has died.
pub fn run(config: &Config, dispatcher: Arc<dyn Dispatch>) -> io::Result<()> {
    let listener = listener::bind(&config.listen, config.backlog)?;
    info!(addr = %config.listen, backlog = config.backlog, "Server listening");

    match config.runtime {
        RuntimeType::Prefork => prefork::run(listener, config.workers, dispatcher),
        RuntimeType::ThreadPool => threadpool::run(listener, config.workers, dispatcher),
    }
}

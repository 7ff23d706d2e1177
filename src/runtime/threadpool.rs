//! Thread-pool worker runtime: one accept loop feeding a fixed set of
//! worker threads.
//!
//! The calling thread owns the sole accept loop; accepted connections
//! are queued on an unbounded channel and drained by the workers. When
//! every worker is busy the queue grows without limit: backpressure is
//! implicit and uncapped, memory grows with the backlog. A bounded queue
//! with explicit rejection is the hardened alternative if that ever
//! becomes a problem in production.
//!
//! A panic inside a session is caught and logged per task, so one bad
//! connection does not take the shared process down with it. Unlike the
//! prefork strategy there is no process boundary: an error that escapes
//! this containment threatens every connection at once.

use crate::runtime::{session, Dispatch};
use crossbeam_channel::{unbounded, Receiver};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Spawn the worker threads and run the accept loop forever.
pub fn run(listener: TcpListener, workers: usize, dispatcher: Arc<dyn Dispatch>) -> io::Result<()> {
    let (tx, rx) = unbounded::<(TcpStream, SocketAddr)>();

    for worker_id in 0..workers {
        let rx = rx.clone();
        let dispatcher = Arc::clone(&dispatcher);
        thread::Builder::new()
            .name(format!("worker-{worker_id}"))
            .spawn(move || worker_loop(worker_id, rx, dispatcher))?;
    }
    drop(rx);

    info!(workers, "Thread pool started");

    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                debug!(peer = %peer, "Queued connection");
                if tx.send((stream, peer)).is_err() {
                    return Err(io::Error::new(io::ErrorKind::Other, "worker pool is empty"));
                }
            }
            Err(e) => error!(error = %e, "Failed to accept connection"),
        }
    }
}

/// One worker thread: take a connection, serve it to completion, repeat.
fn worker_loop(worker_id: usize, rx: Receiver<(TcpStream, SocketAddr)>, dispatcher: Arc<dyn Dispatch>) {
    for (mut stream, peer) in rx {
        debug!(worker = worker_id, peer = %peer, "Client connected");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            session::serve_connection(&mut stream, dispatcher.as_ref())
        }));
        match outcome {
            Ok(Ok(())) => debug!(worker = worker_id, peer = %peer, "Connection closed"),
            Ok(Err(e)) => {
                error!(worker = worker_id, peer = %peer, error = %e, "Connection error")
            }
            Err(_) => {
                error!(worker = worker_id, peer = %peer, "Session panicked, connection dropped")
            }
        }
    }
}

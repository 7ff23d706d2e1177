//! Prefork worker pool: K long-lived processes accepting from one
//! shared listening socket.
//!
//! Every worker is forked before serving begins and inherits the
//! listening fd. Each one independently blocks in `accept`; the kernel
//! accept queue arbitrates which worker receives a pending connection,
//! so no userspace coordination is needed. A worker serves at most one
//! connection at a time, fully synchronously, then returns to `accept`.
//!
//! Fault isolation is the point of this strategy: a crash or hang in one
//! worker only affects the connection it holds. Dead workers are not
//! respawned; pool capacity silently shrinks until restart.

use crate::runtime::{session, Dispatch};
use std::io;
use std::net::TcpListener;
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fork the worker pool and block until every worker has exited.
pub fn run(listener: TcpListener, workers: usize, dispatcher: Arc<dyn Dispatch>) -> io::Result<()> {
    let mut children = Vec::with_capacity(workers);

    for worker_id in 0..workers {
        match unsafe { libc::fork() } {
            -1 => return Err(io::Error::last_os_error()),
            0 => {
                // Child: serve on the inherited listening fd until death.
                accept_loop(worker_id, &listener, dispatcher.as_ref());
                process::exit(0);
            }
            pid => children.push(pid),
        }
    }

    info!(workers, "Prefork pool started");

    // Workers are never respawned: every exit observed here permanently
    // reduces pool capacity.
    for pid in children {
        let mut status: libc::c_int = 0;
        if unsafe { libc::waitpid(pid, &mut status, 0) } == -1 {
            return Err(io::Error::last_os_error());
        }
        warn!(pid, status, "Worker process exited; pool capacity reduced");
    }

    Ok(())
}

/// One worker's unbounded accept loop.
fn accept_loop(worker_id: usize, listener: &TcpListener, dispatcher: &dyn Dispatch) {
    loop {
        match listener.accept() {
            Ok((mut stream, peer)) => {
                debug!(worker = worker_id, peer = %peer, "Client connected");
                if let Err(e) = session::serve_connection(&mut stream, dispatcher) {
                    error!(worker = worker_id, peer = %peer, error = %e, "Connection error");
                }
                debug!(worker = worker_id, peer = %peer, "Connection closed");
            }
            Err(e) => {
                // This worker dies; its siblings keep accepting.
                error!(worker = worker_id, error = %e, "Accept failed, worker exiting");
                return;
            }
        }
    }
}

//! Listening socket setup, shared by both worker-pool runtimes.

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener};

/// Create the bound, listening socket.
///
/// Address reuse is enabled so restarts don't trip over TIME_WAIT. The
/// socket stays in blocking mode: `accept` parks the calling execution
/// unit until the kernel grants a connection. Bind or listen failure is
/// fatal at startup and is not retried.
pub fn bind(addr: &str, backlog: i32) -> io::Result<TcpListener> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let socket = Socket::new(
        match addr {
            SocketAddr::V4(_) => Domain::IPV4,
            SocketAddr::V6(_) => Domain::IPV6,
        },
        Type::STREAM,
        Some(Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;

    Ok(socket.into())
}

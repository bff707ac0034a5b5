//! TCP listener bind/accept, trimmed from the teacher's generic
//! `Tcp`/`Unix` `Listener` enum — this proxy only ever binds one TCP
//! port (see DESIGN.md, Trims).

use crate::error::{Error, Result};
use tokio::net::{TcpListener, TcpStream};
use std::net::SocketAddr;

/// Bind a TCP listener on `addr`, with `SO_REUSEADDR` set and a
/// generous backlog, mirroring `ListenerAddress::bind_to_listener`'s
/// TCP branch.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4()
    } else {
        tokio::net::TcpSocket::new_v6()
    }
    .map_err(|e| Error::wrap("failed to create listening socket", e))?;

    socket
        .set_reuseaddr(true)
        .map_err(|e| Error::wrap("failed to set SO_REUSEADDR", e))?;
    socket
        .bind(addr)
        .map_err(|e| Error::wrap(format!("failed to bind {addr}"), e))?;

    const BACKLOG: u32 = 1024;
    socket
        .listen(BACKLOG)
        .map_err(|e| Error::wrap("failed to listen", e))
}

/// Accept a single connection, logging (not failing the loop) on
/// transient accept errors — the caller decides whether to continue.
pub async fn accept(listener: &TcpListener) -> std::io::Result<(TcpStream, SocketAddr)> {
    listener.accept().await
}

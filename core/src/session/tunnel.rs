//! HTTPS `CONNECT` tunneling (spec §4.4): opaque bidirectional relay
//! between the client and the origin, opened once the `CONNECT`
//! target clears the blocklist.
//!
//! Grounded on `service/duplex.rs`'s commented-out `copy_bidirectional`
//! sketch — that design shuttled bytes through an `mpsc` channel
//! between two tasks per direction; here each direction is instead one
//! self-contained task doing its own read/write loop, joined with
//! `tokio::join!`, which gives the half-close tolerance the teacher's
//! sketch could not (see DESIGN.md, Open Questions).

use super::request::parse_request_line;
use super::response;
use super::Shared;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const RELAY_BUFFER_SIZE: usize = 8 * 1024;

pub async fn handle(mut client: TcpStream, head: &Bytes, shared: &Shared) {
    let head_str = match std::str::from_utf8(head) {
        Ok(s) => s,
        Err(_) => return,
    };

    let (line, _rest) = match parse_request_line(head_str) {
        Some(parsed) => parsed,
        None => return,
    };

    let (host, port) = match parse_authority(line.target) {
        Some(authority) => authority,
        None => return,
    };

    if shared.blocklist.contains(&host) {
        let _ = client.write_all(&response::forbidden(&host)).await;
        return;
    }

    let origin = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(%host, port, error = %e, "tunnel target unreachable");
            let _ = client.write_all(&response::bad_gateway(&host, port)).await;
            return;
        }
    };

    if client.write_all(response::TUNNEL_ESTABLISHED).await.is_err() {
        return;
    }

    relay(client, origin).await;
}

/// `host:port`, defaulting the port to 443 when absent (spec §4.4.1).
fn parse_authority(target: &str) -> Option<(String, u16)> {
    match target.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port.parse().ok()?;
            Some((host.to_lowercase(), port))
        }
        None => Some((target.to_lowercase(), 443)),
    }
}

/// Relay bytes in both directions until both halves have closed.
/// Each direction closes its own write half as soon as its read side
/// sees EOF, so one side finishing early doesn't stall the other.
async fn relay(client: TcpStream, origin: TcpStream) {
    let (mut client_rd, mut client_wr) = client.into_split();
    let (mut origin_rd, mut origin_wr) = origin.into_split();

    let to_origin = async move {
        let mut buf = [0u8; RELAY_BUFFER_SIZE];
        loop {
            match client_rd.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if origin_wr.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                    if origin_wr.flush().await.is_err() {
                        break;
                    }
                }
            }
        }
        let _ = origin_wr.shutdown().await;
    };

    let to_client = async move {
        let mut buf = [0u8; RELAY_BUFFER_SIZE];
        loop {
            match origin_rd.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if client_wr.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                    if client_wr.flush().await.is_err() {
                        break;
                    }
                }
            }
        }
        let _ = client_wr.shutdown().await;
    };

    tokio::join!(to_origin, to_client);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_port() {
        assert_eq!(parse_authority("Origin.test:8443"), Some(("origin.test".into(), 8443)));
    }

    #[test]
    fn defaults_to_443_without_port() {
        assert_eq!(parse_authority("origin.test"), Some(("origin.test".into(), 443)));
    }

    #[tokio::test]
    async fn tunnel_relays_bytes_in_both_directions() {
        let client_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client_addr = client_listener.local_addr().unwrap();
        let origin_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin_addr = origin_listener.local_addr().unwrap();

        let client_task = tokio::spawn(async move {
            let mut client = TcpStream::connect(client_addr).await.unwrap();
            client.write_all(b"to-origin").await.unwrap();
            client.shutdown().await.unwrap();
            let mut buf = Vec::new();
            client.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let origin_task = tokio::spawn(async move {
            let (mut origin, _) = origin_listener.accept().await.unwrap();
            let mut buf = Vec::new();
            origin.read_to_end(&mut buf).await.unwrap();
            origin.write_all(b"to-client").await.unwrap();
            origin.shutdown().await.unwrap();
            buf
        });

        let (client_side, _) = client_listener.accept().await.unwrap();
        let origin_side = TcpStream::connect(origin_addr).await.unwrap();
        relay(client_side, origin_side).await;

        let received_by_client = client_task.await.unwrap();
        let received_by_origin = origin_task.await.unwrap();
        assert_eq!(received_by_client, b"to-client");
        assert_eq!(received_by_origin, b"to-origin");
    }
}

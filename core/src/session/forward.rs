//! Plaintext GET forwarding (spec §4.3): method gate, block check,
//! cache check, origin fetch, response drain and cache fill.
//!
//! Grounded on `session/request.rs`'s `build_to_buffer` for the shape
//! of "request line bytes, then header lines, then a blank line", and
//! on `session/case.rs`'s case-preserving header pass-through — here
//! simplified to raw string passthrough since this proxy never
//! restructures headers, only forwards them minus `Proxy-Connection*`.

use super::request::{header_lines, parse_request_line};
use super::response;
use super::Shared;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use url::Url;

pub async fn handle(mut client: TcpStream, head: &Bytes, shared: &Shared) {
    let head_str = match std::str::from_utf8(head) {
        Ok(s) => s,
        Err(_) => return,
    };

    let (line, rest) = match parse_request_line(head_str) {
        Some(parsed) => parsed,
        None => return,
    };

    if line.method != "GET" {
        tracing::debug!(method = line.method, "method not forwarded");
        return;
    }

    let url = match Url::parse(line.target) {
        Ok(url) => url,
        Err(_) => return,
    };

    let host = match url.host_str() {
        Some(host) => host.to_lowercase(),
        None => return,
    };
    let port = url.port().unwrap_or(80);

    let path = {
        let mut p = url.path().to_string();
        if let Some(query) = url.query() {
            p.push('?');
            p.push_str(query);
        }
        if p.is_empty() {
            p.push('/');
        }
        p
    };

    if shared.blocklist.contains(&host) {
        let _ = client.write_all(&response::forbidden(&host)).await;
        return;
    }

    let cache_key = line.target.to_string();
    if let Some(cached) = shared.cache.get(&cache_key) {
        let _ = client.write_all(&cached).await;
        return;
    }

    let mut origin = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(%host, port, error = %e, "failed to connect to origin");
            return;
        }
    };

    let mut request = BytesMut::with_capacity(head.len());
    request.extend_from_slice(line.method.as_bytes());
    request.extend_from_slice(b" ");
    request.extend_from_slice(path.as_bytes());
    request.extend_from_slice(b" ");
    request.extend_from_slice(line.version.as_bytes());
    request.extend_from_slice(b"\r\n");

    for header in header_lines(rest) {
        if is_proxy_connection(header) {
            continue;
        }
        request.extend_from_slice(header.as_bytes());
        request.extend_from_slice(b"\r\n");
    }
    request.extend_from_slice(b"\r\n");

    if origin.write_all(&request).await.is_err() {
        return;
    }

    let mut response = BytesMut::new();
    loop {
        let mut chunk = [0u8; 8192];
        match origin.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => response.extend_from_slice(&chunk[..n]),
            Err(e) => {
                tracing::warn!(%host, port, error = %e, "origin read failed mid-exchange");
                return;
            }
        }
    }

    if client.write_all(&response).await.is_err() {
        return;
    }

    shared.cache.put(cache_key, response.freeze());
}

fn is_proxy_connection(header_line: &str) -> bool {
    header_line
        .split_once(':')
        .map(|(name, _)| name.trim().to_ascii_lowercase().starts_with("proxy-connection"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_proxy_connection_case_insensitively() {
        assert!(is_proxy_connection("Proxy-Connection: keep-alive"));
        assert!(is_proxy_connection("PROXY-CONNECTION-FOO: bar"));
        assert!(!is_proxy_connection("Connection: keep-alive"));
        assert!(!is_proxy_connection("Host: example.com"));
    }
}

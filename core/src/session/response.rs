//! Byte-exact wire responses the proxy emits on its own behalf, per
//! spec §6's "Wire formats emitted by the proxy".

use bytes::Bytes;

fn html_page(status_line: &str, body: String) -> Bytes {
    let mut page = String::new();
    page.push_str(status_line);
    page.push_str("\r\n");
    page.push_str("Content-Type: text/html\r\n");
    page.push_str("Connection: close\r\n");
    page.push_str("\r\n");
    page.push_str(&body);
    Bytes::from(page.into_bytes())
}

/// The 403 page sent when a target host is on the blocklist.
pub fn forbidden(host: &str) -> Bytes {
    html_page(
        "HTTP/1.1 403 Forbidden",
        format!("<html><body><h1>403 Forbidden</h1><p>Access to the host '{host}' is blocked.</p></body></html>"),
    )
}

/// The 502 page sent when a `CONNECT` target cannot be reached.
pub fn bad_gateway(host: &str, port: u16) -> Bytes {
    html_page(
        "HTTP/1.1 502 Bad Gateway",
        format!("<html><body><h1>502 Bad Gateway</h1><p>Failed to connect to {host}:{port}</p></body></html>"),
    )
}

/// The exact bytes acknowledging a successful `CONNECT`.
pub const TUNNEL_ESTABLISHED: &[u8] = b"HTTP/1.1 200 Connection Established\r\n\r\n";

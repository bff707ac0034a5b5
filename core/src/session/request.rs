//! Reading and tokenizing the client's opening request buffer.
//!
//! Grounded on `service/buffer.rs`'s `BufferSession::read_stream`
//! pattern of one `read_buf` call into a `BytesMut`, simplified to the
//! single fixed-size read the spec calls for (§4.3 step 1): the
//! complete request head is assumed to fit in one buffer; there is no
//! retry loop hunting for `\r\n\r\n`.

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

/// Size of the single read performed at the start of every connection.
pub const HEAD_BUFFER_SIZE: usize = 4096;

/// Read up to [`HEAD_BUFFER_SIZE`] bytes from `client`. Returns `None`
/// on EOF, read error, or an empty read — all silently close the job
/// per spec §4.3/§7's "malformed client request" policy.
pub async fn read_head(client: &mut TcpStream) -> Option<Bytes> {
    let mut buf = BytesMut::with_capacity(HEAD_BUFFER_SIZE);
    match client.read_buf(&mut buf).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.freeze()),
    }
}

/// The request line's three whitespace-separated tokens, and the byte
/// offset of the line terminator.
pub struct RequestLine<'a> {
    pub method: &'a str,
    pub target: &'a str,
    pub version: &'a str,
}

/// Split `head` into its request line and the raw header block that
/// follows (everything after the first CRLF, headers included, up to
/// but not including the terminating blank line). Returns `None` if
/// the request line has fewer than three tokens (§4.3 step 2).
pub fn parse_request_line(head: &str) -> Option<(RequestLine<'_>, &str)> {
    let (line, rest) = head.split_once("\r\n").unwrap_or((head, ""));
    let mut tokens = line.split(' ');
    let method = tokens.next()?;
    let target = tokens.next()?;
    let version = tokens.next()?;
    Some((RequestLine { method, target, version }, rest))
}

/// Iterate header lines out of the raw block returned by
/// [`parse_request_line`], stopping at the first blank line.
pub fn header_lines(rest: &str) -> impl Iterator<Item = &str> {
    rest.split("\r\n").take_while(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_request_line() {
        let head = "GET http://example.com/x HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let (line, rest) = parse_request_line(head).unwrap();
        assert_eq!(line.method, "GET");
        assert_eq!(line.target, "http://example.com/x");
        assert_eq!(line.version, "HTTP/1.1");
        assert_eq!(header_lines(rest).collect::<Vec<_>>(), vec!["Host: example.com"]);
    }

    #[test]
    fn rejects_short_request_line() {
        assert!(parse_request_line("GET\r\n\r\n").is_none());
    }
}

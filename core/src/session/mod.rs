//! Per-connection request handling: reading the client's opening
//! buffer, branching into the HTTP forwarder or the HTTPS tunnel, and
//! building the proxy's own wire responses.

pub mod forward;
pub mod request;
pub mod response;
pub mod tunnel;

use crate::block::BlockSet;
use crate::cache::Cache;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Resources shared by every worker, handed down to a single connection.
#[derive(Clone)]
pub struct Shared {
    pub cache: Arc<Cache>,
    pub blocklist: Arc<BlockSet>,
}

/// Handle one accepted client connection end to end. Closes `client` on
/// every exit path by virtue of dropping it when this function returns.
pub async fn handle(mut client: TcpStream, shared: Shared) {
    let head = match request::read_head(&mut client).await {
        Some(head) => head,
        None => return,
    };

    if head.starts_with(b"CONNECT") {
        tunnel::handle(client, &head, &shared).await;
    } else {
        forward::handle(client, &head, &shared).await;
    }
}

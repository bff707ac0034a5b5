//! Initial blocklist loading (spec §6 "Blocklist file"): one entry per
//! line, normalized and inserted; a missing file is tolerated.

use proxy_core::block::{normalize, BlockSet};
use std::path::Path;

pub const BLOCKLIST_FILE: &str = "blocked_urls.txt";

pub async fn load_blocklist(blocklist: &BlockSet, path: impl AsRef<Path>) {
    let path = path.as_ref();
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "blocklist file not loaded");
            return;
        }
    };

    let mut loaded = 0usize;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(normalized) = normalize(line) {
            blocklist.add(normalized);
            loaded += 1;
        }
    }
    tracing::info!(path = %path.display(), loaded, "blocklist file loaded");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_tolerated() {
        let blocklist = BlockSet::new();
        load_blocklist(&blocklist, "/nonexistent/blocked_urls.txt").await;
        assert!(blocklist.is_empty());
    }

    #[tokio::test]
    async fn loads_and_normalizes_each_line() {
        let dir = std::env::temp_dir().join(format!("fproxy-bootstrap-test-{}", std::process::id()));
        tokio::fs::write(&dir, "http://WWW.Example.com/x\nwww.other.test\n\nexample.com\n")
            .await
            .unwrap();

        let blocklist = BlockSet::new();
        load_blocklist(&blocklist, &dir).await;
        assert!(blocklist.contains("example.com"));
        assert!(blocklist.contains("other.test"));

        tokio::fs::remove_file(&dir).await.ok();
    }
}

//! Host normalization and the dynamically mutable blocklist.
//!
//! Grounded on spec.md §4.2 for the normalization algorithm; the
//! concurrent-set shape follows the `parking_lot` pairing used
//! throughout `core/` (e.g. `service/lru.rs`'s `RwLock`-guarded store).

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashSet;
use url::Url;

/// Normalize a free-form host or URL string to a blocklist lookup key.
///
/// 1. If `s` contains `"://"`, parse it as a URL and take its host.
///    Otherwise take `s` unchanged.
/// 2. Lowercase.
/// 3. Drop a leading `"www."`.
/// 4. An empty result or a parse failure is invalid.
pub fn normalize(s: &str) -> Option<String> {
    let host = if s.contains("://") {
        Url::parse(s).ok()?.host_str()?.to_string()
    } else {
        s.to_string()
    };

    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// An insertion-only, concurrently readable/writable set of normalized
/// hostnames. There is no remove operation — the set only ever grows
/// over the process lifetime.
pub struct BlockSet {
    hosts: RwLock<HashSet<String, RandomState>>,
}

impl BlockSet {
    pub fn new() -> Self {
        BlockSet {
            hosts: RwLock::new(HashSet::with_hasher(RandomState::new())),
        }
    }

    /// Insert an already-normalized hostname. Returns `true` if it was
    /// newly inserted.
    pub fn add(&self, normalized: String) -> bool {
        self.hosts.write().insert(normalized)
    }

    /// Normalize `host` the same way as any would-be blocklist entry
    /// and report whether it is present.
    pub fn contains(&self, host: &str) -> bool {
        match normalize(host) {
            Some(normalized) => self.hosts.read().contains(&normalized),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.hosts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BlockSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_idempotent() {
        for s in ["http://WWW.Example.com/x", "www.example.com", "example.com"] {
            let once = normalize(s).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn normalize_equivalences() {
        assert_eq!(normalize("http://WWW.Example.com/x").unwrap(), "example.com");
        assert_eq!(normalize("www.example.com").unwrap(), "example.com");
        assert_eq!(normalize("example.com").unwrap(), "example.com");
    }

    #[test]
    fn normalize_rejects_empty_or_unparseable() {
        assert!(normalize("").is_none());
        assert!(normalize("://").is_none());
    }

    #[test]
    fn block_enforcement_matches_case_and_www_variants() {
        let blocked = BlockSet::new();
        blocked.add(normalize("example.com").unwrap());

        assert!(blocked.contains("example.com"));
        assert!(blocked.contains("EXAMPLE.com"));
        assert!(blocked.contains("www.example.com"));
        assert!(blocked.contains("http://www.Example.com/path"));
        assert!(!blocked.contains("other.com"));
    }

    #[test]
    fn add_reports_novelty() {
        let blocked = BlockSet::new();
        assert!(blocked.add("example.com".into()));
        assert!(!blocked.add("example.com".into()));
    }
}

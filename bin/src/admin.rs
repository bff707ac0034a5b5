//! The stdin admin console (spec §6 "Admin console"): one command per
//! line, driving blocklist insertions and shutdown.

use proxy_core::block::{normalize, BlockSet};
use proxy_core::Dispatcher;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(blocklist: Arc<BlockSet>, dispatcher: Arc<Dispatcher>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "admin console read failed");
                break;
            }
        };

        match process_line(&line, &blocklist) {
            Outcome::Continue => {}
            Outcome::NoInput => println!("No input entered."),
            Outcome::Invalid => println!("Invalid hostname or URL."),
            Outcome::Shutdown => {
                dispatcher.request_shutdown().await;
                break;
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Continue,
    NoInput,
    Invalid,
    Shutdown,
}

fn process_line(line: &str, blocklist: &BlockSet) -> Outcome {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Outcome::NoInput;
    }

    if trimmed.eq_ignore_ascii_case("exit") {
        return Outcome::Shutdown;
    }

    match normalize(trimmed) {
        Some(normalized) => {
            blocklist.add(normalized);
            Outcome::Continue
        }
        None => Outcome::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_reports_no_input() {
        let blocklist = BlockSet::new();
        assert_eq!(process_line("", &blocklist), Outcome::NoInput);
        assert_eq!(process_line("   ", &blocklist), Outcome::NoInput);
    }

    #[test]
    fn exit_is_case_insensitive() {
        let blocklist = BlockSet::new();
        assert_eq!(process_line("EXIT", &blocklist), Outcome::Shutdown);
        assert_eq!(process_line("Exit", &blocklist), Outcome::Shutdown);
    }

    #[test]
    fn adds_valid_host_and_reports_continue() {
        let blocklist = BlockSet::new();
        assert_eq!(process_line("http://bad.test/x", &blocklist), Outcome::Continue);
        assert!(blocklist.contains("bad.test"));
    }

    #[test]
    fn rejects_unparseable_input() {
        let blocklist = BlockSet::new();
        assert_eq!(process_line("://", &blocklist), Outcome::Invalid);
    }
}

//! File-backed top-10 leaderboards with an HTTP API.
//!
//! - [`Submission`] - validated payloads for each [`GameId`]
//! - [`ScoreStore`] - one JSON file per game, improve-only merges
//! - [`StandingsCache`] - TTL cache in front of the store
//! - [`ScoreSubmitter`] - non-blocking, single-flight submissions for game loops
//! - [`router`] / [`serve`] - the axum API

pub use self::{cache::*, client::*, entry::*, server::*, store::*};

mod cache;
mod client;
mod entry;
mod server;
mod store;

#[cfg(test)]
fn scratch_dir(label: &str) -> std::path::PathBuf {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::{SystemTime, UNIX_EPOCH},
    };

    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "stackfall-{label}-{}-{nanos}-{n}",
        std::process::id()
    ))
}

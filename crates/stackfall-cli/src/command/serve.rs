use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context as _;
use stackfall_leaderboard::{ApiState, StandingsCache};

use super::StoreArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ServeArg {
    /// Listen address; falls back to `STACKFALL_ADDR`, then `STACKFALL_PORT` on localhost
    #[clap(long)]
    addr: Option<SocketAddr>,
    #[clap(flatten)]
    store: StoreArg,
    /// How long a read leaderboard is served from memory
    #[clap(long, default_value_t = 5)]
    cache_ttl_secs: u64,
}

pub(crate) fn run(arg: &ServeArg) -> anyhow::Result<()> {
    let ServeArg {
        addr,
        store,
        cache_ttl_secs,
    } = arg;

    let addr = stackfall_leaderboard::resolve_addr(*addr, |key| env::var(key).ok());
    let store = Arc::new(store.open());
    eprintln!("scores directory: {}", store.dir().display());
    let state = ApiState::new(store, StandingsCache::new(Duration::from_secs(*cache_ttl_secs)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime
        .block_on(stackfall_leaderboard::serve(addr, state))
        .with_context(|| format!("leaderboard server on {addr} failed"))
}

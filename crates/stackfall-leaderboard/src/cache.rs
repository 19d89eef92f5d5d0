use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use crate::entry::{GameId, Standings};

/// Recently read standings, valid for a fixed time-to-live.
#[derive(Debug)]
pub struct StandingsCache {
    ttl: Duration,
    entries: Mutex<HashMap<GameId, (Instant, Standings)>>,
}

impl StandingsCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached standings if they are younger than the TTL.
    #[must_use]
    pub fn get(&self, game: GameId) -> Option<Standings> {
        let entries = self.entries();
        let (stored_at, standings) = entries.get(&game)?;
        (stored_at.elapsed() < self.ttl).then(|| standings.clone())
    }

    pub fn put(&self, standings: Standings) {
        self.entries()
            .insert(standings.game(), (Instant::now(), standings));
    }

    pub fn invalidate(&self, game: GameId) {
        self.entries().remove(&game);
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<GameId, (Instant, Standings)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

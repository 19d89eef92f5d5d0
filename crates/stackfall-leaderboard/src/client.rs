use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{runtime::Handle, sync::mpsc};

use crate::{
    entry::{GameId, Standings, Submission},
    store::{ScoreStore, StoreError},
};

/// Read and write access to the leaderboards.
pub trait Leaderboard: Send + Sync {
    fn standings(&self, game: GameId) -> Result<Standings, StoreError>;

    fn submit(&self, submission: Submission) -> Result<Standings, StoreError>;
}

impl Leaderboard for ScoreStore {
    fn standings(&self, game: GameId) -> Result<Standings, StoreError> {
        ScoreStore::standings(self, game)
    }

    fn submit(&self, submission: Submission) -> Result<Standings, StoreError> {
        ScoreStore::submit(self, submission)
    }
}

pub type SubmitResult = Result<Standings, StoreError>;

/// Clears the in-flight flag when the submission task ends, even by panic.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submits scores in the background, one at a time.
///
/// [`Self::submit`] never blocks: the work runs on the runtime's blocking
/// pool and the outcome is delivered to [`Self::try_recv`]. While a
/// submission is in flight further submissions are rejected, not queued.
pub struct ScoreSubmitter {
    board: Arc<dyn Leaderboard>,
    runtime: Handle,
    in_flight: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<SubmitResult>,
    rx: mpsc::UnboundedReceiver<SubmitResult>,
}

impl ScoreSubmitter {
    #[must_use]
    pub fn new(board: Arc<dyn Leaderboard>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            board,
            runtime,
            in_flight: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Arc<dyn Leaderboard> {
        &self.board
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Starts a submission; returns `false` if one is already running.
    pub fn submit(&self, submission: Submission) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let guard = InFlight(Arc::clone(&self.in_flight));
        let board = Arc::clone(&self.board);
        let tx = self.tx.clone();
        self.runtime.spawn_blocking(move || {
            let result = board.submit(submission);
            drop(guard);
            // The receiver lives as long as the submitter.
            let _ = tx.send(result);
        });
        true
    }

    /// Returns a finished submission's result without waiting.
    pub fn try_recv(&mut self) -> Option<SubmitResult> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next finished submission.
    pub async fn recv(&mut self) -> Option<SubmitResult> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, atomic::AtomicUsize, mpsc as std_mpsc};

    use super::*;
    use crate::{entry::TetrisEntry, scratch_dir};

    /// Blocks each submission until the test releases it.
    struct Gated {
        release: Mutex<std_mpsc::Receiver<()>>,
        calls: AtomicUsize,
    }

    impl Leaderboard for Gated {
        fn standings(&self, game: GameId) -> Result<Standings, StoreError> {
            Ok(Standings::empty(game))
        }

        fn submit(&self, submission: Submission) -> Result<Standings, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.release.lock().unwrap().recv();
            Ok(Standings::empty(submission.game()))
        }
    }

    fn tetris(score: u64) -> Submission {
        Submission::Tetris(TetrisEntry {
            name: "ada".to_owned(),
            score,
        })
    }

    #[tokio::test]
    async fn test_single_flight() {
        let (release, gate) = std_mpsc::channel();
        let gated = Arc::new(Gated {
            release: Mutex::new(gate),
            calls: AtomicUsize::new(0),
        });
        let mut submitter = ScoreSubmitter::new(gated.clone(), Handle::current());

        assert!(submitter.submit(tetris(1)));
        assert!(submitter.is_in_flight());
        assert!(!submitter.submit(tetris(2)));
        assert!(!submitter.submit(tetris(3)));

        release.send(()).unwrap();
        let result = submitter.recv().await.unwrap();
        assert!(result.unwrap().is_empty());
        assert!(!submitter.is_in_flight());
        assert_eq!(gated.calls.load(Ordering::SeqCst), 1);

        assert!(submitter.submit(tetris(4)));
        release.send(()).unwrap();
        submitter.recv().await.unwrap().unwrap();
        assert_eq!(gated.calls.load(Ordering::SeqCst), 2);
        assert!(submitter.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_submits_to_store() {
        let store = Arc::new(ScoreStore::new(scratch_dir("submitter")));
        let mut submitter = ScoreSubmitter::new(store.clone(), Handle::current());
        assert!(submitter.submit(tetris(1234)));
        let standings = submitter.recv().await.unwrap().unwrap();
        assert_eq!(standings.best_of("ada"), Some(1234));
        assert_eq!(
            store.standings(GameId::Tetris).unwrap().best_of("ada"),
            Some(1234)
        );
    }

    #[test]
    fn test_try_recv_from_sync_caller() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = Arc::new(ScoreStore::new(scratch_dir("sync-caller")));
        let mut submitter = ScoreSubmitter::new(store, runtime.handle().clone());
        assert!(submitter.submit(tetris(5)));
        let result = loop {
            if let Some(result) = submitter.try_recv() {
                break result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert_eq!(result.unwrap().best_of("ada"), Some(5));
    }
}

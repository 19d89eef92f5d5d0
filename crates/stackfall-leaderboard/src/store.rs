use std::{
    cmp::Reverse,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::entry::{
    GameId, MAX_STANDINGS, RankedEntry, RpsEntry, Standings, Submission, TetrisEntry,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to encode scores: {source}")]
    Encode { source: serde_json::Error },
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "E: RankedEntry")]
struct ScoreFile<E> {
    scores: Vec<E>,
}

/// Merges `entry` into a ranked list.
///
/// An existing name is replaced only by a strictly greater metric; new names
/// are appended. The list is then stably sorted descending and cut to
/// [`MAX_STANDINGS`].
pub fn merge_entry<E: RankedEntry>(scores: &mut Vec<E>, entry: E) {
    match scores.iter_mut().find(|e| e.name() == entry.name()) {
        Some(existing) => {
            if entry.metric() > existing.metric() {
                *existing = entry;
            }
        }
        None => scores.push(entry),
    }
    scores.sort_by_key(|e| Reverse(e.metric()));
    scores.truncate(MAX_STANDINGS);
}

/// File-backed leaderboards, one `<game>.json` per game.
///
/// Submissions for the same game are serialized by a per-game lock and each
/// write goes to a temporary file that is renamed over the old one.
#[derive(Debug)]
pub struct ScoreStore {
    dir: PathBuf,
    locks: [Mutex<()>; GameId::ALL.len()],
}

impl ScoreStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: [Mutex::new(()), Mutex::new(())],
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self, game: GameId) -> PathBuf {
        self.dir.join(format!("{game}.json"))
    }

    pub fn standings(&self, game: GameId) -> Result<Standings, StoreError> {
        Ok(match game {
            GameId::Tetris => Standings::Tetris(self.read::<TetrisEntry>()?),
            GameId::Rps => Standings::Rps(self.read::<RpsEntry>()?),
        })
    }

    pub fn submit(&self, submission: Submission) -> Result<Standings, StoreError> {
        let _guard = self.lock(submission.game());
        Ok(match submission {
            Submission::Tetris(entry) => Standings::Tetris(self.update(entry)?),
            Submission::Rps(entry) => Standings::Rps(self.update(entry)?),
        })
    }

    fn lock(&self, game: GameId) -> MutexGuard<'_, ()> {
        let index = match game {
            GameId::Tetris => 0,
            GameId::Rps => 1,
        };
        self.locks[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update<E: RankedEntry>(&self, entry: E) -> Result<Vec<E>, StoreError> {
        let mut scores = self.read::<E>()?;
        merge_entry(&mut scores, entry);
        self.write(&scores)?;
        Ok(scores)
    }

    fn read<E: RankedEntry>(&self) -> Result<Vec<E>, StoreError> {
        let path = self.path(E::GAME);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        match serde_json::from_str::<ScoreFile<E>>(&text) {
            Ok(file) => Ok(file.scores),
            Err(e) => {
                eprintln!("warning: ignoring malformed {}: {e}", path.display());
                Ok(Vec::new())
            }
        }
    }

    fn write<E: RankedEntry>(&self, scores: &[E]) -> Result<(), StoreError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let path = self.path(E::GAME);
        let tmp = path.with_extension("json.tmp");
        let file = ScoreFile {
            scores: scores.to_vec(),
        };
        let json =
            serde_json::to_string_pretty(&file).map_err(|source| StoreError::Encode { source })?;
        fs::write(&tmp, json).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }
}

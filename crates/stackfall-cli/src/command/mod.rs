use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stackfall_leaderboard::ScoreStore;

use self::{play::PlayArg, rps::RpsArg, scores::ScoresArg, serve::ServeArg};

mod play;
mod rps;
mod scores;
mod serve;

const DEFAULT_SCORES_DIR: &str = "./data/scores/";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to run (defaults to `play`)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Serve the leaderboard HTTP API
    Serve(#[clap(flatten)] ServeArg),
    /// Print a leaderboard
    Scores(#[clap(flatten)] ScoresArg),
    /// Play Rock-Paper-Scissors against the computer
    Rps(#[clap(flatten)] RpsArg),
}

/// Location of the leaderboard files, shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct StoreArg {
    /// Directory holding the `<game>.json` leaderboard files
    #[clap(long, default_value = DEFAULT_SCORES_DIR)]
    pub(crate) scores_dir: PathBuf,
}

impl StoreArg {
    pub(crate) fn open(&self) -> ScoreStore {
        ScoreStore::new(&self.scores_dir)
    }
}

impl Default for StoreArg {
    fn default() -> Self {
        Self {
            scores_dir: PathBuf::from(DEFAULT_SCORES_DIR),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Serve(arg) => serve::run(&arg)?,
        Mode::Scores(arg) => scores::run(&arg)?,
        Mode::Rps(arg) => rps::run(&arg)?,
    }
    Ok(())
}

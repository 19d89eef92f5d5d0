use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use stackfall_engine::{InputTiming, PieceSeed, SessionConfig};
use stackfall_leaderboard::{GameId, ScoreSubmitter};

use crate::{command::StoreArg, tui::Tui};

use self::app::PlayApp;

mod app;
mod controls;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Piece bag seed as 32 hex digits; random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Submit the final score to the leaderboard under this name
    #[clap(long)]
    name: Option<String>,
    #[clap(flatten)]
    store: StoreArg,
    /// Delay before a held direction starts repeating, in milliseconds
    #[clap(long)]
    das_ms: Option<u64>,
    /// Interval between repeated moves, in milliseconds
    #[clap(long)]
    arr_ms: Option<u64>,
}

impl PlayArg {
    fn session_config(&self) -> SessionConfig {
        let defaults = InputTiming::default();
        SessionConfig {
            seed: self.seed,
            input: InputTiming {
                das: self.das_ms.map_or(defaults.das, Duration::from_millis),
                arr: self.arr_ms.map_or(defaults.arr, Duration::from_millis),
                ..defaults
            },
            ..SessionConfig::default()
        }
    }

    fn player_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    let store = Arc::new(arg.store.open());
    let (standings, status) = match store.standings(GameId::Tetris) {
        Ok(standings) => (Some(standings), None),
        Err(e) => (None, Some(format!("leaderboard unavailable: {e}"))),
    };
    let submitter = ScoreSubmitter::new(store, runtime.handle().clone());

    let mut app = PlayApp::new(arg.session_config(), arg.player_name(), submitter)
        .with_standings(standings)
        .with_status(status);
    Tui::new().run(&mut app)?;

    // Let an in-flight submission land before the runtime shuts down.
    if let Some(result) = runtime.block_on(app.finish()) {
        match result {
            Ok(_) => eprintln!("score saved"),
            Err(e) => eprintln!("failed to save score: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[clap(flatten)]
        play: PlayArg,
    }

    fn parse(args: &[&str]) -> PlayArg {
        Cli::try_parse_from(std::iter::once("play").chain(args.iter().copied()))
            .unwrap()
            .play
    }

    #[test]
    fn test_default_config() {
        let config = parse(&[]).session_config();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(PlayArg::default().session_config(), SessionConfig::default());
    }

    #[test]
    fn test_timing_and_seed_overrides() {
        let arg = parse(&["--das-ms", "120", "--arr-ms", "0", "--seed", "000102030405060708090a0b0c0d0e0f"]);
        let config = arg.session_config();
        assert_eq!(config.input.das, Duration::from_millis(120));
        assert_eq!(config.input.arr, Duration::ZERO);
        assert_eq!(config.input.soft_drop, InputTiming::default().soft_drop);
        assert_eq!(
            config.seed.map(|seed| seed.to_string()).as_deref(),
            Some("000102030405060708090a0b0c0d0e0f")
        );
    }

    #[test]
    fn test_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["play", "--seed", "xyz"]).is_err());
    }

    #[test]
    fn test_blank_name_is_no_name() {
        assert_eq!(parse(&["--name", "  "]).player_name(), None);
        assert_eq!(parse(&["--name", " ada "]).player_name().as_deref(), Some("ada"));
    }
}

use std::fmt::Write as _;

use anyhow::Context as _;
use stackfall_leaderboard::{GameId, Standings};

use super::StoreArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Leaderboard to print (`tetris` or `rps`)
    pub(super) game: GameId,
    #[clap(flatten)]
    pub(super) store: StoreArg,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let store = arg.store.open();
    let standings = store
        .standings(arg.game)
        .with_context(|| format!("failed to read the {} leaderboard", arg.game))?;
    print!("{}", format_standings(&standings));
    Ok(())
}

pub(crate) fn format_standings(standings: &Standings) -> String {
    let mut out = String::new();
    if standings.is_empty() {
        out.push_str("no scores yet\n");
        return out;
    }
    match standings {
        Standings::Tetris(entries) => {
            _ = writeln!(out, "{:>2}  {:<20}  {:>10}", "#", "NAME", "SCORE");
            for (rank, entry) in entries.iter().enumerate() {
                _ = writeln!(out, "{:>2}  {:<20}  {:>10}", rank + 1, entry.name, entry.score);
            }
        }
        Standings::Rps(entries) => {
            _ = writeln!(
                out,
                "{:>2}  {:<20}  {:>5}  {:>5}  {:>5}  {:>5}",
                "#", "NAME", "NET", "W", "L", "T"
            );
            for (rank, entry) in entries.iter().enumerate() {
                _ = writeln!(
                    out,
                    "{:>2}  {:<20}  {:>5}  {:>5}  {:>5}  {:>5}",
                    rank + 1,
                    entry.name,
                    entry.net_score,
                    entry.player_wins,
                    entry.cpu_wins,
                    entry.ties
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use stackfall_leaderboard::{RpsEntry, TetrisEntry};

    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(format_standings(&Standings::empty(GameId::Tetris)), "no scores yet\n");
    }

    #[test]
    fn test_tetris_rows_in_rank_order() {
        let standings = Standings::Tetris(vec![
            TetrisEntry {
                name: "ada".to_owned(),
                score: 2400,
            },
            TetrisEntry {
                name: "bo".to_owned(),
                score: 800,
            },
        ]);
        let text = format_standings(&standings);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("SCORE"));
        assert!(lines[1].starts_with(" 1  ada"));
        assert!(lines[1].ends_with("2400"));
        assert!(lines[2].starts_with(" 2  bo"));
    }

    #[test]
    fn test_rps_columns() {
        let standings = Standings::Rps(vec![RpsEntry::new("cy", 5, 7, 1)]);
        let text = format_standings(&standings);
        let row = text.lines().nth(1).unwrap();
        let columns: Vec<_> = row.split_whitespace().collect();
        assert_eq!(columns, ["1", "cy", "-2", "5", "7", "1"]);
    }
}

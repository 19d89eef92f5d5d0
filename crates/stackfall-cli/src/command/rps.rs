use std::{
    io::{self, BufRead as _, Write as _},
    str::FromStr,
    sync::Arc,
};

use anyhow::Context as _;
use rand::seq::IndexedRandom as _;
use stackfall_leaderboard::{
    GameId, MAX_NAME_CHARS, ScoreSubmitter, Standings, Submission, SubmitResult, net_score,
};

use super::{StoreArg, scores::format_standings};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RpsArg {
    /// Name shown on the leaderboard
    #[clap(long)]
    name: String,
    #[clap(flatten)]
    store: StoreArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum Throw {
    #[display("rock")]
    Rock,
    #[display("paper")]
    Paper,
    #[display("scissors")]
    Scissors,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected rock, paper or scissors, got {input:?}")]
pub(crate) struct ParseThrowError {
    input: String,
}

impl Throw {
    const ALL: [Self; 3] = [Throw::Rock, Throw::Paper, Throw::Scissors];

    const fn beats(self) -> Self {
        match self {
            Throw::Rock => Throw::Scissors,
            Throw::Paper => Throw::Rock,
            Throw::Scissors => Throw::Paper,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Throw::Rock => "crushes",
            Throw::Paper => "covers",
            Throw::Scissors => "cut",
        }
    }
}

impl FromStr for Throw {
    type Err = ParseThrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Throw::Rock),
            "paper" | "p" => Ok(Throw::Paper),
            "scissors" | "s" => Ok(Throw::Scissors),
            _ => Err(ParseThrowError {
                input: s.trim().to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    PlayerWins,
    CpuWins,
    Tie,
}

pub(crate) fn judge(player: Throw, cpu: Throw) -> Outcome {
    if player == cpu {
        Outcome::Tie
    } else if player.beats() == cpu {
        Outcome::PlayerWins
    } else {
        Outcome::CpuWins
    }
}

fn describe(player: Throw, cpu: Throw, outcome: Outcome) -> String {
    match outcome {
        Outcome::Tie => "It's a tie!".to_owned(),
        Outcome::PlayerWins => format!("{player} {} {cpu}, you win!", player.verb()),
        Outcome::CpuWins => format!("{cpu} {} {player}, the computer wins!", cpu.verb()),
    }
}

/// Wins, losses and ties of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    player_wins: u64,
    cpu_wins: u64,
    ties: u64,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWins => self.player_wins += 1,
            Outcome::CpuWins => self.cpu_wins += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    fn net(&self) -> i64 {
        net_score(self.player_wins, self.cpu_wins)
    }

    fn submission(&self, name: &str) -> anyhow::Result<Submission> {
        let body = serde_json::json!({
            "name": name,
            "playerWins": self.player_wins,
            "cpuWins": self.cpu_wins,
            "ties": self.ties,
        });
        Ok(Submission::parse(GameId::Rps, &body)?)
    }
}

/// Whether `tally` should replace the stored best; a player without an
/// entry always submits.
fn beats_best(tally: &Tally, best: Option<i64>) -> bool {
    best.is_none_or(|best| tally.net() > best)
}

struct RpsSession {
    name: String,
    tally: Tally,
    best: Option<i64>,
    submitter: ScoreSubmitter,
}

impl RpsSession {
    fn play(&mut self, player: Throw, cpu: Throw) -> anyhow::Result<()> {
        let outcome = judge(player, cpu);
        self.tally.record(outcome);
        println!("Computer chose {cpu}. {}", describe(player, cpu, outcome));
        println!(
            "W:{} L:{} T:{}  net {}  best {}",
            self.tally.player_wins,
            self.tally.cpu_wins,
            self.tally.ties,
            self.tally.net(),
            self.best.map_or_else(|| "-".to_owned(), |b| b.to_string())
        );
        self.collect_results();
        if beats_best(&self.tally, self.best) {
            // A rejected submit is retried after the next round.
            self.submitter.submit(self.tally.submission(&self.name)?);
        }
        Ok(())
    }

    fn collect_results(&mut self) {
        while let Some(result) = self.submitter.try_recv() {
            self.apply(result);
        }
    }

    fn apply(&mut self, result: SubmitResult) {
        match result {
            Ok(standings) => self.update_best(&standings),
            Err(e) => eprintln!("failed to save score: {e}"),
        }
    }

    fn update_best(&mut self, standings: &Standings) {
        if let Some(best) = standings.best_of(&self.name) {
            self.best = Some(best);
        }
    }

    async fn finish(&mut self) -> anyhow::Result<()> {
        if self.submitter.is_in_flight()
            && let Some(result) = self.submitter.recv().await
        {
            self.apply(result);
        }
        self.collect_results();
        if self.tally != Tally::default() && beats_best(&self.tally, self.best) {
            self.submitter.submit(self.tally.submission(&self.name)?);
            if let Some(result) = self.submitter.recv().await {
                self.apply(result);
            }
        }
        Ok(())
    }
}

pub(crate) fn run(arg: &RpsArg) -> anyhow::Result<()> {
    let RpsArg { name, store } = arg;
    anyhow::ensure!(!name.trim().is_empty(), "--name must not be blank");

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    let store = Arc::new(store.open());
    let standings = store
        .standings(GameId::Rps)
        .context("failed to read the rps leaderboard")?;
    print!("{}", format_standings(&standings));

    let mut session = RpsSession {
        name: name.trim().chars().take(MAX_NAME_CHARS).collect(),
        tally: Tally::default(),
        best: None,
        submitter: ScoreSubmitter::new(store.clone(), runtime.handle().clone()),
    };
    session.update_best(&standings);

    let mut rng = rand::rng();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("rock, paper or scissors (q to quit)> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "q" | "quit") {
            break;
        }
        let player = match line.parse::<Throw>() {
            Ok(throw) => throw,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let cpu = *Throw::ALL.choose(&mut rng).unwrap_or(&Throw::Rock);
        session.play(player, cpu)?;
    }

    runtime.block_on(session.finish())?;
    let standings = store
        .standings(GameId::Rps)
        .context("failed to read the rps leaderboard")?;
    print!("{}", format_standings(&standings));
    Ok(())
}

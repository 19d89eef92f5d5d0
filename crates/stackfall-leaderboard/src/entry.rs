use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Entries kept per game.
pub const MAX_STANDINGS: usize = 10;
/// Names are truncated to this many characters after trimming.
pub const MAX_NAME_CHARS: usize = 20;
pub const MAX_SCORE: u64 = 1_000_000_000;
pub const MAX_COUNTER: u64 = 1_000_000;

/// A game with a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Tetris,
    Rps,
}

impl GameId {
    pub const ALL: [Self; 2] = [GameId::Tetris, GameId::Rps];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameId::Tetris => "tetris",
            GameId::Rps => "rps",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown game: {name}")]
pub struct UnknownGameError {
    pub name: String,
}

impl FromStr for GameId {
    type Err = UnknownGameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::ALL
            .into_iter()
            .find(|game| game.as_str() == s)
            .ok_or_else(|| UnknownGameError { name: s.to_owned() })
    }
}

/// An entry that can be ranked on a leaderboard.
pub trait RankedEntry: Clone + Serialize + DeserializeOwned + Send + 'static {
    const GAME: GameId;

    fn name(&self) -> &str;

    /// Value ranked descending; higher is better.
    fn metric(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetrisEntry {
    pub name: String,
    pub score: u64,
}

impl RankedEntry for TetrisEntry {
    const GAME: GameId = GameId::Tetris;

    fn name(&self) -> &str {
        &self.name
    }

    fn metric(&self) -> i64 {
        i64::try_from(self.score).unwrap_or(i64::MAX)
    }
}

/// Rock-Paper-Scissors tally ranked by `player_wins - cpu_wins`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpsEntry {
    pub name: String,
    pub net_score: i64,
    pub player_wins: u64,
    pub cpu_wins: u64,
    pub ties: u64,
}

impl RpsEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, player_wins: u64, cpu_wins: u64, ties: u64) -> Self {
        Self {
            name: name.into(),
            net_score: net_score(player_wins, cpu_wins),
            player_wins,
            cpu_wins,
            ties,
        }
    }
}

/// `player_wins - cpu_wins`, saturating.
#[must_use]
pub fn net_score(player_wins: u64, cpu_wins: u64) -> i64 {
    let wins = i64::try_from(player_wins).unwrap_or(i64::MAX);
    let losses = i64::try_from(cpu_wins).unwrap_or(i64::MAX);
    wins.saturating_sub(losses)
}

impl RankedEntry for RpsEntry {
    const GAME: GameId = GameId::Rps;

    fn name(&self) -> &str {
        &self.name
    }

    fn metric(&self) -> i64 {
        self.net_score
    }
}

/// The ranked list of one game, serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Standings {
    Tetris(Vec<TetrisEntry>),
    Rps(Vec<RpsEntry>),
}

impl Standings {
    #[must_use]
    pub fn empty(game: GameId) -> Self {
        match game {
            GameId::Tetris => Standings::Tetris(Vec::new()),
            GameId::Rps => Standings::Rps(Vec::new()),
        }
    }

    #[must_use]
    pub fn game(&self) -> GameId {
        match self {
            Standings::Tetris(_) => GameId::Tetris,
            Standings::Rps(_) => GameId::Rps,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Standings::Tetris(entries) => entries.len(),
            Standings::Rps(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(name, metric)` pairs in rank order.
    #[must_use]
    pub fn ranking(&self) -> Vec<(&str, i64)> {
        fn pairs<E: RankedEntry>(entries: &[E]) -> Vec<(&str, i64)> {
            entries.iter().map(|e| (e.name(), e.metric())).collect()
        }
        match self {
            Standings::Tetris(entries) => pairs(entries),
            Standings::Rps(entries) => pairs(entries),
        }
    }

    /// Stored metric for `name`, if ranked.
    #[must_use]
    pub fn best_of(&self, name: &str) -> Option<i64> {
        self.ranking()
            .into_iter()
            .find(|&(n, _)| n == name)
            .map(|(_, metric)| metric)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    const fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// A validated score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Tetris(TetrisEntry),
    Rps(RpsEntry),
}

impl Submission {
    /// Validates a JSON payload for `game`.
    ///
    /// Tetris expects `{name, score}`; RPS expects
    /// `{name, playerWins, cpuWins, ties}` and derives the net score.
    ///
    /// ```
    /// use serde_json::json;
    /// use stackfall_leaderboard::{GameId, Submission};
    ///
    /// let sub = Submission::parse(GameId::Tetris, &json!({"name": "  ada ", "score": 1200}))
    ///     .unwrap();
    /// assert_eq!(sub.name(), "ada");
    ///
    /// let err = Submission::parse(GameId::Tetris, &json!({"name": "ada", "score": -1}))
    ///     .unwrap_err();
    /// assert_eq!(err.field, "score");
    /// ```
    pub fn parse(game: GameId, body: &Value) -> Result<Self, ValidationError> {
        let body = body
            .as_object()
            .ok_or(ValidationError::new("body", "must be a JSON object"))?;
        let name = parse_name(body)?;
        Ok(match game {
            GameId::Tetris => Submission::Tetris(TetrisEntry {
                name,
                score: parse_count(body, "score", MAX_SCORE)?,
            }),
            GameId::Rps => Submission::Rps(RpsEntry::new(
                name,
                parse_count(body, "playerWins", MAX_COUNTER)?,
                parse_count(body, "cpuWins", MAX_COUNTER)?,
                parse_count(body, "ties", MAX_COUNTER)?,
            )),
        })
    }

    #[must_use]
    pub fn game(&self) -> GameId {
        match self {
            Submission::Tetris(_) => GameId::Tetris,
            Submission::Rps(_) => GameId::Rps,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Submission::Tetris(entry) => entry.name(),
            Submission::Rps(entry) => entry.name(),
        }
    }

    #[must_use]
    pub fn metric(&self) -> i64 {
        match self {
            Submission::Tetris(entry) => entry.metric(),
            Submission::Rps(entry) => entry.metric(),
        }
    }
}

fn parse_name(body: &Map<String, Value>) -> Result<String, ValidationError> {
    let name = body
        .get("name")
        .ok_or(ValidationError::new("name", "is required"))?
        .as_str()
        .ok_or(ValidationError::new("name", "must be a string"))?
        .trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", "must not be blank"));
    }
    Ok(name.chars().take(MAX_NAME_CHARS).collect())
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn parse_count(
    body: &Map<String, Value>,
    field: &'static str,
    max: u64,
) -> Result<u64, ValidationError> {
    let value = body
        .get(field)
        .ok_or(ValidationError::new(field, "is required"))?;
    if let Some(n) = value.as_u64() {
        return if n <= max {
            Ok(n)
        } else {
            Err(ValidationError::new(field, "is out of range"))
        };
    }
    let n = value
        .as_f64()
        .ok_or(ValidationError::new(field, "must be a number"))?;
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(ValidationError::new(field, "must be a whole number"));
    }
    if n < 0.0 || n > max as f64 {
        return Err(ValidationError::new(field, "is out of range"));
    }
    Ok(n as u64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_game_id_parse() {
        assert_eq!("tetris".parse::<GameId>(), Ok(GameId::Tetris));
        assert_eq!("rps".parse::<GameId>(), Ok(GameId::Rps));
        assert_eq!(
            "chess".parse::<GameId>(),
            Err(UnknownGameError {
                name: "chess".to_owned()
            })
        );
        assert!("Tetris".parse::<GameId>().is_err());
        assert_eq!(GameId::Rps.to_string(), "rps");
    }

    #[test]
    fn test_name_trimmed_and_truncated() {
        let body = json!({"name": "   abcdefghijklmnopqrstuvwxyz  ", "score": 5});
        let sub = Submission::parse(GameId::Tetris, &body).unwrap();
        assert_eq!(sub.name(), "abcdefghijklmnopqrst");

        let body = json!({"name": "ñandú ñandú ñandú ñandú", "score": 5});
        let sub = Submission::parse(GameId::Tetris, &body).unwrap();
        assert_eq!(sub.name().chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_name_errors() {
        for (body, reason) in [
            (json!({"score": 1}), "is required"),
            (json!({"name": 7, "score": 1}), "must be a string"),
            (json!({"name": "   ", "score": 1}), "must not be blank"),
        ] {
            let err = Submission::parse(GameId::Tetris, &body).unwrap_err();
            assert_eq!(err, ValidationError::new("name", reason));
        }
    }

    #[test]
    fn test_score_bounds() {
        let parse = |score: Value| Submission::parse(GameId::Tetris, &json!({"name": "a", "score": score}));
        assert!(parse(json!(0)).is_ok());
        assert!(parse(json!(1_000_000_000)).is_ok());
        assert_eq!(parse(json!(12.0)).unwrap().metric(), 12);
        for bad in [
            json!(1_000_000_001),
            json!(-1),
            json!(1.5),
            json!("100"),
            json!(null),
        ] {
            assert_eq!(parse(bad.clone()).unwrap_err().field, "score", "{bad}");
        }
    }

    #[test]
    fn test_rps_submission_derives_net_score() {
        let body = json!({"name": "bo", "playerWins": 3, "cpuWins": 5, "ties": 1});
        let Submission::Rps(entry) = Submission::parse(GameId::Rps, &body).unwrap() else {
            panic!("expected rps entry");
        };
        assert_eq!(entry, RpsEntry::new("bo", 3, 5, 1));
        assert_eq!(entry.net_score, -2);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            json!({"name": "bo", "netScore": -2, "playerWins": 3, "cpuWins": 5, "ties": 1})
        );
    }

    #[test]
    fn test_rps_counter_errors_name_field() {
        let body = json!({"name": "bo", "playerWins": 3, "cpuWins": 2_000_000, "ties": 1});
        let err = Submission::parse(GameId::Rps, &body).unwrap_err();
        assert_eq!(err.field, "cpuWins");
        let body = json!({"name": "bo", "playerWins": 3, "cpuWins": 2});
        assert_eq!(Submission::parse(GameId::Rps, &body).unwrap_err().field, "ties");
    }

    #[test]
    fn test_body_must_be_object() {
        let err = Submission::parse(GameId::Tetris, &json!([1, 2])).unwrap_err();
        assert_eq!(err.field, "body");
    }

    #[test]
    fn test_standings_serialize_as_array() {
        let standings = Standings::Tetris(vec![TetrisEntry {
            name: "a".to_owned(),
            score: 10,
        }]);
        assert_eq!(
            serde_json::to_string(&standings).unwrap(),
            r#"[{"name":"a","score":10}]"#
        );
        assert_eq!(standings.best_of("a"), Some(10));
        assert_eq!(standings.best_of("b"), None);
        assert_eq!(serde_json::to_string(&Standings::empty(GameId::Rps)).unwrap(), "[]");
    }
}

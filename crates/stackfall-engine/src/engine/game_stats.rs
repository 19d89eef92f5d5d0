use std::time::Duration;

/// Base points for line clears, indexed by lines cleared at once.
///
/// The awarded value is multiplied by `level + 1`.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Points per row for a player-initiated soft drop.
pub const SOFT_DROP_POINTS: usize = 1;
/// Points per row for a hard drop.
pub const HARD_DROP_POINTS: usize = 2;

const LINES_PER_LEVEL: usize = 10;
const BASE_DROP_INTERVAL: Duration = Duration::from_millis(800);
const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);
const DROP_INTERVAL_STEP: Duration = Duration::from_millis(80);

/// Gravity interval for `level`: 800ms minus 80ms per level, at least 100ms.
#[must_use]
pub fn drop_interval(level: usize) -> Duration {
    let step = DROP_INTERVAL_STEP.saturating_mul(u32::try_from(level).unwrap_or(u32::MAX));
    BASE_DROP_INTERVAL
        .saturating_sub(step)
        .max(MIN_DROP_INTERVAL)
}

/// Score, lines, level and piece counters for one session.
///
/// # Example
///
/// ```
/// use stackfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    level: usize,
    drop_interval: Duration,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            drop_interval: BASE_DROP_INTERVAL,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Current gravity interval.
    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by lines cleared (`[0]` counts locks clearing nothing).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    pub fn award_soft_drop(&mut self) {
        self.score += SOFT_DROP_POINTS;
    }

    pub fn award_hard_drop(&mut self, rows: usize) {
        self.score += rows * HARD_DROP_POINTS;
    }

    /// Records a locked piece that cleared `cleared_lines` lines.
    ///
    /// Points use the level in effect before the clear. The level advances
    /// once the cumulative line count reaches `(level + 1) * 10`.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;
        if cleared_lines == 0 {
            return;
        }

        let base = SCORE_TABLE.get(cleared_lines).copied().unwrap_or(SCORE_TABLE[4]);
        self.score += base * (self.level + 1);
        self.total_cleared_lines += cleared_lines;
        if self.total_cleared_lines >= (self.level + 1) * LINES_PER_LEVEL {
            self.level += 1;
            self.drop_interval = drop_interval(self.level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tetris_at_level_zero() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(4);
        assert_eq!(stats.score(), 800);
        assert_eq!(stats.level(), 0);
    }

    #[test]
    fn test_line_clear_table() {
        for (lines, expected) in [(1, 100), (2, 300), (3, 500), (4, 800)] {
            let mut stats = GameStats::new();
            stats.complete_piece_drop(lines);
            assert_eq!(stats.score(), expected);
        }
    }

    #[test]
    fn test_tetris_at_level_two() {
        let mut stats = GameStats::new();
        // Five doubles → 10 lines → level 1; five more → 20 lines → level 2.
        for _ in 0..10 {
            stats.complete_piece_drop(2);
        }
        assert_eq!(stats.level(), 2);
        let before = stats.score();
        stats.complete_piece_drop(4);
        assert_eq!(stats.score() - before, 2400);
    }

    #[test]
    fn test_points_use_level_before_clear() {
        let mut stats = GameStats::new();
        for _ in 0..3 {
            stats.complete_piece_drop(3);
        }
        assert_eq!((stats.total_cleared_lines(), stats.level()), (9, 0));
        let before = stats.score();
        stats.complete_piece_drop(1);
        assert_eq!(stats.score() - before, 100);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.drop_interval(), Duration::from_millis(720));
    }

    #[test]
    fn test_drop_interval_floor() {
        assert_eq!(drop_interval(0), Duration::from_millis(800));
        assert_eq!(drop_interval(5), Duration::from_millis(400));
        assert_eq!(drop_interval(9), Duration::from_millis(100));
        assert_eq!(drop_interval(10), Duration::from_millis(100));
        assert_eq!(drop_interval(usize::MAX), Duration::from_millis(100));
    }

    #[test]
    fn test_drop_awards() {
        let mut stats = GameStats::new();
        stats.award_soft_drop();
        stats.award_hard_drop(19);
        assert_eq!(stats.score(), 39);
        assert_eq!(stats.completed_pieces(), 0);
    }

    #[test]
    fn test_histogram_counts_empty_locks() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        assert_eq!(stats.line_cleared_counter(), &[2, 1, 0, 0, 0]);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.score(), 100);
    }
}

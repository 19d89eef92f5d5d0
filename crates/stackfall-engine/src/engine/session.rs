use std::{mem, time::Duration};

use crate::core::{
    board::Board,
    piece::{ActivePiece, PieceKind, RotationDirection},
};

use super::{
    game_stats::GameStats,
    input::{InputController, InputTiming, Shift},
    piece_buffer::{PieceBuffer, PieceSeed},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Notifications queued by the session for its driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// Score, lines or level changed (also sent once at start).
    ScoreChanged {
        score: usize,
        lines: usize,
        level: usize,
    },
    /// The active piece was written into the board.
    PieceLocked { cleared_lines: usize },
    /// A spawned piece collided; sent once per game.
    GameOver { final_score: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed bag seed; `None` draws a new random seed on every reset.
    pub seed: Option<PieceSeed>,
    pub input: InputTiming,
    /// How long a grounded piece may stay unlocked.
    pub lock_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            input: InputTiming::default(),
            lock_delay: Duration::from_millis(500),
        }
    }
}

/// One game, advanced by an external loop.
///
/// The session never schedules itself: the driver measures elapsed time and
/// calls [`Self::tick`], forwards player actions, and drains
/// [`Self::take_events`] after each frame. Actions report whether they took
/// effect and are ignored unless the session is [`SessionState::Playing`].
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    pieces: PieceBuffer,
    active: ActivePiece,
    next: PieceKind,
    held: Option<PieceKind>,
    hold_used: bool,
    stats: GameStats,
    input: InputController,
    drop_timer: Duration,
    lock_timer: Duration,
    elapsed: Duration,
    session_state: SessionState,
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_config(SessionConfig {
            seed: Some(seed),
            ..SessionConfig::default()
        })
    }

    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        let mut pieces = config.seed.map_or_else(PieceBuffer::new, PieceBuffer::with_seed);
        let next = pieces.pop_next();
        let mut this = Self {
            config,
            board: Board::EMPTY,
            pieces,
            active: ActivePiece::spawn(next),
            next,
            held: None,
            hold_used: false,
            stats: GameStats::new(),
            input: InputController::new(config.input),
            drop_timer: Duration::ZERO,
            lock_timer: Duration::ZERO,
            elapsed: Duration::ZERO,
            session_state: SessionState::Playing,
            events: Vec::new(),
        };
        this.emit_score();
        this.spawn();
        this
    }

    /// Starts a new game with the same configuration.
    ///
    /// Pending events of the previous game are discarded.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &ActivePiece {
        &self.active
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> ActivePiece {
        self.active.drop_position(&self.board)
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        !self.hold_used
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Time spent playing, excluding pauses.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn lock_timer(&self) -> Duration {
        self.lock_timer
    }

    /// Drains the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Advances the game by `dt`.
    ///
    /// Gravity runs first, then held-key repeats, then the lock delay.
    pub fn tick(&mut self, dt: Duration) {
        if !self.session_state.is_playing() {
            return;
        }
        self.elapsed += dt;

        self.drop_timer += dt;
        if self.drop_timer >= self.stats.drop_interval() {
            self.try_shift(0, 1);
            self.drop_timer = Duration::ZERO;
        }

        let actions = self.input.update(dt);
        if let Some(dir) = actions.shift {
            self.try_shift(dir.dx(), 0);
        }
        if actions.soft_drop {
            self.soft_drop();
        }

        if self.active.is_grounded(&self.board) {
            self.lock_timer += dt;
            if self.lock_timer >= self.config.lock_delay {
                self.lock_active();
            }
        } else {
            self.lock_timer = Duration::ZERO;
        }
    }

    /// Updates the held horizontal direction; a new direction moves at once.
    pub fn set_horizontal(&mut self, dir: Option<Shift>) {
        if let Some(dir) = self.input.set_horizontal(dir) {
            self.try_shift(dir.dx(), 0);
        }
    }

    pub fn set_soft_drop(&mut self, held: bool) {
        self.input.set_down(held);
    }

    pub fn try_move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    pub fn try_move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    /// Rotates with wall kicks.
    ///
    /// The O piece always succeeds without moving, and without resetting the
    /// lock timer.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> bool {
        if !self.session_state.is_playing() {
            return false;
        }
        let Some(rotated) = self.active.try_rotate(&self.board, direction) else {
            return false;
        };
        if rotated != self.active {
            self.active = rotated;
            self.lock_timer = Duration::ZERO;
        }
        true
    }

    /// Moves the piece down one row, awarding a point on success.
    pub fn soft_drop(&mut self) -> bool {
        if !self.try_shift(0, 1) {
            return false;
        }
        self.stats.award_soft_drop();
        self.emit_score();
        true
    }

    /// Drops the piece to its landing row and locks it.
    pub fn hard_drop(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        let landed = self.ghost_piece();
        let distance = usize::try_from(landed.row() - self.active.row()).unwrap_or(0);
        self.active = landed;
        if distance > 0 {
            self.stats.award_hard_drop(distance);
            self.emit_score();
        }
        self.lock_active();
    }

    /// Holds the active piece, once per spawned piece.
    ///
    /// With an empty slot the next piece spawns. Otherwise the held kind
    /// swaps in at the spawn origin; a swap that would collide is refused.
    pub fn hold(&mut self) -> bool {
        if !self.session_state.is_playing() || self.hold_used {
            return false;
        }
        let current = self.active.kind();
        match self.held {
            None => {
                self.held = Some(current);
                self.spawn();
            }
            Some(held) => {
                let swapped = ActivePiece::spawn(held);
                if !swapped.is_valid_on(&self.board) {
                    return false;
                }
                self.active = swapped;
                self.held = Some(current);
            }
        }
        self.hold_used = true;
        self.lock_timer = Duration::ZERO;
        self.drop_timer = Duration::ZERO;
        true
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        if !self.session_state.is_playing() {
            return false;
        }
        let Some(piece) = self.active.moved(&self.board, dx, dy) else {
            return false;
        };
        self.active = piece;
        self.lock_timer = Duration::ZERO;
        true
    }

    fn lock_active(&mut self) {
        self.board.lock_piece(&self.active);
        let cleared_lines = self.board.clear_full_lines();
        self.stats.complete_piece_drop(cleared_lines);
        self.events.push(GameEvent::PieceLocked { cleared_lines });
        if cleared_lines > 0 {
            self.emit_score();
        }
        self.spawn();
    }

    fn spawn(&mut self) {
        self.active = ActivePiece::spawn(self.next);
        self.next = self.pieces.pop_next();
        self.hold_used = false;
        self.lock_timer = Duration::ZERO;
        self.drop_timer = Duration::ZERO;
        if !self.active.is_valid_on(&self.board) && !self.session_state.is_game_over() {
            self.session_state = SessionState::GameOver;
            self.events.push(GameEvent::GameOver {
                final_score: self.stats.score(),
            });
        }
    }

    fn emit_score(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: self.stats.score(),
            lines: self.stats.total_cleared_lines(),
            level: self.stats.level(),
        });
    }
}

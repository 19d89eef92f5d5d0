//! Game rules on top of the core data structures.
//!
//! - [`GameSession`] - one game: spawning, gravity, lock delay, hold, scoring
//! - [`GameStats`] - score, lines, level and drop interval
//! - [`InputController`] - DAS/ARR and soft-drop timing for held keys
//! - [`PieceBuffer`] - 7-bag randomizer seeded by a [`PieceSeed`]
//! - [`RenderBoard`], [`PiecePreview`] - views for front ends
//!
//! # Driving a session
//!
//! The session has no clock of its own. A front end measures the time since
//! the previous frame, calls [`GameSession::tick`], forwards key presses and
//! releases, then drains [`GameSession::take_events`]:
//!
//! ```
//! use std::time::Duration;
//! use stackfall_engine::{GameEvent, GameSession, Shift};
//!
//! let mut session = GameSession::new();
//!
//! session.set_horizontal(Some(Shift::Left));
//! session.tick(Duration::from_millis(16));
//! session.set_horizontal(None);
//! session.hard_drop();
//!
//! for event in session.take_events() {
//!     if let GameEvent::GameOver { final_score } = event {
//!         println!("Game over: {final_score}");
//!     }
//! }
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{game_stats::*, input::*, piece_buffer::*, render::*, session::*};

mod game_stats;
mod input;
mod piece_buffer;
mod render;
mod session;

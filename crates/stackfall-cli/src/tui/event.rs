use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Tick interval reached; carries the time since the previous tick.
    #[from(ignore)]
    Tick(Duration),
    Render,
    Crossterm(CrosstermEvent),
}

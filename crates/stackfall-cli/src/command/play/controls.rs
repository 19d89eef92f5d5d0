use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use stackfall_engine::{RotationDirection, Shift};

/// A game input, independent of the key it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Control {
    Shift(Shift),
    SoftDrop,
    HardDrop,
    Rotate(RotationDirection),
    Hold,
    Pause,
    Restart,
    Quit,
}

impl Control {
    pub(super) fn from_key(code: KeyCode) -> Option<Self> {
        let control = match code {
            KeyCode::Left | KeyCode::Char('a' | 'h') => Control::Shift(Shift::Left),
            KeyCode::Right | KeyCode::Char('d' | 'l') => Control::Shift(Shift::Right),
            KeyCode::Down | KeyCode::Char('s' | 'j') => Control::SoftDrop,
            KeyCode::Char(' ') => Control::HardDrop,
            KeyCode::Up | KeyCode::Char('x' | 'w' | 'k') => {
                Control::Rotate(RotationDirection::Clockwise)
            }
            KeyCode::Char('z') => Control::Rotate(RotationDirection::CounterClockwise),
            KeyCode::Char('c') | KeyCode::Tab => Control::Hold,
            KeyCode::Char('p') | KeyCode::Esc => Control::Pause,
            KeyCode::Char('r') => Control::Restart,
            KeyCode::Char('q') => Control::Quit,
            _ => return None,
        };
        Some(control)
    }

    /// Whether the control is held rather than triggered.
    fn is_held(self) -> bool {
        matches!(self, Control::Shift(_) | Control::SoftDrop)
    }
}

/// What a key event asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    /// The held horizontal direction changed.
    Horizontal(Option<Shift>),
    /// The soft-drop key was pressed or released.
    SoftDropHeld(bool),
    /// A single step, for terminals that only report presses.
    Step(Control),
    Trigger(Control),
}

/// Turns key events into session actions.
///
/// With release reporting, movement keys are tracked as held and the
/// session's own auto-repeat moves the piece. Without it every press,
/// including the terminal's key repeats, is one step.
#[derive(Debug, Default)]
pub(super) struct KeyState {
    key_release: bool,
    /// Held directions, most recent last.
    shifts: Vec<Shift>,
}

impl KeyState {
    pub(super) fn new(key_release: bool) -> Self {
        Self {
            key_release,
            shifts: Vec::new(),
        }
    }

    pub(super) fn clear(&mut self) {
        self.shifts.clear();
    }

    pub(super) fn handle(&mut self, event: &KeyEvent) -> Option<Action> {
        let control = Control::from_key(event.code)?;
        if !self.key_release {
            return match event.kind {
                KeyEventKind::Release => None,
                _ if control.is_held() => Some(Action::Step(control)),
                _ => Some(Action::Trigger(control)),
            };
        }

        match (control, event.kind) {
            (Control::Shift(shift), KeyEventKind::Press) => {
                self.shifts.retain(|&s| s != shift);
                self.shifts.push(shift);
                Some(Action::Horizontal(Some(shift)))
            }
            (Control::Shift(shift), KeyEventKind::Release) => {
                let before = self.shifts.last().copied();
                self.shifts.retain(|&s| s != shift);
                let after = self.shifts.last().copied();
                (before != after).then_some(Action::Horizontal(after))
            }
            (Control::SoftDrop, KeyEventKind::Press) => Some(Action::SoftDropHeld(true)),
            (Control::SoftDrop, KeyEventKind::Release) => Some(Action::SoftDropHeld(false)),
            (_, KeyEventKind::Press) => Some(Action::Trigger(control)),
            _ => None,
        }
    }
}

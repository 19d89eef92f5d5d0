use std::time::Duration;

/// Horizontal direction of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// Thresholds for auto-shift and auto-drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTiming {
    /// Delayed auto shift: how long a direction must be held before repeating.
    pub das: Duration,
    /// Auto repeat rate: interval between repeated moves after DAS.
    pub arr: Duration,
    /// Interval between soft-drop steps while down is held.
    pub soft_drop: Duration,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            das: Duration::from_millis(170),
            arr: Duration::from_millis(50),
            soft_drop: Duration::from_millis(40),
        }
    }
}

/// Actions produced by one [`InputController::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputActions {
    pub shift: Option<Shift>,
    pub soft_drop: bool,
}

/// Converts held keys into timed moves.
///
/// The controller only reports what should happen; the session applies the
/// moves and awards points.
///
/// ```
/// use std::time::Duration;
/// use stackfall_engine::{InputController, Shift};
///
/// let mut input = InputController::default();
/// assert_eq!(input.set_horizontal(Some(Shift::Left)), Some(Shift::Left));
///
/// // Nothing repeats until DAS has elapsed.
/// assert_eq!(input.update(Duration::from_millis(100)).shift, None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputController {
    timing: InputTiming,
    horizontal: Option<Shift>,
    das_timer: Duration,
    arr_timer: Duration,
    down_held: bool,
    soft_drop_timer: Duration,
}

impl InputController {
    #[must_use]
    pub fn new(timing: InputTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timing(&self) -> &InputTiming {
        &self.timing
    }

    #[must_use]
    pub fn horizontal(&self) -> Option<Shift> {
        self.horizontal
    }

    #[must_use]
    pub fn is_down_held(&self) -> bool {
        self.down_held
    }

    /// Sets the held horizontal direction.
    ///
    /// A change resets the DAS and ARR timers and, when a direction is now
    /// held, returns it as one immediate move. Repeating the current
    /// direction returns `None`.
    pub fn set_horizontal(&mut self, dir: Option<Shift>) -> Option<Shift> {
        if self.horizontal == dir {
            return None;
        }
        self.horizontal = dir;
        self.das_timer = Duration::ZERO;
        self.arr_timer = Duration::ZERO;
        dir
    }

    pub fn set_down(&mut self, held: bool) {
        self.down_held = held;
        if !held {
            self.soft_drop_timer = Duration::ZERO;
        }
    }

    /// Releases everything, as after a restart.
    pub fn clear(&mut self) {
        *self = Self::new(self.timing);
    }

    /// Advances the timers by `dt`.
    pub fn update(&mut self, dt: Duration) -> InputActions {
        let mut actions = InputActions::default();

        if let Some(dir) = self.horizontal {
            if self.das_timer < self.timing.das {
                self.das_timer += dt;
            } else {
                self.arr_timer += dt;
                if self.arr_timer >= self.timing.arr {
                    actions.shift = Some(dir);
                    self.arr_timer = Duration::ZERO;
                }
            }
        }

        if self.down_held {
            self.soft_drop_timer += dt;
            if self.soft_drop_timer >= self.timing.soft_drop {
                actions.soft_drop = true;
                self.soft_drop_timer = Duration::ZERO;
            }
        } else {
            self.soft_drop_timer = Duration::ZERO;
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn repeats(input: &mut InputController, frames: u32, dt: Duration) -> usize {
        (0..frames)
            .filter(|_| input.update(dt).shift.is_some())
            .count()
    }

    #[test]
    fn test_press_moves_immediately_once() {
        let mut input = InputController::default();
        assert_eq!(input.set_horizontal(Some(Shift::Right)), Some(Shift::Right));
        assert_eq!(input.set_horizontal(Some(Shift::Right)), None);
        assert_eq!(input.set_horizontal(None), None);
        assert_eq!(input.horizontal(), None);
    }

    #[test]
    fn test_das_then_arr_cadence() {
        let mut input = InputController::default();
        input.set_horizontal(Some(Shift::Left));
        // 10ms frames: DAS needs 17 frames to reach 170ms.
        assert_eq!(repeats(&mut input, 17, 10 * MS), 0);
        // After DAS, one repeat every 5 frames (50ms).
        assert_eq!(repeats(&mut input, 4, 10 * MS), 0);
        assert_eq!(input.update(10 * MS).shift, Some(Shift::Left));
        assert_eq!(repeats(&mut input, 50, 10 * MS), 10);
    }

    #[test]
    fn test_direction_change_resets_das() {
        let mut input = InputController::default();
        input.set_horizontal(Some(Shift::Left));
        assert_eq!(repeats(&mut input, 30, 10 * MS), 2);
        assert_eq!(input.set_horizontal(Some(Shift::Right)), Some(Shift::Right));
        assert_eq!(repeats(&mut input, 17, 10 * MS), 0);
    }

    #[test]
    fn test_no_repeat_without_direction() {
        let mut input = InputController::default();
        assert_eq!(repeats(&mut input, 100, 10 * MS), 0);
    }

    #[test]
    fn test_soft_drop_cadence() {
        let mut input = InputController::default();
        input.set_down(true);
        assert!(!input.update(30 * MS).soft_drop);
        assert!(input.update(10 * MS).soft_drop);
        assert!(!input.update(39 * MS).soft_drop);
        assert!(input.update(MS).soft_drop);
    }

    #[test]
    fn test_soft_drop_release_resets_timer() {
        let mut input = InputController::default();
        input.set_down(true);
        assert!(!input.update(30 * MS).soft_drop);
        input.set_down(false);
        assert!(!input.update(30 * MS).soft_drop);
        input.set_down(true);
        assert!(!input.update(30 * MS).soft_drop);
    }

    #[test]
    fn test_custom_timing() {
        let mut input = InputController::new(InputTiming {
            das: 100 * MS,
            arr: 20 * MS,
            ..InputTiming::default()
        });
        input.set_horizontal(Some(Shift::Right));
        assert_eq!(repeats(&mut input, 10, 10 * MS), 0);
        assert_eq!(repeats(&mut input, 10, 10 * MS), 5);
    }
}

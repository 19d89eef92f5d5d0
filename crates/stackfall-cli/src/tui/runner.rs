use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Terminal runtime for an [`App`].
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    key_release: bool,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in ticks per second.
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Whether the terminal reports key releases and repeats.
    ///
    /// Without them every key event is a press.
    pub fn reports_key_release(&self) -> bool {
        self.key_release
    }

    /// Runs `app` until [`App::should_exit`] returns true.
    ///
    /// Ticks call [`App::update`], renders call [`App::draw`] and terminal
    /// events go to [`App::handle_event`].
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release = enable_key_release();
            app.init(&mut self);
            self.events.restart_clock();

            let result = (|| -> anyhow::Result<()> {
                while !app.should_exit() {
                    match self.events.next()? {
                        TuiEvent::Tick(elapsed) => app.update(&mut self, elapsed),
                        TuiEvent::Render => {
                            terminal.draw(|f| app.draw(f))?;
                        }
                        TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                    }
                }
                Ok(())
            })();

            if self.key_release {
                _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            }
            result
        })
    }
}

fn enable_key_release() -> bool {
    if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
        return false;
    }
    execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok()
}

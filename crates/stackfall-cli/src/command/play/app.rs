use std::time::Duration;

use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Line,
};
use serde_json::json;
use stackfall_engine::{GameEvent, GameSession, SessionConfig, SessionState, Shift};
use stackfall_leaderboard::{GameId, ScoreSubmitter, Standings, Submission, SubmitResult};

use crate::{
    command::play::controls::{Action, Control, KeyState},
    tui::{App, RenderMode, Tui},
    view::widgets::{KeyBindingDisplay, KeyHint, SessionDisplay},
};

const FPS: f64 = 60.0;

const PLAYING_HINTS: &[KeyHint] = &[
    KeyHint::new(&["←", "→"], "Move"),
    KeyHint::new(&["↓"], "Soft"),
    KeyHint::new(&["Space"], "Hard"),
    KeyHint::new(&["↑", "X"], "Rotate"),
    KeyHint::new(&["Z"], "Rotate left"),
    KeyHint::new(&["C"], "Hold"),
    KeyHint::new(&["P"], "Pause"),
    KeyHint::new(&["Q"], "Quit"),
];
const PAUSED_HINTS: &[KeyHint] = &[
    KeyHint::new(&["P"], "Resume"),
    KeyHint::new(&["R"], "Restart"),
    KeyHint::new(&["Q"], "Quit"),
];
const GAME_OVER_HINTS: &[KeyHint] = &[KeyHint::new(&["R"], "Restart"), KeyHint::new(&["Q"], "Quit")];

pub(super) struct PlayApp {
    session: GameSession,
    keys: KeyState,
    player: Option<String>,
    submitter: ScoreSubmitter,
    standings: Option<Standings>,
    status: Option<String>,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(config: SessionConfig, player: Option<String>, submitter: ScoreSubmitter) -> Self {
        Self {
            session: GameSession::with_config(config),
            keys: KeyState::default(),
            player,
            submitter,
            standings: None,
            status: None,
            is_exiting: false,
        }
    }

    pub(super) fn with_standings(self, standings: Option<Standings>) -> Self {
        Self { standings, ..self }
    }

    pub(super) fn with_status(self, status: Option<String>) -> Self {
        Self { status, ..self }
    }

    /// Waits for a submission still running when the player quit.
    pub(super) async fn finish(&mut self) -> Option<SubmitResult> {
        if self.submitter.is_in_flight() {
            self.submitter.recv().await
        } else {
            self.submitter.try_recv()
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Horizontal(shift) => self.session.set_horizontal(shift),
            Action::SoftDropHeld(held) => self.session.set_soft_drop(held),
            Action::Step(Control::Shift(Shift::Left)) => _ = self.session.try_move_left(),
            Action::Step(Control::Shift(Shift::Right)) => _ = self.session.try_move_right(),
            Action::Step(Control::SoftDrop) => _ = self.session.soft_drop(),
            Action::Step(control) | Action::Trigger(control) => self.trigger(control),
        }
    }

    fn trigger(&mut self, control: Control) {
        match control {
            Control::HardDrop => self.session.hard_drop(),
            Control::Rotate(direction) => _ = self.session.try_rotate(direction),
            Control::Hold => _ = self.session.hold(),
            Control::Pause => {
                self.release_keys();
                self.session.toggle_pause();
            }
            Control::Restart => self.restart(),
            Control::Quit => self.is_exiting = true,
            Control::Shift(_) | Control::SoftDrop => {}
        }
    }

    fn release_keys(&mut self) {
        self.keys.clear();
        self.session.set_horizontal(None);
        self.session.set_soft_drop(false);
    }

    fn restart(&mut self) {
        self.release_keys();
        self.session.reset();
        if !self.submitter.is_in_flight() {
            self.status = None;
        }
    }

    fn handle_game_events(&mut self) {
        for event in self.session.take_events() {
            if let GameEvent::GameOver { final_score } = event {
                self.submit(final_score);
            }
        }
    }

    fn submit(&mut self, score: usize) {
        let Some(player) = &self.player else {
            return;
        };
        let body = json!({ "name": player, "score": score });
        let submission = match Submission::parse(GameId::Tetris, &body) {
            Ok(submission) => submission,
            Err(e) => {
                self.status = Some(format!("score not submitted: {e}"));
                return;
            }
        };
        self.status = Some(if self.submitter.submit(submission) {
            "submitting score...".to_owned()
        } else {
            "a submission is already running".to_owned()
        });
    }

    fn collect_submissions(&mut self) {
        while let Some(result) = self.submitter.try_recv() {
            match result {
                Ok(standings) => {
                    let rank = self.player.as_deref().and_then(|player| {
                        standings
                            .ranking()
                            .iter()
                            .position(|&(name, _)| name == player)
                    });
                    self.status = Some(match rank {
                        Some(rank) => format!("score saved, rank #{}", rank + 1),
                        None => "score saved".to_owned(),
                    });
                    self.standings = Some(standings);
                }
                Err(e) => self.status = Some(format!("failed to save score: {e}")),
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        tui.set_render_mode(RenderMode::from_rate(FPS));
        self.keys = KeyState::new(tui.reports_key_release());
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_event()
            && let Some(action) = self.keys.handle(&key)
        {
            self.apply(action);
            self.handle_game_events();
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let hints = match self.session.session_state() {
            SessionState::Playing => PLAYING_HINTS,
            SessionState::Paused => PAUSED_HINTS,
            SessionState::GameOver => GAME_OVER_HINTS,
        };
        let [main_area, help_area, status_area] = Layout::vertical([
            Constraint::Length(SessionDisplay::HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let session = SessionDisplay::new(&self.session)
            .leaderboard(self.standings.as_ref(), self.player.as_deref());
        frame.render_widget(session, main_area);
        frame.render_widget(KeyBindingDisplay::new(hints), help_area);
        if let Some(status) = &self.status {
            frame.render_widget(Line::from(status.as_str()).centered(), status_area);
        }
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.session.tick(elapsed);
        self.handle_game_events();
        self.collect_submissions();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use stackfall_leaderboard::ScoreStore;
    use tokio::runtime::Runtime;

    use super::*;

    fn scratch_dir(label: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        std::env::temp_dir().join(format!("stackfall-cli-{label}-{}-{nanos}", std::process::id()))
    }

    fn app(runtime: &Runtime, player: Option<&str>) -> (PlayApp, Arc<ScoreStore>) {
        let store = Arc::new(ScoreStore::new(scratch_dir("play")));
        let submitter = ScoreSubmitter::new(store.clone(), runtime.handle().clone());
        let app = PlayApp::new(SessionConfig::default(), player.map(str::to_owned), submitter);
        (app, store)
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        let mut tui = Tui::new();
        app.handle_event(&mut tui, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn play_until_game_over(app: &mut PlayApp) {
        for _ in 0..1000 {
            if app.session.session_state().is_game_over() {
                return;
            }
            press(app, KeyCode::Char(' '));
        }
        panic!("game never ended");
    }

    fn wait_for_submission(app: &mut PlayApp) {
        let mut tui = Tui::new();
        for _ in 0..500 {
            app.update(&mut tui, Duration::from_millis(1));
            if !app.submitter.is_in_flight() && app.standings.is_some() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("submission never finished");
    }

    #[test]
    fn test_game_over_submits_named_score() {
        let runtime = Runtime::new().unwrap();
        let (mut app, store) = app(&runtime, Some("ada"));
        play_until_game_over(&mut app);
        let score = app.session.stats().score();
        wait_for_submission(&mut app);

        let expected = i64::try_from(score).unwrap();
        let saved = store.standings(GameId::Tetris).unwrap();
        assert_eq!(saved.best_of("ada"), Some(expected));
        assert_eq!(app.standings.as_ref().and_then(|s| s.best_of("ada")), Some(expected));
        assert_eq!(app.status.as_deref(), Some("score saved, rank #1"));
    }

    #[test]
    fn test_anonymous_game_is_not_submitted() {
        let runtime = Runtime::new().unwrap();
        let (mut app, store) = app(&runtime, None);
        play_until_game_over(&mut app);
        assert!(!app.submitter.is_in_flight());
        assert!(app.status.is_none());
        assert!(store.standings(GameId::Tetris).unwrap().is_empty());
    }

    #[test]
    fn test_restart_and_quit_keys() {
        let runtime = Runtime::new().unwrap();
        let (mut app, _) = app(&runtime, None);
        play_until_game_over(&mut app);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.session.session_state().is_playing());
        assert_eq!(app.session.stats().score(), 0);

        press(&mut app, KeyCode::Char('p'));
        assert!(app.session.session_state().is_paused());
        assert!(!app.should_exit());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }
}

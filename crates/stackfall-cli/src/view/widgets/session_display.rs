use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use stackfall_engine::{GameSession, RenderBoard, SessionState};
use stackfall_leaderboard::Standings;

use crate::view::widgets::{
    BoardDisplay, LeaderboardDisplay, PieceDisplay, StatsDisplay, color, style,
};

/// Hold and stats on the left, the board in the middle, next piece and
/// leaderboard on the right.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    standings: Option<&'a Standings>,
    player: Option<&'a str>,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            standings: None,
            player: None,
        }
    }

    pub const HEIGHT: u16 = 22;

    pub fn leaderboard(self, standings: Option<&'a Standings>, player: Option<&'a str>) -> Self {
        Self {
            standings,
            player,
            ..self
        }
    }
}

fn panel<'a>(title: &'a str, border: Color) -> Block<'a> {
    Block::bordered()
        .title(Line::from(title).centered())
        .padding(Padding::horizontal(1))
        .border_style(border)
        .style(style::DEFAULT)
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.session.session_state();
        let border = match state {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let render_board = RenderBoard::from_session(self.session);
        let board = BoardDisplay::new(&render_board)
            .block(Block::bordered().border_style(border).style(style::DEFAULT));
        let hold = PieceDisplay::new(self.session.held_piece())
            .dimmed(!self.session.can_hold())
            .block(panel("HOLD", border));
        let next = PieceDisplay::new(Some(self.session.next_piece())).block(panel("NEXT", border));
        let stats = StatsDisplay::new(self.session).block(panel("STATS", border));
        let leaderboard = LeaderboardDisplay::new(self.standings)
            .player(self.player)
            .block(panel("TOP 10", border));

        let [left, center, right] = Layout::horizontal([
            Constraint::Length(u16::max(hold.width(), stats.width())),
            Constraint::Length(board.width()),
            Constraint::Length(u16::max(next.width(), leaderboard.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold.height()),
            Constraint::Length(stats.height()),
        ])
        .areas(left);
        let [hold_area] = Layout::horizontal([Constraint::Length(hold.width())])
            .flex(Flex::End)
            .areas(hold_area);
        let [stats_area] = Layout::horizontal([Constraint::Length(stats.width())])
            .flex(Flex::End)
            .areas(stats_area);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(center);
        let [next_area, leaderboard_area] = Layout::vertical([
            Constraint::Length(next.height()),
            Constraint::Length(leaderboard.height()),
        ])
        .areas(right);
        let [next_area] = Layout::horizontal([Constraint::Length(next.width())]).areas(next_area);

        let board_width = board.width();
        hold.render(hold_area, buf);
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        next.render(next_area, buf);
        leaderboard.render(leaderboard_area, buf);

        let popup = match state {
            SessionState::Playing => None,
            SessionState::Paused => Some((
                "PAUSED".to_owned(),
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionState::GameOver => Some((
                format!("GAME OVER\n{} points", self.session.stats().score()),
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        };
        if let Some((text, style)) = popup {
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(4));
            let block = Block::new().style(style);
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            Text::styled(text, style)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(2)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(session: &GameSession) -> Buffer {
        let area = Rect::new(0, 0, 80, SessionDisplay::HEIGHT);
        let mut buf = Buffer::empty(area);
        let standings = Standings::empty(stackfall_leaderboard::GameId::Tetris);
        SessionDisplay::new(session)
            .leaderboard(Some(&standings), Some("ada"))
            .render(area, &mut buf);
        buf
    }

    fn contains(buf: &Buffer, needle: &str) -> bool {
        (0..buf.area.height).any(|y| {
            let row: String = (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect();
            row.contains(needle)
        })
    }

    #[test]
    fn test_panels_fit_in_eighty_columns() {
        let buf = render(&GameSession::new());
        for title in ["HOLD", "NEXT", "STATS", "TOP 10", "SCORE", "no scores yet"] {
            assert!(contains(&buf, title), "missing {title}");
        }
        assert!(!contains(&buf, "PAUSED"));
    }

    #[test]
    fn test_pause_popup() {
        let mut session = GameSession::new();
        session.toggle_pause();
        assert!(contains(&render(&session), "PAUSED"));
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_leaderboard::{MAX_STANDINGS, Standings};

use crate::view::widgets::style;

/// Ranked names and scores, highlighting the current player.
#[derive(Debug)]
pub struct LeaderboardDisplay<'a> {
    standings: Option<&'a Standings>,
    player: Option<&'a str>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> LeaderboardDisplay<'a> {
    pub fn new(standings: Option<&'a Standings>) -> Self {
        Self {
            standings,
            player: None,
            block: None,
        }
    }

    pub fn player(self, player: Option<&'a str>) -> Self {
        Self { player, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        24 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(MAX_STANDINGS).unwrap_or(u16::MAX) + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self, width: usize) -> Vec<Line<'a>> {
        let Some(standings) = self.standings else {
            return vec![Line::styled("unavailable", style::STATUS)];
        };
        if standings.is_empty() {
            return vec![Line::styled("no scores yet", style::STATUS)];
        }
        standings
            .ranking()
            .into_iter()
            .enumerate()
            .map(|(rank, (name, metric))| {
                let style = if self.player == Some(name) {
                    style::HIGHLIGHT
                } else {
                    style::DEFAULT
                };
                let head = format!("{:>2}. {name}", rank + 1);
                let tail = metric.to_string();
                let pad = width.saturating_sub(head.chars().count() + tail.chars().count());
                Line::from(vec![
                    Span::styled(head, style),
                    Span::styled(" ".repeat(pad), Style::new()),
                    Span::styled(tail, style),
                ])
            })
            .collect()
    }
}

impl Widget for LeaderboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        for (line, y) in self.lines(usize::from(area.width)).into_iter().zip(area.top()..area.bottom()) {
            line.render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}

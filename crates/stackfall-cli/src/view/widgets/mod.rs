use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, leaderboard_display::*,
    piece_display::*, session_display::*, stats_display::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod leaderboard_display;
mod piece_display;
mod session_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 240, 240);
    pub const YELLOW: Color = Color::Rgb(240, 240, 0);
    pub const PURPLE: Color = Color::Rgb(160, 0, 240);
    pub const GREEN: Color = Color::Rgb(0, 240, 0);
    pub const RED: Color = Color::Rgb(240, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 240);
    pub const ORANGE: Color = Color::Rgb(240, 160, 0);
    pub const GRAY: Color = Color::Rgb(96, 96, 96);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

mod style {
    use ratatui::style::{Color, Modifier, Style};
    use stackfall_engine::PieceKind;

    use super::color;

    const fn fill(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = Style::new().fg(color::WHITE).bg(color::BLACK);
    pub const EMPTY: Style = fill(color::BLACK);
    pub const EMPTY_DOT: Style = Style::new().fg(color::GRAY).bg(color::BLACK);
    pub const HIGHLIGHT: Style = DEFAULT.fg(color::YELLOW).add_modifier(Modifier::BOLD);
    pub const STATUS: Style = Style::new().fg(Color::DarkGray);

    pub const fn piece_color(kind: PieceKind) -> Color {
        match kind {
            PieceKind::I => color::CYAN,
            PieceKind::O => color::YELLOW,
            PieceKind::T => color::PURPLE,
            PieceKind::S => color::GREEN,
            PieceKind::Z => color::RED,
            PieceKind::J => color::BLUE,
            PieceKind::L => color::ORANGE,
        }
    }

    pub const fn piece(kind: PieceKind) -> Style {
        fill(piece_color(kind))
    }

    pub const fn ghost(kind: PieceKind) -> Style {
        Style::new().fg(piece_color(kind)).bg(color::BLACK)
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let probe = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(probe, |block| block.inner(probe));
    probe.height - inner.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let probe = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(probe, |block| block.inner(probe));
    probe.width - inner.width
}

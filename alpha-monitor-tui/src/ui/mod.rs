use crate::app::App;
use alpha_monitor::{EnrichedToken, MonitorState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};

mod detail;
mod status;
mod table;

pub const GAIN: Color = Color::Rgb(16, 185, 129);
pub const LOSS: Color = Color::Rgb(239, 68, 68);
pub const HOLDERS: Color = Color::Rgb(59, 130, 246);
pub const ACCENT: Color = Color::Rgb(234, 179, 8);
pub const MUTED: Color = Color::Rgb(107, 114, 128);
pub const TEXT: Color = Color::Rgb(229, 231, 235);
pub const PANEL: Color = Color::Rgb(17, 24, 39);

/// Colour for a value whose sign carries meaning. Zero counts as a gain.
pub fn signed_color(value: f64) -> Color {
    if value >= 0.0 { GAIN } else { LOSS }
}

/// Render one frame of the dashboard.
pub fn render(f: &mut Frame, app: &App, state: &MonitorState, visible: &[&EnrichedToken]) {
    let banner = if state.error().is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.area());

    status::render_header(f, chunks[0], app, state);
    if let Some(error) = state.error() {
        status::render_error_banner(f, chunks[1], error);
    }
    status::render_controls(f, chunks[2], app);
    table::render_tokens(f, chunks[3], app, state, visible);
    status::render_footer(f, chunks[4], app, state);

    if let Some(token) = app
        .view
        .selected
        .as_ref()
        .and_then(|id| state.tokens().iter().find(|token| token.id() == id))
    {
        detail::render_detail(f, centered_rect(80, 80, f.area()), token, state.history());
    }
}

/// Rectangle of `percent_x` by `percent_y` centred within `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let actual = centered_rect(80, 80, area);
        assert_eq!(actual, Rect::new(10, 5, 80, 40));
    }

    #[test]
    fn test_signed_color() {
        assert_eq!(signed_color(0.0), GAIN);
        assert_eq!(signed_color(2.5), GAIN);
        assert_eq!(signed_color(-0.1), LOSS);
    }
}

use super::{ACCENT, GAIN, LOSS, MUTED, PANEL, TEXT};
use crate::{
    app::{App, Mode},
    format,
};
use alpha_monitor::{Column, MonitorError, MonitorState};
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

pub fn render_header(f: &mut Frame, area: Rect, app: &App, state: &MonitorState) {
    let (symbol, label, color) = if state.is_loading() {
        ("⟳", "LOADING", ACCENT)
    } else if state.error().is_some() {
        ("○", "STALE", LOSS)
    } else {
        ("●", "LIVE", GAIN)
    };

    let updated = state
        .last_updated()
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    let line = Line::from(vec![
        Span::styled(
            " ◆ BINANCE ALPHA MONITOR ◆ ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {symbol} {label} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" Updated: {updated} "), Style::default().fg(TEXT)),
        Span::styled(
            format!(" Freq: {} ", format::interval(app.view.refresh_interval)),
            Style::default().fg(TEXT),
        ),
        Span::styled(
            format!(" Tokens: {} ", state.tokens().len()),
            Style::default().fg(MUTED),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(PANEL));

    f.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}

pub fn render_error_banner(f: &mut Frame, area: Rect, error: &MonitorError) {
    let line = Line::from(vec![
        Span::styled(" ✖ ", Style::default().fg(LOSS).add_modifier(Modifier::BOLD)),
        Span::styled(error.to_string(), Style::default().fg(LOSS)),
        Span::styled(format!("  ({})", error.hint()), Style::default().fg(MUTED)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(LOSS));

    f.render_widget(
        Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Search box, sort indicator and, in column mode, the column picker.
pub fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.mode {
        Mode::Columns => column_picker(app),
        Mode::Normal | Mode::Search => {
            let editing = app.mode == Mode::Search;
            let search = if app.view.search.is_empty() && !editing {
                Span::styled("Search tokens... [/]", Style::default().fg(MUTED))
            } else {
                Span::styled(
                    format!("{}{}", app.view.search, if editing { "█" } else { "" }),
                    Style::default().fg(TEXT),
                )
            };

            Line::from(vec![
                Span::styled(" 🔍 ", Style::default().fg(ACCENT)),
                search,
                Span::styled(
                    format!(
                        "   Sort: {} {}",
                        app.view.sort_field, app.view.sort_direction
                    ),
                    Style::default().fg(MUTED),
                ),
            ])
        }
    };

    let border = if app.mode == Mode::Normal { MUTED } else { ACCENT };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn column_picker(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " Columns: ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];

    spans.extend(Column::ALL.iter().enumerate().map(|(index, column)| {
        let (mark, color) = if app.view.is_visible(*column) {
            ("x", TEXT)
        } else {
            (" ", MUTED)
        };
        Span::styled(
            format!("{}[{mark}] {column}  ", index + 1),
            Style::default().fg(color),
        )
    }));

    Line::from(spans)
}

pub fn render_footer(f: &mut Frame, area: Rect, app: &App, state: &MonitorState) {
    let retention_hours = state.history().retention().as_secs() / 3600;
    let lines = vec![
        Line::from(Span::styled(
            format!(
                "Data sourced from Binance Web3 Wallet (Alpha). Sparklines accumulate at {} intervals. \
                 Tokens listed on CEX are hidden. History is retained for {retention_hours} hours.",
                format::interval(app.view.refresh_interval)
            ),
            Style::default().fg(MUTED),
        )),
        Line::from(Span::styled(
            "[/] Search  [1-8] Sort  [c] Columns  [i] Interval  [r] Refresh  [Enter] Detail  [q] Quit",
            Style::default().fg(MUTED),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

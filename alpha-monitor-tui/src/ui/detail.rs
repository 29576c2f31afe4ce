use super::{ACCENT, HOLDERS, MUTED, PANEL, TEXT, signed_color};
use crate::format;
use alpha_monitor::{EnrichedToken, HistoryMetric, HistoryStore};
use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Sparkline},
};

pub fn render_detail(f: &mut Frame, area: Rect, token: &EnrichedToken, history: &HistoryStore) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(ACCENT))
        .title_top(
            Line::from(vec![
                Span::styled(
                    format!(" {} ", token.name()),
                    Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("/ {} ", token.symbol()), Style::default().fg(MUTED)),
            ])
            .alignment(Alignment::Center),
        )
        .title_bottom(
            Line::from(Span::styled(" [Esc] Close ", Style::default().fg(MUTED)))
                .alignment(Alignment::Center),
        )
        .style(Style::default().bg(PANEL));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    f.render_widget(Paragraph::new(identity_line(token)), chunks[0]);
    render_stats(f, chunks[1], token);

    render_chart(
        f,
        chunks[2],
        "PRICE TREND",
        history,
        token,
        HistoryMetric::Price,
        signed_color(token.change_24h),
    );
    render_chart(
        f,
        chunks[3],
        "HOLDERS TREND",
        history,
        token,
        HistoryMetric::Holders,
        HOLDERS,
    );

    let listed = token
        .listed_at()
        .filter(|_| token.listing_time() > 0)
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    f.render_widget(
        Paragraph::new(Span::styled(
            format!(
                "Listed: {listed}   Supply: {} / {}   Token ID: {}",
                format::compact(token.circulating_supply()),
                format::compact(token.total_supply()),
                token.id()
            ),
            Style::default().fg(MUTED),
        )),
        chunks[4],
    );
}

fn identity_line(token: &EnrichedToken) -> Line<'_> {
    let chain = if token.raw.chain_name.is_empty() {
        token.raw.chain_id.as_str()
    } else {
        token.raw.chain_name.as_str()
    };

    Line::from(vec![
        Span::styled(chain, Style::default().fg(ACCENT)),
        Span::styled("  ", Style::default()),
        Span::styled(
            format::short_address(&token.raw.contract_address),
            Style::default().fg(MUTED),
        ),
    ])
}

fn render_stats(f: &mut Frame, area: Rect, token: &EnrichedToken) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let change = signed_color(token.change_24h);

    stat(
        f,
        columns[0],
        "PRICE",
        format::price(token.price),
        Span::styled(
            format::change(&token.raw.percent_change_24h, token.change_24h),
            Style::default().fg(change),
        ),
    );
    stat(
        f,
        columns[1],
        "HOLDERS",
        format::thousands(token.holders),
        Span::styled(
            format!(
                "H {} / L {}",
                format::price(token.price_high_24h()),
                format::price(token.price_low_24h())
            ),
            Style::default().fg(MUTED),
        ),
    );
    stat(
        f,
        columns[2],
        "MARKET CAP",
        format!("${}", format::compact(token.market_cap)),
        Span::styled(
            format!("FDV: ${}", format::compact(token.fdv())),
            Style::default().fg(MUTED),
        ),
    );
    stat(
        f,
        columns[3],
        "24H VOLUME",
        format!("${}", format::compact(token.volume_24h)),
        Span::styled(
            format!("Trades: {}", format::thousands(token.trades_24h())),
            Style::default().fg(MUTED),
        ),
    );
}

fn stat(f: &mut Frame, area: Rect, label: &str, value: String, note: Span<'_>) {
    let lines = vec![
        Line::from(Span::styled(label.to_string(), Style::default().fg(MUTED))),
        Line::from(Span::styled(
            value,
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(note),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(MUTED));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_chart(
    f: &mut Frame,
    area: Rect,
    title: &str,
    history: &HistoryStore,
    token: &EnrichedToken,
    metric: HistoryMetric,
    color: Color,
) {
    let series = history.series(token.id());
    let values = series
        .map(|series| series.points().map(|point| metric.value(point)).collect::<Vec<_>>())
        .unwrap_or_default();

    // Keep the most recent points that fit inside the borders
    let width = usize::from(area.width.saturating_sub(2));
    let recent = &values[values.len().saturating_sub(width)..];
    let sparkline_data = format::bars(recent);

    let span = series
        .and_then(|series| Some((series.first()?.timestamp, series.last()?.timestamp)))
        .map(|(first, last)| format!(" {} → {} ", clock(first), clock(last)))
        .unwrap_or_else(|| " no history yet ".to_string());

    let latest = match (metric, values.last()) {
        (HistoryMetric::Price, Some(value)) => format::price(*value),
        (HistoryMetric::Holders, Some(value)) => format::thousands(*value as u64),
        (_, None) => "-".to_string(),
    };
    let arrow = match history.trend(token.id(), metric) {
        Some(true) => "▲ ",
        Some(false) => "▼ ",
        None => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title_top(Line::from(vec![
            Span::styled(
                format!(" {title} "),
                Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{latest} {arrow}"), Style::default().fg(color)),
        ]))
        .title_bottom(
            Line::from(Span::styled(
                format!("{span}({} points) ", values.len()),
                Style::default().fg(MUTED),
            ))
            .alignment(Alignment::Right),
        );

    let sparkline = Sparkline::default()
        .block(block)
        .data(&sparkline_data)
        .style(Style::default().fg(color))
        .max(100);

    f.render_widget(sparkline, area);
}

fn clock(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|at| at.with_timezone(&Local).format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

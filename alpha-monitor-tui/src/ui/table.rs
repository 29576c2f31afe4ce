use super::{ACCENT, HOLDERS, LOSS, MUTED, PANEL, TEXT, signed_color};
use crate::{app::App, format};
use alpha_monitor::{
    Column, EnrichedToken, HistoryMetric, HistoryStore, MonitorState, SortDirection, SortField,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

const SPARK_WIDTH: usize = 14;

pub fn render_tokens(
    f: &mut Frame,
    area: Rect,
    app: &App,
    state: &MonitorState,
    visible: &[&EnrichedToken],
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(MUTED))
        .title_top(
            Line::from(Span::styled(
                format!(" ALPHA TOKENS ({}) ", visible.len()),
                Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        )
        .style(Style::default().bg(PANEL));

    if visible.is_empty() {
        let message = if state.is_loading() {
            "Loading data from Binance..."
        } else {
            "No tokens found."
        };
        f.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(MUTED)))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let columns = app.view.columns().collect::<Vec<_>>();

    let header = Row::new(
        std::iter::once(header_cell("Token", SortField::Name, app))
            .chain(columns.iter().map(|column| match column.sort_field() {
                Some(field) => header_cell(&column.to_string(), field, app),
                None => Cell::from(column.to_string()).style(Style::default().fg(MUTED)),
            })),
    )
    .height(1);

    let rows = visible
        .iter()
        .map(|token| token_row(token, &columns, state.history()));

    let widths = std::iter::once(Constraint::Min(20))
        .chain(columns.iter().map(|column| column_width(*column)))
        .collect::<Vec<_>>();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::Rgb(31, 41, 55))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn header_cell(label: &str, field: SortField, app: &App) -> Cell<'static> {
    if app.view.sort_field != field {
        return Cell::from(label.to_string()).style(Style::default().fg(MUTED));
    }

    let arrow = match app.view.sort_direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    };
    Cell::from(format!("{label} {arrow}"))
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
}

fn column_width(column: Column) -> Constraint {
    match column {
        Column::PriceTrend | Column::HoldersTrend => Constraint::Length(SPARK_WIDTH as u16 + 1),
        Column::Price | Column::Liquidity => Constraint::Length(16),
        Column::Holders
        | Column::Change24h
        | Column::MarketCap
        | Column::Volume24h
        | Column::ListingTime => Constraint::Length(12),
    }
}

fn token_row<'a>(token: &'a EnrichedToken, columns: &[Column], history: &HistoryStore) -> Row<'a> {
    let mut identity = vec![Span::styled(
        token.symbol(),
        Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
    )];
    if token.is_hot() {
        identity.push(Span::styled(" HOT", Style::default().fg(LOSS)));
    }
    identity.push(Span::styled(format!(" {}", token.name()), Style::default().fg(MUTED)));

    let cells = std::iter::once(Cell::from(Line::from(identity)))
        .chain(columns.iter().map(|column| token_cell(token, *column, history)))
        .collect::<Vec<_>>();

    Row::new(cells).height(1)
}

fn token_cell<'a>(token: &EnrichedToken, column: Column, history: &HistoryStore) -> Cell<'a> {
    let plain = Style::default().fg(TEXT);
    let dim = Style::default().fg(MUTED);

    match column {
        Column::Price => Cell::from(format::price(token.price)).style(plain),
        Column::PriceTrend => Cell::from(trend(history, token, HistoryMetric::Price))
            .style(Style::default().fg(signed_color(token.change_24h))),
        Column::Holders => Cell::from(format::thousands(token.holders)).style(plain),
        Column::HoldersTrend => Cell::from(trend(history, token, HistoryMetric::Holders))
            .style(Style::default().fg(HOLDERS)),
        Column::Change24h => {
            Cell::from(format::change(&token.raw.percent_change_24h, token.change_24h))
                .style(Style::default().fg(signed_color(token.change_24h)))
        }
        Column::MarketCap => Cell::from(format::millions(token.market_cap)).style(dim),
        Column::Volume24h => Cell::from(format::millions(token.volume_24h)).style(dim),
        Column::Liquidity => {
            Cell::from(format!("${}", format::decimal_thousands(token.liquidity()))).style(dim)
        }
        Column::ListingTime => Cell::from(format::listing_date(token.listing_time())).style(dim),
    }
}

fn trend(history: &HistoryStore, token: &EnrichedToken, metric: HistoryMetric) -> String {
    let values = history
        .query(token.id(), metric)
        .into_iter()
        .map(|point| point.value)
        .collect::<Vec<_>>();

    format::sparkline(&values, SPARK_WIDTH)
}

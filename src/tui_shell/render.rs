use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Paragraph, Row, Sparkline, Table, TableState, Wrap,
};
use time::OffsetDateTime;

use crate::model::{CatalogMachine, Difficulty};
use crate::state::Context;

use super::app::{App, EntryKind};
use super::status;

const ACCENT: Color = Color::Rgb(0x9f, 0xef, 0x00);

fn difficulty_color(d: Difficulty) -> Color {
    match d {
        Difficulty::Easy => Color::Rgb(0x90, 0xcd, 0x3f),
        Difficulty::Medium => Color::Rgb(0xff, 0xb8, 0x3e),
        Difficulty::Hard => Color::Rgb(0xfe, 0x00, 0x00),
        Difficulty::Insane => Color::Rgb(0xff, 0xcc, 0xff),
    }
}

fn panel<'a>(title: &'a str) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(super) fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(9),
        ])
        .split(area);

    draw_header(frame, app, outer[0]);
    draw_body(frame, app, outer[1]);
    draw_footer(frame, app, outer[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("labdeck", Style::default().fg(Color::Black).bg(ACCENT)),
        Span::raw("  "),
    ];
    if let Some(p) = &app.profile {
        spans.push(Span::styled(
            p.name.as_str(),
            Style::default().fg(ACCENT),
        ));
        spans.push(Span::raw("  "));
    }
    if app.dispatcher.in_flight() {
        spans.push(Span::styled(
            "[command in flight]",
            Style::default().fg(Color::Yellow),
        ));
    }
    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(area);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(18), Constraint::Min(0)])
        .split(cols[0]);

    draw_profile(frame, app, sidebar[0]);
    draw_catalog(frame, app, sidebar[1]);
    draw_console(frame, app, cols[1]);
}

fn draw_profile(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = status::profile_lines(app.profile.as_ref(), app.season.as_ref())
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Player Stats")), area);
}

fn catalog_row(machine: &CatalogMachine) -> Row<'_> {
    let difficulty = machine.difficulty.map(|d| {
        Cell::from(d.as_str()).style(Style::default().fg(difficulty_color(d)))
    });
    Row::new(vec![
        Cell::from(machine.id.to_string()),
        Cell::from(machine.name.as_str()),
        Cell::from(machine.os.as_str()),
        difficulty.unwrap_or_else(|| Cell::from("?")),
        Cell::from(if machine.user_owned { "U" } else { "" }),
        Cell::from(if machine.root_owned { "R" } else { "" }),
    ])
}

fn draw_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "Machines [{}] ({})",
        app.tab.title(),
        app.rows().len()
    );

    let rows: Vec<Row> = app.rows().iter().map(catalog_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(2),
            Constraint::Length(2),
        ],
    )
    .header(
        Row::new(vec!["ID", "Name", "OS", "Diff", "U", "R"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).fg(ACCENT))
    .block(panel(&title));

    let mut state = TableState::default();
    if !app.rows().is_empty() {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn entry_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::Output => Style::default().fg(Color::White),
        EntryKind::Error => Style::default().fg(Color::Red),
        EntryKind::Command => Style::default().fg(Color::Cyan),
        EntryKind::Debug => Style::default().fg(Color::DarkGray),
    }
}

fn draw_console(frame: &mut Frame, app: &App, area: Rect) {
    let suggestion_height = if app.suggestions.is_empty() {
        0
    } else {
        app.suggestions.len().min(6) as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(suggestion_height),
            Constraint::Length(3),
        ])
        .split(area);

    // Scroll log, pinned to the bottom.
    let lines: Vec<Line> = app
        .log
        .iter()
        .flat_map(|entry| {
            let style = entry_style(entry.kind);
            entry
                .lines
                .iter()
                .map(move |l| Line::from(Span::styled(l.clone(), style)))
        })
        .collect();
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(panel("Console"));
    frame.render_widget(log, chunks[0]);

    if !app.suggestions.is_empty() {
        let rows: Vec<Line> = app
            .suggestions
            .iter()
            .take(6)
            .enumerate()
            .map(|(i, def)| {
                let style = if i == app.suggestion_selected {
                    Style::default().fg(Color::Black).bg(ACCENT)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(
                    format!("{:<24} {}", def.usage, def.help),
                    style,
                ))
            })
            .collect();
        frame.render_widget(
            Paragraph::new(rows).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
    }

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.input.buf.as_str()),
    ]))
    .block(panel("Command"));
    frame.render_widget(input, chunks[2]);
    frame.set_cursor_position(Position::new(
        chunks[2].x + 3 + app.input.cursor as u16,
        chunks[2].y + 1,
    ));
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(36),
            Constraint::Percentage(36),
        ])
        .split(area);

    let vpn: Vec<Line> = status::vpn_lines(&app.vpn).into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(vpn).block(panel("VPN Connection")), cols[0]);

    draw_active_machine(frame, app, cols[1]);
    draw_detail(frame, app, cols[2]);
}

fn draw_active_machine(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = status::active_machine_lines(
        app.context.context(),
        app.ping_ms,
        OffsetDateTime::now_utc(),
    )
    .into_iter()
    .map(Line::from)
    .collect();

    // Control hints, greyed out while unavailable.
    let mut spans = Vec::new();
    for (label, enabled) in status::control_hints(app.control_state()) {
        let style = if enabled {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    lines.push(Line::default());
    lines.push(Line::from(spans));

    frame.render_widget(Paragraph::new(lines).block(panel("Active Machine")), area);
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let feedback = match app.context.context() {
        Context::Browsing(entry) => entry.feedback.clone(),
        _ => None,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if feedback.is_some() { 2 } else { 0 }),
        ])
        .split(area);

    let lines: Vec<Line> = status::detail_lines(app.context.context())
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Machine Details")), chunks[0]);

    if let Some(histogram) = feedback {
        let buckets: Vec<u64> = histogram.buckets().iter().map(|&n| n as u64).collect();
        let spark = Sparkline::default()
            .data(&buckets)
            .style(Style::default().fg(ACCENT));
        frame.render_widget(spark, chunks[1]);
    }
}

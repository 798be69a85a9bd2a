//! Layout and rendering with ratatui

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use redstream_feed::{ContentSource, FeedRow};

use crate::app::{App, Mode};

pub fn draw<CS>(frame: &mut Frame, app: &mut App<CS>)
where
    CS: ContentSource + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Feed
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_feed(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header<CS>(frame: &mut Frame, app: &App<CS>, area: Rect)
where
    CS: ContentSource + 'static,
{
    let state = app.view.state();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.topic()),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} · {} posts", state.sort(), state.items().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if state.loading() {
        spans.push(Span::styled(
            format!(" {}", app.spinner()),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_feed<CS>(frame: &mut Frame, app: &mut App<CS>, area: Rect)
where
    CS: ContentSource + 'static,
{
    let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    app.list_height = block.inner(area).height;

    let spinner = app.spinner();
    let items: Vec<ListItem> = app
        .view
        .rows()
        .into_iter()
        .map(|row| match row {
            FeedRow::Entry(entry) => ListItem::new(vec![
                Line::from(Span::styled(
                    entry.title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", entry.meta),
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            FeedRow::Error(message) => ListItem::new(Line::from(Span::styled(
                format!("✗ {} (r to retry)", message),
                Style::default().fg(Color::Red),
            ))),
            FeedRow::Loading => ListItem::new(Line::from(Span::styled(
                format!("{} Loading...", spinner),
                Style::default().fg(Color::Yellow),
            ))),
            FeedRow::End => ListItem::new(Line::from(Span::styled(
                "-- end of feed --",
                Style::default().fg(Color::DarkGray),
            ))),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 48)))
        .highlight_symbol("▌");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_footer<CS>(frame: &mut Frame, app: &App<CS>, area: Rect)
where
    CS: ContentSource + 'static,
{
    let line = match (&app.mode, &app.notice) {
        (Mode::EditTopic(input), _) => Line::from(vec![
            Span::styled(" r/", Style::default().fg(Color::LightRed)),
            Span::raw(input.clone()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ]),
        (Mode::Browse, Some(notice)) => Line::from(Span::styled(
            format!(" {}", notice),
            Style::default().fg(Color::Red),
        )),
        (Mode::Browse, None) => Line::from(Span::styled(
            " j/k move · / topic · s sort · r reload · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

use crate::app::{App, Content, InputMode};
use crate::catalog::{Card, NOT_FOUND_MESSAGE};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

pub const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 4;

pub fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.controller.state();
    let mut spans = vec![Span::styled(
        " Pokédex Explorer",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let (Some(total_items), Some(total_pages)) = (state.total_items, state.total_pages()) {
        spans.push(Span::styled(
            format!(
                "   [page {} of {} · {} entries]",
                state.current_page,
                total_pages.max(1),
                total_items
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(loaded_at) = app.loaded_at {
        spans.push(Span::styled(
            format!("   loaded {}", loaded_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, area);
}

pub fn render_search(app: &App, frame: &mut Frame, area: Rect) {
    let style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let label = if app.input_mode == InputMode::Editing {
        " Name or number (Enter to search, Esc to cancel): "
    } else {
        " Name or number (/): "
    };

    let search_bar = Paragraph::new(format!("{}{}", label, app.search))
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, area);

    if app.input_mode == InputMode::Editing {
        let cursor_x = area.x + 1 + label.width() as u16 + app.search.width() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

pub fn render_cards(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Catalog ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = match &app.content {
        Content::Cards(cards) => cards,
        Content::Loading => {
            render_message(frame, inner, "Loading...", Color::DarkGray);
            return;
        }
        Content::NotFound => {
            render_message(frame, inner, NOT_FOUND_MESSAGE, Color::Red);
            return;
        }
        Content::Failed(msg) => {
            let text = format!("Could not load the catalog: {}\nPress r to retry.", msg);
            render_message(frame, inner, &text, Color::Red);
            return;
        }
    };

    let columns = (inner.width / CARD_WIDTH).max(1);
    let rows = inner.height / CARD_HEIGHT;
    let visible = cards
        .iter()
        .skip(app.card_scroll)
        .take(usize::from(columns) * usize::from(rows));

    for (i, card) in visible.enumerate() {
        let i = i as u16;
        let cell = Rect::new(
            inner.x + (i % columns) * CARD_WIDTH,
            inner.y + (i / columns) * CARD_HEIGHT,
            CARD_WIDTH.min(inner.width),
            CARD_HEIGHT,
        );
        render_card(frame, cell, card);
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card) {
    let text_width = usize::from(area.width.saturating_sub(2));
    let lines = vec![
        Line::from(vec![
            Span::styled(card.id.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::styled(card.category.clone(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(
            truncate_str(&card.image, text_width),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(Span::styled(
                format!(" {} ", truncate_str(&card.name, text_width.saturating_sub(2))),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let message = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, area);
}

pub fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←→", key),
        Span::raw(" Page  "),
        Span::styled("Tab", key),
        Span::raw(" Focus  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("r", key),
        Span::raw(" Reload  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), area);
}

/// Truncate a string to `max_width` columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        result.push(c);
        width += w;
    }
    result.push('…');
    result
}

mod cards;
mod help;
pub mod pagination;

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub use cards::CARD_WIDTH;

/// Screen regions shared by rendering and mouse hit-testing.
pub struct Areas {
    pub header: Rect,
    pub search: Rect,
    pub cards: Rect,
    pub pagination: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> Areas {
    // header(3) + search(3) + cards(min) + pagination(3) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    Areas {
        header: chunks[0],
        search: chunks[1],
        cards: chunks[2],
        pagination: chunks[3],
        status: chunks[4],
    }
}

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    let areas = layout(frame.area());

    cards::render_header(app, frame, areas.header);
    cards::render_search(app, frame, areas.search);
    cards::render_cards(app, frame, areas.cards);
    pagination::render(app, frame, areas.pagination);
    cards::render_status(app, frame, areas.status);

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Index of the pagination control under a mouse position.
pub fn control_at(app: &App, screen: Rect, column: u16, row: u16) -> Option<usize> {
    let areas = layout(screen);
    pagination::hit_test(&app.controls, areas.pagination, column, row)
}

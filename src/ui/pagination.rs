use crate::app::App;
use crate::pagination::{Control, PageToken};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const GAP: u16 = 1;

fn label(control: &Control) -> String {
    format!(" {} ", control.token.label())
}

/// Screen cell ranges of each control inside the bordered bar.
pub fn regions(controls: &[Control], area: Rect) -> Vec<Rect> {
    let inner = Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2).min(1),
    );
    let right = inner.x.saturating_add(inner.width);

    let mut x = inner.x;
    controls
        .iter()
        .map(|control| {
            let width = label(control).width() as u16;
            let start = x.min(right);
            let visible = width.min(right - start);
            x = x.saturating_add(width + GAP);
            Rect::new(start, inner.y, visible, inner.height)
        })
        .collect()
}

/// Control under a screen position. Only live links are reported.
pub fn hit_test(controls: &[Control], area: Rect, column: u16, row: u16) -> Option<usize> {
    regions(controls, area)
        .iter()
        .zip(controls)
        .position(|(rect, control)| {
            control.is_interactive()
                && row >= rect.y
                && row < rect.y + rect.height
                && column >= rect.x
                && column < rect.x + rect.width
        })
}

fn style_for(control: &Control, focused: bool) -> Style {
    let style = if control.token == PageToken::Ellipsis || control.disabled {
        Style::default().fg(Color::DarkGray)
    } else if control.active {
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    if focused {
        style.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED)
    } else {
        style
    }
}

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (i, control) in app.controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" ".repeat(GAP as usize)));
        }
        spans.push(Span::styled(label(control), style_for(control, app.focused == Some(i))));
    }

    let title = match app.controller.state().total_pages() {
        Some(total) if !app.controls.is_empty() => {
            format!(" Page {} of {} ", app.controller.state().current_page, total)
        }
        _ => " Pages ".to_string(),
    };

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title),
    );
    frame.render_widget(bar, area);
}

pub mod cabinet_view;
pub mod popup;
pub mod projects_view;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::{App, Screen};
use super::text_input::TextInput;
use super::theme::Theme;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.screen {
        Screen::Cabinet => cabinet_view::render_cabinet_view(frame, app, chunks[1]),
        Screen::Projects => projects_view::render_projects_view(frame, app, chunks[1]),
    }

    // Dialogs and alerts are drawn on top of everything
    if app.modal.is_some() {
        popup::render_modal(frame, app, area);
    }
    if app.alert.is_some() {
        popup::render_alert(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// A rect of fixed size centered in `area`
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Spans for an input field; `mask` replaces every character with a bullet
pub(super) fn input_spans<'a>(
    input: &TextInput,
    focused: bool,
    mask: bool,
    theme: &Theme,
) -> Vec<Span<'a>> {
    let style = Style::default().fg(theme.text_bright).bg(theme.background);
    let (before, after) = input.split_at_cursor();
    let show = |s: &str| {
        if mask {
            "\u{2022}".repeat(s.chars().count())
        } else {
            s.to_string()
        }
    };
    let mut spans = vec![Span::styled(show(before), style)];
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(theme.highlight).bg(theme.background),
        ));
    }
    spans.push(Span::styled(show(after), style));
    spans
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};
use crate::util::text::display_width;

/// Render the status row: the signed-in user on the left, key hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let left = format!(" {}", app.profile.profile().email);
    let hint = if app.modal.is_some() || app.alert.is_some() {
        ""
    } else {
        match app.screen {
            Screen::Cabinet => "e изменить  p пароль  m написать  L выйти  q ",
            Screen::Projects => "j/k  Enter раскрыть  a проект  t задача  L выйти  q ",
        }
    };

    let mut spans = vec![Span::styled(
        left.clone(),
        Style::default().fg(app.theme.dim).bg(bg),
    )];
    let used = display_width(&left) + display_width(hint);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{Fixture, TERM_W, render_to_string};

    #[test]
    fn hints_follow_screen() {
        let fx = Fixture::new();
        let mut app = fx.app();
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.starts_with(" ivan@example.com"));
        assert!(out.contains("e изменить"));

        app.screen = Screen::Projects;
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.contains("a проект"));
    }

    #[test]
    fn hints_hidden_under_dialog() {
        let fx = Fixture::new();
        let mut app = fx.app();
        app.alert = Some("x".into());
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(out, " ivan@example.com");
    }
}

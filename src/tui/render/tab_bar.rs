use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};

const TABS: [(Screen, &str); 2] = [
    (Screen::Cabinet, "Личный кабинет"),
    (Screen::Projects, "Проекты"),
];

/// Render the tab bar with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let mut spans: Vec<Span> = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
    ];
    for (i, (screen, name)) in TABS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                "\u{2502}",
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        let style = if app.screen == *screen {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", name), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{Fixture, TERM_W, render_to_string};

    #[test]
    fn shows_both_tabs() {
        let fx = Fixture::new();
        let app = fx.app();
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let first = out.lines().next().unwrap();
        assert_eq!(first, " \u{25B6}  Личный кабинет \u{2502} Проекты");
        assert!(out.lines().nth(1).unwrap().starts_with("\u{2500}\u{2500}"));
    }
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::profile::ProfileField;
use crate::tui::app::{App, EditProfileState, Modal, PasswordState};
use crate::util::text::{display_width, truncate_to_width};

use super::{centered_rect_fixed, input_spans};

/// Width of the label column in multi-field dialogs
const LABEL_W: usize = 20;

/// Render the open dialog
pub fn render_modal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(modal) = &app.modal else {
        return;
    };
    let (title, width, lines) = match modal {
        Modal::ConfirmLogout => (
            "Выход",
            44,
            vec![
                text_line(app, " Вы уверены, что хотите выйти?"),
                Line::from(""),
                hint_line(app, " y да   n нет"),
            ],
        ),
        Modal::Contact(input) => (
            "Написать нам",
            60,
            vec![
                text_line(app, " Ваше сообщение:"),
                Line::from(prefixed(" ", input_spans(input, true, false, &app.theme))),
                Line::from(""),
                hint_line(app, " Enter отправить   Esc отмена"),
            ],
        ),
        Modal::EditProfile(state) => ("Редактирование профиля", 64, edit_profile_lines(app, state)),
        Modal::ChangePassword(state) => ("Смена пароля", 56, password_lines(app, state)),
        Modal::AddProject(input) => (
            "Новый проект",
            56,
            vec![
                text_line(app, " Название проекта:"),
                Line::from(prefixed(" ", input_spans(input, true, false, &app.theme))),
                Line::from(""),
                hint_line(app, " Enter добавить   Esc отмена"),
            ],
        ),
        Modal::AddTask { project_id, input } => {
            let project = app
                .projects
                .project(*project_id)
                .map(|p| p.title.as_str())
                .unwrap_or("");
            (
                "Новая задача",
                56,
                vec![
                    text_line(app, &format!(" Проект: {}", truncate_to_width(project, 44))),
                    text_line(app, " Название задачи:"),
                    Line::from(prefixed(" ", input_spans(input, true, false, &app.theme))),
                    Line::from(""),
                    hint_line(app, " Enter добавить   Esc отмена"),
                ],
            )
        }
    };
    render_box(frame, app, area, title, width, lines);
}

/// Render the blocking alert above any dialog
pub fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = &app.alert else {
        return;
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", message),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.background),
        )),
        Line::from(""),
        hint_line(app, " Нажмите любую клавишу"),
    ];
    let width = (display_width(message) + 4).clamp(30, 60) as u16;
    render_box(frame, app, area, "!", width, lines);
}

fn render_box(frame: &mut Frame, app: &App, area: Rect, title: &str, width: u16, lines: Vec<Line>) {
    let bg = app.theme.background;
    let highlight = app.theme.highlight;
    let popup_w = width.min(area.width.saturating_sub(2));
    // Content + 2 for borders
    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn edit_profile_lines<'a>(app: &App, state: &EditProfileState) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let mut lines = Vec::new();
    for (i, field) in ProfileField::ALL.iter().enumerate() {
        let focused = i == state.field;
        let label_style = if focused {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let mut spans = vec![Span::styled(padded_label(field.label()), label_style)];
        if focused && *field == ProfileField::Gender {
            spans.push(Span::styled(
                format!("\u{2039} {} \u{203A}", state.input.text()),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
        } else if focused {
            spans.extend(input_spans(&state.input, true, false, &app.theme));
        } else {
            spans.push(Span::styled(
                state.form.get(*field).to_string(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(hint_line(app, " Tab поле   Enter сохранить   Esc отмена"));
    lines
}

fn password_lines<'a>(app: &App, state: &PasswordState) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let mut lines = Vec::new();
    for (i, label) in PasswordState::LABELS.iter().enumerate() {
        let focused = i == state.focus;
        let label_style = if focused {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let mut spans = vec![Span::styled(padded_label(label), label_style)];
        spans.extend(input_spans(&state.inputs[i], focused, true, &app.theme));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(hint_line(app, " Tab поле   Enter сохранить   Esc отмена"));
    lines
}

fn padded_label(label: &str) -> String {
    let pad = LABEL_W.saturating_sub(display_width(label) + 1);
    format!(" {}{}", label, " ".repeat(pad))
}

fn prefixed<'a>(prefix: &'static str, mut spans: Vec<Span<'a>>) -> Vec<Span<'a>> {
    spans.insert(0, Span::raw(prefix));
    spans
}

fn text_line<'a>(app: &App, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.text).bg(app.theme.background),
    ))
}

fn hint_line<'a>(app: &App, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{Fixture, TERM_H, TERM_W, render_to_string};
    use crate::tui::text_input::TextInput;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_modal(frame, app, area);
            render_alert(frame, app, area);
        })
    }

    #[test]
    fn confirm_logout_dialog() {
        let fx = Fixture::new();
        let mut app = fx.app();
        app.modal = Some(Modal::ConfirmLogout);
        let out = draw(&app);
        assert!(out.contains(" Выход "));
        assert!(out.contains("Вы уверены, что хотите выйти?"));
        assert!(out.contains("y да   n нет"));
    }

    #[test]
    fn password_dialog_masks_input() {
        let fx = Fixture::new();
        let mut app = fx.app();
        let mut state = PasswordState::default();
        state.inputs[1] = TextInput::with_text("secret");
        state.focus = 1;
        app.modal = Some(Modal::ChangePassword(state));
        let out = draw(&app);
        assert!(!out.contains("secret"));
        assert!(out.contains("\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{258C}"));
        assert!(out.contains("Подтвердите пароль"));
    }

    #[test]
    fn edit_dialog_lists_all_fields() {
        let fx = Fixture::new();
        let mut app = fx.app();
        app.modal = Some(Modal::EditProfile(EditProfileState::new(
            app.profile.begin_edit(),
        )));
        let out = draw(&app);
        for field in ProfileField::ALL {
            assert!(out.contains(field.label()), "missing {}", field.label());
        }
        assert!(out.contains("ivan\u{258C}"));
    }

    #[test]
    fn add_task_dialog_names_project() {
        let fx = Fixture::new();
        let mut app = fx.app();
        app.modal = Some(Modal::AddTask {
            project_id: 2,
            input: TextInput::with_text("Прототип"),
        });
        let out = draw(&app);
        assert!(out.contains("Проект: Мобильное приложение"));
        assert!(out.contains("Прототип\u{258C}"));
    }

    #[test]
    fn alert_draws_over_dialog() {
        let fx = Fixture::new();
        let mut app = fx.app();
        app.modal = Some(Modal::Contact(TextInput::new()));
        app.alert = Some("Пароль успешно изменен".into());
        let out = draw(&app);
        assert!(out.contains("Пароль успешно изменен"));
        assert!(out.contains("Нажмите любую клавишу"));
    }
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::project::Project;
use crate::tui::app::App;
use crate::util::text::truncate_to_width;

/// Render project cards; the expanded card lists its tasks
pub fn render_projects_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let projects = app.projects.projects();

    if projects.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Нет проектов. Нажмите a, чтобы добавить.",
                Style::default().fg(app.theme.dim).bg(bg),
            ))),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;
    for (i, project) in projects.iter().enumerate() {
        let is_cursor = i == app.project_cursor;
        let is_expanded = app.projects.expanded() == Some(project.id);
        if is_cursor {
            cursor_line = lines.len();
        }
        lines.push(project_line(app, project, is_cursor, is_expanded, width));
        if is_expanded {
            push_task_lines(app, project, width, &mut lines);
        }
    }

    // Keep the cursor row on screen
    let height = area.height as usize;
    let scroll = (cursor_line + 1).saturating_sub(height);
    let lines: Vec<Line> = lines.into_iter().skip(scroll).collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn project_line<'a>(
    app: &App,
    project: &Project,
    is_cursor: bool,
    is_expanded: bool,
    width: usize,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let marker = if is_expanded { "\u{25BE}" } else { "\u{25B8}" };
    let status = project.status.label();
    let count = format!("  Задач: {}", project.tasks.len());
    // marker, spaces, brackets
    let fixed = 3 + status.chars().count() + 4 + count.chars().count();
    let title = truncate_to_width(&project.title, width.saturating_sub(fixed));

    let mut title_style = Style::default().fg(app.theme.text_bright).bg(bg);
    if is_cursor {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(
            format!(" {} ", marker),
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(title, title_style),
        Span::styled("  [", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            status.to_string(),
            Style::default()
                .fg(app.theme.project_status_color(&project.status))
                .bg(bg),
        ),
        Span::styled("]", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(count, Style::default().fg(app.theme.text).bg(bg)),
    ])
}

fn push_task_lines<'a>(app: &App, project: &Project, width: usize, lines: &mut Vec<Line<'a>>) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    if project.tasks.is_empty() {
        lines.push(Line::from(Span::styled("     Нет задач", dim)));
        return;
    }

    for task in &project.tasks {
        let status = task.status.label();
        let tail = format!("  {}  Изменено: {}", task.kind, task.modified);
        let fixed = 5 + status.chars().count() + 4 + tail.chars().count();
        let title = truncate_to_width(&task.title, width.saturating_sub(fixed));
        lines.push(Line::from(vec![
            Span::styled("     ", Style::default().bg(bg)),
            Span::styled(title, Style::default().fg(app.theme.text_bright).bg(bg)),
            Span::styled("  [", dim),
            Span::styled(
                status.to_string(),
                Style::default()
                    .fg(app.theme.task_status_color(&task.status))
                    .bg(bg),
            ),
            Span::styled("]", dim),
            Span::styled(tail, Style::default().fg(app.theme.text).bg(bg)),
        ]));
        if !task.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(
                    "       {}",
                    truncate_to_width(&task.description, width.saturating_sub(7))
                ),
                dim,
            )));
        }
    }
}

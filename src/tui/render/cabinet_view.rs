use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::NOT_SET;
use crate::model::profile::ProfileField;
use crate::tui::app::App;
use crate::util::text::{display_width, truncate_to_width};

/// Widest the label/value rows get on wide terminals
const MAX_ROW_WIDTH: usize = 56;

/// Render the profile card
pub fn render_cabinet_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let profile = app.profile.profile();
    let row_width = (area.width as usize).saturating_sub(2).min(MAX_ROW_WIDTH);

    let label_style = Style::default().fg(app.theme.text).bg(bg);
    let dots_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let unset_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();

    let name = profile.full_name();
    let name = if name.is_empty() { profile.login.clone() } else { name };
    lines.push(Line::from(Span::styled(
        format!(" {}", truncate_to_width(&name, row_width)),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::styled(" Заполнено на ", label_style),
        Span::styled(
            profile.completion_status.clone(),
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
    ]));
    lines.push(Line::from(""));

    for field in ProfileField::ALL {
        let value = profile.get(field);
        let (value, style) = if value.is_empty() {
            (NOT_SET, unset_style)
        } else {
            (value, value_style)
        };
        let label = field.label();
        let value = truncate_to_width(value, row_width.saturating_sub(display_width(label) + 5));
        let dots = row_width
            .saturating_sub(display_width(label) + display_width(&value) + 2)
            .max(3);
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", label), label_style),
            Span::styled(".".repeat(dots), dots_style),
            Span::styled(format!(" {}", value), style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

use serde::Serialize;

use crate::model::profile::{ProfileField, UserProfile};
use crate::model::project::Project;
use crate::model::task::TaskStatus;
use crate::util::text::dotted_row;

/// Shown for profile fields without a value
pub const NOT_SET: &str = "Не указано";

/// Width of the `label ...... value` rows
const ROW_WIDTH: usize = 44;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// Profile as printed by `--json`; the password never leaves the store
#[derive(Serialize)]
pub struct ProfileJson<'a> {
    pub full_name: String,
    pub completion: &'a str,
    pub fields: Vec<ProfileFieldJson<'a>>,
    pub has_password: bool,
}

#[derive(Serialize)]
pub struct ProfileFieldJson<'a> {
    pub key: &'static str,
    pub label: &'static str,
    pub value: &'a str,
}

#[derive(Serialize)]
pub struct ProjectSummaryJson {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub tasks: usize,
    pub completed_tasks: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn profile_to_json(profile: &UserProfile) -> ProfileJson<'_> {
    ProfileJson {
        full_name: profile.full_name(),
        completion: &profile.completion_status,
        fields: ProfileField::ALL
            .iter()
            .map(|f| ProfileFieldJson {
                key: f.key(),
                label: f.label(),
                value: profile.get(*f),
            })
            .collect(),
        has_password: profile.password.is_some(),
    }
}

pub fn project_summary(project: &Project) -> ProjectSummaryJson {
    ProjectSummaryJson {
        id: project.id,
        title: project.title.clone(),
        status: project.status.label().to_string(),
        tasks: project.tasks.len(),
        completed_tasks: project.count_with_status(&TaskStatus::Completed),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Profile card: name, completion, one dotted row per field
pub fn format_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    let name = profile.full_name();
    if !name.is_empty() {
        out.push_str(&name);
        out.push('\n');
    }
    out.push_str(&format!("Заполнено на {}\n\n", profile.completion_status));
    for field in ProfileField::ALL {
        let value = profile.get(field);
        let value = if value.is_empty() { NOT_SET } else { value };
        out.push_str(&dotted_row(field.label(), value, ROW_WIDTH));
        out.push('\n');
    }
    out
}

/// One line per project: id, title, status, task count
pub fn format_project_line(project: &Project) -> String {
    format!(
        "{}  {}  [{}]  Задач: {}",
        project.id,
        project.title,
        project.status.label(),
        project.tasks.len()
    )
}

/// Project header followed by its tasks
pub fn format_project_detail(project: &Project) -> String {
    let mut out = format_project_line(project);
    out.push('\n');
    if project.tasks.is_empty() {
        out.push_str("  Нет задач\n");
        return out;
    }
    for task in &project.tasks {
        out.push_str(&format!(
            "  {}  {}  [{}] {}  Изменено: {}\n",
            task.id,
            task.title,
            task.status.label(),
            task.kind,
            task.modified
        ));
        if !task.description.is_empty() {
            out.push_str(&format!("      {}\n", task.description));
        }
    }
    out
}

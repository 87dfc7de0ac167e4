use serde::{Deserialize, Serialize};

use super::task::{Task, TaskStatus};

/// Project status. Anything outside the known set is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    New,
    InProgress,
    Completed,
    Other(String),
}

impl ProjectStatus {
    pub fn label(&self) -> &str {
        match self {
            ProjectStatus::New => "Новый",
            ProjectStatus::InProgress => "В работе",
            ProjectStatus::Completed => "Завершен",
            ProjectStatus::Other(s) => s,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Новый" => ProjectStatus::New,
            "В работе" => ProjectStatus::InProgress,
            "Завершен" => ProjectStatus::Completed,
            _ => ProjectStatus::Other(s),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(s: ProjectStatus) -> Self {
        match s {
            ProjectStatus::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

/// A named unit of work owning an ordered list of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Creation timestamp in milliseconds
    pub id: i64,
    pub title: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(id: i64, title: String) -> Self {
        Project {
            id,
            title,
            status: ProjectStatus::New,
            tasks: Vec::new(),
        }
    }

    /// Append a task. The first task moves a new project into progress.
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
        if self.status == ProjectStatus::New {
            self.status = ProjectStatus::InProgress;
        }
    }

    /// Count tasks by status
    pub fn count_with_status(&self, status: &TaskStatus) -> usize {
        self.tasks.iter().filter(|t| &t.status == status).count()
    }
}

/// Starter list written on first load when nothing is stored yet
pub fn starter_projects() -> Vec<Project> {
    vec![
        Project {
            id: 1,
            title: "Веб-сайт компании".into(),
            status: ProjectStatus::InProgress,
            tasks: vec![
                Task {
                    id: 1,
                    title: "Дизайн главной страницы".into(),
                    description: "Создать макет главной страницы с учётом брендинга".into(),
                    status: TaskStatus::Completed,
                    kind: "Дизайн".into(),
                    modified: "30.05.2025 13:34".into(),
                },
                Task {
                    id: 2,
                    title: "Разработка API".into(),
                    description: "Создать REST API для работы с данными".into(),
                    status: TaskStatus::InProgress,
                    kind: "Backend".into(),
                    modified: "20.05.2025 19:50".into(),
                },
            ],
        },
        Project::new(2, "Мобильное приложение".into()),
    ]
}

use chrono::Local;
use regex::Regex;

use crate::io::session::Session;
use crate::io::store::{Store, StoreError, get_json, set_json};
use crate::model::project::{Project, starter_projects};
use crate::model::session::{Navigation, Opened};
use crate::model::task::Task;

/// Error type for project operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Storage key of a user's project list. Bytes outside the key alphabet
/// are percent-encoded, so every user id maps to its own valid key.
pub fn projects_key(user_id: &str) -> String {
    let mut key = String::from("projects_");
    for c in user_id.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-') {
            key.push(c);
        } else {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                key.push_str(&format!("%{:02X}", b));
            }
        }
    }
    key
}

/// How the manager behaves when a user has nothing stored yet
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub seed_starter: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { seed_starter: true }
    }
}

/// New identifier: the current time in milliseconds, bumped past the
/// largest existing one so two records made in the same millisecond differ.
pub fn next_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    let now = Local::now().timestamp_millis();
    match existing.into_iter().max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

/// The project screen: the signed-in user's projects and the expanded card
pub struct ProjectManager<'a> {
    store: &'a dyn Store,
    session: &'a dyn Session,
    user_id: String,
    projects: Vec<Project>,
    expanded: Option<i64>,
}

impl<'a> ProjectManager<'a> {
    /// Open the project list for the signed-in user, or redirect to sign-in.
    pub fn open(
        store: &'a dyn Store,
        session: &'a dyn Session,
        options: LoadOptions,
    ) -> Result<Opened<Self>, ProjectError> {
        let user = match session.current_user()? {
            Some(user) => user,
            None => return Ok(Opened::RedirectToAuth),
        };
        let mut manager = ProjectManager {
            store,
            session,
            user_id: user.id,
            projects: Vec::new(),
            expanded: None,
        };
        manager.load(options)?;
        Ok(Opened::Ready(manager))
    }

    /// Read the user's list. When nothing is stored, start from the starter
    /// projects (or an empty list) and persist it right away.
    pub fn load(&mut self, options: LoadOptions) -> Result<(), ProjectError> {
        let key = projects_key(&self.user_id);
        match get_json::<Vec<Project>>(self.store, &key)? {
            Some(projects) => {
                self.projects = projects;
            }
            None => {
                self.projects = if options.seed_starter {
                    starter_projects()
                } else {
                    Vec::new()
                };
                tracing::debug!(user = %self.user_id, seeded = options.seed_starter, "no stored projects");
                self.persist()?;
            }
        }
        self.expanded = None;
        Ok(())
    }

    /// Write the whole list under the user's key
    pub fn persist(&self) -> Result<(), ProjectError> {
        set_json(self.store, &projects_key(&self.user_id), &self.projects)?;
        Ok(())
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Projects whose title matches `re`, in list order
    pub fn find_by_title<'b>(&'b self, re: &'b Regex) -> impl Iterator<Item = &'b Project> + 'b {
        self.projects.iter().filter(move |p| re.is_match(&p.title))
    }

    /// Append a new project. A blank title is ignored (`Ok(None)`).
    pub fn add_project(&mut self, title: &str) -> Result<Option<i64>, ProjectError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let id = next_id(self.projects.iter().map(|p| p.id));
        self.projects.push(Project::new(id, title.to_string()));
        self.persist()?;
        Ok(Some(id))
    }

    /// Append a task to a project. A blank title or an unknown project is
    /// ignored (`Ok(None)`).
    pub fn add_task(&mut self, project_id: i64, title: &str) -> Result<Option<i64>, ProjectError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let project = match self.projects.iter_mut().find(|p| p.id == project_id) {
            Some(p) => p,
            None => {
                tracing::debug!(project_id, "add_task: no such project");
                return Ok(None);
            }
        };
        let id = next_id(project.tasks.iter().map(|t| t.id));
        project.push_task(Task::new(id, title.to_string(), Local::now()));
        self.persist()?;
        Ok(Some(id))
    }

    /// Expand a project's task list, collapsing any other. Toggling the
    /// expanded project collapses it.
    pub fn toggle_expand(&mut self, project_id: i64) {
        self.expanded = if self.expanded == Some(project_id) {
            None
        } else {
            Some(project_id)
        };
    }

    pub fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    /// End the session. The stored project list is kept.
    pub fn logout(&mut self) -> Result<Navigation, ProjectError> {
        self.session.logout()?;
        self.expanded = None;
        Ok(Navigation::Auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::session::StoreSession;
    use crate::io::store::MemoryStore;
    use crate::model::project::ProjectStatus;
    use crate::model::session::User;
    use crate::model::task::TaskStatus;

    fn signed_in_store() -> MemoryStore {
        let store = MemoryStore::new();
        StoreSession::new(&store)
            .login(&User {
                id: "42".into(),
                email: "ivan@example.com".into(),
            })
            .unwrap();
        store
    }

    fn open<'a>(store: &'a MemoryStore, session: &'a StoreSession<'a>) -> ProjectManager<'a> {
        ProjectManager::open(store, session, LoadOptions::default())
            .unwrap()
            .ready()
            .expect("session present")
    }

    fn stored(store: &MemoryStore) -> Vec<Project> {
        get_json(store, "projects_42").unwrap().unwrap()
    }

    #[test]
    fn first_load_seeds_and_persists_starter_list() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let m = open(&store, &session);

        let projects = m.projects();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Веб-сайт компании");
        assert_eq!(projects[0].tasks.len(), 2);
        assert_eq!(projects[0].status.label(), "В работе");
        assert_eq!(projects[1].title, "Мобильное приложение");
        assert_eq!(projects[1].tasks.len(), 0);
        assert_eq!(projects[1].status.label(), "Новый");
        assert_eq!(stored(&store), projects);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let m = ProjectManager::open(&store, &session, LoadOptions { seed_starter: false })
            .unwrap()
            .ready()
            .unwrap();
        assert!(m.projects().is_empty());
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn stored_list_wins_over_seed() {
        let store = signed_in_store();
        set_json(&store, "projects_42", &vec![Project::new(5, "Своё".into())]).unwrap();
        let session = StoreSession::new(&store);
        let m = open(&store, &session);
        assert_eq!(m.projects().len(), 1);
        assert_eq!(m.projects()[0].title, "Своё");
    }

    #[test]
    fn corrupt_list_is_an_error() {
        let store = signed_in_store();
        store.set("projects_42", "not json").unwrap();
        let session = StoreSession::new(&store);
        let result = ProjectManager::open(&store, &session, LoadOptions::default());
        assert!(matches!(
            result,
            Err(ProjectError::Store(StoreError::Corrupt { .. }))
        ));
    }

    #[test]
    fn no_session_redirects() {
        let store = MemoryStore::new();
        let session = StoreSession::new(&store);
        let opened = ProjectManager::open(&store, &session, LoadOptions::default()).unwrap();
        assert!(matches!(opened, Opened::RedirectToAuth));
        assert!(store.is_empty());
    }

    #[test]
    fn add_project_appends_new_and_persists() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        let id = m.add_project("Интранет").unwrap().unwrap();

        let p = m.project(id).unwrap();
        assert_eq!(p.title, "Интранет");
        assert_eq!(p.status, ProjectStatus::New);
        assert!(p.tasks.is_empty());
        assert_eq!(m.projects().last().unwrap().id, id);
        assert_eq!(stored(&store).len(), 3);
    }

    #[test]
    fn blank_titles_are_no_ops() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        for blank in ["", "   ", "\t\n"] {
            assert_eq!(m.add_project(blank).unwrap(), None);
            assert_eq!(m.add_task(2, blank).unwrap(), None);
        }
        assert_eq!(m.projects().len(), 2);
        assert!(m.project(2).unwrap().tasks.is_empty());
        assert_eq!(m.project(2).unwrap().status, ProjectStatus::New);
    }

    #[test]
    fn first_task_moves_project_in_progress() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        let task_id = m.add_task(2, "Прототип экранов").unwrap().unwrap();

        let p = m.project(2).unwrap();
        assert_eq!(p.status, ProjectStatus::InProgress);
        let task = p.tasks.iter().find(|t| t.id == task_id).unwrap();
        assert_eq!(task.status, TaskStatus::New);
        assert_eq!(task.kind, "Разработка");
        assert_eq!(task.description, "");
        let re = Regex::new(r"^\d{2}\.\d{2}\.\d{4} \d{2}:\d{2}$").unwrap();
        assert!(re.is_match(&task.modified), "modified = {}", task.modified);
        assert_eq!(stored(&store)[1].status, ProjectStatus::InProgress);
    }

    #[test]
    fn adding_task_keeps_other_status() {
        let store = signed_in_store();
        let mut list = starter_projects();
        list[1].status = ProjectStatus::Completed;
        set_json(&store, "projects_42", &list).unwrap();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        m.add_task(1, "Ещё").unwrap().unwrap();
        m.add_task(2, "Ещё").unwrap().unwrap();
        assert_eq!(m.project(1).unwrap().status, ProjectStatus::InProgress);
        assert_eq!(m.project(2).unwrap().status, ProjectStatus::Completed);
        assert_eq!(m.project(1).unwrap().tasks.len(), 3);
    }

    #[test]
    fn unknown_project_is_a_no_op() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        let before = m.projects().to_vec();
        assert_eq!(m.add_task(999, "Потерянная").unwrap(), None);
        assert_eq!(m.projects(), before.as_slice());
    }

    #[test]
    fn ids_stay_unique_within_a_millisecond() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        let a = m.add_project("A").unwrap().unwrap();
        let b = m.add_project("B").unwrap().unwrap();
        assert!(b > a);
        let t1 = m.add_task(a, "1").unwrap().unwrap();
        let t2 = m.add_task(a, "2").unwrap().unwrap();
        assert!(t2 > t1);
    }

    #[test]
    fn next_id_uses_clock_or_bumps() {
        let now = Local::now().timestamp_millis();
        assert!(next_id([1, 2]) >= now);
        let future = now + 1_000_000;
        assert_eq!(next_id([future]), future + 1);
    }

    #[test]
    fn expand_is_single_select() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        assert_eq!(m.expanded(), None);
        m.toggle_expand(1);
        assert_eq!(m.expanded(), Some(1));
        m.toggle_expand(2);
        assert_eq!(m.expanded(), Some(2));
        m.toggle_expand(2);
        assert_eq!(m.expanded(), None);
    }

    #[test]
    fn find_by_title_filters() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let m = open(&store, &session);
        let re = Regex::new("(?i)мобильн").unwrap();
        let hits: Vec<i64> = m.find_by_title(&re).map(|p| p.id).collect();
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn logout_keeps_project_list() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        let mut m = open(&store, &session);
        m.add_project("Сохранится").unwrap();
        assert_eq!(m.logout().unwrap(), Navigation::Auth);
        assert!(session.current_user().unwrap().is_none());
        assert!(store.contains("projects_42"));
        assert_eq!(stored(&store).len(), 3);
    }

    #[test]
    fn reload_restores_persisted_mutations() {
        let store = signed_in_store();
        let session = StoreSession::new(&store);
        {
            let mut m = open(&store, &session);
            m.add_task(2, "Первая").unwrap();
        }
        let m = open(&store, &session);
        assert_eq!(m.project(2).unwrap().tasks.len(), 1);
        assert_eq!(m.project(2).unwrap().status, ProjectStatus::InProgress);
    }

    #[test]
    fn projects_key_escapes_user_ids() {
        assert_eq!(projects_key("42"), "projects_42");
        assert_eq!(projects_key("a.b@c-d_e"), "projects_a.b@c-d_e");
        assert_eq!(projects_key("user 1"), "projects_user%201");
        assert_eq!(projects_key("50%"), "projects_50%25");
        assert_eq!(projects_key("я"), "projects_%D1%8F");
        assert_eq!(projects_key("../x"), "projects_..%2Fx");
    }

    #[test]
    fn any_user_id_gets_a_project_list() {
        let store = MemoryStore::new();
        let session = StoreSession::new(&store);
        session
            .login(&User {
                id: "пользователь 1".into(),
                email: "ivan@example.com".into(),
            })
            .unwrap();
        let mut m = open(&store, &session);
        assert_eq!(m.projects().len(), 2);
        m.add_project("CRM").unwrap();
        assert!(store.contains(&projects_key("пользователь 1")));
        assert_eq!(m.logout().unwrap(), Navigation::Auth);
    }
}

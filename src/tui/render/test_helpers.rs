use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::remote::MemoryRemote;
use crate::io::session::StoreSession;
use crate::io::store::{MemoryStore, set_json};
use crate::model::profile::UserProfile;
use crate::model::session::User;
use crate::ops::profile_ops::{PROFILE_KEY, ProfileManager};
use crate::ops::project_ops::{LoadOptions, ProjectManager};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Signed-in user with a partly filled profile and the starter projects.
/// The stores are leaked so the `App` borrowing them can be `'static`.
#[derive(Clone, Copy)]
pub struct Fixture {
    pub store: &'static MemoryStore,
    pub remote: &'static MemoryRemote,
    pub session: &'static StoreSession<'static>,
}

impl Fixture {
    pub fn new() -> Self {
        let store: &'static MemoryStore = Box::leak(Box::new(MemoryStore::new()));
        let remote: &'static MemoryRemote = Box::leak(Box::new(MemoryRemote::new()));
        let session: &'static StoreSession<'static> = Box::leak(Box::new(StoreSession::new(store)));
        session
            .login(&User {
                id: "u1".into(),
                email: "ivan@example.com".into(),
            })
            .unwrap();
        let profile = UserProfile {
            login: "ivan".into(),
            email: "ivan@example.com".into(),
            last_name: "Иванов".into(),
            first_name: "Иван".into(),
            completion_status: "33%".into(),
            ..Default::default()
        };
        set_json(store, PROFILE_KEY, &profile).unwrap();
        Fixture {
            store,
            remote,
            session,
        }
    }

    pub fn app(&self) -> App<'static> {
        let profile = ProfileManager::open(self.store, self.remote, self.session)
            .unwrap()
            .ready()
            .unwrap();
        let projects = ProjectManager::open(self.store, self.session, LoadOptions::default())
            .unwrap()
            .ready()
            .unwrap();
        App::new(profile, projects, Theme::default())
    }
}

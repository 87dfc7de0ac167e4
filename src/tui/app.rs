use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::{Context, NotSignedIn};
use crate::io::remote::FileRemote;
use crate::io::session::StoreSession;
use crate::io::store::FileStore;
use crate::logging;
use crate::model::profile::ProfileField;
use crate::ops::profile_ops::{PasswordChange, ProfileForm, ProfileManager};
use crate::ops::project_ops::ProjectManager;

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Personal cabinet: profile card and actions
    Cabinet,
    /// Project cards with their tasks
    Projects,
}

impl Screen {
    pub fn toggle(self) -> Screen {
        match self {
            Screen::Cabinet => Screen::Projects,
            Screen::Projects => Screen::Cabinet,
        }
    }
}

/// Edit-profile dialog: the staged form plus the field being typed into
#[derive(Debug, Clone)]
pub struct EditProfileState {
    pub form: ProfileForm,
    /// Index into `ProfileField::ALL`
    pub field: usize,
    pub input: TextInput,
}

impl EditProfileState {
    pub fn new(form: ProfileForm) -> Self {
        let input = TextInput::with_text(form.get(ProfileField::ALL[0]));
        EditProfileState {
            form,
            field: 0,
            input,
        }
    }

    pub fn current_field(&self) -> ProfileField {
        ProfileField::ALL[self.field]
    }

    /// Write the input buffer back into the form
    pub fn commit(&mut self) {
        let field = self.current_field();
        self.form.set(field, self.input.text());
    }

    /// Move to another field, keeping what was typed so far
    pub fn focus(&mut self, index: usize) {
        self.commit();
        self.field = index.min(ProfileField::ALL.len() - 1);
        self.input = TextInput::with_text(self.form.get(self.current_field()));
    }

    pub fn into_form(mut self) -> ProfileForm {
        self.commit();
        self.form
    }
}

/// Change-password dialog: current, new, confirmation
#[derive(Debug, Clone, Default)]
pub struct PasswordState {
    pub inputs: [TextInput; 3],
    pub focus: usize,
}

impl PasswordState {
    pub const LABELS: [&'static str; 3] =
        ["Текущий пароль", "Новый пароль", "Подтвердите пароль"];

    pub fn to_change(&self) -> PasswordChange {
        PasswordChange {
            current: self.inputs[0].text().to_string(),
            new: self.inputs[1].text().to_string(),
            confirm: self.inputs[2].text().to_string(),
        }
    }
}

/// Open dialog, at most one at a time
#[derive(Debug, Clone)]
pub enum Modal {
    ConfirmLogout,
    Contact(TextInput),
    EditProfile(EditProfileState),
    ChangePassword(PasswordState),
    AddProject(TextInput),
    AddTask { project_id: i64, input: TextInput },
}

/// Main application state
pub struct App<'a> {
    pub profile: ProfileManager<'a>,
    pub projects: ProjectManager<'a>,
    pub screen: Screen,
    pub modal: Option<Modal>,
    /// Blocking notice drawn above everything; any key dismisses it
    pub alert: Option<String>,
    /// Cursor into the project list
    pub project_cursor: usize,
    pub theme: Theme,
    pub should_quit: bool,
    /// Printed after the terminal is restored (e.g. after signing out)
    pub exit_message: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(profile: ProfileManager<'a>, projects: ProjectManager<'a>, theme: Theme) -> Self {
        App {
            profile,
            projects,
            screen: Screen::Cabinet,
            modal: None,
            alert: None,
            project_cursor: 0,
            theme,
            should_quit: false,
            exit_message: None,
        }
    }

    /// Id of the project under the cursor
    pub fn cursor_project_id(&self) -> Option<i64> {
        self.projects.projects().get(self.project_cursor).map(|p| p.id)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.projects.projects().len();
        if len == 0 {
            self.project_cursor = 0;
        } else if self.project_cursor >= len {
            self.project_cursor = len - 1;
        }
    }

    /// Leave the UI and hand control back to the sign-in step
    pub fn sign_out(&mut self, message: &str) {
        self.exit_message = Some(message.to_string());
        self.should_quit = true;
    }
}

/// Run the TUI application
pub fn run(config_override: Option<&str>, data_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config_override, data_dir)?;
    logging::init_file(&ctx.paths.log_file())?;

    let store = FileStore::open(&ctx.paths.data_dir)?;
    let remote = FileRemote::new(&ctx.paths.remote_dir);
    let session = StoreSession::new(&store);

    let profile = ProfileManager::open(&store, &remote, &session)?
        .ready()
        .ok_or(NotSignedIn)?;
    let projects = ProjectManager::open(&store, &session, ctx.load_options())?
        .ready()
        .ok_or(NotSignedIn)?;

    let mut app = App::new(profile, projects, Theme::from_config(&ctx.config.ui));
    tracing::info!("tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(message) = app.exit_message.take() {
        println!("{}", message);
    }
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

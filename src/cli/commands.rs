use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cab", about = concat!("cabinet v", env!("CARGO_PKG_VERSION"), " - personal cabinet and project tracker"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in as a user (records the session)
    Login(LoginArgs),
    /// End the session (project data is kept)
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or edit the personal profile
    Profile(ProfileCmd),
    /// List, show or add projects
    Projects(ProjectsCmd),
    /// Add tasks to a project
    Tasks(TasksCmd),
    /// Show or edit configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// User identifier (project lists are stored per identifier)
    #[arg(long)]
    pub id: String,
    /// User email
    #[arg(long)]
    pub email: String,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProfileCmd {
    #[command(subcommand)]
    pub action: Option<ProfileAction>,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile (default)
    Show,
    /// Edit fields and save: `cab profile set city=Тверь phone=...`
    Set(ProfileSetArgs),
    /// Change the password
    Password(PasswordArgs),
    /// Clear the stored profile and sign out
    Logout,
    /// Send a message to the support team
    Contact(ContactArgs),
}

#[derive(Args)]
pub struct ProfileSetArgs {
    /// Assignments of the form field=value (fields: login, email, lastName,
    /// firstName, middleName, gender, phone, city, street, house, building,
    /// birthDate)
    #[arg(required = true)]
    pub assignments: Vec<String>,
}

#[derive(Args)]
pub struct PasswordArgs {
    /// Current password
    #[arg(long, default_value = "")]
    pub current: String,
    /// New password
    #[arg(long)]
    pub new: String,
    /// New password again
    #[arg(long)]
    pub confirm: String,
}

#[derive(Args)]
pub struct ContactArgs {
    /// Message text
    pub text: String,
}

// ---------------------------------------------------------------------------
// Projects and tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: Option<ProjectsAction>,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List projects (default)
    List(ProjectsListArgs),
    /// Show a project with its tasks
    Show(ProjectShowArgs),
    /// Add a project
    Add(ProjectAddArgs),
}

#[derive(Args, Default)]
pub struct ProjectsListArgs {
    /// Only projects whose title matches this regex (case-insensitive)
    #[arg(long = "match")]
    pub pattern: Option<String>,
}

#[derive(Args)]
pub struct ProjectShowArgs {
    /// Project ID
    pub id: i64,
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project title (a blank title adds nothing)
    pub title: String,
}

#[derive(Args)]
pub struct TasksCmd {
    #[command(subcommand)]
    pub action: TasksAction,
}

#[derive(Subcommand)]
pub enum TasksAction {
    /// Add a task to a project
    Add(TaskAddArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Project ID
    pub project_id: i64,
    /// Task title (a blank title adds nothing)
    pub title: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (default)
    Show,
    /// Set a value: storage.data_dir, storage.remote_dir, projects.seed_starter, ui.colors.<name>
    Set(ConfigSetArgs),
    /// Print the path of the config file
    Path,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

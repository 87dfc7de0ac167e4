mod config;
pub use config::cmd_config;

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, StoragePaths};
use crate::io::remote::FileRemote;
use crate::io::session::{Session, StoreSession};
use crate::io::store::{FileStore, Store, set_json};
use crate::model::config::AppConfig;
use crate::model::profile::{ProfileField, UserProfile};
use crate::model::session::{Opened, User};
use crate::ops::profile_ops::{PROFILE_KEY, PasswordChange, ProfileManager};
use crate::ops::project_ops::{LoadOptions, ProjectManager};

/// Returned by commands that need a signed-in user
#[derive(Debug, thiserror::Error)]
#[error("not signed in: run `cab login --id <ID> --email <EMAIL>`")]
pub struct NotSignedIn;

/// Resolved config and storage locations for one invocation
#[derive(Debug, Clone)]
pub struct Context {
    pub config_path: PathBuf,
    pub config: AppConfig,
    pub paths: StoragePaths,
}

impl Context {
    pub fn load(config_override: Option<&str>, data_dir: Option<&str>) -> Result<Self, config_io::ConfigError> {
        let config_path = config_override
            .map(PathBuf::from)
            .unwrap_or_else(config_io::config_path);
        let (config, _doc) = config_io::read_config(&config_path)?;
        let paths = StoragePaths::resolve(&config, data_dir.map(Path::new));
        Ok(Context {
            config_path,
            config,
            paths,
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            seed_starter: self.config.projects.seed_starter,
        }
    }

    fn open_store(&self) -> Result<FileStore, crate::io::store::StoreError> {
        FileStore::open(&self.paths.data_dir)
    }

    fn remote(&self) -> FileRemote {
        FileRemote::new(&self.paths.remote_dir)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ctx = Context::load(cli.config.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        None => {
            eprintln!("no command given (try `cab --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Session
            Commands::Login(args) => cmd_login(&ctx, args),
            Commands::Logout => cmd_logout(&ctx),
            Commands::Whoami => cmd_whoami(&ctx, json),

            // Profile
            Commands::Profile(args) => match args.action.unwrap_or(ProfileAction::Show) {
                ProfileAction::Show => cmd_profile_show(&ctx, json),
                ProfileAction::Set(args) => cmd_profile_set(&ctx, args, json),
                ProfileAction::Password(args) => cmd_profile_password(&ctx, args),
                ProfileAction::Logout => cmd_profile_logout(&ctx),
                ProfileAction::Contact(args) => cmd_profile_contact(&ctx, args),
            },

            // Projects
            Commands::Projects(args) => match args.action {
                None => cmd_projects_list(&ctx, ProjectsListArgs::default(), json),
                Some(ProjectsAction::List(args)) => cmd_projects_list(&ctx, args, json),
                Some(ProjectsAction::Show(args)) => cmd_projects_show(&ctx, args, json),
                Some(ProjectsAction::Add(args)) => cmd_projects_add(&ctx, args),
            },
            Commands::Tasks(args) => match args.action {
                TasksAction::Add(args) => cmd_tasks_add(&ctx, args),
            },

            Commands::Config(args) => cmd_config(&ctx, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_login(ctx: &Context, args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let id = args.id.trim();
    let email = args.email.trim();
    if id.is_empty() || email.is_empty() {
        return Err("both --id and --email are required".into());
    }
    let store = ctx.open_store()?;
    let session = StoreSession::new(&store);
    session.login(&User {
        id: id.to_string(),
        email: email.to_string(),
    })?;

    // The sign-in step hands over a profile record carrying the email
    if store.get(PROFILE_KEY)?.is_none() {
        let mut profile = UserProfile {
            email: email.to_string(),
            ..Default::default()
        };
        profile.completion_status = profile.compute_completion_status();
        set_json(&store, PROFILE_KEY, &profile)?;
    }
    println!("signed in as {}", email);
    Ok(())
}

fn cmd_logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    // Ends the session without loading (or seeding) the project list
    let store = ctx.open_store()?;
    let session = StoreSession::new(&store);
    if session.current_user()?.is_none() {
        println!("not signed in");
        return Ok(());
    }
    session.logout()?;
    println!("signed out");
    Ok(())
}

fn cmd_whoami(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let user = StoreSession::new(&store)
        .current_user()?
        .ok_or(NotSignedIn)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("{} <{}>", user.id, user.email);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Profile commands
// ---------------------------------------------------------------------------

/// Parse `field=value` into a profile field and its new value
fn parse_assignment(s: &str) -> Result<(ProfileField, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    let field = ProfileField::from_key(key.trim())
        .ok_or_else(|| format!("unknown profile field: {}", key.trim()))?;
    Ok((field, value.to_string()))
}

fn cmd_profile_show(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let remote = ctx.remote();
    let session = StoreSession::new(&store);
    let manager = ProfileManager::open(&store, &remote, &session)?
        .ready()
        .ok_or(NotSignedIn)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&profile_to_json(manager.profile()))?
        );
    } else {
        print!("{}", format_profile(manager.profile()));
    }
    Ok(())
}

fn cmd_profile_set(
    ctx: &Context,
    args: ProfileSetArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Parse everything before touching storage
    let assignments = args
        .assignments
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>, _>>()?;

    let store = ctx.open_store()?;
    let remote = ctx.remote();
    let session = StoreSession::new(&store);
    let mut manager = ProfileManager::open(&store, &remote, &session)?
        .ready()
        .ok_or(NotSignedIn)?;

    let mut form = manager.begin_edit();
    for (field, value) in assignments {
        form.set(field, value);
    }
    let saved = manager.save(form)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile_to_json(saved))?);
    } else {
        println!("saved, profile {} complete", saved.completion_status);
    }
    Ok(())
}

fn cmd_profile_password(ctx: &Context, args: PasswordArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let remote = ctx.remote();
    let session = StoreSession::new(&store);
    let mut manager = ProfileManager::open(&store, &remote, &session)?
        .ready()
        .ok_or(NotSignedIn)?;

    manager.change_password(&PasswordChange {
        current: args.current,
        new: args.new,
        confirm: args.confirm,
    })?;
    println!("password changed");
    Ok(())
}

fn cmd_profile_logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let remote = ctx.remote();
    let session = StoreSession::new(&store);
    match ProfileManager::open(&store, &remote, &session)? {
        Opened::Ready(mut manager) => {
            manager.logout()?;
            println!("profile cleared, signed out");
        }
        Opened::RedirectToAuth => println!("not signed in"),
    }
    Ok(())
}

fn cmd_profile_contact(ctx: &Context, args: ContactArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let remote = ctx.remote();
    let session = StoreSession::new(&store);
    let manager = ProfileManager::open(&store, &remote, &session)?
        .ready()
        .ok_or(NotSignedIn)?;
    if manager.send_contact_message(&args.text) {
        println!("message sent");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

fn cmd_projects_list(
    ctx: &Context,
    args: ProjectsListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let re = match args.pattern {
        Some(ref p) => Some(
            Regex::new(&format!("(?i){}", p))
                .map_err(|e| format!("invalid --match pattern: {}", e))?,
        ),
        None => None,
    };

    let store = ctx.open_store()?;
    let session = StoreSession::new(&store);
    let manager = ProjectManager::open(&store, &session, ctx.load_options())?
        .ready()
        .ok_or(NotSignedIn)?;

    let projects: Vec<_> = match re {
        Some(ref re) => manager.find_by_title(re).collect(),
        None => manager.projects().iter().collect(),
    };

    if json {
        let items: Vec<ProjectSummaryJson> = projects.iter().map(|p| project_summary(p)).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for p in projects {
            println!("{}", format_project_line(p));
        }
    }
    Ok(())
}

fn cmd_projects_show(
    ctx: &Context,
    args: ProjectShowArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let session = StoreSession::new(&store);
    let manager = ProjectManager::open(&store, &session, ctx.load_options())?
        .ready()
        .ok_or(NotSignedIn)?;
    let project = manager
        .project(args.id)
        .ok_or_else(|| format!("project not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        print!("{}", format_project_detail(project));
    }
    Ok(())
}

fn cmd_projects_add(ctx: &Context, args: ProjectAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let session = StoreSession::new(&store);
    let mut manager = ProjectManager::open(&store, &session, ctx.load_options())?
        .ready()
        .ok_or(NotSignedIn)?;
    if let Some(id) = manager.add_project(&args.title)? {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_tasks_add(ctx: &Context, args: TaskAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let session = StoreSession::new(&store);
    let mut manager = ProjectManager::open(&store, &session, ctx.load_options())?
        .ready()
        .ok_or(NotSignedIn)?;
    if manager.project(args.project_id).is_none() {
        return Err(format!("project not found: {}", args.project_id).into());
    }
    if let Some(id) = manager.add_task(args.project_id, &args.title)? {
        println!("{}", id);
    }
    Ok(())
}

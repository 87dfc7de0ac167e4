use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, EditProfileState, Modal, PasswordState, Screen};
use crate::tui::text_input::TextInput;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.should_quit = true,
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => app.screen = app.screen.toggle(),
        _ => match app.screen {
            Screen::Cabinet => handle_cabinet(app, key),
            Screen::Projects => handle_projects(app, key),
        },
    }
}

fn handle_cabinet(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('e')) => {
            app.modal = Some(Modal::EditProfile(EditProfileState::new(
                app.profile.begin_edit(),
            )));
        }
        (KeyModifiers::NONE, KeyCode::Char('p')) => {
            app.modal = Some(Modal::ChangePassword(PasswordState::default()));
        }
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            app.modal = Some(Modal::Contact(TextInput::new()));
        }
        (_, KeyCode::Char('L')) => app.modal = Some(Modal::ConfirmLogout),
        _ => {}
    }
}

fn handle_projects(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            app.project_cursor += 1;
            app.clamp_cursor();
        }
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.project_cursor = app.project_cursor.saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => app.project_cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.project_cursor = usize::MAX;
            app.clamp_cursor();
        }
        (_, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            if let Some(id) = app.cursor_project_id() {
                app.projects.toggle_expand(id);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('a')) => {
            app.modal = Some(Modal::AddProject(TextInput::new()));
        }
        (KeyModifiers::NONE, KeyCode::Char('t')) => {
            // The task goes to the expanded project, else the one under the cursor
            if let Some(project_id) = app.projects.expanded().or(app.cursor_project_id()) {
                app.modal = Some(Modal::AddTask {
                    project_id,
                    input: TextInput::new(),
                });
            }
        }
        // Project screen logout keeps the profile record
        (_, KeyCode::Char('L')) => match app.projects.logout() {
            Ok(_) => app.sign_out("signed out"),
            Err(e) => app.alert = Some(format!("Не удалось выйти: {}", e)),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::press;
    use super::*;
    use crate::io::session::Session;
    use crate::ops::profile_ops::PROFILE_KEY;
    use crate::tui::render::test_helpers::Fixture;

    fn on_projects(fx: &Fixture) -> App<'static> {
        let mut app = fx.app();
        app.screen = Screen::Projects;
        app
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let fx = Fixture::new();
        let mut app = on_projects(&fx);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.project_cursor, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.project_cursor, 1);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.project_cursor, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.project_cursor, 1);
    }

    #[test]
    fn enter_toggles_single_expanded_project() {
        let fx = Fixture::new();
        let mut app = on_projects(&fx);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.projects.expanded(), Some(1));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.projects.expanded(), Some(2));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.projects.expanded(), None);
    }

    #[test]
    fn add_task_targets_expanded_project() {
        let fx = Fixture::new();
        let mut app = on_projects(&fx);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('t'));
        assert!(matches!(
            app.modal,
            Some(Modal::AddTask { project_id: 2, .. })
        ));
    }

    #[test]
    fn dialogs_open_from_cabinet_only() {
        let fx = Fixture::new();
        let mut app = fx.app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.modal.is_none());
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.modal, Some(Modal::EditProfile(_))));
    }

    #[test]
    fn projects_logout_keeps_profile() {
        let fx = Fixture::new();
        let mut app = on_projects(&fx);
        press(&mut app, KeyCode::Char('L'));
        assert!(app.should_quit);
        assert_eq!(app.exit_message.as_deref(), Some("signed out"));
        assert!(fx.session.current_user().unwrap().is_none());
        assert!(fx.store.contains(PROFILE_KEY));
    }

    #[test]
    fn cabinet_logout_asks_first() {
        let fx = Fixture::new();
        let mut app = fx.app();
        press(&mut app, KeyCode::Char('L'));
        assert!(matches!(app.modal, Some(Modal::ConfirmLogout)));
        assert!(!app.should_quit);
    }
}

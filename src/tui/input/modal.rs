use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::profile::{Gender, ProfileField};
use crate::tui::app::{App, EditProfileState, Modal, PasswordState};
use crate::tui::text_input::TextInput;

use super::edit_text;

pub(super) const SAVE_FAILED: &str = "Произошла ошибка при сохранении данных";
pub(super) const PASSWORD_MISMATCH: &str = "Новый пароль и подтверждение не совпадают";
pub(super) const PASSWORD_CHANGED: &str = "Пароль успешно изменен";
pub(super) const PASSWORD_FAILED: &str = "Произошла ошибка при изменении пароля";

/// Route a key to the open dialog. Each handler returns the dialog to keep
/// open, or `None` to close it.
pub(super) fn handle_modal(app: &mut App, key: KeyEvent) {
    let Some(modal) = app.modal.take() else {
        return;
    };
    app.modal = match modal {
        Modal::ConfirmLogout => confirm_logout(app, key),
        Modal::Contact(input) => contact(app, input, key),
        Modal::EditProfile(state) => edit_profile(app, state, key),
        Modal::ChangePassword(state) => change_password(app, state, key),
        Modal::AddProject(input) => add_project(app, input, key),
        Modal::AddTask { project_id, input } => add_task(app, project_id, input, key),
    };
}

fn confirm_logout(app: &mut App, key: KeyEvent) -> Option<Modal> {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) | (_, KeyCode::Enter) => {
            match app.profile.logout() {
                Ok(_) => app.sign_out("profile cleared, signed out"),
                Err(e) => app.alert = Some(format!("Не удалось выйти: {}", e)),
            }
            None
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => None,
        _ => Some(Modal::ConfirmLogout),
    }
}

fn contact(app: &mut App, mut input: TextInput, key: KeyEvent) -> Option<Modal> {
    match key.code {
        KeyCode::Esc => None,
        KeyCode::Enter => {
            app.profile.send_contact_message(input.text());
            None
        }
        _ => {
            edit_text(&mut input, key);
            Some(Modal::Contact(input))
        }
    }
}

fn edit_profile(app: &mut App, mut state: EditProfileState, key: KeyEvent) -> Option<Modal> {
    let last = ProfileField::ALL.len() - 1;
    match key.code {
        KeyCode::Esc => return None,
        KeyCode::Enter => {
            let form = state.clone().into_form();
            return match app.profile.save(form) {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "profile save failed");
                    app.alert = Some(SAVE_FAILED.to_string());
                    Some(Modal::EditProfile(state))
                }
            };
        }
        KeyCode::Tab | KeyCode::Down => {
            let next = if state.field == last { 0 } else { state.field + 1 };
            state.focus(next);
        }
        KeyCode::BackTab | KeyCode::Up => {
            let prev = if state.field == 0 { last } else { state.field - 1 };
            state.focus(prev);
        }
        // Gender is a select: cycle through its options
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if state.current_field() == ProfileField::Gender =>
        {
            let next = Gender::parse(state.input.text()).next();
            state.input = TextInput::with_text(next.as_str());
        }
        _ if state.current_field() == ProfileField::Gender => {}
        _ => {
            edit_text(&mut state.input, key);
        }
    }
    Some(Modal::EditProfile(state))
}

fn change_password(app: &mut App, mut state: PasswordState, key: KeyEvent) -> Option<Modal> {
    let count = state.inputs.len();
    match key.code {
        KeyCode::Esc => return None,
        KeyCode::Enter => {
            return match app.profile.change_password(&state.to_change()) {
                Ok(()) => {
                    app.alert = Some(PASSWORD_CHANGED.to_string());
                    None
                }
                Err(e) if e.is_validation() => {
                    app.alert = Some(PASSWORD_MISMATCH.to_string());
                    Some(Modal::ChangePassword(state))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "password change failed");
                    app.alert = Some(PASSWORD_FAILED.to_string());
                    Some(Modal::ChangePassword(state))
                }
            };
        }
        KeyCode::Tab | KeyCode::Down => state.focus = (state.focus + 1) % count,
        KeyCode::BackTab | KeyCode::Up => state.focus = (state.focus + count - 1) % count,
        _ => {
            let focus = state.focus;
            edit_text(&mut state.inputs[focus], key);
        }
    }
    Some(Modal::ChangePassword(state))
}

fn add_project(app: &mut App, mut input: TextInput, key: KeyEvent) -> Option<Modal> {
    match key.code {
        KeyCode::Esc => None,
        KeyCode::Enter => match app.projects.add_project(input.text()) {
            Ok(Some(_)) => {
                app.project_cursor = app.projects.projects().len().saturating_sub(1);
                None
            }
            // Blank title: keep the dialog open
            Ok(None) => Some(Modal::AddProject(input)),
            Err(e) => {
                app.alert = Some(format!("Не удалось сохранить проект: {}", e));
                Some(Modal::AddProject(input))
            }
        },
        _ => {
            edit_text(&mut input, key);
            Some(Modal::AddProject(input))
        }
    }
}

fn add_task(app: &mut App, project_id: i64, mut input: TextInput, key: KeyEvent) -> Option<Modal> {
    match key.code {
        KeyCode::Esc => None,
        KeyCode::Enter => match app.projects.add_task(project_id, input.text()) {
            Ok(Some(_)) => None,
            Ok(None) => Some(Modal::AddTask { project_id, input }),
            Err(e) => {
                app.alert = Some(format!("Не удалось сохранить задачу: {}", e));
                Some(Modal::AddTask { project_id, input })
            }
        },
        _ => {
            edit_text(&mut input, key);
            Some(Modal::AddTask { project_id, input })
        }
    }
}

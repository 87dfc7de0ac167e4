use crate::io::remote::{Document, RemoteError, RemoteStore, USERS_COLLECTION, to_document};
use crate::io::session::Session;
use crate::io::store::{Store, StoreError, get_json, set_json};
use crate::model::profile::{ProfileField, UserProfile};
use crate::model::session::{Navigation, Opened};

/// Storage key of the profile record
pub const PROFILE_KEY: &str = "userData";

/// Error type for profile operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("new password and confirmation do not match")]
    PasswordMismatch,
    #[error("could not save to the remote store: {0}")]
    Persistence(#[from] RemoteError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProfileError {
    /// Validation failures leave every piece of state untouched
    pub fn is_validation(&self) -> bool {
        matches!(self, ProfileError::PasswordMismatch)
    }
}

/// Staged copy of the profile used by the edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    draft: UserProfile,
}

impl ProfileForm {
    pub fn get(&self, field: ProfileField) -> &str {
        self.draft.get(field)
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        self.draft.set(field, value.into());
    }
}

/// Input of the change-password dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

/// The personal cabinet: one profile record, staged edits, password change
pub struct ProfileManager<'a> {
    store: &'a dyn Store,
    remote: &'a dyn RemoteStore,
    session: &'a dyn Session,
    profile: UserProfile,
}

impl<'a> ProfileManager<'a> {
    /// Open the cabinet for the signed-in user, or redirect to sign-in.
    pub fn open(
        store: &'a dyn Store,
        remote: &'a dyn RemoteStore,
        session: &'a dyn Session,
    ) -> Result<Opened<Self>, ProfileError> {
        if session.current_user()?.is_none() {
            return Ok(Opened::RedirectToAuth);
        }
        let mut manager = ProfileManager {
            store,
            remote,
            session,
            profile: UserProfile::default(),
        };
        manager.profile = manager.load()?;
        Ok(Opened::Ready(manager))
    }

    /// Read the stored profile. Nothing stored, or a record that no longer
    /// parses, gives an empty profile.
    pub fn load(&self) -> Result<UserProfile, ProfileError> {
        match get_json::<UserProfile>(self.store, PROFILE_KEY) {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => Ok(UserProfile::default()),
            Err(StoreError::Corrupt { key, reason }) => {
                tracing::warn!(%key, %reason, "discarding unreadable profile record");
                Ok(UserProfile::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The displayed profile
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Start editing: a copy that does not touch the displayed profile
    pub fn begin_edit(&self) -> ProfileForm {
        ProfileForm {
            draft: self.profile.clone(),
        }
    }

    /// Save the form: remote first, then local. A remote failure leaves
    /// local state and storage as they were.
    pub fn save(&mut self, form: ProfileForm) -> Result<&UserProfile, ProfileError> {
        let mut updated = form.draft;
        updated.completion_status = updated.compute_completion_status();

        // The document is keyed by the email on record before this edit
        let key = self.profile.email.clone();
        self.remote
            .update_document(USERS_COLLECTION, &key, to_document(&updated)?)?;

        set_json(self.store, PROFILE_KEY, &updated)?;
        tracing::debug!(completion = %updated.completion_status, "profile saved");
        self.profile = updated;
        Ok(&self.profile)
    }

    /// Change the password. Only the password field goes to the remote.
    ///
    /// `change.current` is not compared against the stored password.
    // TODO: verify the current password once the remote exposes a credential check
    pub fn change_password(&mut self, change: &PasswordChange) -> Result<(), ProfileError> {
        if change.new != change.confirm {
            return Err(ProfileError::PasswordMismatch);
        }
        tracing::debug!(
            current_supplied = !change.current.is_empty(),
            "current password is not checked"
        );

        let mut fields = Document::new();
        fields.insert(
            "password".to_string(),
            serde_json::Value::String(change.new.clone()),
        );
        self.remote
            .update_document(USERS_COLLECTION, &self.profile.email, fields)?;

        let mut updated = self.profile.clone();
        updated.password = Some(change.new.clone());
        set_json(self.store, PROFILE_KEY, &updated)?;
        self.profile = updated;
        Ok(())
    }

    /// Clear the stored profile and end the session
    pub fn logout(&mut self) -> Result<Navigation, ProfileError> {
        self.store.remove(PROFILE_KEY)?;
        self.session.logout()?;
        self.profile = UserProfile::default();
        Ok(Navigation::Auth)
    }

    /// "Write to us". There is no delivery channel; the message is logged.
    /// Returns whether a message was accepted.
    pub fn send_contact_message(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        tracing::info!(message = %text, from = %self.profile.email, "contact message");
        true
    }
}

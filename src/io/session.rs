use crate::io::store::{Store, StoreError, get_json, set_json};
use crate::model::session::User;

/// Storage key of the session record
pub const SESSION_KEY: &str = "session";

/// The ambient identity of the signed-in user, passed explicitly to both
/// managers.
pub trait Session {
    fn current_user(&self) -> Result<Option<User>, StoreError>;
    fn logout(&self) -> Result<(), StoreError>;
}

/// Session kept as a record in the key-value store
pub struct StoreSession<'a> {
    store: &'a dyn Store,
}

impl<'a> StoreSession<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        StoreSession { store }
    }

    /// Record a signed-in user. Stands in for the authentication screen.
    pub fn login(&self, user: &User) -> Result<(), StoreError> {
        set_json(self.store, SESSION_KEY, user)?;
        tracing::info!(user = %user.id, "session started");
        Ok(())
    }
}

impl Session for StoreSession<'_> {
    fn current_user(&self) -> Result<Option<User>, StoreError> {
        get_json(self.store, SESSION_KEY)
    }

    fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(SESSION_KEY)?;
        tracing::info!("session ended");
        Ok(())
    }
}

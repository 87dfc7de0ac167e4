use serde::{Deserialize, Serialize};

/// The signed-in user as recorded by the authentication screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Where control goes after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Hand control to the external authentication screen
    Auth,
    Stay,
}

/// Result of opening a screen: ready, or no session and back to sign-in
#[derive(Debug)]
pub enum Opened<T> {
    Ready(T),
    RedirectToAuth,
}

impl<T> Opened<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Opened::Ready(t) => Some(t),
            Opened::RedirectToAuth => None,
        }
    }
}

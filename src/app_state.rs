//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{AuthProvider, DEFAULT_COOKIE_DURATION, SQLiteAuthProvider},
    db::initialize,
    store::{DocumentStore, SQLiteDocumentStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Signs users in and registers new accounts.
    pub auth_provider: Arc<dyn AuthProvider>,

    /// Holds each user's profile and transactions.
    pub document_store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection shared by
    /// the auth provider and the document store.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            auth_provider: Arc::new(SQLiteAuthProvider::new(connection.clone())),
            document_store: Arc::new(SQLiteDocumentStore::new(connection)),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{AppState, create_cookie_key};

    #[test]
    fn same_secret_gives_same_key() {
        assert_eq!(
            create_cookie_key("hunter2").master(),
            create_cookie_key("hunter2").master()
        );
        assert_ne!(
            create_cookie_key("hunter2").master(),
            create_cookie_key("hunter3").master()
        );
    }

    #[test]
    fn new_state_initializes_database() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "secret", "Etc/UTC");

        assert!(state.is_ok());
    }
}

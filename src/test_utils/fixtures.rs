//! In-memory databases, seeded users and a store that always fails.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::{PasswordHash, User, UserID, ValidatedPassword, create_user},
    database_id::TransactionId,
    db::initialize,
    store::{DocumentStore, Profile, SQLiteDocumentStore},
    theme::Theme,
    transaction::{NewTransaction, Transaction},
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "quartz-lemon-harbor-91";

#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("could not open in-memory database");
    initialize(&connection).expect("could not initialize database");
    connection
}

/// Insert a user with [TEST_PASSWORD], hashed with the minimum bcrypt cost.
#[track_caller]
pub(crate) fn insert_test_user(email: &str, connection: &Connection) -> User {
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4)
        .expect("could not hash password");

    create_user(&EmailAddress::new_unchecked(email), password_hash, connection)
        .expect("could not create user")
}

/// A store over a fresh database along with one registered user.
#[track_caller]
pub(crate) fn get_test_store() -> (Arc<Mutex<Connection>>, SQLiteDocumentStore, UserID) {
    let connection = get_test_connection();
    let user = insert_test_user("alice@example.com", &connection);
    let connection = Arc::new(Mutex::new(connection));
    let store = SQLiteDocumentStore::new(connection.clone());

    (connection, store, user.id)
}

/// A store whose every operation fails with [Error::DatabaseLockError].
pub(crate) struct FailingDocumentStore;

impl DocumentStore for FailingDocumentStore {
    fn add_transaction(
        &self,
        _user_id: UserID,
        _transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn list_transactions(&self, _user_id: UserID) -> Result<Vec<Transaction>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete_transaction(
        &self,
        _user_id: UserID,
        _transaction_id: TransactionId,
    ) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn create_profile(
        &self,
        _user_id: UserID,
        _display_name: &str,
        _now: OffsetDateTime,
    ) -> Result<Profile, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get_profile(&self, _user_id: UserID) -> Result<Profile, Error> {
        Err(Error::DatabaseLockError)
    }

    fn touch_profile(&self, _user_id: UserID, _now: OffsetDateTime) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn set_theme(&self, _user_id: UserID, _theme: Theme) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }
}

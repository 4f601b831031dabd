//! The SQLite implementation of [DocumentStore].

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    store::{
        DocumentStore, Profile,
        profile::{insert_profile, select_profile, update_theme, upsert_last_updated},
    },
    theme::Theme,
    transaction::{
        NewTransaction, Transaction, delete_transaction, get_transactions_for_user,
        insert_transaction,
    },
};

/// Stores documents in the app's SQLite database.
///
/// The tables must already exist, see [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteDocumentStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteDocumentStore {
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl DocumentStore for SQLiteDocumentStore {
    fn add_transaction(
        &self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        insert_transaction(
            user_id,
            transaction,
            OffsetDateTime::now_utc(),
            &*self.lock()?,
        )
    }

    fn list_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        get_transactions_for_user(user_id, &*self.lock()?)
    }

    fn delete_transaction(
        &self,
        user_id: UserID,
        transaction_id: TransactionId,
    ) -> Result<(), Error> {
        delete_transaction(user_id, transaction_id, &*self.lock()?)
    }

    fn create_profile(
        &self,
        user_id: UserID,
        display_name: &str,
        now: OffsetDateTime,
    ) -> Result<Profile, Error> {
        insert_profile(user_id, display_name, now, &*self.lock()?)
    }

    fn get_profile(&self, user_id: UserID) -> Result<Profile, Error> {
        select_profile(user_id, &*self.lock()?)
    }

    fn touch_profile(&self, user_id: UserID, now: OffsetDateTime) -> Result<(), Error> {
        upsert_last_updated(user_id, now, &*self.lock()?)
    }

    fn set_theme(&self, user_id: UserID, theme: Theme) -> Result<(), Error> {
        update_theme(user_id, theme, &*self.lock()?)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        dashboard::{Totals, compute_totals},
        db::initialize,
        store::DocumentStore,
        theme::Theme,
        transaction::{Transaction, TransactionType},
    };

    use super::SQLiteDocumentStore;

    fn get_store_with_users() -> (SQLiteDocumentStore, UserID, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let [alice, bob] = ["alice@example.com", "bob@example.com"].map(|email| {
            create_user(
                &EmailAddress::from_str(email).unwrap(),
                PasswordHash::new_unchecked("hunter2"),
                &connection,
            )
            .unwrap()
            .id
        });

        (
            SQLiteDocumentStore::new(Arc::new(Mutex::new(connection))),
            alice,
            bob,
        )
    }

    #[test]
    fn add_transaction_stamps_current_time() {
        let (store, alice, _) = get_store_with_users();
        let before = OffsetDateTime::now_utc();

        let transaction = store
            .add_transaction(
                alice,
                Transaction::build("Salary", 1000.0, TransactionType::Income),
            )
            .unwrap();

        assert!(transaction.timestamp >= before - Duration::seconds(1));
        assert!(transaction.timestamp <= OffsetDateTime::now_utc() + Duration::seconds(1));
        assert_eq!(store.list_transactions(alice).unwrap(), vec![transaction]);
    }

    #[test]
    fn users_only_see_their_own_transactions() {
        let (store, alice, bob) = get_store_with_users();
        store
            .add_transaction(
                alice,
                Transaction::build("Salary", 1000.0, TransactionType::Income),
            )
            .unwrap();

        assert_eq!(store.list_transactions(bob).unwrap(), vec![]);
    }

    #[test]
    fn deleting_removes_exactly_that_transaction_from_totals() {
        let (store, alice, _) = get_store_with_users();
        store
            .add_transaction(
                alice,
                Transaction::build("Salary", 1000.0, TransactionType::Income),
            )
            .unwrap();
        let rent = store
            .add_transaction(
                alice,
                Transaction::build("Rent", 400.0, TransactionType::Expense),
            )
            .unwrap();
        store
            .add_transaction(
                alice,
                Transaction::build("Food", 100.0, TransactionType::Expense),
            )
            .unwrap();

        store.delete_transaction(alice, rent.id).unwrap();

        let remaining = store.list_transactions(alice).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|transaction| transaction.id != rent.id));
        assert_eq!(
            Totals::from_transactions(&remaining),
            Totals {
                income: 1000.0,
                expenses: 100.0,
                balance: 900.0,
            }
        );
    }

    #[test]
    fn deleting_missing_transaction_leaves_collection_unchanged() {
        let (store, alice, _) = get_store_with_users();
        store
            .add_transaction(
                alice,
                Transaction::build("Salary", 1000.0, TransactionType::Income),
            )
            .unwrap();

        let result = store.delete_transaction(alice, 9999);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
        assert_eq!(
            compute_totals(&store.list_transactions(alice).unwrap(), TransactionType::Income),
            1000.0
        );
    }

    #[test]
    fn create_and_get_profile() {
        let (store, alice, _) = get_store_with_users();
        let now = datetime!(2025-06-01 12:00:00 UTC);

        let created = store.create_profile(alice, "Alice", now).unwrap();
        let got = store.get_profile(alice).unwrap();

        assert_eq!(got, created);
        assert_eq!(got.display_name, "Alice");
        assert_eq!(got.created_at, now);
        assert_eq!(got.last_updated, now);
        assert_eq!(got.theme, Theme::Light);
    }

    #[test]
    fn get_missing_profile_fails() {
        let (store, alice, _) = get_store_with_users();

        assert_eq!(store.get_profile(alice), Err(Error::NotFound));
    }

    #[test]
    fn touch_profile_updates_last_updated_only() {
        let (store, alice, _) = get_store_with_users();
        let created_at = datetime!(2025-06-01 12:00:00 UTC);
        let later = datetime!(2025-06-02 08:30:00 UTC);
        store.create_profile(alice, "Alice", created_at).unwrap();

        store.touch_profile(alice, later).unwrap();

        let profile = store.get_profile(alice).unwrap();
        assert_eq!(profile.created_at, created_at);
        assert_eq!(profile.last_updated, later);
        assert_eq!(profile.display_name, "Alice");
    }

    #[test]
    fn touch_profile_creates_missing_profile_from_email() {
        let (store, alice, _) = get_store_with_users();
        let now = datetime!(2025-06-01 12:00:00 UTC);

        store.touch_profile(alice, now).unwrap();

        let profile = store.get_profile(alice).unwrap();
        assert_eq!(profile.display_name, "alice");
        assert_eq!(profile.created_at, now);
    }

    #[test]
    fn set_theme_persists() {
        let (store, alice, _) = get_store_with_users();
        store
            .create_profile(alice, "Alice", OffsetDateTime::now_utc())
            .unwrap();

        store.set_theme(alice, Theme::Dark).unwrap();

        assert_eq!(store.get_profile(alice).unwrap().theme, Theme::Dark);
    }

    #[test]
    fn set_theme_without_profile_fails() {
        let (store, alice, _) = get_store_with_users();

        assert_eq!(store.set_theme(alice, Theme::Dark), Err(Error::NotFound));
    }
}

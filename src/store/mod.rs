//! Per-user document storage: profiles and transaction collections.
//!
//! Handlers depend on the [DocumentStore] trait so that tests can swap in a
//! failing store. [SQLiteDocumentStore] is the implementation used by the server.

mod profile;
mod sqlite;

pub use profile::{Profile, create_profile_table};
pub use sqlite::SQLiteDocumentStore;

use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    theme::Theme,
    transaction::{NewTransaction, Transaction},
};

/// Stores each user's profile and transactions.
///
/// Every operation is scoped to one user. A user can never read or delete
/// another user's transactions through this trait.
pub trait DocumentStore: Send + Sync {
    /// Add a transaction to `user_id`'s collection, stamped with the current time.
    fn add_transaction(
        &self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// All of `user_id`'s transactions, newest first.
    fn list_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// # Errors
    ///
    /// Returns [Error::DeleteMissingTransaction] if `user_id` has no
    /// transaction with the ID `transaction_id`.
    fn delete_transaction(
        &self,
        user_id: UserID,
        transaction_id: TransactionId,
    ) -> Result<(), Error>;

    /// Create the profile for a newly registered user.
    fn create_profile(
        &self,
        user_id: UserID,
        display_name: &str,
        now: OffsetDateTime,
    ) -> Result<Profile, Error>;

    /// # Errors
    ///
    /// Returns [Error::NotFound] if `user_id` has no profile.
    fn get_profile(&self, user_id: UserID) -> Result<Profile, Error>;

    /// Record activity by setting the profile's last updated time to `now`.
    ///
    /// Creates the profile, named after the email, if it is missing.
    fn touch_profile(&self, user_id: UserID, now: OffsetDateTime) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [Error::NotFound] if `user_id` has no profile.
    fn set_theme(&self, user_id: UserID, theme: Theme) -> Result<(), Error>;
}

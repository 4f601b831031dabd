//! Database setup.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, store::create_profile_table,
    transaction::create_transaction_table,
};

/// Create the tables for users, profiles and transactions if they do not exist.
///
/// # Errors
///
/// Returns [Error::SqlError] if any of the tables could not be created, in
/// which case none of them are.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_profile_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

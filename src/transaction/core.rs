//! The transaction model and its SQL queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::UserID, database_id::TransactionId};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type \"{other}\"")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A single income or expense entry.
///
/// The description doubles as the category on the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within the owner's collection.
    pub id: TransactionId,
    pub description: String,
    /// Always non-negative, the direction comes from `type_`.
    pub amount: f64,
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// When the transaction was recorded, in UTC when read from the database.
    pub timestamp: OffsetDateTime,
    pub user_id: UserID,
}

impl Transaction {
    /// Start a new transaction. The ID and timestamp are assigned when it is stored.
    pub fn build(description: &str, amount: f64, type_: TransactionType) -> NewTransaction {
        NewTransaction {
            description: description.to_owned(),
            amount,
            type_,
        }
    }
}

/// The user supplied fields of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub type_: TransactionType,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                timestamp TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Listing a user's transactions newest first is the only query the dashboard makes.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_timestamp \
            ON \"transaction\"(user_id, timestamp);",
        (),
    )?;

    Ok(())
}

/// Store `transaction` for `user_id` with the given `timestamp`.
///
/// The timestamp is converted to UTC so that timestamps sort as text.
///
/// # Errors
///
/// Returns [Error::SqlError] if the user does not exist or the amount is negative.
pub fn insert_transaction(
    user_id: UserID,
    transaction: NewTransaction,
    timestamp: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let timestamp = timestamp.to_offset(time::UtcOffset::UTC);

    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, description, amount, type, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, user_id, description, amount, type, timestamp",
        )?
        .query_row(
            (
                user_id,
                &transaction.description,
                transaction.amount,
                transaction.type_,
                timestamp,
            ),
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// All of `user_id`'s transactions, newest first.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, type, timestamp
            FROM \"transaction\"
            WHERE user_id = ?1
            ORDER BY timestamp DESC, id DESC",
        )?
        .query_map([user_id], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete one of `user_id`'s transactions.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTransaction] if `user_id` has no transaction
/// with the ID `transaction_id`.
pub fn delete_transaction(
    user_id: UserID,
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount: row.get(3)?,
        type_: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

//! Registered users and their credentials.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row, ToSql, types::ToSqlOutput};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// Keeps user IDs from being mixed up with transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserID {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

/// A user that can log in.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    /// Stored lowercase, see [normalize_email].
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
}

/// Emails are compared case-insensitively and without surrounding whitespace.
pub fn normalize_email(raw_email: &str) -> String {
    raw_email.trim().to_lowercase()
}

pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user.
///
/// # Errors
///
/// - [Error::DuplicateEmail] if another user has `email`.
/// - [Error::SqlError] for other SQL errors.
pub fn create_user(
    email: &EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let email = EmailAddress::new_unchecked(normalize_email(email.as_str()));

    connection.execute(
        "INSERT INTO user (email, password) VALUES (?1, ?2)",
        (email.as_str(), password_hash.as_str()),
    )?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        email,
        password_hash,
    })
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

/// # Errors
///
/// Returns [Error::NotFound] if no user has the ID `user_id`.
#[cfg(test)]
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE id = ?1")?
        .query_row([user_id], map_user_row)
        .map_err(Error::from)
}

/// Look up a user by email, ignoring case.
///
/// # Errors
///
/// Returns [Error::NotFound] if nobody has registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE email = ?1")?
        .query_row([normalize_email(email)], map_user_row)
        .map_err(Error::from)
}

/// Replace the password hash of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the ID `user_id`.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_str(), user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{Error, auth::PasswordHash};

    use super::{
        UserID, create_user, create_user_table, get_user_by_email, get_user_by_id,
        update_password,
    };

    fn get_db_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        connection
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::from_str(raw).unwrap()
    }

    #[test]
    fn create_user_assigns_id_and_lowercases_email() {
        let connection = get_db_connection();

        let user = create_user(
            &email("Alice@Example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.email.as_str(), "alice@example.com");
    }

    #[test]
    fn create_user_rejects_duplicate_email() {
        let connection = get_db_connection();
        create_user(
            &email("alice@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let result = create_user(
            &email("ALICE@example.com"),
            PasswordHash::new_unchecked("hunter3"),
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_by_email_ignores_case() {
        let connection = get_db_connection();
        let want = create_user(
            &email("alice@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let got = get_user_by_email(" Alice@Example.COM ", &connection).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn get_user_by_email_fails_for_unknown_email() {
        let connection = get_db_connection();

        assert_eq!(
            get_user_by_email("nobody@example.com", &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_password_replaces_hash() {
        let connection = get_db_connection();
        let user = create_user(
            &email("alice@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(user.id, &new_hash, &connection).unwrap();

        assert_eq!(
            get_user_by_id(user.id, &connection).unwrap().password_hash,
            new_hash
        );
    }

    #[test]
    fn update_password_fails_for_unknown_user() {
        let connection = get_db_connection();

        assert_eq!(
            update_password(
                UserID::new(42),
                &PasswordHash::new_unchecked("hunter2"),
                &connection
            ),
            Err(Error::NotFound)
        );
    }
}

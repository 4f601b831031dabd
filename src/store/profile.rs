//! The profile document kept alongside each user's transactions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, auth::UserID, theme::Theme};

/// Who the user is and how they like the app to look.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: UserID,
    pub display_name: String,
    pub created_at: OffsetDateTime,
    /// The last time the user logged in, opened the dashboard or added a transaction.
    pub last_updated: OffsetDateTime,
    pub theme: Theme,
}

pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profile (
                user_id INTEGER PRIMARY KEY,
                display_name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL,
                theme TEXT NOT NULL DEFAULT 'light',
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

pub(super) fn insert_profile(
    user_id: UserID,
    display_name: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Profile, Error> {
    connection
        .prepare(
            "INSERT INTO profile (user_id, display_name, created_at, last_updated, theme)
            VALUES (?1, ?2, ?3, ?3, ?4)
            RETURNING user_id, display_name, created_at, last_updated, theme",
        )?
        .query_row(
            (user_id, display_name, now, Theme::default()),
            map_profile_row,
        )
        .map_err(Error::from)
}

pub(super) fn select_profile(user_id: UserID, connection: &Connection) -> Result<Profile, Error> {
    connection
        .prepare(
            "SELECT user_id, display_name, created_at, last_updated, theme
            FROM profile WHERE user_id = ?1",
        )?
        .query_row([user_id], map_profile_row)
        .map_err(Error::from)
}

/// Bump `last_updated`, creating the profile from the user's email if needed.
pub(super) fn upsert_last_updated(
    user_id: UserID,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO profile (user_id, display_name, created_at, last_updated)
        SELECT id, substr(email, 1, instr(email, '@') - 1), ?2, ?2 FROM user WHERE id = ?1
        ON CONFLICT(user_id) DO UPDATE SET last_updated = excluded.last_updated",
        (user_id, now),
    )?;

    Ok(())
}

pub(super) fn update_theme(
    user_id: UserID,
    theme: Theme,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE profile SET theme = ?1 WHERE user_id = ?2",
        (theme, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_profile_row(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        user_id: UserID::new(row.get(0)?),
        display_name: row.get(1)?,
        created_at: row.get(2)?,
        last_updated: row.get(3)?,
        theme: row.get(4)?,
    })
}

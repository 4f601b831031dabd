//! The identity service that signs users in and registers new accounts.
//!
//! Handlers only see the [AuthProvider] trait. [SQLiteAuthProvider] keeps the
//! accounts in the app database and rate limits failed sign-ins per email.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{
        PasswordHash, User, ValidatedPassword,
        user::{create_user, get_user_by_email, normalize_email},
    },
};

/// How many failed sign-ins an email gets before it is locked out.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// How long failed sign-ins are remembered for.
pub const LOCKOUT_WINDOW: Duration = Duration::minutes(15);

/// Why signing in or signing up failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("no user is registered with that email")]
    UserNotFound,
    #[error("the password does not match")]
    WrongPassword,
    #[error("the email address is not valid")]
    InvalidEmail,
    #[error("too many failed sign in attempts")]
    TooManyRequests,
    #[error("the email address is already registered")]
    EmailAlreadyInUse,
    /// Holds suggestions for a stronger password.
    #[error("the password is too weak: {0}")]
    WeakPassword(String),
    /// The identity service could not be reached or failed internally.
    #[error("the identity service failed: {0}")]
    NetworkFailed(String),
}

impl AuthError {
    /// The machine readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::WrongPassword => "auth/wrong-password",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::TooManyRequests => "auth/too-many-requests",
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::WeakPassword(_) => "auth/weak-password",
            AuthError::NetworkFailed(_) => "auth/network-request-failed",
        }
    }

    /// The message to show the user.
    pub fn message(&self) -> String {
        match self {
            AuthError::UserNotFound => {
                "No account found with this email. Please sign up first.".to_owned()
            }
            AuthError::WrongPassword => "Incorrect password. Please try again.".to_owned(),
            AuthError::InvalidEmail => "Please enter a valid email address.".to_owned(),
            AuthError::TooManyRequests => {
                "Too many failed attempts. Please try again later.".to_owned()
            }
            AuthError::EmailAlreadyInUse => {
                "This email is already registered. Please sign in instead.".to_owned()
            }
            AuthError::WeakPassword(feedback) if feedback.trim().is_empty() => {
                "Password is too weak. Please choose a longer, less common password.".to_owned()
            }
            AuthError::WeakPassword(feedback) => format!("Password is too weak. {feedback}"),
            AuthError::NetworkFailed(_) => {
                "Network error. Please check your internet connection.".to_owned()
            }
        }
    }

    /// The message to show on the log-in form, which words a few errors differently.
    pub fn log_in_message(&self) -> String {
        match self {
            AuthError::InvalidEmail => "Invalid email address.".to_owned(),
            error => error.message(),
        }
    }
}

/// Creates and verifies user identities.
pub trait AuthProvider: Send + Sync {
    /// Check `password` against the account registered with `email`.
    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Register a new account. The new user is not signed in.
    fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError>;
}

#[derive(Debug, Clone, Copy)]
struct FailedAttempts {
    count: u32,
    first_failure: OffsetDateTime,
}

/// An [AuthProvider] backed by the `user` table.
#[derive(Debug, Clone)]
pub struct SQLiteAuthProvider {
    connection: Arc<Mutex<Connection>>,
    hash_cost: u32,
    lockout_window: Duration,
    failed_attempts: Arc<Mutex<HashMap<String, FailedAttempts>>>,
}

impl SQLiteAuthProvider {
    /// The `user` table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            hash_cost: PasswordHash::DEFAULT_COST,
            lockout_window: LOCKOUT_WINDOW,
            failed_attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Use a lower bcrypt cost, e.g. to keep tests fast.
    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// Forget failed sign-ins after `lockout_window` instead of [LOCKOUT_WINDOW].
    pub fn with_lockout_window(mut self, lockout_window: Duration) -> Self {
        self.lockout_window = lockout_window;
        self
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, AuthError> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            AuthError::NetworkFailed(Error::DatabaseLockError.to_string())
        })
    }

    fn lock_attempts(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, FailedAttempts>>, AuthError> {
        self.failed_attempts.lock().map_err(|error| {
            tracing::error!("could not acquire failed attempts lock: {error}");
            AuthError::NetworkFailed("failed attempts lock poisoned".to_owned())
        })
    }

    fn is_locked_out(&self, email: &str, now: OffsetDateTime) -> Result<bool, AuthError> {
        let mut attempts = self.lock_attempts()?;

        match attempts.get(email) {
            Some(entry) if now - entry.first_failure >= self.lockout_window => {
                attempts.remove(email);
                Ok(false)
            }
            Some(entry) => Ok(entry.count >= MAX_FAILED_ATTEMPTS),
            None => Ok(false),
        }
    }

    fn record_failure(&self, email: &str, now: OffsetDateTime) -> Result<(), AuthError> {
        let mut attempts = self.lock_attempts()?;
        let lockout_window = self.lockout_window;

        attempts
            .entry(email.to_owned())
            .and_modify(|entry| {
                if now - entry.first_failure >= lockout_window {
                    *entry = FailedAttempts {
                        count: 1,
                        first_failure: now,
                    };
                } else {
                    entry.count += 1;
                }
            })
            .or_insert(FailedAttempts {
                count: 1,
                first_failure: now,
            });

        Ok(())
    }

    fn clear_failures(&self, email: &str) -> Result<(), AuthError> {
        self.lock_attempts()?.remove(email);
        Ok(())
    }
}

fn parse_email(raw_email: &str) -> Result<EmailAddress, AuthError> {
    EmailAddress::from_str(&normalize_email(raw_email)).map_err(|_| AuthError::InvalidEmail)
}

impl AuthProvider for SQLiteAuthProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = parse_email(email)?;
        let now = OffsetDateTime::now_utc();

        if self.is_locked_out(email.as_str(), now)? {
            tracing::warn!("Sign in for {email} refused after too many failed attempts");
            return Err(AuthError::TooManyRequests);
        }

        let user = match get_user_by_email(email.as_str(), &*self.lock_connection()?) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(AuthError::UserNotFound),
            Err(error) => return Err(AuthError::NetworkFailed(error.to_string())),
        };

        match user.password_hash.verify(password) {
            Ok(true) => {
                self.clear_failures(email.as_str())?;
                Ok(user)
            }
            Ok(false) => {
                self.record_failure(email.as_str(), now)?;
                Err(AuthError::WrongPassword)
            }
            Err(error) => {
                tracing::error!("Could not verify password for user {}: {error}", user.id);
                Err(AuthError::NetworkFailed(error.to_string()))
            }
        }
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = parse_email(email)?;

        let validated_password =
            ValidatedPassword::new(password, &[email.as_str(), email.local_part()]).map_err(
                |error| match error {
                    Error::TooWeak(feedback) => AuthError::WeakPassword(feedback),
                    error => AuthError::NetworkFailed(error.to_string()),
                },
            )?;
        let password_hash = PasswordHash::new(validated_password, self.hash_cost)
            .map_err(|error| AuthError::NetworkFailed(error.to_string()))?;

        match create_user(&email, password_hash, &*self.lock_connection()?) {
            Ok(user) => {
                tracing::info!("Registered user {} ({})", user.id, user.email);
                Ok(user)
            }
            Err(Error::DuplicateEmail) => Err(AuthError::EmailAlreadyInUse),
            Err(error) => Err(AuthError::NetworkFailed(error.to_string())),
        }
    }
}

//! Accounts, sessions and the pages for signing in and out.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod provider;
mod redirect;
mod sign_up;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use provider::{AuthError, AuthProvider, SQLiteAuthProvider};
pub use redirect::normalize_redirect_url;
pub use sign_up::{get_sign_up_page, sign_up};
pub use user::{User, UserID, create_user_table, get_user_by_email, update_password};
#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub(crate) use user::create_user;

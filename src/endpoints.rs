//! The route paths.
//!
//! For routes that take a parameter, e.g. '/api/transactions/{transaction_id}', use [format_endpoint].

/// The public landing page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The log-in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page for creating an account.
pub const SIGN_UP_VIEW: &str = "/sign_up";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// Checks credentials and starts a session.
pub const LOG_IN_API: &str = "/api/log_in";
/// Ends the current session.
pub const LOG_OUT: &str = "/api/log_out";
/// Registers a new user.
pub const USERS_API: &str = "/api/users";
/// Adds a transaction for the current user.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// A single transaction of the current user.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// Switches between the light and dark theme and saves the choice to the profile.
pub const THEME_API: &str = "/api/theme";
/// Switches the theme for visitors who are not logged in, cookie only.
pub const GUEST_THEME_API: &str = "/api/guest_theme";

/// Replace the first `{parameter}` in `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

//! Reading and writing the private cookie that marks a user as logged in.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{UserID, token::Token},
};

pub(crate) const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// The cookie expires `duration` from now.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: OffsetDateTime::now_utc() + duration,
    };

    set_token_cookie(jar, token)
}

fn set_token_cookie(jar: PrivateCookieJar, token: Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .path("/")
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Overwrite the auth cookie and expire it, which deletes it on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the token from the auth cookie.
///
/// # Errors
///
/// - [Error::CookieMissing] if there is no auth cookie.
/// - [Error::InvalidToken] if the cookie does not hold a token.
/// - [Error::TokenExpired] if the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidToken(error.to_string()))?;

    if token.expires_at < OffsetDateTime::now_utc() {
        return Err(Error::TokenExpired);
    }

    Ok(token)
}

/// Push the expiry of the auth cookie out to at least `duration` from now.
///
/// Cookies that already outlive `duration`, such as "remember me" cookies,
/// are left as they are.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned. See
/// [get_token_from_cookies] for the possible errors.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let expires_at = max(token.expires_at, OffsetDateTime::now_utc() + duration);

    if expires_at == token.expires_at {
        return Ok(jar);
    }

    set_token_cookie(
        jar,
        Token {
            expires_at,
            ..token
        },
    )
}

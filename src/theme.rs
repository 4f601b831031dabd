//! The light/dark colour theme.
//!
//! The theme lives in a plain cookie so that every page, including the
//! log-in page, can render in the right colours without a database lookup.
//! Signed-in users also have their choice saved to their profile, which
//! restores the cookie when they log in on another device.

use std::{convert::Infallible, fmt::Display, str::FromStr, sync::Arc};

use axum::{
    Extension,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HxRefresh;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{AppState, auth::UserID, store::DocumentStore};

/// The name of the cookie that holds the theme.
pub const COOKIE_THEME: &str = "theme";

/// How long the theme cookie lasts in the browser.
const THEME_COOKIE_DURATION: Duration = Duration::days(365);

/// The colour theme used to render pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The class to put on the root `<html>` element, if any.
    pub fn html_class(self) -> Option<&'static str> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some("dark"),
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme \"{other}\"")),
        }
    }
}

impl ToSql for Theme {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Theme {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// Reads the theme cookie. A missing or unreadable cookie gives the default theme.
impl<S> FromRequestParts<S> for Theme
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(theme_from_cookies(&jar))
    }
}

pub fn theme_from_cookies(jar: &CookieJar) -> Theme {
    jar.get(COOKIE_THEME)
        .and_then(|cookie| cookie.value().parse().ok())
        .unwrap_or_default()
}

/// Add a cookie holding `theme` to the cookie jar.
pub fn set_theme_cookie(jar: CookieJar, theme: Theme) -> CookieJar {
    jar.add(
        Cookie::build((COOKIE_THEME, theme.as_str()))
            .path("/")
            .max_age(THEME_COOKIE_DURATION)
            .same_site(SameSite::Lax),
    )
}

/// The state needed to save a user's theme.
#[derive(Clone)]
pub struct ThemeState {
    pub document_store: Arc<dyn DocumentStore>,
}

impl FromRef<AppState> for ThemeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            document_store: state.document_store.clone(),
        }
    }
}

/// Switch between the light and dark theme and ask htmx to reload the page.
///
/// The cookie is updated even if saving the choice to the profile fails so
/// the toggle still works for the current browser.
pub async fn toggle_theme_endpoint(
    State(state): State<ThemeState>,
    Extension(user_id): Extension<UserID>,
    current_theme: Theme,
    jar: CookieJar,
) -> Response {
    let theme = current_theme.toggled();

    if let Err(error) = state.document_store.set_theme(user_id, theme) {
        tracing::error!("Could not save theme {theme} for user {user_id}: {error}");
    }

    (set_theme_cookie(jar, theme), HxRefresh(true), StatusCode::OK).into_response()
}

/// Switch the theme for a visitor without a session. Only the cookie changes.
pub async fn toggle_guest_theme_endpoint(current_theme: Theme, jar: CookieJar) -> Response {
    (
        set_theme_cookie(jar, current_theme.toggled()),
        HxRefresh(true),
        StatusCode::OK,
    )
        .into_response()
}

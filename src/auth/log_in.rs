//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState,
    auth::{AuthProvider, invalidate_auth_cookie, normalize_redirect_url, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, auth_card, base, email_input, form_message,
        password_input,
    },
    store::DocumentStore,
    theme::{Theme, set_theme_cookie, theme_from_cookies},
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// `registered` query value after a complete sign-up.
pub(super) const REGISTERED: &str = "true";
/// `registered` query value when the account exists but its profile does not.
pub(super) const REGISTERED_WITHOUT_PROFILE: &str = "partial";

const REGISTERED_MESSAGE: &str = "Account created successfully! Please sign in.";
const REGISTERED_WITHOUT_PROFILE_MESSAGE: &str = "Account created! Please sign in to continue.";

fn log_in_form(
    email: &str,
    error_message: Option<&str>,
    success_message: Option<&str>,
    redirect_url: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (form_message(error_message, success_message))

            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email))
            (password_input("password", "Password", 0))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Sign In"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::SIGN_UP_VIEW) class=(LINK_STYLE) { "Sign up" }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// The optional query parameters of the log-in page.
#[derive(Debug, Default, Deserialize)]
pub struct LogInQuery {
    /// Prefills the email field.
    pub email: Option<String>,
    /// Set after a sign-up, see [REGISTERED] and [REGISTERED_WITHOUT_PROFILE].
    pub registered: Option<String>,
    /// Where to go after logging in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<LogInQuery>, theme: Theme) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let success_message = match query.registered.as_deref() {
        Some(REGISTERED) => Some(REGISTERED_MESSAGE),
        Some(REGISTERED_WITHOUT_PROFILE) => Some(REGISTERED_WITHOUT_PROFILE_MESSAGE),
        _ => None,
    };
    let log_in_form = log_in_form(
        query.email.as_deref().unwrap_or_default(),
        None,
        success_message,
        redirect_url.as_deref(),
    );
    let content = auth_card("Sign in to your account", &log_in_form);

    base("Log In", theme, &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub auth_provider: Arc<dyn AuthProvider>,
    pub document_store: Arc<dyn DocumentStore>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            auth_provider: state.auth_provider.clone(),
            document_store: state.document_store.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set, the theme cookie is
/// restored from the user's profile and the client is redirected to the
/// dashboard page. Otherwise, the form is returned with a message explaining
/// the problem.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    theme_jar: CookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let email = user_data.email.trim();
    let current_theme = theme_from_cookies(&theme_jar);

    let form_error =
        |message: &str| log_in_form(email, Some(message), None, redirect_url).into_response();

    if email.is_empty() || user_data.password.is_empty() {
        return form_error("Email and password are required");
    }

    if !email.contains('@') {
        return form_error("Please enter a valid email address");
    }

    let user = match state.auth_provider.sign_in(email, &user_data.password) {
        Ok(user) => user,
        Err(error) => {
            tracing::info!("Log-in failed with {}: {error}", error.code());
            return form_error(&error.log_in_message());
        }
    };

    if let Err(error) = state
        .document_store
        .touch_profile(user.id, OffsetDateTime::now_utc())
    {
        tracing::warn!("Could not update profile for user {}: {error}", user.id);
    }

    let theme = match state.document_store.get_profile(user.id) {
        Ok(profile) => profile.theme,
        Err(error) => {
            tracing::warn!("Could not get profile for user {}: {error}", user.id);
            current_theme
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.to_owned()),
            updated_jar,
            set_theme_cookie(theme_jar, theme),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}


#[cfg(test)]
mod log_in_tests {
    use std::sync::Arc;

    use axum::{
        Form, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode, header::SET_COOKIE},
        routing::post,
    };
    use axum_extra::extract::{CookieJar, PrivateCookieJar, cookie::Cookie};
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{
        app_state::create_cookie_key,
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, SQLiteAuthProvider},
        endpoints,
        store::DocumentStore,
        test_utils::{
            TEST_PASSWORD, assert_form_message, assert_hx_redirect, get_test_store, must_get_form,
            parse_html_fragment,
        },
        theme::{COOKIE_THEME, Theme},
    };

    use super::{LogInData, LogInState, REMEMBER_ME_COOKIE_DURATION, post_log_in};

    fn get_test_state() -> LogInState {
        let (connection, store, _) = get_test_store();

        LogInState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            auth_provider: Arc::new(SQLiteAuthProvider::new(connection).with_hash_cost(4)),
            document_store: Arc::new(store),
        }
    }

    fn log_in_data(email: &str, password: &str) -> LogInData {
        LogInData {
            email: email.to_owned(),
            password: password.to_owned(),
            remember_me: None,
            redirect_url: None,
        }
    }

    async fn new_log_in_request(state: LogInState, log_in_form: LogInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, CookieJar::new(), Form(log_in_form)).await
    }

    fn get_cookie<'a>(response: &'a Response<Body>, name: &str) -> Option<Cookie<'a>> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| Cookie::parse(header.to_str().ok()?).ok())
            .find(|cookie| cookie.name() == name)
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let response = new_log_in_request(
            get_test_state(),
            log_in_data("alice@example.com", TEST_PASSWORD),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);

        let token_cookie = get_cookie(&response, COOKIE_TOKEN).expect("no auth cookie");
        assert!(token_cookie.expires_datetime() > Some(OffsetDateTime::now_utc()));
        assert!(get_cookie(&response, COOKIE_THEME).is_some());
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let response = new_log_in_request(
            get_test_state(),
            log_in_data("  Alice@Example.com ", TEST_PASSWORD),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn log_in_restores_saved_theme() {
        let state = get_test_state();
        let user_id = state
            .auth_provider
            .sign_in("alice@example.com", TEST_PASSWORD)
            .unwrap()
            .id;
        state
            .document_store
            .touch_profile(user_id, OffsetDateTime::now_utc())
            .unwrap();
        state.document_store.set_theme(user_id, Theme::Dark).unwrap();

        let response =
            new_log_in_request(state, log_in_data("alice@example.com", TEST_PASSWORD)).await;

        let theme_cookie = get_cookie(&response, COOKIE_THEME).expect("no theme cookie");
        assert_eq!(theme_cookie.value(), "dark");
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_url() {
        let redirect_url = "/dashboard?tab=charts";

        let response = new_log_in_request(
            get_test_state(),
            LogInData {
                redirect_url: Some(redirect_url.to_string()),
                ..log_in_data("alice@example.com", TEST_PASSWORD)
            },
        )
        .await;

        assert_hx_redirect(&response, redirect_url);
    }

    #[tokio::test]
    async fn log_in_falls_back_on_invalid_redirect_url() {
        let response = new_log_in_request(
            get_test_state(),
            LogInData {
                redirect_url: Some("https://example.com".to_string()),
                ..log_in_data("alice@example.com", TEST_PASSWORD)
            },
        )
        .await;

        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn shows_validation_and_provider_errors() {
        let cases = [
            (log_in_data("", TEST_PASSWORD), "Email and password are required"),
            (log_in_data("alice@example.com", ""), "Email and password are required"),
            (log_in_data("alice", TEST_PASSWORD), "Please enter a valid email address"),
            (log_in_data("alice@", TEST_PASSWORD), "Invalid email address."),
            (
                log_in_data("bob@example.com", TEST_PASSWORD),
                "No account found with this email. Please sign up first.",
            ),
            (
                log_in_data("alice@example.com", "not-the-password"),
                "Incorrect password. Please try again.",
            ),
        ];

        for (form, want_message) in cases {
            let response = new_log_in_request(get_test_state(), form).await;

            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get(SET_COOKIE).is_none());
            let html = parse_html_fragment(response).await;
            assert_form_message(&must_get_form(&html), want_message);
        }
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr$(,)?) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(2),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[tokio::test]
    async fn remember_me_extends_auth_cookie_through_form() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(get_test_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let form = [
            ("email", "alice@example.com"),
            ("password", TEST_PASSWORD),
            ("remember_me", "on"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        let token_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close!(
            token_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + REMEMBER_ME_COOKIE_DURATION
        );
    }

    #[tokio::test]
    async fn form_deserialises_without_remember_me() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(get_test_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let form = [("email", "alice@example.com"), ("password", "test")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_ne!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

//! The sign-up page and the endpoint that registers new accounts.
use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState,
    auth::{
        AuthProvider,
        log_in::{REGISTERED, REGISTERED_WITHOUT_PROFILE},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, auth_card,
        base, email_input, form_message, password_input,
    },
    store::DocumentStore,
    theme::Theme,
};

/// Checked in the browser and again on the server.
const PASSWORD_MIN_LENGTH: usize = 6;

fn sign_up_form(name: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (form_message(error_message, None))

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name (optional)" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="Your name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(name);
            }

            (email_input(email))
            (password_input("password", "Password", PASSWORD_MIN_LENGTH))
            (password_input("confirm_password", "Confirm Password", PASSWORD_MIN_LENGTH))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Sign Up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Sign in" }
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page(theme: Theme) -> Response {
    let sign_up_form = sign_up_form("", "", None);
    let content = auth_card("Create an account", &sign_up_form);

    base("Sign Up", theme, &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct SignUpState {
    pub auth_provider: Arc<dyn AuthProvider>,
    pub document_store: Arc<dyn DocumentStore>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            auth_provider: state.auth_provider.clone(),
            document_store: state.document_store.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct SignUpForm {
    /// Shown on the dashboard, defaults to the start of the email.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn validate_form(form: &SignUpForm) -> Result<(), &'static str> {
    if form.email.trim().is_empty() || form.password.is_empty() || form.confirm_password.is_empty()
    {
        return Err("All fields are required");
    }

    if form.password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err("Password should be at least 6 characters");
    }

    if form.password != form.confirm_password {
        return Err("Passwords do not match");
    }

    if !form.email.contains('@') {
        return Err("Please enter a valid email address");
    }

    Ok(())
}

/// Register a new account and send the user to the log-in page.
///
/// The new user is not logged in, the log-in page greets them and has their
/// email filled in.
pub async fn sign_up(State(state): State<SignUpState>, Form(form): Form<SignUpForm>) -> Response {
    let name = form.name.trim();
    let email = form.email.trim();

    if let Err(message) = validate_form(&form) {
        return sign_up_form(name, email, Some(message)).into_response();
    }

    let user = match state.auth_provider.sign_up(email, &form.password) {
        Ok(user) => user,
        Err(error) => {
            tracing::info!("Sign-up failed with {}: {error}", error.code());
            return sign_up_form(name, email, Some(&error.message())).into_response();
        }
    };

    let display_name = if name.is_empty() {
        user.email.local_part()
    } else {
        name
    };

    // The profile is recreated from the email the next time the user is seen,
    // so a failure here still lets the user sign in.
    let registered = match state.document_store.create_profile(
        user.id,
        display_name,
        OffsetDateTime::now_utc(),
    ) {
        Ok(_) => REGISTERED,
        Err(error) => {
            tracing::error!("Could not create profile for user {}: {error}", user.id);
            REGISTERED_WITHOUT_PROFILE
        }
    };

    let log_in_url = match serde_urlencoded::to_string([
        ("email", user.email.as_str()),
        ("registered", registered),
    ]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode log-in query for user {}: {error}", user.id);
            endpoints::LOG_IN_VIEW.to_owned()
        }
    };

    (HxRedirect(log_in_url), StatusCode::SEE_OTHER).into_response()
}

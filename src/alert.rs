//! Alert messages shown at the bottom of the page after htmx requests.
//!
//! Handlers return an alert with an error status code and forms set
//! `hx-target-error="#alert-container"` so the fragment lands in the
//! container rendered by [crate::html::base].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert with a headline `message` and optional `details`.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    #[cfg(test)]
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "flex items-start p-4 mb-4 text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 shadow"
            }
            AlertType::Error => {
                "flex items-start p-4 mb-4 text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 shadow"
            }
        };

        html! {
            div class=(style) role="alert"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-3 text-sm font-semibold"
                    onclick="this.parentElement.remove()"
                {
                    "×"
                }
            }
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}

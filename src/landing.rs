//! The public page at the site root that introduces the app.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{APP_NAME, CARD_STYLE, base},
    navigation::theme_toggle,
    theme::Theme,
};

const PRIMARY_LINK_STYLE: &str = "px-5 py-2.5 rounded-full text-white bg-blue-500 \
    hover:bg-blue-600 dark:bg-blue-600 dark:hover:bg-blue-700 font-medium";
const SECONDARY_LINK_STYLE: &str = "px-5 py-2.5 rounded-full border border-blue-500 \
    text-blue-600 dark:text-blue-400 hover:bg-blue-500/10 font-medium";

/// Title and blurb for each feature card.
const FEATURES: [(&str, &str); 4] = [
    (
        "Track Expenses",
        "Easily monitor your daily expenses and income with an intuitive interface.",
    ),
    (
        "Visual Analytics",
        "Get insights into your spending patterns with charts of where your money goes.",
    ),
    (
        "Secure & Private",
        "Your account is protected by a hashed password and an encrypted session cookie.",
    ),
    (
        "Access Anywhere",
        "Check your finances from any device with a web browser.",
    ),
];

fn landing_view(theme: Theme) -> Markup {
    html! {
        header class="max-w-screen-xl flex flex-wrap items-center justify-between gap-2 mx-auto p-4"
        {
            span class="text-2xl font-semibold text-blue-600 dark:text-blue-500" { (APP_NAME) }

            div class="flex items-center gap-3"
            {
                (theme_toggle(theme, endpoints::GUEST_THEME_API))

                a href=(endpoints::LOG_IN_VIEW) class=(SECONDARY_LINK_STYLE) { "Sign In" }
                a href=(endpoints::SIGN_UP_VIEW) class=(PRIMARY_LINK_STYLE) { "Get Started" }
            }
        }

        main class="max-w-screen-xl mx-auto px-6 text-gray-900 dark:text-white"
        {
            section id="hero" class="mt-16 mb-12 text-center"
            {
                h1 class="mb-6 text-4xl md:text-6xl font-bold text-blue-700 dark:text-blue-500"
                {
                    "Take Control of Your Finances"
                }

                p class="max-w-2xl mx-auto mb-8 text-xl text-gray-600 dark:text-gray-400"
                {
                    "Track your income and expenses with an easy-to-use finance management tool."
                }

                div class="flex justify-center gap-4"
                {
                    a href=(endpoints::SIGN_UP_VIEW) class=(PRIMARY_LINK_STYLE) { "Get Started" }
                    a href=(endpoints::LOG_IN_VIEW) class=(SECONDARY_LINK_STYLE) { "Sign In" }
                }
            }

            section id="features" class="grid gap-6 sm:grid-cols-2 lg:grid-cols-4 mb-16"
            {
                @for (title, description) in FEATURES {
                    div class={(CARD_STYLE) " text-center"}
                    {
                        h2 class="mb-2 text-lg font-semibold" { (title) }
                        p class="text-gray-600 dark:text-gray-400" { (description) }
                    }
                }
            }
        }
    }
}

/// Display the landing page. It is shown whether or not the visitor is logged in.
pub async fn get_landing_page(theme: Theme) -> Response {
    base("Welcome", theme, &[], &landing_view(theme)).into_response()
}

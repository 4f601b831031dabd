//! The navigation bar shown at the top of every page behind the log-in.

use maud::{Markup, html};

use crate::{endpoints, html::APP_NAME, theme::Theme};

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm md:bg-transparent
            md:text-blue-700 md:p-0 dark:text-white md:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
            md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0
            dark:text-white md:dark:hover:text-blue-500 dark:hover:bg-gray-700
            dark:hover:text-white md:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    theme: Theme,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML. `theme` is
    /// the current theme, the toggle button offers the other one.
    pub fn new(active_endpoint: &str, theme: Theme) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links, theme }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        (APP_NAME)
                    }

                    ul
                        class="font-medium flex flex-row items-center space-x-6
                        rtl:space-x-reverse"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }

                        li { (theme_toggle(self.theme, endpoints::THEME_API)) }
                    }
                }
            }
        )
    }
}

/// A button that asks `endpoint` to switch away from `theme`.
///
/// The label names the theme the button switches to.
pub fn theme_toggle(theme: Theme, endpoint: &str) -> Markup {
    let label = match theme.toggled() {
        Theme::Dark => "Dark mode",
        Theme::Light => "Light mode",
    };

    html!(
        button
            id="theme-toggle"
            type="button"
            hx-post=(endpoint)
            hx-target-error="#alert-container"
            class="py-2 px-3 text-sm rounded border border-gray-300
            dark:border-gray-600 text-gray-900 dark:text-white
            hover:bg-gray-100 dark:hover:bg-gray-700"
        {
            (label)
        }
    )
}

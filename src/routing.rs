//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_sign_up_page, post_log_in,
        sign_up,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    landing::get_landing_page,
    not_found::get_404_not_found,
    theme::{toggle_guest_theme_endpoint, toggle_theme_endpoint},
    transaction::{create_transaction_endpoint, delete_transaction_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_landing_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page))
        .route(endpoints::USERS_API, post(sign_up))
        .route(endpoints::GUEST_THEME_API, post(toggle_guest_theme_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by htmx, so they need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
            .route(endpoints::THEME_API, post(toggle_theme_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

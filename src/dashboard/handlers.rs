//! The dashboard page: totals, charts, the add-transaction form and the
//! transaction list.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::{
            MONTHLY_WINDOW, Totals, compute_category_breakdown, compute_monthly_series,
        },
        cards::totals_cards_view,
        charts::{
            DashboardChart, ECHARTS_SCRIPT, charts_script, charts_view,
            expense_distribution_chart, income_distribution_chart, trends_chart,
        },
    },
    endpoints,
    html::{CARD_STYLE, FORM_ERROR_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    store::DocumentStore,
    theme::Theme,
    timezone::get_local_offset,
    transaction::{
        Transaction, TransactionFormDefaults, TransactionType, transaction_form,
        transactions_view,
    },
};

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The store that holds the user's profile and transactions.
    pub document_store: Arc<dyn DocumentStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            document_store: state.document_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
///
/// If the transactions cannot be loaded the page still renders, with empty
/// data and a banner describing the error.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    theme: Theme,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    if let Err(error) = state
        .document_store
        .touch_profile(user_id, OffsetDateTime::now_utc())
    {
        tracing::warn!("could not update profile for user {user_id}: {error}");
    }

    let display_name = state
        .document_store
        .get_profile(user_id)
        .inspect_err(|error| tracing::warn!("could not get profile for user {user_id}: {error}"))
        .ok()
        .map(|profile| profile.display_name);

    let (transactions, load_error) = match state.document_store.list_transactions(user_id) {
        Ok(transactions) => (to_local_time(transactions, local_offset), None),
        Err(error) => {
            tracing::error!("could not load transactions for user {user_id}: {error}");
            (Vec::new(), Some(format!("Failed to load transactions: {error}")))
        }
    };

    let charts = build_charts(&transactions);

    Ok(dashboard_view(
        theme,
        display_name.as_deref(),
        load_error.as_deref(),
        &Totals::from_transactions(&transactions),
        &charts,
        &transactions,
    )
    .into_response())
}

fn to_local_time(transactions: Vec<Transaction>, local_offset: UtcOffset) -> Vec<Transaction> {
    transactions
        .into_iter()
        .map(|transaction| Transaction {
            timestamp: transaction.timestamp.to_offset(local_offset),
            ..transaction
        })
        .collect()
}

/// The charts for `transactions`, which are ordered newest first.
///
/// Returns no charts when there are no transactions.
fn build_charts(transactions: &[Transaction]) -> Vec<DashboardChart> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let mut charts = Vec::with_capacity(3);

    let income_shares = compute_category_breakdown(transactions, TransactionType::Income);
    if !income_shares.is_empty() {
        charts.push(DashboardChart {
            id: "income-distribution-chart",
            options: income_distribution_chart(&income_shares).to_string(),
        });
    }

    let expense_shares = compute_category_breakdown(transactions, TransactionType::Expense);
    if !expense_shares.is_empty() {
        charts.push(DashboardChart {
            id: "expense-distribution-chart",
            options: expense_distribution_chart(&expense_shares).to_string(),
        });
    }

    // Oldest first so that the window keeps the most recent months in
    // chronological order.
    let chronological: Vec<Transaction> = transactions.iter().rev().cloned().collect();
    let series = compute_monthly_series(&chronological, MONTHLY_WINDOW);
    charts.push(DashboardChart {
        id: "trends-chart",
        options: trends_chart(&series).to_string(),
    });

    charts
}

fn dashboard_view(
    theme: Theme,
    display_name: Option<&str>,
    load_error: Option<&str>,
    totals: &Totals,
    charts: &[DashboardChart],
    transactions: &[Transaction],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, theme).into_html();
    let head_elements = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(charts, theme),
        ]
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-4"
            {
                h1 class="text-2xl font-bold"
                {
                    @match display_name {
                        Some(name) => { "Welcome, " (name) }
                        None => { "Dashboard" }
                    }
                }

                @if let Some(message) = load_error {
                    p id="load-error" class=(FORM_ERROR_STYLE) role="alert" { (message) }
                }

                (totals_cards_view(totals))

                @if !charts.is_empty() {
                    (charts_view(charts))
                }

                div class="grid grid-cols-1 lg:grid-cols-3 gap-4"
                {
                    div class={(CARD_STYLE) " lg:col-span-1 h-fit"}
                    {
                        (transaction_form(&TransactionFormDefaults::default(), None))
                    }

                    div class={(CARD_STYLE) " lg:col-span-2"}
                    {
                        (transactions_view(transactions))
                    }
                }
            }
        }
    );

    base("Dashboard", theme, &head_elements, &content)
}

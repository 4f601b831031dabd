//! Defines the endpoint for adding a transaction.
use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState,
    alert::Alert,
    auth::UserID,
    endpoints,
    store::DocumentStore,
    transaction::{
        Transaction,
        core::TransactionType,
        form::{TransactionFormDefaults, transaction_form},
    },
};

/// The state needed to add a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The store that holds the user's transactions.
    pub document_store: Arc<dyn DocumentStore>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            document_store: state.document_store.clone(),
        }
    }
}

/// The form data for adding a transaction.
///
/// The amount is kept as text so that a missing or malformed amount can be
/// reported in the form instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction, also used as its category.
    #[serde(default)]
    pub description: String,
    /// The value of the transaction in dollars.
    #[serde(default)]
    pub amount: String,
    #[serde(rename = "type", default)]
    pub type_: TransactionType,
}

/// A route handler for adding a transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let description = form.description.trim();
    let raw_amount = form.amount.trim();

    let amount = match validate_form(description, raw_amount) {
        Ok(amount) => amount,
        Err(message) => {
            return transaction_form(
                &TransactionFormDefaults {
                    description: &form.description,
                    amount: &form.amount,
                    transaction_type: form.type_,
                },
                Some(message),
            )
            .into_response();
        }
    };

    let transaction = Transaction::build(description, amount, form.type_);
    let result = state
        .document_store
        .touch_profile(user_id, OffsetDateTime::now_utc())
        .and_then(|_| state.document_store.add_transaction(user_id, transaction));

    if let Err(error) = result {
        tracing::error!("could not add transaction for user {user_id}: {error}");

        return Alert::error(
            "Failed to add transaction",
            &format!("Failed to add transaction: {error}"),
        )
        .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn validate_form(description: &str, raw_amount: &str) -> Result<f64, &'static str> {
    if description.is_empty() || raw_amount.is_empty() {
        return Err("Please fill in all fields");
    }

    let amount: f64 = raw_amount
        .parse()
        .map_err(|_| "Please enter a valid amount")?;

    if !amount.is_finite() {
        return Err("Please enter a valid amount");
    }

    if amount < 0.0 {
        return Err("Amount cannot be negative");
    }

    Ok(amount)
}

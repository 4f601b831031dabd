//! Defines the endpoint for deleting a transaction.
use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, auth::UserID, database_id::TransactionId, endpoints, store::DocumentStore,
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The store that holds the user's transactions.
    pub document_store: Arc<dyn DocumentStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            document_store: state.document_store.clone(),
        }
    }
}

/// A route handler for deleting one of the user's transactions.
///
/// Redirects to the dashboard on success so the totals and charts are
/// recomputed from scratch.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state
        .document_store
        .delete_transaction(user_id, transaction_id)
    {
        Ok(()) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(
                "could not delete transaction {transaction_id} for user {user_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

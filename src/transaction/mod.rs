//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing it
//! - The add-transaction form and the transaction list
//! - The endpoints for adding and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod view;

pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction_table, delete_transaction,
    get_transactions_for_user, insert_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::{TransactionFormDefaults, transaction_form};
pub use view::transactions_view;

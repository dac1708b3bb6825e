//! Transaction management for the application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and database functions for storing and querying
//!   transactions, including account balance maintenance
//! - The pure list view-model that filters, sorts and paginates the account
//!   page
//! - View handlers and endpoints for the transaction pages and API

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod schedule;
mod transactions_page;
mod view;
mod view_model;

pub use core::{
    RecurringInterval, Transaction, TransactionKind, create_transaction,
    create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::{bulk_delete_transactions_endpoint, delete_transaction_endpoint};
pub use edit_endpoint::update_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use schedule::next_occurrence;
pub use transactions_page::get_account_page;

pub(crate) use core::{
    count_transactions_for_account, get_transactions_for_account, signed_amount,
};

#[cfg(test)]
pub(crate) use core::{delete_transaction, delete_transactions, get_transaction, update_transaction};

//! Account management for the application.
//!
//! This module contains the `Account` model, the database functions for
//! storing and querying accounts, and the view handlers and endpoints for
//! the account pages.

mod accounts_page;
mod core;
mod create_endpoint;
mod create_page;
mod default_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountForm, AccountKind, create_account, create_account_table, get_account,
    get_all_accounts, get_default_account,
};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_new_account_page;
pub use default_endpoint::set_default_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::update_account_endpoint;
pub use edit_page::get_edit_account_page;

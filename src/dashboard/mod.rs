//! The dashboard landing page.
//!
//! Shows the default account's budget progress, the most recent transactions
//! for a selectable account, the current month's expense breakdown and a
//! grid of the user's accounts.

mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;

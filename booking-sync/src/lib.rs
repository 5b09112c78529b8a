//! booking-sync: GloriaFood orders and table reservations into Google Sheets
//!
//! Every webhook delivery is reconciled against the spreadsheet by external
//! identifier: rows are inserted once and overwritten in place afterwards.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod sheets;
pub mod state;

pub use config::Config;
pub use state::AppState;

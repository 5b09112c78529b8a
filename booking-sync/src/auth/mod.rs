//! Webhook authentication

mod webhook_secret;

pub use webhook_secret::webhook_secret_middleware;

//! Core expensify library (session manager, API client, store, config).

pub mod api;
pub mod config;
pub mod error;
pub mod expense;
pub mod logging;
pub mod manager;
pub mod session;
pub mod store;
pub mod validation;

pub use error::ClientError;
pub use manager::SessionManager;
pub use session::{Session, User};

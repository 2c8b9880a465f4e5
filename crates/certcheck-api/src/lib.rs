//! certcheck API Library
//!
//! HTTP handlers, HTML views, and application setup for the document upload
//! and classification server.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod views;

pub use error::HttpAppError;
pub use state::AppState;

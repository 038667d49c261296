//! Shared application service layer for kittyplot.
//!
//! Ties ingestion, metric selection and rendering together behind one
//! `Session` so front ends only deal with paths, patterns and images.

pub mod config;
pub mod error;
pub mod selector;
pub mod session;

// Re-export key types for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use selector::{MatchState, SelectError};
pub use session::Session;

//! Beer Review Shared Library
//!
//! Wire types, models and validation rules shared by the backend and any
//! Rust client of the API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;

pub mod error;

// GitHub integration
pub mod github;

// Command line front end
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use error::{EncodingError, Error, Result, ServiceError, ServiceResult};

//! HTTP protocol layer module
//!
//! Response builders and query-string helpers, kept apart from the
//! calculator logic.

pub mod query;
pub mod response;

// Re-export commonly used types
pub use query::QueryParams;
pub use response::{build_405_response, build_envelope_response, Envelope};

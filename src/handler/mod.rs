//! Request handler module
//!
//! Routes requests to the four operation endpoints and shapes their JSON
//! envelopes.

mod calculate;
pub mod router;

// Re-export main entry point
pub use router::handle_request;

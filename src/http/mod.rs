//! HTTP protocol layer module
//!
//! Response building shared by the action dispatcher, decoupled from action semantics.

pub mod response;

// Re-export commonly used builders
pub use response::{build_413_response, build_json_response, build_options_response};

//! HTTP protocol layer
//!
//! Protocol-level building blocks shared by the page and data file handlers:
//! response builders, MIME inference, conditional requests, and range
//! parsing. Nothing in here knows about the route table.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use range::{parse_range, RangeOutcome};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_500_response, build_options_response, build_redirect_response,
};

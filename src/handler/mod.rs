//! Request handler module
//!
//! Routing dispatch plus the two kinds of content this site delivers: fixed
//! HTML pages and files from the data directory.

pub mod files;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;

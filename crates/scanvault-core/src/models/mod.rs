//! Data models for the application
//!
//! `upload` holds the audit trail records, `scan` the request and response types of the
//! scan pipeline.

mod scan;
mod upload;

pub use scan::*;
pub use upload::*;

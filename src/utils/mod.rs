//! Utility modules
//!
//! Error types and the render report.

pub mod error;

pub use error::{ExpandError, ExpandResult, RenderReport, RenderWarning};

//! Core functionality
//!
//! - [`number`]: numeric literal normalization
//! - [`macros`]: the siunitx macro table
//! - [`engine`]: reference host that expands math markup
//! - [`render`]: finds math regions in a document

pub mod engine;
pub mod macros;
pub mod number;
pub mod render;

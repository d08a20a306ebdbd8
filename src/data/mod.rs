//! Data layer - static macro tables

pub mod siunitx;

pub use siunitx::{lookup_template, SI_PREFIXES, SI_STRUCTURE, SI_UNITS};

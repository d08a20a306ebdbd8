//! # texnum
//!
//! siunitx-style number and unit macros for TeX math markup.
//!
//! ## Features
//!
//! - **Number formatting**: `12345.678e-3` becomes `12\,345.678\cdot 10^{-3}`
//! - **Macro table**: `\num`, `\qty`, `\qtyrange`, SI units and prefixes,
//!   ready to hand to a KaTeX-style renderer
//! - **Expansion**: a small host that expands the table over math markup
//! - **Auto-render**: expands every `$...$`, `$$...$$`, `\(...\)` and
//!   `\[...\]` region of a document
//!
//! ## Example
//!
//! ```rust
//! use texnum::{expand_math, format_number};
//!
//! assert_eq!(format_number("1234567"), "1\\,234\\,567");
//! assert_eq!(
//!     expand_math("\\qty{10000}{\\volt}").unwrap(),
//!     "10\\,000\\,\\mathrm{\\text{V}}"
//! );
//! ```

pub mod core;
pub mod data;
pub mod utils;
pub mod wasm;

pub use crate::core::engine::{expand_math, Engine, TokenStream};
pub use crate::core::macros::{
    InvocationContext, MacroArgument, MacroRule, MacroTable, COMPUTED_MACROS,
};
pub use crate::core::number::{format_number, parse_literal, NumericLiteral, Sign};
pub use crate::core::render::{
    default_delimiters, render_document, render_document_default, split_at_delimiters,
    Delimiter, RenderOptions, Segment,
};
pub use crate::utils::error::{ExpandError, ExpandResult, RenderReport, RenderWarning};

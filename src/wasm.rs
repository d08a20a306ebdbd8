//! WASM bindings for texnum
//!
//! This module provides JavaScript-accessible functions for number
//! formatting, math expansion and document rendering.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::Serialize;

#[cfg(feature = "wasm")]
use crate::{RenderOptions, RenderReport, RenderWarning};

/// Safely serialize a value to JsValue, returning an error object on failure.
#[cfg(feature = "wasm")]
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = RenderReport::with_warnings(
            String::new(),
            vec![RenderWarning {
                region: String::new(),
                message: format!("Serialization error: {}", e),
            }],
        );
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Normalize a numeric literal, e.g. `12345.678e-3`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "formatNumber")]
pub fn format_number_wasm(input: &str) -> String {
    crate::format_number(input)
}

/// Expand the siunitx macros in math markup (without $ delimiters)
///
/// # Returns
/// The expanded markup, or the error message if expansion failed
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "expandMath")]
pub fn expand_math_wasm(input: &str) -> String {
    crate::expand_math(input).unwrap_or_else(|e| e.to_string())
}

/// Expand every math region of a document.
///
/// `options` takes the same fields as the CLI config file; anything
/// missing or malformed falls back to the defaults. Returns
/// `{ content, warnings }`.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderDocument")]
pub fn render_document_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: RenderOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();

    let report = crate::render_document(input, &opts).unwrap_or_else(|e| {
        RenderReport::with_warnings(input.to_string(), vec![RenderWarning::new(input, &e)])
    });
    to_js_value(&report)
}

/// Names of all built-in macros, sorted
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "macroNames")]
pub fn macro_names_wasm() -> JsValue {
    let table = crate::MacroTable::builtin();
    to_js_value(&table.names())
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

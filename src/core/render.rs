//! Document rendering: find math regions and expand them.
//!
//! Splitting follows KaTeX auto-render. The earliest left delimiter wins,
//! and the first listed delimiter that matches there is used (which is why
//! `$$` must be listed before `$`). The right delimiter is only accepted
//! outside braces, and a backslash escapes the character after it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::engine::{Engine, DEFAULT_MAX_EXPANSIONS};
use super::macros::MacroTable;
use crate::utils::error::{ExpandResult, RenderReport, RenderWarning};

/// A pair of math delimiters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiter {
    pub left: String,
    pub right: String,
    /// Display (block) math rather than inline
    #[serde(default)]
    pub display: bool,
}

impl Delimiter {
    pub fn new(left: impl Into<String>, right: impl Into<String>, display: bool) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            display,
        }
    }
}

/// `$$`, `$`, `\[ \]`, `\( \)`, in that order
pub fn default_delimiters() -> Vec<Delimiter> {
    vec![
        Delimiter::new("$$", "$$", true),
        Delimiter::new("$", "$", false),
        Delimiter::new("\\[", "\\]", true),
        Delimiter::new("\\(", "\\)", false),
    ]
}

/// A piece of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text outside math, copied through unchanged
    Text(String),
    /// A math region
    Math {
        /// Text between the delimiters
        content: String,
        /// The region as written, delimiters included
        raw: String,
        delimiter: Delimiter,
    },
}

/// Options for rendering a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Math delimiters, checked in order
    pub delimiters: Vec<Delimiter>,
    /// Fail on the first region that cannot be expanded instead of
    /// leaving it as written
    pub throw_on_error: bool,
    /// Expansion limit per region
    pub max_expansions: usize,
    /// User templates, e.g. `"\\RR" = "\\mathbb{R}"`
    pub macros: IndexMap<String, String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            throw_on_error: false,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            macros: IndexMap::new(),
        }
    }
}

impl RenderOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that stop at the first failing region
    pub fn strict() -> Self {
        Self {
            throw_on_error: true,
            ..Self::default()
        }
    }

    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> ExpandResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Built-in macros plus the user templates
    pub fn macro_table(&self) -> MacroTable {
        MacroTable::with_macros(self.macros.clone())
    }
}

/// Byte offset of `delimiter` in `text`, searching from `start` and
/// skipping escaped characters and braced groups.
fn find_end_of_math(delimiter: &str, text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let needle = delimiter.as_bytes();
    let mut index = start;
    let mut brace_level: i32 = 0;

    while index < bytes.len() {
        if brace_level <= 0 && bytes[index..].starts_with(needle) {
            return Some(index);
        }
        match bytes[index] {
            b'\\' => index += 1,
            b'{' => brace_level += 1,
            b'}' => brace_level -= 1,
            _ => {}
        }
        index += 1;
    }

    None
}

/// Split a document into text and math segments.
///
/// An opening delimiter without a matching close leaves the rest of the
/// document as text.
pub fn split_at_delimiters(text: &str, delimiters: &[Delimiter]) -> Vec<Segment> {
    let delimiters: Vec<&Delimiter> = delimiters
        .iter()
        .filter(|d| !d.left.is_empty() && !d.right.is_empty())
        .collect();
    let mut segments = Vec::new();
    let mut rest = text;

    loop {
        let Some(start) = delimiters
            .iter()
            .filter_map(|d| rest.find(d.left.as_str()))
            .min()
        else {
            break;
        };
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
            rest = &rest[start..];
        }

        let Some(delimiter) = delimiters.iter().find(|d| rest.starts_with(d.left.as_str())) else {
            break;
        };
        let Some(end) = find_end_of_math(&delimiter.right, rest, delimiter.left.len()) else {
            break;
        };

        let raw_end = end + delimiter.right.len();
        segments.push(Segment::Math {
            content: rest[delimiter.left.len()..end].to_string(),
            raw: rest[..raw_end].to_string(),
            delimiter: (*delimiter).clone(),
        });
        rest = &rest[raw_end..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    segments
}

/// Expand every math region of a document.
///
/// Unless `throw_on_error` is set, a region that fails to expand is copied
/// through as written and reported in the returned warnings; the rest of
/// the document is still processed.
pub fn render_document(text: &str, options: &RenderOptions) -> ExpandResult<RenderReport> {
    let table = options.macro_table();
    let engine = Engine::new(&table).with_max_expansions(options.max_expansions);

    let mut content = String::with_capacity(text.len());
    let mut warnings = Vec::new();

    for segment in split_at_delimiters(text, &options.delimiters) {
        match segment {
            Segment::Text(text) => content.push_str(&text),
            Segment::Math {
                content: math,
                raw,
                delimiter,
            } => match engine.expand(&math) {
                Ok(expanded) => {
                    content.push_str(&delimiter.left);
                    content.push_str(&expanded);
                    content.push_str(&delimiter.right);
                }
                Err(err) if options.throw_on_error => return Err(err),
                Err(err) => {
                    warn!(region = %raw, error = %err, "leaving math region unexpanded");
                    warnings.push(RenderWarning::new(raw.as_str(), &err));
                    content.push_str(&raw);
                }
            },
        }
    }

    Ok(RenderReport::with_warnings(content, warnings))
}

/// Render with default options. Failing regions are left as written.
pub fn render_document_default(text: &str) -> String {
    match render_document(text, &RenderOptions::default()) {
        Ok(report) => report.content,
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ExpandError;
    use pretty_assertions::assert_eq;

    fn math(segment: &Segment) -> (&str, bool) {
        match segment {
            Segment::Math {
                content, delimiter, ..
            } => (content.as_str(), delimiter.display),
            Segment::Text(t) => panic!("expected math, got text {:?}", t),
        }
    }

    #[test]
    fn test_split_inline_and_text() {
        let segments = split_at_delimiters("a $x$ b", &default_delimiters());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Text("a ".into()));
        assert_eq!(math(&segments[1]), ("x", false));
        assert_eq!(segments[2], Segment::Text(" b".into()));
    }

    #[test]
    fn test_double_dollar_before_single() {
        let segments = split_at_delimiters("$$x$$", &default_delimiters());
        assert_eq!(segments.len(), 1);
        assert_eq!(math(&segments[0]), ("x", true));
    }

    #[test]
    fn test_bracket_delimiters() {
        let segments = split_at_delimiters("\\[a\\] and \\(b\\)", &default_delimiters());
        assert_eq!(math(&segments[0]), ("a", true));
        assert_eq!(segments[1], Segment::Text(" and ".into()));
        assert_eq!(math(&segments[2]), ("b", false));
    }

    #[test]
    fn test_right_delimiter_inside_braces_ignored() {
        let segments = split_at_delimiters("$\\text{$}x$", &default_delimiters());
        assert_eq!(segments.len(), 1);
        assert_eq!(math(&segments[0]), ("\\text{$}x", false));
    }

    #[test]
    fn test_escaped_right_delimiter_ignored() {
        let segments = split_at_delimiters("$a\\$b$", &default_delimiters());
        assert_eq!(math(&segments[0]), ("a\\$b", false));
    }

    #[test]
    fn test_unclosed_delimiter_is_text() {
        let segments = split_at_delimiters("cost $5 total", &default_delimiters());
        assert_eq!(
            segments,
            vec![
                Segment::Text("cost ".into()),
                Segment::Text("$5 total".into())
            ]
        );
    }

    #[test]
    fn test_multibyte_text() {
        let segments = split_at_delimiters("μ $\\micro$ é", &default_delimiters());
        assert_eq!(math(&segments[1]), ("\\micro", false));
    }

    #[test]
    fn test_render_document() {
        let out = render_document_default("Supply: $\\qty{1000}{\\volt}$, range $$\\qtyrange{1}{5}{\\meter}$$.");
        assert_eq!(
            out,
            "Supply: $1000\\,\\mathrm{\\text{V}}$, range $$1\\,\\text{--}\\,5\\,\\mathrm{\\text{m}}$$."
        );
    }

    #[test]
    fn test_region_without_macros_unchanged() {
        assert_eq!(render_document_default("$a#b$ and $x_1^2$"), "$a#b$ and $x_1^2$");
    }

    #[test]
    fn test_failing_region_left_as_written() {
        let report = render_document("$\\qty{5}$ and $\\num{12345}$", &RenderOptions::default()).unwrap();
        assert_eq!(report.content, "$\\qty{5}$ and $12\\,345$");
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].region, "$\\qty{5}$");
    }

    #[test]
    fn test_strict_mode_propagates() {
        let result = render_document("ok $x$ then $\\qty{5}$", &RenderOptions::strict());
        assert!(matches!(result, Err(ExpandError::MissingArgument { .. })));
        // a `$` inside an open brace never closes the region
        let report = render_document("$\\num{1$", &RenderOptions::strict()).unwrap();
        assert_eq!(report.content, "$\\num{1$");
    }

    #[test]
    fn test_options_from_json() {
        let options = RenderOptions::from_json(
            r#"{"throw_on_error": true, "macros": {"\\RR": "\\mathbb{R}"}}"#,
        )
        .unwrap();
        assert!(options.throw_on_error);
        assert_eq!(options.delimiters, default_delimiters());
        assert_eq!(options.max_expansions, DEFAULT_MAX_EXPANSIONS);
        let report = render_document("$\\RR$", &options).unwrap();
        assert_eq!(report.content, "$\\mathbb{R}$");
    }

    #[test]
    fn test_options_from_bad_json() {
        assert!(matches!(
            RenderOptions::from_json("{\"max_expansions\": \"many\"}"),
            Err(ExpandError::Config { .. })
        ));
    }
}

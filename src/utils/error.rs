//! Error handling for macro expansion and rendering
//!
//! Number formatting never fails. Everything in here belongs to the host
//! side: collecting macro arguments from a token stream, bounding the
//! expansion, and reading configuration.

use std::fmt;

use serde::Serialize;

/// Expansion error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// A macro needed more arguments than the input provides
    MissingArgument {
        macro_name: String,
        expected: usize,
        found: usize,
    },
    /// A `{` group was never closed
    UnbalancedGroup,
    /// A single argument grew beyond the token limit
    ArgumentTooLong { limit: usize },
    /// Macro expansion did not terminate within the expansion limit
    TooManyExpansions { limit: usize },
    /// Expanded output grew beyond the token limit
    TokenLimitExceeded { limit: usize },
    /// IO error (for file operations)
    Io { message: String },
    /// Configuration could not be parsed
    Config { message: String },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::MissingArgument {
                macro_name,
                expected,
                found,
            } => write!(
                f,
                "Macro '{}' expects {} argument(s) but only {} found",
                macro_name, expected, found
            ),
            ExpandError::UnbalancedGroup => {
                write!(f, "Unexpected end of input in a macro argument, expected '}}'")
            }
            ExpandError::ArgumentTooLong { limit } => {
                write!(f, "Macro argument exceeds {} tokens", limit)
            }
            ExpandError::TooManyExpansions { limit } => write!(
                f,
                "Too many expansions ({}): maybe a loop in macro definition",
                limit
            ),
            ExpandError::TokenLimitExceeded { limit } => {
                write!(f, "Expanded output exceeds {} tokens", limit)
            }
            ExpandError::Io { message } => write!(f, "IO error: {}", message),
            ExpandError::Config { message } => write!(f, "Config error: {}", message),
        }
    }
}

impl std::error::Error for ExpandError {}

impl From<std::io::Error> for ExpandError {
    fn from(err: std::io::Error) -> Self {
        ExpandError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExpandError {
    fn from(err: serde_json::Error) -> Self {
        ExpandError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type for expansion operations
pub type ExpandResult<T> = Result<T, ExpandError>;

/// A math region that could not be expanded and was left as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderWarning {
    /// The region exactly as it appears in the source, delimiters included
    pub region: String,
    /// Human-readable reason
    pub message: String,
}

impl RenderWarning {
    pub fn new(region: impl Into<String>, error: &ExpandError) -> Self {
        Self {
            region: region.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning: {} (in `{}`)", self.message, self.region)
    }
}

/// Render output with the regions that were left unexpanded
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    /// The rendered content
    pub content: String,
    /// Regions whose expansion failed
    pub warnings: Vec<RenderWarning>,
}

impl RenderReport {
    pub fn with_warnings(content: String, warnings: Vec<RenderWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

//! TeX tokens for the reference expansion host.
//!
//! Tokens follow the KaTeX lexer rather than full TeX: there are no
//! category-code changes, comments never reach the token stream, and every
//! token has a source text that argument reconstruction concatenates.

use std::fmt;

/// A single math-mode token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TexToken {
    /// A control sequence like `\num` or `\,`.
    /// The string does NOT include the leading backslash.
    ControlSeq(String),

    /// Begin group token `{`
    BeginGroup,

    /// End group token `}`
    EndGroup,

    /// A parameter token `#1` .. `#9` (only meaningful in templates)
    Param(u8),

    /// A regular character (letters, digits, punctuation, etc.)
    Char(char),

    /// A run of whitespace
    Space,

    /// Math shift `$`
    MathShift,

    /// Alignment tab `&`
    AlignTab,

    /// Superscript `^`
    Superscript,

    /// Subscript `_`
    Subscript,

    /// Active char `~`
    ActiveChar(char),
}

impl TexToken {
    /// Returns true if this token is whitespace
    pub fn is_space(&self) -> bool {
        matches!(self, TexToken::Space)
    }

    /// Check if this is a specific control sequence
    pub fn is_cs(&self, name: &str) -> bool {
        matches!(self, TexToken::ControlSeq(n) if n == name)
    }

    /// Source text of the token, as used for macro lookup and argument
    /// reconstruction (`\volt`, `{`, `1`, ` `).
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TexToken::ControlSeq(name) => write!(f, "\\{}", name),
            TexToken::BeginGroup => write!(f, "{{"),
            TexToken::EndGroup => write!(f, "}}"),
            TexToken::Param(n) => write!(f, "#{}", n),
            TexToken::Char(c) => write!(f, "{}", c),
            TexToken::Space => write!(f, " "),
            TexToken::MathShift => write!(f, "$"),
            TexToken::AlignTab => write!(f, "&"),
            TexToken::Superscript => write!(f, "^"),
            TexToken::Subscript => write!(f, "_"),
            TexToken::ActiveChar(c) => write!(f, "{}", c),
        }
    }
}

/// A list of tokens, used for expansions and arguments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenList(pub Vec<TexToken>);

impl TokenList {
    /// Create from a vector of tokens
    pub fn from_vec(tokens: Vec<TexToken>) -> Self {
        TokenList(tokens)
    }

    /// Get the inner vector
    pub fn into_inner(self) -> Vec<TexToken> {
        self.0
    }

    /// Get a reference to the inner vector
    pub fn as_slice(&self) -> &[TexToken] {
        &self.0
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get length
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Plain concatenation of token texts. Use `lexer::detokenize` when the
/// result has to lex back into the same tokens.
impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl IntoIterator for TokenList {
    type Item = TexToken;
    type IntoIter = std::vec::IntoIter<TexToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a TexToken;
    type IntoIter = std::slice::Iter<'a, TexToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

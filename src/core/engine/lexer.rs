//! Math-mode lexer
//!
//! Converts math markup into a stream of tokens using KaTeX's rules:
//! - Control words swallow the whitespace that follows them
//! - Control symbols (`\,`, `\%`, `\\`) are a backslash plus one character
//! - Comments are dropped entirely
//! - Any run of whitespace, newlines included, is a single space token

use super::token::{TexToken, TokenList};

/// The lexer that converts source text to tokens
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    /// Track if we just emitted a control word (for space swallowing)
    after_cs: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            after_cs: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.next_char();
        }
    }

    /// Read a control sequence name (letters only, or single non-letter)
    fn read_control_seq(&mut self) -> String {
        let mut name = String::new();

        if let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() {
                while let Some(c) = self.peek_char() {
                    if !c.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(c);
                    self.next_char();
                }
                self.after_cs = true;
            } else {
                name.push(c);
                self.next_char();
            }
        }

        name
    }

    /// Skip a comment up to and including the line end
    fn skip_comment(&mut self) {
        while let Some(c) = self.next_char() {
            if c == '\n' {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Option<TexToken> {
        loop {
            if self.after_cs {
                self.skip_whitespace();
                self.after_cs = false;
            }

            let c = self.next_char()?;

            let token = match c {
                '\\' => {
                    let name = self.read_control_seq();
                    if name.is_empty() {
                        // Lone backslash at end of input
                        TexToken::Char('\\')
                    } else {
                        TexToken::ControlSeq(name)
                    }
                }
                '{' => TexToken::BeginGroup,
                '}' => TexToken::EndGroup,
                '#' => match self.peek_char() {
                    Some(d @ '1'..='9') => {
                        self.next_char();
                        TexToken::Param(d as u8 - b'0')
                    }
                    Some('#') => {
                        // ## produces a single literal #
                        self.next_char();
                        TexToken::Char('#')
                    }
                    _ => TexToken::Char('#'),
                },
                '%' => {
                    self.skip_comment();
                    continue;
                }
                '$' => TexToken::MathShift,
                '&' => TexToken::AlignTab,
                '^' => TexToken::Superscript,
                '_' => TexToken::Subscript,
                '~' => TexToken::ActiveChar('~'),
                c if c.is_whitespace() => {
                    self.skip_whitespace();
                    TexToken::Space
                }
                _ => TexToken::Char(c),
            };
            return Some(token);
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(self) -> TokenList {
        TokenList::from_vec(self.collect())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = TexToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Convenience function to tokenize a string
pub fn tokenize(input: &str) -> TokenList {
    Lexer::new(input).tokenize()
}

/// Convert a token list back to a string that lexes to the same tokens.
pub fn detokenize(tokens: &TokenList) -> String {
    let mut result = String::new();
    let slice = tokens.as_slice();

    for (i, token) in slice.iter().enumerate() {
        match token {
            TexToken::ControlSeq(name) => {
                result.push('\\');
                result.push_str(name);

                // A control word would otherwise absorb a following letter
                if name.chars().all(|c| c.is_ascii_alphabetic()) {
                    if let Some(TexToken::Char(c)) = slice.get(i + 1) {
                        if c.is_ascii_alphabetic() {
                            result.push(' ');
                        }
                    }
                }
            }
            TexToken::Param(n) => {
                result.push('#');
                result.push(char::from(b'0' + *n));
            }
            // Doubled only where a bare `#` would re-lex as a parameter or
            // merge with the next `#`
            TexToken::Char('#') => match slice.get(i + 1) {
                Some(TexToken::Char('1'..='9' | '#')) => result.push_str("##"),
                _ => result.push('#'),
            },
            other => result.push_str(&other.text()),
        }
    }

    result
}

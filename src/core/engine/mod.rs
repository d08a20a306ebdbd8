//! Reference expansion host
//!
//! A small stand-in for the math renderer that normally drives the macro
//! table. It lexes math markup, expands every macro the table knows, pushes
//! each expansion back onto the input so nested macros expand too, and
//! writes the result back out as markup.

pub mod lexer;
pub mod token;
pub mod utils;

use std::collections::VecDeque;

use tracing::debug;

use self::lexer::{detokenize, tokenize};
use self::token::{TexToken, TokenList};
use super::macros::{substitute_args, InvocationContext, MacroArgument, MacroRule, MacroTable};
use crate::utils::error::{ExpandError, ExpandResult};

/// Default expansion limit (same as KaTeX's `maxExpand`).
pub const DEFAULT_MAX_EXPANSIONS: usize = 1000;

/// Default maximum output token count.
const DEFAULT_MAX_TOKENS: usize = 100_000;

/// Limits for one expansion run.
#[derive(Debug, Clone)]
struct ExpansionConfig {
    /// Maximum number of macro expansions, to stop runaway recursion.
    max_expansions: usize,
    /// Maximum number of output tokens.
    max_tokens: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Pending input of an expansion run. Also the invocation context handed
/// to computed macros.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: VecDeque<TexToken>,
    /// Macro currently reading arguments, for error messages
    current_macro: String,
}

impl TokenStream {
    pub fn new(tokens: TokenList) -> Self {
        Self {
            tokens: VecDeque::from(tokens.into_inner()),
            current_macro: String::new(),
        }
    }

    /// Lex `input` into a stream
    pub fn from_markup(input: &str) -> Self {
        Self::new(tokenize(input))
    }

    /// Put tokens back at the front, in order
    pub fn push_front(&mut self, tokens: TokenList) {
        for token in tokens.into_inner().into_iter().rev() {
            self.tokens.push_front(token);
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn set_current_macro(&mut self, name: &str) {
        self.current_macro.clear();
        self.current_macro.push_str(name);
    }
}

impl Iterator for TokenStream {
    type Item = TexToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.pop_front()
    }
}

impl InvocationContext for TokenStream {
    fn peek_token(&self) -> Option<&TexToken> {
        self.tokens.front()
    }

    fn consume_args(&mut self, count: usize) -> ExpandResult<Vec<MacroArgument>> {
        let mut args = Vec::with_capacity(count);
        for found in 0..count {
            match utils::read_argument(&mut self.tokens)? {
                Some(tokens) => args.push(MacroArgument::new(tokens)),
                None => {
                    return Err(ExpandError::MissingArgument {
                        macro_name: self.current_macro.clone(),
                        expected: count,
                        found,
                    })
                }
            }
        }
        Ok(args)
    }
}

/// The macro expansion engine.
pub struct Engine<'t> {
    table: &'t MacroTable,
    config: ExpansionConfig,
}

impl<'t> Engine<'t> {
    pub fn new(table: &'t MacroTable) -> Self {
        Engine {
            table,
            config: ExpansionConfig::default(),
        }
    }

    /// Set the expansion limit (builder pattern).
    pub fn with_max_expansions(mut self, count: usize) -> Self {
        self.config.max_expansions = count;
        self
    }

    /// Set the output token limit (builder pattern).
    pub fn with_max_tokens(mut self, count: usize) -> Self {
        self.config.max_tokens = count;
        self
    }

    /// Expand all macros in a math-mode source string.
    pub fn expand(&self, input: &str) -> ExpandResult<String> {
        let tokens = self.expand_tokens(tokenize(input))?;
        Ok(detokenize(&tokens))
    }

    /// Expand all macros in a token list.
    pub fn expand_tokens(&self, tokens: TokenList) -> ExpandResult<TokenList> {
        let mut stream = TokenStream::new(tokens);
        let mut output = Vec::new();
        let mut expansions = 0usize;

        while let Some(token) = stream.next() {
            if output.len() >= self.config.max_tokens {
                return Err(ExpandError::TokenLimitExceeded {
                    limit: self.config.max_tokens,
                });
            }

            // \char`x reads its operand raw, so a following `,` must not expand
            if token.is_cs("char") && matches!(stream.peek_token(), Some(TexToken::Char('`'))) {
                output.push(token);
                output.extend(stream.next());
                output.extend(stream.next());
                continue;
            }

            let name = token.text();
            let Some(rule) = self.table.get(&name) else {
                output.push(token);
                continue;
            };

            expansions += 1;
            if expansions > self.config.max_expansions {
                return Err(ExpandError::TooManyExpansions {
                    limit: self.config.max_expansions,
                });
            }

            stream.set_current_macro(&name);
            let replacement = match rule {
                MacroRule::Computed(expand) => tokenize(&expand(&mut stream)?),
                MacroRule::Template(body) => {
                    let args = stream.consume_args(rule.arity().unwrap_or(0))?;
                    substitute_args(&tokenize(body), &args)
                }
            };
            debug!(
                macro_name = %name,
                arity = ?rule.arity(),
                tokens = replacement.len(),
                "expanded macro"
            );

            // TeX semantics: the expansion is read again before the rest of the input
            stream.push_front(replacement);
        }

        Ok(TokenList::from_vec(output))
    }
}

/// Expand math markup with the built-in macro table.
pub fn expand_math(input: &str) -> ExpandResult<String> {
    let table = MacroTable::builtin();
    Engine::new(&table).expand(input)
}

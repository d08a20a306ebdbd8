//! Utility functions for token stream parsing

use std::collections::VecDeque;

use super::token::{TexToken, TokenList};
use crate::utils::error::{ExpandError, ExpandResult};

/// Maximum number of tokens to read in a single argument.
/// This prevents runaway parsing when input contains unclosed braces.
pub const MAX_ARG_TOKENS: usize = 10000;

/// Skip space tokens at the front of the stream
pub fn skip_spaces(tokens: &mut VecDeque<TexToken>) {
    while tokens.front().is_some_and(TexToken::is_space) {
        tokens.pop_front();
    }
}

/// Read tokens inside a balanced group { ... }, after the opening brace.
///
/// The closing brace is consumed but not returned.
pub fn read_balanced_group<I>(iter: &mut I) -> ExpandResult<TokenList>
where
    I: Iterator<Item = TexToken>,
{
    let mut result = Vec::new();
    let mut depth = 1;

    for token in iter {
        if result.len() >= MAX_ARG_TOKENS {
            return Err(ExpandError::ArgumentTooLong {
                limit: MAX_ARG_TOKENS,
            });
        }
        match &token {
            TexToken::BeginGroup => {
                depth += 1;
                result.push(token);
            }
            TexToken::EndGroup => {
                depth -= 1;
                if depth == 0 {
                    return Ok(TokenList::from_vec(result));
                }
                result.push(token);
            }
            _ => {
                result.push(token);
            }
        }
    }

    Err(ExpandError::UnbalancedGroup)
}

/// Read a single macro argument (braced group or single token).
///
/// Returns `None` when there is nothing to read: end of input, or a `}`
/// closing the enclosing group. Neither is consumed.
pub fn read_argument(tokens: &mut VecDeque<TexToken>) -> ExpandResult<Option<TokenList>> {
    skip_spaces(tokens);

    match tokens.front() {
        Some(TexToken::BeginGroup) => {
            tokens.pop_front();
            read_balanced_group(&mut std::iter::from_fn(|| tokens.pop_front())).map(Some)
        }
        Some(TexToken::EndGroup) | None => Ok(None),
        Some(_) => Ok(tokens
            .pop_front()
            .map(|token| TokenList::from_vec(vec![token]))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::lexer::tokenize;

    fn stream(input: &str) -> VecDeque<TexToken> {
        VecDeque::from(tokenize(input).into_inner())
    }

    #[test]
    fn test_read_braced_argument() {
        let mut tokens = stream(" {1{2}3} rest");
        let arg = read_argument(&mut tokens).unwrap().unwrap();
        assert_eq!(arg.to_string(), "1{2}3");
        assert_eq!(tokens.front(), Some(&TexToken::Space));
    }

    #[test]
    fn test_read_single_token_argument() {
        let mut tokens = stream("\\volt x");
        let arg = read_argument(&mut tokens).unwrap().unwrap();
        assert_eq!(arg.to_string(), "\\volt");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_missing_argument_is_not_consumed() {
        let mut tokens = stream("  ");
        assert_eq!(read_argument(&mut tokens), Ok(None));
        let mut tokens = stream("}x");
        assert_eq!(read_argument(&mut tokens), Ok(None));
        assert_eq!(tokens.front(), Some(&TexToken::EndGroup));
    }

    #[test]
    fn test_unbalanced_group() {
        let mut tokens = stream("{12");
        assert_eq!(read_argument(&mut tokens), Err(ExpandError::UnbalancedGroup));
    }

    #[test]
    fn test_argument_too_long() {
        let long = format!("{{{}}}", "1".repeat(MAX_ARG_TOKENS + 1));
        let mut tokens = stream(&long);
        assert_eq!(
            read_argument(&mut tokens),
            Err(ExpandError::ArgumentTooLong {
                limit: MAX_ARG_TOKENS
            })
        );
    }
}

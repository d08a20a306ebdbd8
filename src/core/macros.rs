//! Macro table for siunitx-style math markup.
//!
//! A table maps a macro name (`\num`, `\volt`, or the bare `,`) to a
//! [`MacroRule`]: either a template with `#1`-style placeholders, or a
//! function that reads its own arguments from an [`InvocationContext`].
//! The table only describes expansions. Finding invocations, collecting
//! arguments and re-scanning the output is the host's job (see
//! [`crate::core::engine`]).

use std::fmt;

use indexmap::IndexMap;
use phf::phf_map;

use super::engine::lexer::tokenize;
use super::engine::token::{TexToken, TokenList};
use super::number::format_number;
use crate::data::siunitx;
use crate::utils::error::{ExpandError, ExpandResult};

/// Unit markup starting with this attaches to the number without a space.
pub const DEGREE_PREFIX: &str = "\\degree";

const THIN_SPACE: &str = "\\,";
const EN_DASH: &str = "\\text{--}";

/// Comma followed by whitespace: braced so it typesets as an ordinary
/// symbol instead of punctuation.
pub const COMMA_BEFORE_SPACE: &str = "{\\char`,}";
/// Comma followed by anything else.
pub const COMMA: &str = "\\char`,";

/// What a host hands to a computed macro for one invocation.
pub trait InvocationContext {
    /// The next raw token after the macro name, without consuming it.
    /// Spaces are not skipped.
    fn peek_token(&self) -> Option<&TexToken>;

    /// Consume exactly `count` arguments. Each is a braced group or a
    /// single token, returned in source order.
    fn consume_args(&mut self, count: usize) -> ExpandResult<Vec<MacroArgument>>;
}

/// One macro argument, tokens in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MacroArgument {
    tokens: TokenList,
}

impl MacroArgument {
    pub fn new(tokens: TokenList) -> Self {
        Self { tokens }
    }

    /// For hosts that collect argument tokens last-to-first.
    pub fn from_reversed(mut tokens: Vec<TexToken>) -> Self {
        tokens.reverse();
        Self {
            tokens: TokenList::from_vec(tokens),
        }
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Source text: the token texts concatenated left to right.
    pub fn text(&self) -> String {
        self.tokens.to_string()
    }
}

/// Expansion function of a computed macro
pub type ExpandFn = fn(&mut dyn InvocationContext) -> ExpandResult<String>;

/// How a macro expands
#[derive(Clone, Copy)]
pub enum MacroRule<'a> {
    /// Replacement text; `#n` is replaced by the n-th argument
    Template(&'a str),
    /// Replacement computed from the invocation context
    Computed(ExpandFn),
}

impl MacroRule<'_> {
    /// Number of arguments a template consumes (its highest `#n`).
    /// Computed rules consume whatever they need, so there is no answer.
    pub fn arity(&self) -> Option<usize> {
        match self {
            MacroRule::Template(body) => Some(
                tokenize(body)
                    .into_iter()
                    .filter_map(|t| match t {
                        TexToken::Param(n) => Some(n as usize),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0),
            ),
            MacroRule::Computed(_) => None,
        }
    }
}

impl fmt::Debug for MacroRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroRule::Template(body) => f.debug_tuple("Template").field(body).finish(),
            MacroRule::Computed(_) => f.write_str("Computed"),
        }
    }
}

impl fmt::Display for MacroRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroRule::Template(body) => f.write_str(body),
            MacroRule::Computed(_) => f.write_str("<computed>"),
        }
    }
}

/// Macros whose output depends on their arguments or the next token
pub static COMPUTED_MACROS: phf::Map<&'static str, ExpandFn> = phf_map! {
    "," => expand_comma as ExpandFn,
    "\\num" => expand_num as ExpandFn,
    "\\qty" => expand_qty as ExpandFn,
    "\\qtyrange" => expand_qtyrange as ExpandFn,
};

/// Consume `N` arguments and return their source text.
fn argument_texts<const N: usize>(
    ctx: &mut dyn InvocationContext,
    macro_name: &str,
) -> ExpandResult<[String; N]> {
    let args = ctx.consume_args(N)?;
    let found = args.len();
    let texts: Vec<String> = args.iter().map(MacroArgument::text).collect();
    texts.try_into().map_err(|_| ExpandError::MissingArgument {
        macro_name: macro_name.to_string(),
        expected: N,
        found,
    })
}

fn upright(unit: &str) -> String {
    format!("\\mathrm{{{}}}", unit)
}

fn expand_comma(ctx: &mut dyn InvocationContext) -> ExpandResult<String> {
    let out = if ctx.peek_token().is_some_and(TexToken::is_space) {
        COMMA_BEFORE_SPACE
    } else {
        COMMA
    };
    Ok(out.to_string())
}

fn expand_num(ctx: &mut dyn InvocationContext) -> ExpandResult<String> {
    let [value] = argument_texts::<1>(ctx, "\\num")?;
    Ok(format_number(&value))
}

fn expand_qty(ctx: &mut dyn InvocationContext) -> ExpandResult<String> {
    let [value, unit] = argument_texts::<2>(ctx, "\\qty")?;
    let value = format_number(&value);
    if unit.starts_with(DEGREE_PREFIX) {
        Ok(format!("{}{}", value, upright(&unit)))
    } else {
        Ok(format!("{}{}{}", value, THIN_SPACE, upright(&unit)))
    }
}

fn expand_qtyrange(ctx: &mut dyn InvocationContext) -> ExpandResult<String> {
    let [low, high, unit] = argument_texts::<3>(ctx, "\\qtyrange")?;
    let low = format_number(&low);
    let high = format_number(&high);
    if unit.starts_with(DEGREE_PREFIX) {
        Ok(format!(
            "{low}{THIN_SPACE}{EN_DASH}{high}{unit}",
            unit = upright(&unit)
        ))
    } else {
        Ok(format!(
            "{low}{THIN_SPACE}{EN_DASH}{THIN_SPACE}{high}{THIN_SPACE}{unit}",
            unit = upright(&unit)
        ))
    }
}

/// Replace `#n` in `body` with the tokens of the n-th argument.
/// Placeholders without a matching argument expand to nothing.
pub fn substitute_args(body: &TokenList, args: &[MacroArgument]) -> TokenList {
    let mut result = Vec::with_capacity(body.len());
    for token in body {
        match token {
            TexToken::Param(n) => {
                if let Some(arg) = (*n as usize).checked_sub(1).and_then(|i| args.get(i)) {
                    result.extend(arg.tokens().as_slice().iter().cloned());
                }
            }
            _ => result.push(token.clone()),
        }
    }
    TokenList::from_vec(result)
}

/// The complete macro table: built-in rules plus user templates.
///
/// Built-ins live in static tables; a `MacroTable` value only owns the
/// user overlay, which shadows built-ins of the same name.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    user: IndexMap<String, String>,
}

impl MacroTable {
    /// Table with only the built-in macros
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Table with user templates on top of the built-ins
    pub fn with_macros(user: IndexMap<String, String>) -> Self {
        Self { user }
    }

    /// Add a user template, returning the template it replaced, if any
    pub fn define(&mut self, name: impl Into<String>, template: impl Into<String>) -> Option<String> {
        self.user.insert(name.into(), template.into())
    }

    /// Look up the rule for a macro name (`\num`, `,`, ...)
    pub fn get(&self, name: &str) -> Option<MacroRule<'_>> {
        if let Some(template) = self.user.get(name) {
            return Some(MacroRule::Template(template.as_str()));
        }
        if let Some(expand) = COMPUTED_MACROS.get(name) {
            return Some(MacroRule::Computed(*expand));
        }
        siunitx::lookup_template(name).map(MacroRule::Template)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every macro name, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = COMPUTED_MACROS
            .keys()
            .copied()
            .chain(siunitx::templates().map(|(name, _)| name))
            .chain(self.user.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

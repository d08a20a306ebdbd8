//! Numeric literal normalization
//!
//! Turns the raw text of a `\num`-style argument into typeset math markup:
//! digit groups separated by thin spaces, the decimal separator kept as
//! written, an explicit sign and an optional `\cdot 10^{n}` suffix.
//!
//! The parse peels parts off the trimmed input in a fixed order (exponent,
//! sign, fraction) and whatever is left becomes the integer part. Nothing is
//! ever rejected; malformed input just ends up in the integer part.
//!
//! ```text
//! 1234567.1234  ->  1\,234\,567.123\,4
//! \pm 1.5e-3    ->  \pm1.5\cdot 10^{-3}
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

/// Markup inserted between digit groups (a thin space).
pub const GROUP_SEPARATOR: &str = "\\,";

/// Integer parts shorter than this are left ungrouped (`1234` stays as is).
const INTEGER_GROUPING_MIN_LEN: usize = 5;

/// Fractional parts shorter than this are left ungrouped.
const FRACTION_GROUPING_MIN_LEN: usize = 4;

lazy_static! {
    static ref EXPONENT_RE: Regex =
        Regex::new(r"[eE]([+-]?[0-9]+)$").expect("exponent pattern is valid");
    /// `\pm` written with one or two backslashes, plus trailing whitespace.
    static ref PLUS_MINUS_RE: Regex =
        Regex::new(r"^(?:\\\\pm|\\pm)\s*").expect("plus-minus pattern is valid");
    static ref DECIMAL_RE: Regex =
        Regex::new(r"([.,])([0-9]+)$").expect("decimal pattern is valid");
}

/// Leading sign of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
    /// `\pm`, however it was escaped in the source
    PlusMinus,
}

impl Sign {
    /// Markup emitted for this sign
    pub fn as_markup(&self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
            Sign::PlusMinus => "\\pm",
        }
    }
}

/// Decimal separator and the digits after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    /// `.` or `,`, exactly as written
    pub separator: char,
    /// ASCII digits only, never empty
    pub digits: String,
}

/// A numeric literal split into its semantic parts.
///
/// `Display` renders the typeset form, so `literal.to_string()` is the
/// normalized markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericLiteral {
    pub sign: Option<Sign>,
    /// Digits before the separator. On malformed input this holds whatever
    /// text was left after the other parts were removed.
    pub integer: String,
    pub fraction: Option<Fraction>,
    /// Power of ten from an `e`/`E` suffix, as written minus any `+` and
    /// leading zeros (`-007` is `-7`, `+00` is `0`). Zero is kept here but
    /// not rendered. Kept as text so any number of digits survives.
    pub exponent: Option<String>,
}

/// Split raw literal text into sign, integer part, fraction and exponent.
pub fn parse_literal(raw: &str) -> NumericLiteral {
    let mut rest = raw.trim();

    let mut exponent = None;
    if let Some(caps) = EXPONENT_RE.captures(rest) {
        exponent = Some(normalize_exponent(&caps[1]));
        if let Some(whole) = caps.get(0) {
            rest = &rest[..whole.start()];
        }
    }

    let mut sign = None;
    if let Some(m) = PLUS_MINUS_RE.find(rest) {
        sign = Some(Sign::PlusMinus);
        rest = &rest[m.end()..];
    } else if let Some(stripped) = rest.strip_prefix('+') {
        sign = Some(Sign::Plus);
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('-') {
        sign = Some(Sign::Minus);
        rest = stripped;
    }

    let mut integer = rest;
    let mut fraction = None;
    if let Some(caps) = DECIMAL_RE.captures(rest) {
        if let (Some(whole), Some(sep)) = (caps.get(0), caps[1].chars().next()) {
            integer = &rest[..whole.start()];
            fraction = Some(Fraction {
                separator: sep,
                digits: caps[2].to_string(),
            });
        }
    }

    NumericLiteral {
        sign,
        integer: integer.to_string(),
        fraction,
        exponent,
    }
}

/// Normalize a numeric literal into typeset markup.
///
/// Total: any input produces output. Only raw, ungrouped input is
/// supported; feeding already formatted output (containing `\,`) back in
/// is undefined and may or may not come out unchanged.
pub fn format_number(raw: &str) -> String {
    parse_literal(raw).to_string()
}

impl fmt::Display for NumericLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sign) = self.sign {
            f.write_str(sign.as_markup())?;
        }
        f.write_str(&group_integer(&self.integer))?;
        if let Some(fraction) = &self.fraction {
            write!(f, "{}{}", fraction.separator, group_fraction(&fraction.digits))?;
        }
        match self.exponent.as_deref() {
            Some("0") | None => Ok(()),
            Some(exp) => write!(f, "\\cdot 10^{{{}}}", exp),
        }
    }
}

/// Strip the `+` and leading zeros from a captured exponent.
fn normalize_exponent(text: &str) -> String {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0".to_string()
    } else if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Right-to-left triplet grouping.
///
/// A mark goes in front of position `i` when the digit run starting there
/// has a length that is a multiple of three and the previous character is a
/// word character. For plain digit strings that is ordinary grouping; for
/// anything else it still only splits runs of digits.
fn group_integer(part: &str) -> String {
    let chars: Vec<char> = part.chars().collect();
    if chars.len() < INTEGER_GROUPING_MIN_LEN {
        return part.to_string();
    }

    // run[i] = length of the digit run starting at i
    let mut run = vec![0usize; chars.len() + 1];
    for i in (0..chars.len()).rev() {
        run[i] = if chars[i].is_ascii_digit() {
            run[i + 1] + 1
        } else {
            0
        };
    }

    let mut out = String::with_capacity(part.len() + 2 * (chars.len() / 3));
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && run[i] > 0 && run[i] % 3 == 0 && is_word_char(chars[i - 1]) {
            out.push_str(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Left-to-right grouping: a mark after every full triplet that has more
/// digits after it. A short remainder stays attached to the last group
/// (`1234` -> `123\,4`).
fn group_fraction(digits: &str) -> String {
    if digits.len() < FRACTION_GROUPING_MIN_LEN {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + 2 * (digits.len() / 3));
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push_str(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

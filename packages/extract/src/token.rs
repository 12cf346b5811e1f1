//! Shape-based classification of single whitespace tokens.
//!
//! The three metric columns of a production report cannot be told apart by
//! position (store names have a variable word count), so each token is
//! classified by what it looks like instead.

/// Symbols that mark a currency-metric token and are stripped before
/// parsing.
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Thousands separator stripped from numeric text.
pub const THOUSANDS_SEPARATOR: char = ',';

/// The shape of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    /// Begins with a currency symbol (e.g. `$4.50`).
    Currency,
    /// Only digits once thousands separators are removed (e.g. `1,234`).
    Numeric,
    /// Anything else; part of a label such as a store name.
    Label,
}

/// Classifies a token by shape alone.
///
/// Whether a currency or numeric token actually fills a metric slot depends
/// on which slots are already taken; see [`crate::record::extract`].
#[must_use]
pub fn classify(token: &str) -> TokenShape {
    if token.starts_with(CURRENCY_SYMBOLS) {
        TokenShape::Currency
    } else if is_plain_numeric(token) {
        TokenShape::Numeric
    } else {
        TokenShape::Label
    }
}

/// Returns `true` if `token` is non-empty and only ASCII digits once
/// thousands separators are removed.
#[must_use]
pub fn is_plain_numeric(token: &str) -> bool {
    let mut digits = token.chars().filter(|&c| c != THOUSANDS_SEPARATOR).peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

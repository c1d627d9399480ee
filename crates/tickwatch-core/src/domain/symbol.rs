use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Canonical ticker symbol.
///
/// Two ways in: [`Symbol::parse`] is the strict path for configuration
/// values, where a bad symbol is a programmer error; free-text user input
/// goes through [`SymbolNormalizer::normalize`], which never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    ///
    /// Accepts an alphanumeric start so numeric listings like `2330.TW`
    /// parse alongside `AAPL`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Never-failing cleaner for free-text ticker input.
///
/// Users paste things like `"aapl 蘋果"` or `"2330.tw 台積電"`: the first
/// whitespace-delimited token is the ticker, anything after it is annotation
/// and gets discarded. Empty or whitespace-only input falls back to the
/// configured default symbol.
#[derive(Debug, Clone)]
pub struct SymbolNormalizer {
    default: Symbol,
}

impl SymbolNormalizer {
    pub fn new(default: Symbol) -> Self {
        Self { default }
    }

    pub fn default_symbol(&self) -> &Symbol {
        &self.default
    }

    /// First token, trimmed and upper-cased. Always returns a non-empty
    /// symbol.
    pub fn normalize(&self, raw: &str) -> Symbol {
        match raw.split_whitespace().next() {
            Some(token) => Symbol(token.to_uppercase()),
            None => self.default.clone(),
        }
    }
}

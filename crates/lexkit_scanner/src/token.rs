//! Tokens produced by the scanner.

use crate::config::StringRuleId;
use crate::error::ValueError;
use lexkit_core::key::TokenKey;
use lexkit_core::text::TextSpan;
use std::borrow::Cow;
use std::fmt;

/// A scanned token.
///
/// `value` and `indent` borrow from the scanned input; no escape decoding
/// is ever applied.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Sequence number, dense from 0 in production order.
    pub id: usize,
    /// The kind of token.
    pub key: TokenKey,
    /// The raw text covered by the token.
    pub value: &'a [u8],
    /// The raw whitespace between the previous token and this one.
    pub indent: &'a [u8],
    /// Byte offset of the first byte of `value`.
    pub offset: usize,
    /// 1-based line of the first byte of `value`.
    pub line: u32,
    /// The quote rule that produced this token, for strings and fragments.
    pub string: Option<StringRuleId>,
}

impl<'a> Token<'a> {
    /// Byte offset just past the end of `value`.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.value.len()
    }

    /// The byte span covered by `value`.
    pub fn span(&self) -> TextSpan {
        TextSpan::from_offsets(self.offset, self.end())
    }

    #[inline]
    pub fn is_keyword(&self) -> bool {
        self.key == TokenKey::Keyword
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        self.key == TokenKey::Integer
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        self.key == TokenKey::Float
    }

    /// Whether this token is an integer or float literal.
    #[inline]
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Whether this token is a complete quoted string.
    #[inline]
    pub fn is_string(&self) -> bool {
        self.key == TokenKey::String
    }

    #[inline]
    pub fn is_string_fragment(&self) -> bool {
        self.key == TokenKey::StringFragment
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.key.is_custom()
    }

    /// The value as text, replacing invalid UTF-8 with U+FFFD.
    pub fn value_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.value)
    }

    pub fn indent_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.indent)
    }

    /// Parse an integer token's value.
    pub fn value_int(&self) -> Result<i64, ValueError> {
        if !self.is_integer() {
            return Err(ValueError::NotNumeric { key: self.key });
        }
        let text = self.value_str();
        text.parse::<i64>().map_err(|source| ValueError::InvalidInteger {
            text: text.into_owned(),
            source,
        })
    }

    /// Parse an integer or float token's value as a float.
    pub fn value_float(&self) -> Result<f64, ValueError> {
        if !self.is_number() {
            return Err(ValueError::NotNumeric { key: self.key });
        }
        let text = self.value_str();
        text.parse::<f64>().map_err(|source| ValueError::InvalidFloat {
            text: text.into_owned(),
            source,
        })
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("value", &String::from_utf8_lossy(self.value))
            .field("indent", &String::from_utf8_lossy(self.indent))
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("string", &self.string)
            .finish()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}:{} {:?}",
            self.id,
            self.key,
            self.line,
            self.offset,
            String::from_utf8_lossy(self.value)
        )
    }
}

//! The token key space.
//!
//! Built-in classifications are a closed set of variants. Caller-defined
//! kinds (custom literals, quote rules, injection delimiters) live in a
//! separate [`CustomKey`] space, so the two can never collide.

use std::fmt;

/// A caller-defined token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomKey(pub u32);

impl fmt::Display for CustomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "custom({})", self.0)
    }
}

/// Classification of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// A single code point (or invalid byte) no other rule claimed.
    Unknown,
    Keyword,
    Integer,
    Float,
    /// A complete quoted region with no injections.
    String,
    /// A piece of a quoted region split by an injection.
    StringFragment,
    /// A caller-registered literal or injection delimiter.
    Custom(CustomKey),
}

impl TokenKey {
    /// The fixed number assigned to a reserved kind, or `None` for custom keys.
    pub const fn reserved_index(self) -> Option<u32> {
        match self {
            TokenKey::Unknown => Some(0),
            TokenKey::Keyword => Some(1),
            TokenKey::Integer => Some(2),
            TokenKey::Float => Some(3),
            TokenKey::String => Some(4),
            TokenKey::StringFragment => Some(5),
            TokenKey::Custom(_) => None,
        }
    }

    #[inline]
    pub const fn is_custom(self) -> bool {
        matches!(self, TokenKey::Custom(_))
    }

    #[inline]
    pub const fn custom(self) -> Option<CustomKey> {
        match self {
            TokenKey::Custom(key) => Some(key),
            _ => None,
        }
    }
}

impl From<CustomKey> for TokenKey {
    fn from(key: CustomKey) -> Self {
        TokenKey::Custom(key)
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKey::Unknown => write!(f, "unknown"),
            TokenKey::Keyword => write!(f, "keyword"),
            TokenKey::Integer => write!(f, "integer"),
            TokenKey::Float => write!(f, "float"),
            TokenKey::String => write!(f, "string"),
            TokenKey::StringFragment => write!(f, "string-fragment"),
            TokenKey::Custom(key) => write!(f, "{}", key),
        }
    }
}

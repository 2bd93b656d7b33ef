//! lexkit_scanner: A configurable lexical scanner.
//!
//! Callers register literal tokens, quoted-string rules and keyword shape
//! options on a [`TokenizerBuilder`], freeze it into a [`Tokenizer`], then
//! scan raw input into a [`Stream`] of tokens. Supported out of the box:
//! - Longest-match custom literals (operators, word tokens)
//! - Integer and float literals with optional exponent
//! - Unicode keywords
//! - Quoted strings with an escape byte and injected sub-expressions
//!
//! Every token records its byte offset, 1-based line and the exact
//! whitespace that preceded it.

mod char_codes;
mod config;
mod error;
mod matcher;
mod scanner;
mod stream;
mod string;
mod token;

pub use config::{Injection, ScanFlags, StringRule, StringRuleBuilder, StringRuleId, Tokenizer, TokenizerBuilder};
pub use error::{ConfigError, ValueError};
pub use lexkit_core::key::{CustomKey, TokenKey};
pub use stream::Stream;
pub use token::Token;

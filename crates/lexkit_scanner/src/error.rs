//! Error types for tokenizer configuration and token value conversion.

use lexkit_core::key::{CustomKey, TokenKey};
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// A rule set rejected by [`TokenizerBuilder::build`](crate::TokenizerBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("empty literal registered under {key}")]
    EmptyLiteral { key: CustomKey },

    #[error("string rule {key} has an empty {side} delimiter")]
    EmptyDelimiter { key: CustomKey, side: &'static str },

    #[error("injection key {key} has no registered literals")]
    UnregisteredInjectionKey { key: CustomKey },
}

/// A token value that could not be converted to a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{key} token is not a number")]
    NotNumeric { key: TokenKey },

    #[error("invalid integer literal '{text}'")]
    InvalidInteger {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid float literal '{text}'")]
    InvalidFloat {
        text: String,
        #[source]
        source: ParseFloatError,
    },
}

//! lexkit_rules: rule-set files for the lexkit scanner.
//!
//! A rule set is a JSON description of a tokenizer configuration: literal
//! token groups, quoted-string rules and keyword shape flags. It can be
//! loaded from disk and turned into a `TokenizerBuilder`.
//!
//! ```json
//! {
//!   "tokens": [
//!     { "key": 10, "name": "compare", "literals": [">=", "<=", "="] },
//!     { "key": 11, "literals": ["{{"] },
//!     { "key": 12, "literals": ["}}"] }
//!   ],
//!   "strings": [
//!     { "key": 14, "start": "\"", "end": "\"", "escape": "\\", "injections": [[11, 12]] }
//!   ],
//!   "allowKeywordUnderscore": true
//! }
//! ```

use lexkit_scanner::{ConfigError, CustomKey, Tokenizer, TokenizerBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A complete tokenizer description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub tokens: Vec<TokenGroup>,
    #[serde(default)]
    pub strings: Vec<StringDefinition>,
    #[serde(default)]
    pub allow_numbers_in_keyword: bool,
    #[serde(default)]
    pub allow_keyword_underscore: bool,
    #[serde(default)]
    pub stop_on_unknown_token: bool,
}

/// Literals registered under one custom key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGroup {
    pub key: u32,
    /// Display name for the key; tools fall back to `custom(N)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub literals: Vec<String>,
}

/// A quoted-string rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringDefinition {
    pub key: u32,
    pub start: String,
    pub end: String,
    /// Single ASCII character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<char>,
    /// `[start_key, end_key]` pairs.
    #[serde(default)]
    pub injections: Vec<(u32, u32)>,
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("cannot read rule set {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule set: {0}")]
    Json(#[from] serde_json::Error),
    #[error("escape for string key {key} must be a single ASCII character, got {escape:?}")]
    InvalidEscape { key: u32, escape: char },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RuleSet {
    /// Parse a rule set from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a rule-set file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            groups = rules.tokens.len(),
            strings = rules.strings.len(),
            "rule set loaded"
        );
        Ok(rules)
    }

    pub fn to_json_string(&self) -> Result<String, RulesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register everything in this rule set on a fresh builder.
    pub fn to_builder(&self) -> Result<TokenizerBuilder, RulesError> {
        let mut builder = Tokenizer::builder();
        for group in &self.tokens {
            builder.define_tokens(CustomKey(group.key), &group.literals);
        }
        for definition in &self.strings {
            let escape = definition
                .escape
                .map(|escape| {
                    u8::try_from(escape)
                        .ok()
                        .filter(u8::is_ascii)
                        .ok_or(RulesError::InvalidEscape {
                            key: definition.key,
                            escape,
                        })
                })
                .transpose()?;

            let mut rule = builder.define_string_token(
                CustomKey(definition.key),
                &definition.start,
                &definition.end,
            );
            if let Some(escape) = escape {
                rule = rule.set_escape_symbol(escape);
            }
            for &(start, end) in &definition.injections {
                rule = rule.add_injection(CustomKey(start), CustomKey(end));
            }
        }
        if self.allow_numbers_in_keyword {
            builder.allow_numbers_in_keyword();
        }
        if self.allow_keyword_underscore {
            builder.allow_keyword_underscore();
        }
        if self.stop_on_unknown_token {
            builder.stop_on_unknown_token();
        }
        Ok(builder)
    }

    /// Build a frozen tokenizer from this rule set.
    pub fn build(&self) -> Result<Tokenizer, RulesError> {
        Ok(self.to_builder()?.build()?)
    }

    /// Display name registered for a custom key.
    pub fn key_name(&self, key: CustomKey) -> Option<&str> {
        self.tokens
            .iter()
            .find(|group| group.key == key.0 && group.name.is_some())
            .and_then(|group| group.name.as_deref())
    }
}

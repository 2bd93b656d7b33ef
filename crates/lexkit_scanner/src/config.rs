//! Tokenizer configuration.
//!
//! Rules are registered on a [`TokenizerBuilder`], which is owned
//! exclusively while it is being filled in. [`TokenizerBuilder::build`]
//! validates the rules and freezes them into a [`Tokenizer`] that can be
//! shared freely and used for any number of parse calls.

use crate::error::ConfigError;
use crate::matcher::{LiteralMatcher, LiteralTarget};
use crate::scanner::Scanner;
use crate::stream::Stream;
use crate::string::StringScan;
use indexmap::IndexMap;
use lexkit_core::key::CustomKey;

bitflags::bitflags! {
    /// Options that change how the scanner classifies input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScanFlags: u8 {
        /// Digits may continue (but not start) a keyword.
        const NUMBERS_IN_KEYWORD  = 1 << 0;
        /// Underscores may start and continue a keyword.
        const KEYWORD_UNDERSCORE  = 1 << 1;
        /// Stop scanning at the first byte that would become an Unknown token.
        const STOP_ON_UNKNOWN     = 1 << 2;
    }
}

/// Identity of a quote rule: its index in the configuration's rule table.
///
/// Two rules with identical delimiters still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringRuleId(u32);

impl StringRuleId {
    #[inline]
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A pair of custom keys whose literals open and close an injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Injection {
    pub start: CustomKey,
    pub end: CustomKey,
}

/// A quoted-string rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRule {
    id: StringRuleId,
    key: CustomKey,
    start: Vec<u8>,
    end: Vec<u8>,
    escape: Option<u8>,
    injections: Vec<Injection>,
    /// Registration order of the start delimiter in the literal pool.
    order: u32,
}

impl StringRule {
    pub fn id(&self) -> StringRuleId {
        self.id
    }

    /// The key the rule was registered under.
    pub fn key(&self) -> CustomKey {
        self.key
    }

    pub fn start(&self) -> &[u8] {
        &self.start
    }

    pub fn end(&self) -> &[u8] {
        &self.end
    }

    pub fn escape(&self) -> Option<u8> {
        self.escape
    }

    pub fn injections(&self) -> &[Injection] {
        &self.injections
    }
}

/// Chained configuration of a freshly registered quote rule.
pub struct StringRuleBuilder<'b> {
    rule: &'b mut StringRule,
}

impl StringRuleBuilder<'_> {
    /// Set the escape byte. The escape byte and the byte after it are
    /// never taken as the end delimiter.
    pub fn set_escape_symbol(self, escape: u8) -> Self {
        self.rule.escape = Some(escape);
        self
    }

    /// Add an injection: inside the string, a literal registered under
    /// `start` suspends string scanning until a literal registered under
    /// `end` is scanned at top level.
    pub fn add_injection(self, start: CustomKey, end: CustomKey) -> Self {
        self.rule.injections.push(Injection { start, end });
        self
    }

    /// The identity tokens produced by this rule will carry.
    pub fn id(&self) -> StringRuleId {
        self.rule.id
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RegisteredLiteral {
    pub text: Vec<u8>,
    pub order: u32,
}

/// The registered rules, shared by the builder and the frozen tokenizer.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleTable {
    pub tokens: IndexMap<CustomKey, Vec<RegisteredLiteral>>,
    pub strings: Vec<StringRule>,
    next_order: u32,
}

impl RuleTable {
    fn next_order(&mut self) -> u32 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// The literals registered under `key`, in registration order.
    pub fn literals(&self, key: CustomKey) -> impl Iterator<Item = &RegisteredLiteral> {
        self.tokens.get(&key).into_iter().flatten()
    }

    fn literal_count(&self) -> usize {
        self.tokens.values().map(Vec::len).sum()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (&key, literals) in &self.tokens {
            if literals.iter().any(|literal| literal.text.is_empty()) {
                return Err(ConfigError::EmptyLiteral { key });
            }
        }
        for rule in &self.strings {
            if rule.start.is_empty() {
                return Err(ConfigError::EmptyDelimiter { key: rule.key, side: "start" });
            }
            if rule.end.is_empty() {
                return Err(ConfigError::EmptyDelimiter { key: rule.key, side: "end" });
            }
            for injection in &rule.injections {
                for key in [injection.start, injection.end] {
                    if self.literals(key).next().is_none() {
                        return Err(ConfigError::UnregisteredInjectionKey { key });
                    }
                }
            }
        }
        Ok(())
    }

    /// The pool searched at top level: custom literals and quote starts.
    fn top_level_matcher(&self) -> LiteralMatcher {
        let tokens = self.tokens.iter().flat_map(|(&key, literals)| {
            literals
                .iter()
                .map(move |literal| (literal.text.as_slice(), LiteralTarget::Token(key), literal.order))
        });
        let quotes = self
            .strings
            .iter()
            .map(|rule| (rule.start.as_slice(), LiteralTarget::Quote(rule.id), rule.order));
        LiteralMatcher::new(tokens.chain(quotes))
    }
}

/// Mutable rule set, filled in before any scanning happens.
#[derive(Debug, Clone, Default)]
pub struct TokenizerBuilder {
    rules: RuleTable,
    flags: ScanFlags,
}

impl TokenizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register literal strings under a caller key.
    ///
    /// Calling this again with the same key appends to its literals.
    pub fn define_tokens<I, L>(&mut self, key: CustomKey, literals: I) -> &mut Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        for literal in literals {
            let order = self.rules.next_order();
            self.rules
                .tokens
                .entry(key)
                .or_default()
                .push(RegisteredLiteral {
                    text: literal.as_ref().to_vec(),
                    order,
                });
        }
        self
    }

    /// Register a quoted-string rule. Tokens produced by it are keyed
    /// `String`/`StringFragment` and carry the returned rule's id.
    pub fn define_string_token(
        &mut self,
        key: CustomKey,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
    ) -> StringRuleBuilder<'_> {
        let order = self.rules.next_order();
        let id = StringRuleId::new(self.rules.strings.len() as u32);
        self.rules.strings.push(StringRule {
            id,
            key,
            start: start.as_ref().to_vec(),
            end: end.as_ref().to_vec(),
            escape: None,
            injections: Vec::new(),
            order,
        });
        let rule = &mut self.rules.strings[id.index()];
        StringRuleBuilder { rule }
    }

    /// Reopen a previously registered quote rule for further configuration.
    pub fn string_rule_mut(&mut self, id: StringRuleId) -> Option<StringRuleBuilder<'_>> {
        self.rules
            .strings
            .get_mut(id.index())
            .map(|rule| StringRuleBuilder { rule })
    }

    /// Let digits continue a keyword (`one1` becomes a single keyword).
    pub fn allow_numbers_in_keyword(&mut self) -> &mut Self {
        self.flags |= ScanFlags::NUMBERS_IN_KEYWORD;
        self
    }

    /// Let underscores start and continue a keyword (`one_two`).
    pub fn allow_keyword_underscore(&mut self) -> &mut Self {
        self.flags |= ScanFlags::KEYWORD_UNDERSCORE;
        self
    }

    /// Stop scanning at the first unknown token instead of emitting it.
    pub fn stop_on_unknown_token(&mut self) -> &mut Self {
        self.flags |= ScanFlags::STOP_ON_UNKNOWN;
        self
    }

    pub fn flags(&self) -> ScanFlags {
        self.flags
    }

    /// Validate the rules and freeze them for scanning.
    pub fn build(self) -> Result<Tokenizer, ConfigError> {
        self.rules.validate()?;
        let matcher = self.rules.top_level_matcher();
        let string_scans = self
            .rules
            .strings
            .iter()
            .map(|rule| StringScan::new(rule, &self.rules))
            .collect();
        tracing::debug!(
            literals = self.rules.literal_count(),
            strings = self.rules.strings.len(),
            flags = ?self.flags,
            "tokenizer built"
        );
        Ok(Tokenizer {
            rules: self.rules,
            flags: self.flags,
            matcher,
            string_scans,
        })
    }
}

/// A frozen, read-only rule set. Parse calls take `&self`, so one
/// tokenizer can serve many threads.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    rules: RuleTable,
    flags: ScanFlags,
    matcher: LiteralMatcher,
    string_scans: Vec<StringScan>,
}

impl Tokenizer {
    /// Start a builder; shorthand for [`TokenizerBuilder::new`].
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    /// Thaw the rule set back into a builder to change it.
    pub fn into_builder(self) -> TokenizerBuilder {
        TokenizerBuilder {
            rules: self.rules,
            flags: self.flags,
        }
    }

    pub fn flags(&self) -> ScanFlags {
        self.flags
    }

    /// Look up a quote rule by the id carried on string tokens.
    pub fn string_rule(&self, id: StringRuleId) -> Option<&StringRule> {
        self.rules.strings.get(id.index())
    }

    pub fn string_rules(&self) -> &[StringRule] {
        &self.rules.strings
    }

    /// The literals registered under `key`, in registration order.
    pub fn literals(&self, key: CustomKey) -> impl Iterator<Item = &[u8]> {
        self.rules.literals(key).map(|literal| literal.text.as_slice())
    }

    /// Scan raw bytes into a token stream.
    #[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
    pub fn parse_bytes<'a>(&self, input: &'a [u8]) -> Stream<'a> {
        Scanner::new(self, input).run()
    }

    /// Scan text into a token stream; equivalent to scanning its UTF-8 bytes.
    pub fn parse_str<'a>(&self, input: &'a str) -> Stream<'a> {
        self.parse_bytes(input.as_bytes())
    }

    pub(crate) fn matcher(&self) -> &LiteralMatcher {
        &self.matcher
    }

    pub(crate) fn rule_and_scan(&self, id: StringRuleId) -> (&StringRule, &StringScan) {
        (&self.rules.strings[id.index()], &self.string_scans[id.index()])
    }
}

//! Longest-match lookup over a pool of registered literals.
//!
//! Candidates are bucketed by their first byte. Each bucket is kept sorted
//! longest first, then by registration order, so the first candidate that
//! is a prefix of the remaining input is the one to take.

use crate::config::StringRuleId;
use lexkit_core::key::CustomKey;
use rustc_hash::FxHashMap;

/// What a matched literal stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralTarget {
    /// A custom literal registered under a caller key.
    Token(CustomKey),
    /// The start delimiter of a quote rule.
    Quote(StringRuleId),
}

/// A successful match: the target and the number of bytes matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatch {
    pub target: LiteralTarget,
    pub len: usize,
}

#[derive(Debug, Clone)]
struct Candidate {
    text: Box<[u8]>,
    target: LiteralTarget,
    order: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LiteralMatcher {
    buckets: FxHashMap<u8, Vec<Candidate>>,
}

impl LiteralMatcher {
    /// Build a matcher from `(text, target, registration order)` triples.
    /// Empty texts are ignored.
    pub fn new<'t>(literals: impl IntoIterator<Item = (&'t [u8], LiteralTarget, u32)>) -> Self {
        let mut buckets: FxHashMap<u8, Vec<Candidate>> = FxHashMap::default();
        for (text, target, order) in literals {
            let Some(&first) = text.first() else {
                continue;
            };
            buckets.entry(first).or_default().push(Candidate {
                text: text.into(),
                target,
                order,
            });
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| {
                b.text
                    .len()
                    .cmp(&a.text.len())
                    .then(a.order.cmp(&b.order))
            });
        }
        Self { buckets }
    }

    /// Find the longest literal that prefixes `rest`, earliest registered on ties.
    pub fn longest_match(&self, rest: &[u8]) -> Option<LiteralMatch> {
        let first = rest.first()?;
        self.buckets
            .get(first)?
            .iter()
            .find(|candidate| rest.starts_with(&candidate.text))
            .map(|candidate| LiteralMatch {
                target: candidate.target,
                len: candidate.text.len(),
            })
    }

    /// First bytes of every registered literal.
    pub fn first_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.buckets.keys().copied()
    }
}

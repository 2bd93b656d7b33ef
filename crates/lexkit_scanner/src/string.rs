//! Quoted-string scanning.
//!
//! String content is skipped with `memchr` up to the next byte that could
//! matter: the escape byte, the first byte of the end delimiter, or the
//! first byte of an injection start literal. Only at those positions are
//! the delimiters compared.

use crate::config::{RuleTable, StringRule};
use crate::matcher::{LiteralMatcher, LiteralTarget};
use lexkit_core::key::CustomKey;

/// Per-rule lookup data, derived once when the tokenizer is built.
#[derive(Debug, Clone)]
pub(crate) struct StringScan {
    /// Injection start literals; each target is the injection's start key.
    injection_starts: LiteralMatcher,
    /// Bytes at which string content scanning has to look closer.
    stop_bytes: Vec<u8>,
}

/// Where scanning of string content stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringStop {
    /// The end delimiter was consumed; `end` is the position just past it.
    Terminated { end: usize },
    /// An injection start literal begins at `at`.
    Injection {
        at: usize,
        len: usize,
        start: CustomKey,
        end: CustomKey,
    },
    /// Input ran out before the end delimiter.
    Eof,
}

impl StringScan {
    pub fn new(rule: &StringRule, rules: &RuleTable) -> Self {
        let starts = rule.injections().iter().flat_map(|injection| {
            rules.literals(injection.start).map(move |literal| {
                (literal.text.as_slice(), LiteralTarget::Token(injection.start), literal.order)
            })
        });
        let injection_starts = LiteralMatcher::new(starts);

        let mut stop_bytes: Vec<u8> = rule.end().first().copied().into_iter().collect();
        stop_bytes.extend(rule.escape());
        stop_bytes.extend(injection_starts.first_bytes());
        stop_bytes.sort_unstable();
        stop_bytes.dedup();

        Self {
            injection_starts,
            stop_bytes,
        }
    }

    /// Offset in `haystack` of the first byte that may end plain content.
    fn find_stop_byte(&self, haystack: &[u8]) -> Option<usize> {
        match self.stop_bytes.as_slice() {
            [] => None,
            &[a] => memchr::memchr(a, haystack),
            &[a, b] => memchr::memchr2(a, b, haystack),
            &[a, b, c] => memchr::memchr3(a, b, c, haystack),
            many => haystack.iter().position(|b| many.contains(b)),
        }
    }

    /// Scan string content of `rule` in `input` starting at `pos`.
    ///
    /// The escape byte is checked first, then the end delimiter, then the
    /// injection starts.
    pub fn scan_content(&self, rule: &StringRule, input: &[u8], mut pos: usize) -> StringStop {
        loop {
            let Some(skip) = self.find_stop_byte(&input[pos..]) else {
                return StringStop::Eof;
            };
            pos += skip;
            let rest = &input[pos..];

            if rule.escape() == Some(rest[0]) {
                pos = (pos + 2).min(input.len());
                continue;
            }
            if rest.starts_with(rule.end()) {
                return StringStop::Terminated {
                    end: pos + rule.end().len(),
                };
            }
            if let Some(found) = self.injection_starts.longest_match(rest) {
                if let LiteralTarget::Token(start) = found.target {
                    if let Some(injection) = rule.injections().iter().find(|i| i.start == start) {
                        return StringStop::Injection {
                            at: pos,
                            len: found.len,
                            start,
                            end: injection.end,
                        };
                    }
                }
            }
            pos += 1;
        }
    }
}

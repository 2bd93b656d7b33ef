//! Cursor-based view over the tokens of one parse call.

use crate::token::Token;
use lexkit_core::key::TokenKey;
use lexkit_diagnostics::DiagnosticCollection;
use std::fmt;

/// The tokens produced by one parse call and a cursor into them.
///
/// The token sequence never changes after scanning; only the cursor moves.
/// A cursor before the first token or past the last one is invalid.
#[derive(Debug, Clone)]
pub struct Stream<'a> {
    tokens: Vec<Token<'a>>,
    /// Index of the current token; -1 before the start, `len` past the end.
    cursor: isize,
    diagnostics: DiagnosticCollection,
}

impl<'a> Stream<'a> {
    pub(crate) fn new(tokens: Vec<Token<'a>>, diagnostics: DiagnosticCollection) -> Self {
        Self {
            tokens,
            cursor: 0,
            diagnostics,
        }
    }

    /// Whether the cursor addresses an existing token.
    pub fn is_valid(&self) -> bool {
        self.index().is_some()
    }

    fn index(&self) -> Option<usize> {
        usize::try_from(self.cursor)
            .ok()
            .filter(|&index| index < self.tokens.len())
    }

    fn token_at(&self, cursor: isize) -> Option<&Token<'a>> {
        usize::try_from(cursor).ok().and_then(|index| self.tokens.get(index))
    }

    /// The token at the cursor.
    pub fn current_token(&self) -> Option<&Token<'a>> {
        self.token_at(self.cursor)
    }

    /// The token after the cursor, without moving.
    pub fn next_token(&self) -> Option<&Token<'a>> {
        self.token_at(self.cursor + 1)
    }

    /// The token before the cursor, without moving.
    pub fn prev_token(&self) -> Option<&Token<'a>> {
        self.token_at(self.cursor - 1)
    }

    /// The first token of the stream.
    pub fn head_token(&self) -> Option<&Token<'a>> {
        self.tokens.first()
    }

    /// Move to the next token. Past the last token the stream becomes invalid.
    pub fn go_next(&mut self) -> &mut Self {
        if self.cursor < self.tokens.len() as isize {
            self.cursor += 1;
        }
        self
    }

    /// Move to the previous token. Before the first token the stream becomes
    /// invalid; from past the end it returns to the last token.
    pub fn go_prev(&mut self) -> &mut Self {
        if self.cursor >= 0 {
            self.cursor -= 1;
        }
        self
    }

    /// Move the cursor to the token with the given id. An id past the end
    /// leaves the stream invalid.
    pub fn go_to(&mut self, id: usize) -> &mut Self {
        self.cursor = isize::try_from(id)
            .unwrap_or(isize::MAX)
            .min(self.tokens.len() as isize);
        self
    }

    /// Move the cursor back to the first token.
    pub fn reset(&mut self) -> &mut Self {
        self.cursor = 0;
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens, in production order.
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// Diagnostics recorded while scanning.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Tokens from `before` tokens ahead of the cursor up to `after` tokens
    /// past it, inclusive, clipped to the sequence. The cursor does not move.
    pub fn snippet(&self, before: usize, after: usize) -> &[Token<'a>] {
        let len = self.tokens.len() as i128;
        let cursor = self.cursor as i128;
        let start = (cursor - before as i128).clamp(0, len);
        let end = (cursor + after as i128 + 1).clamp(0, len);
        if start >= end {
            return &[];
        }
        &self.tokens[start as usize..end as usize]
    }

    /// Render a snippet as text: each token's indent followed by its value,
    /// with values longer than `max_len` bytes cut short and marked `...`.
    pub fn snippet_as_string(&self, before: usize, after: usize, max_len: usize) -> String {
        let mut out = String::new();
        for token in self.snippet(before, after) {
            out.push_str(&String::from_utf8_lossy(token.indent));
            if token.value.len() > max_len {
                out.push_str(&String::from_utf8_lossy(&token.value[..max_len]));
                out.push_str("...");
            } else {
                out.push_str(&token.value_str());
            }
        }
        out
    }

    /// Whether the tokens following the cursor have exactly these keys,
    /// in order. The current token is not part of the comparison.
    pub fn is_next_sequence(&self, keys: &[TokenKey]) -> bool {
        let Ok(first) = usize::try_from(self.cursor + 1) else {
            return false;
        };
        match self.tokens.get(first..first + keys.len()) {
            Some(next) => next.iter().zip(keys).all(|(token, key)| token.key == *key),
            None => false,
        }
    }

    /// Whether any of the given key sequences follows the cursor.
    pub fn is_any_next_sequence(&self, sequences: &[&[TokenKey]]) -> bool {
        sequences.iter().any(|keys| self.is_next_sequence(keys))
    }
}

impl fmt::Display for Stream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            let marker = if Some(token.id) == self.index() { "> " } else { "  " };
            writeln!(f, "{}{}", marker, token)?;
        }
        Ok(())
    }
}

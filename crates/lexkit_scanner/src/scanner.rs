//! The scan engine.
//!
//! Scanning is driven by an explicit stack of modes. The bottom of the stack
//! is always top-level scanning. Entering a quoted string pushes a
//! [`ScanMode::Quoted`]; an injection inside that string pushes another
//! top-level mode that pops itself once the injection's end literal has been
//! emitted, handing control back to the string with a fresh segment.

use crate::char_codes::*;
use crate::config::{ScanFlags, StringRuleId, Tokenizer};
use crate::matcher::LiteralTarget;
use crate::stream::Stream;
use crate::string::StringStop;
use crate::token::Token;
use lexkit_core::key::{CustomKey, TokenKey};
use lexkit_core::text::TextSpan;
use lexkit_diagnostics::{messages, Diagnostic, DiagnosticCollection};

/// State of a quoted region being scanned.
#[derive(Debug, Clone, Copy)]
struct QuotedState {
    rule: StringRuleId,
    /// Offset of the opening delimiter.
    opened_at: usize,
    /// Start of the text not yet emitted as a string token.
    segment_start: usize,
    /// Whether an injection has already split this region.
    fragmented: bool,
}

#[derive(Debug, Clone, Copy)]
enum ScanMode {
    /// Ordinary tokens. Inside an injection, `until` is the key whose
    /// literal closes it.
    TopLevel { until: Option<CustomKey> },
    Quoted(QuotedState),
}

/// What the engine should do after one step.
enum Step {
    Continue,
    Stop,
}

pub(crate) struct Scanner<'t, 'a> {
    tokenizer: &'t Tokenizer,
    flags: ScanFlags,
    input: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Line at `pos`, as far as newlines have been accounted for.
    line: u32,
    /// End of the last emitted token; the indent of the next token starts here.
    last_end: usize,
    tokens: Vec<Token<'a>>,
    modes: Vec<ScanMode>,
    diagnostics: DiagnosticCollection,
}

impl<'t, 'a> Scanner<'t, 'a> {
    pub fn new(tokenizer: &'t Tokenizer, input: &'a [u8]) -> Self {
        Self {
            tokenizer,
            flags: tokenizer.flags(),
            input,
            pos: 0,
            line: 1,
            last_end: 0,
            tokens: Vec::new(),
            modes: vec![ScanMode::TopLevel { until: None }],
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Scan the whole input into a stream.
    pub fn run(mut self) -> Stream<'a> {
        while let Some(&mode) = self.modes.last() {
            let step = match mode {
                ScanMode::TopLevel { until } => self.scan_top_level(until),
                ScanMode::Quoted(state) => self.scan_quoted(state),
            };
            if let Step::Stop = step {
                break;
            }
        }
        Stream::new(self.tokens, self.diagnostics)
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.get(pos).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skip whitespace, counting line feeds. The skipped bytes become the
    /// indent of the next token.
    fn skip_white_space(&mut self) {
        while let Some(b) = self.byte_at(self.pos) {
            if !is_white_space(b) {
                break;
            }
            if b == LINE_FEED {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// Append a token covering `start..end` and move past it.
    fn emit(&mut self, key: TokenKey, start: usize, end: usize, string: Option<StringRuleId>) {
        let input = self.input;
        let value = &input[start..end];
        self.tokens.push(Token {
            id: self.tokens.len(),
            key,
            value,
            indent: &input[self.last_end..start],
            offset: start,
            line: self.line,
            string,
        });
        self.line += count_line_feeds(value);
        self.last_end = end;
        self.pos = end;
    }

    /// One token at top level.
    fn scan_top_level(&mut self, until: Option<CustomKey>) -> Step {
        self.skip_white_space();

        if self.is_eof() {
            let Some(end) = until else {
                return Step::Stop;
            };
            self.report_unclosed_injection(end);
            self.leave_injection();
            return Step::Continue;
        }

        let start = self.pos;
        if let Some(found) = self.tokenizer.matcher().longest_match(&self.input[start..]) {
            match found.target {
                LiteralTarget::Quote(rule) => self.enter_string(rule, start, found.len),
                LiteralTarget::Token(key) => {
                    self.emit(TokenKey::Custom(key), start, start + found.len, None);
                    if until == Some(key) {
                        self.leave_injection();
                    }
                }
            }
            return Step::Continue;
        }

        let b = self.input[start];
        if is_digit(b) {
            self.scan_number();
        } else if let Some(end) = self.keyword_end(start) {
            self.emit(TokenKey::Keyword, start, end, None);
        } else {
            let end = start + unknown_width(&self.input[start..]);
            if self.flags.contains(ScanFlags::STOP_ON_UNKNOWN) {
                let text = String::from_utf8_lossy(&self.input[start..end]);
                self.diagnostics.add(Diagnostic::with_span(
                    TextSpan::from_offsets(start, end),
                    &messages::SCANNING_STOPPED_AT_UNKNOWN_TOKEN,
                    &[&*text],
                ));
                return Step::Stop;
            }
            self.emit(TokenKey::Unknown, start, end, None);
        }
        Step::Continue
    }

    /// Scan a numeric literal starting at a digit.
    fn scan_number(&mut self) {
        let start = self.pos;
        let mut end = self.skip_digits(start);
        let mut key = TokenKey::Integer;

        if self.byte_at(end) == Some(DOT) {
            end = self.skip_digits(end + 1);
            key = TokenKey::Float;
        }

        // Exponent
        if let Some(exponent_end) = self.exponent_end(end) {
            end = exponent_end;
            key = TokenKey::Float;
        }

        self.emit(key, start, end, None);
    }

    fn skip_digits(&self, mut pos: usize) -> usize {
        while self.byte_at(pos).is_some_and(is_digit) {
            pos += 1;
        }
        pos
    }

    /// End of an exponent (`e`, optional sign, digits) starting at `pos`,
    /// or `None` if no digits follow the marker.
    fn exponent_end(&self, pos: usize) -> Option<usize> {
        if !self.byte_at(pos).is_some_and(is_exponent_marker) {
            return None;
        }
        let mut digits = pos + 1;
        if let Some(PLUS | MINUS) = self.byte_at(digits) {
            digits += 1;
        }
        let end = self.skip_digits(digits);
        (end > digits).then_some(end)
    }

    /// End of a keyword starting at `start`, or `None` if no keyword starts there.
    fn keyword_end(&self, start: usize) -> Option<usize> {
        let underscore = self.flags.contains(ScanFlags::KEYWORD_UNDERSCORE);
        let numbers = self.flags.contains(ScanFlags::NUMBERS_IN_KEYWORD);

        let (first, width) = decode_char(&self.input[start..])?;
        if !(is_letter(first) || (underscore && first == UNDERSCORE)) {
            return None;
        }

        let mut end = start + width;
        while let Some((ch, width)) = decode_char(&self.input[end..]) {
            let is_part = is_letter(ch)
                || (numbers && ch.is_ascii_digit())
                || (underscore && ch == UNDERSCORE);
            if !is_part {
                break;
            }
            end += width;
        }
        Some(end)
    }

    // ========================================================================
    // Quoted strings and injections
    // ========================================================================

    fn enter_string(&mut self, rule: StringRuleId, start: usize, delimiter_len: usize) {
        tracing::trace!(rule = rule.index(), offset = start, "string entered");
        self.pos = start + delimiter_len;
        self.modes.push(ScanMode::Quoted(QuotedState {
            rule,
            opened_at: start,
            segment_start: start,
            fragmented: false,
        }));
    }

    /// Scan string content up to the end delimiter, an injection, or EOF.
    fn scan_quoted(&mut self, state: QuotedState) -> Step {
        let tokenizer = self.tokenizer;
        let (rule, scan) = tokenizer.rule_and_scan(state.rule);
        let key = if state.fragmented {
            TokenKey::StringFragment
        } else {
            TokenKey::String
        };

        match scan.scan_content(rule, self.input, self.pos) {
            StringStop::Terminated { end } => {
                self.emit_segment(key, state, end);
                self.modes.pop();
            }
            StringStop::Injection { at, len, start, end } => {
                self.emit_segment(TokenKey::StringFragment, state, at);
                self.emit(TokenKey::Custom(start), at, at + len, None);
                if let Some(ScanMode::Quoted(quoted)) = self.modes.last_mut() {
                    quoted.fragmented = true;
                }
                tracing::trace!(rule = state.rule.index(), offset = at, "injection entered");
                self.modes.push(ScanMode::TopLevel { until: Some(end) });
            }
            StringStop::Eof => {
                let input_end = self.input.len();
                self.emit_segment(key, state, input_end);
                self.pos = input_end;
                tracing::warn!(offset = state.opened_at, "unterminated string");
                let expected = String::from_utf8_lossy(rule.end());
                self.diagnostics.add(Diagnostic::with_span(
                    TextSpan::from_offsets(state.opened_at, state.opened_at + rule.start().len()),
                    &messages::UNTERMINATED_STRING_LITERAL,
                    &[&*expected],
                ));
                self.modes.pop();
            }
        }
        Step::Continue
    }

    /// Emit the pending string segment ending at `end`. A zero-length
    /// segment (between adjacent injections) is not emitted.
    fn emit_segment(&mut self, key: TokenKey, state: QuotedState, end: usize) {
        if end > state.segment_start {
            self.emit(key, state.segment_start, end, Some(state.rule));
        }
    }

    /// Pop an injection's top-level mode; the string beneath resumes with a
    /// fresh segment at the current position.
    fn leave_injection(&mut self) {
        self.modes.pop();
        let pos = self.pos;
        if let Some(ScanMode::Quoted(quoted)) = self.modes.last_mut() {
            quoted.segment_start = pos;
            tracing::trace!(rule = quoted.rule.index(), offset = pos, "injection left");
        }
    }

    fn report_unclosed_injection(&mut self, end: CustomKey) {
        let expected = self
            .tokenizer
            .literals(end)
            .next()
            .map(|literal| String::from_utf8_lossy(literal).into_owned())
            .unwrap_or_default();
        let at = self.input.len();
        self.diagnostics.add(Diagnostic::with_span(
            TextSpan::from_offsets(at, at),
            &messages::INJECTION_END_EXPECTED,
            &[&*expected],
        ));
    }
}

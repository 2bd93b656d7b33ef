//! lexkit_diagnostics: Diagnostic messages reported while scanning.
//!
//! Scanning never fails: every byte ends up in some token. Conditions a
//! caller may still want to surface (an unterminated string, a scan that
//! stopped early) are recorded as diagnostics on the resulting stream.

use lexkit_core::text::{LineMap, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the scanned input came from, if known.
    pub file: Option<String>,
    /// The byte span in the scanned input, if any.
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic attached to a span of the scanned input.
    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    /// Attach the name of the file the input was read from.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Render this diagnostic with a `line:column` location resolved through `lines`.
    pub fn render(&self, lines: &LineMap) -> String {
        let mut out = String::new();
        if let Some(ref file) = self.file {
            out.push_str(file);
            out.push(':');
        }
        if let Some(span) = self.span {
            out.push_str(&lines.line_and_column_of(span.start).to_string());
            out.push_str(": ");
        } else if self.file.is_some() {
            out.push(' ');
        }
        out.push_str(&format!(
            "{} LK{}: {}",
            self.category, self.code, self.message_text
        ));
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        } else if let Some(span) = self.span {
            write!(f, "({}): ", span.start)?;
        }
        write!(
            f,
            "{} LK{}: {}",
            self.category, self.code, self.message_text
        )
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during one parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner diagnostics (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal, '{0}' expected.");
    pub const INJECTION_END_EXPECTED: DiagnosticMessage = diag!(1003, Error, "'{0}' expected to close the injection.");
    pub const SCANNING_STOPPED_AT_UNKNOWN_TOKEN: DiagnosticMessage = diag!(1004, Warning, "Scanning stopped at unknown token '{0}'.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("Unterminated string literal, '{0}' expected.", &["\""]);
        assert_eq!(msg, "Unterminated string literal, '\"' expected.");
    }

    #[test]
    fn test_format_message_no_args() {
        let msg = format_message("Nothing to replace.", &[]);
        assert_eq!(msg, "Nothing to replace.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_span(
            TextSpan::from_bounds(10, 11),
            &messages::UNTERMINATED_STRING_LITERAL,
            &["'"],
        )
        .in_file("query.txt");
        let display = format!("{}", diag);
        assert_eq!(
            display,
            "query.txt(10): error LK1002: Unterminated string literal, ''' expected."
        );
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::SCANNING_STOPPED_AT_UNKNOWN_TOKEN, &["="]);
        assert!(diag.file.is_none());
        assert!(diag.span.is_none());
        assert_eq!(diag.code, 1004);
        assert!(!diag.is_error());
    }

    #[test]
    fn test_diagnostic_render_uses_line_map() {
        let lines = LineMap::new(b"a\nb \"c");
        let diag = Diagnostic::with_span(
            TextSpan::from_bounds(4, 5),
            &messages::UNTERMINATED_STRING_LITERAL,
            &["\""],
        );
        assert_eq!(
            diag.render(&lines),
            "2:3: error LK1002: Unterminated string literal, '\"' expected."
        );
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);

        collection.add(Diagnostic::new(&messages::SCANNING_STOPPED_AT_UNKNOWN_TOKEN, &["?"]));
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::INJECTION_END_EXPECTED, &["}}"]));
        assert!(collection.has_errors());
        assert_eq!(collection.len(), 2);
    }
}

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;

use crate::node::{Span, SyntaxError};

/// A syntax error ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte range the diagnostic points at.
    pub span: Span,
    /// Headline message.
    pub message: String,
}

impl Diagnostic {
    /// An error diagnostic.
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        Diagnostic::error(error.span.clone(), error.message.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

/// Render diagnostics with ariadne for terminal output.
///
/// Zero-width spans are widened to one character so the label stays visible.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let span = visible_span(source, &diag.span);
        Report::build(ReportKind::Error, (filename, span.clone()))
            .with_message(&diag.message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&diag.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Ariadne works in characters, not bytes.
fn visible_span(source: &str, span: &Span) -> Span {
    let start = source
        .get(..span.start)
        .map_or(0, |prefix| prefix.chars().count());
    let len = source
        .get(span.clone())
        .map_or(0, |text| text.chars().count());
    start..start + len.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(0..5, "expected comma");
        assert_eq!(d.to_string(), "error: expected comma");
    }

    #[test]
    fn from_syntax_error() {
        let error = SyntaxError {
            span: 3..4,
            message: "unexpected closing bracket".into(),
        };
        let d = Diagnostic::from(&error);
        assert_eq!(d, Diagnostic::error(3..4, "unexpected closing bracket"));
    }

    #[test]
    fn render_produces_output() {
        let source = "#f(a b)\n";
        let diags = vec![Diagnostic::error(5..5, "expected comma")];
        let output = render_diagnostics(source, "test.typ", &diags);
        assert!(output.contains("expected comma"));
        assert!(output.contains("test.typ"));
    }

    #[test]
    fn spans_count_characters() {
        assert_eq!(visible_span("字a", &(3..4)), 1..2);
        assert_eq!(visible_span("ab", &(2..2)), 2..3);
    }
}

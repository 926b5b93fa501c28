//! Error types for script parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("Unrecognised input '{text}' at {span:?}")]
    InvalidInput { span: Span, text: String },
}

impl ParseError {
    pub fn invalid_input(span: Span, text: impl Into<String>) -> Self {
        ParseError::InvalidInput {
            span,
            text: text.into(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } | ParseError::InvalidInput { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (span, message, label) = match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                (span, message.clone(), format!("{}{}", message, expected_str))
            }
            ParseError::InvalidInput { span, text } => (
                span,
                format!("Unrecognised input '{}'", text),
                "not part of the script language".to_string(),
            ),
        };
        render_report(source, filename, span, &message, &label)
    }
}

/// Render a single-label ariadne report to a string
pub(crate) fn render_report(
    source: &str,
    filename: &str,
    span: &Span,
    message: &str,
    label: &str,
) -> String {
    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf);
    if written.is_err() {
        return format!("{}: {}", filename, message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found.as_deref() {
                // Keywords cannot double as widget or line names
                Some(tok) if tok.keyword().is_some() && expects_identifier(&err) => format!(
                    "Cannot use '{}' as a name - it's a reserved keyword",
                    tok.keyword().unwrap_or_default()
                ),
                Some(tok) => format!("Unexpected {}", tok.describe()),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(tok.describe()),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

fn expects_identifier(err: &chumsky::error::Rich<'_, Token>) -> bool {
    use chumsky::error::RichPattern;
    // `select!` over identifiers reports no concrete expectation
    err.expected()
        .all(|e| matches!(e, RichPattern::SomethingElse | RichPattern::Any))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_includes_message_and_filename() {
        let err = ParseError::invalid_input(7..8, "@");
        let out = err.format("settle @", "scene.anchor");
        assert!(out.contains("Unrecognised input '@'"));
        assert!(out.contains("scene.anchor"));
    }

    #[test]
    fn test_span_accessor() {
        let err = ParseError::Syntax {
            span: 3..5,
            message: "Unexpected".to_string(),
            expected: vec![],
        };
        assert_eq!(err.span(), &(3..5));
    }
}

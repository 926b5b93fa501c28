//! Errors raised while running a script against a scene

use thiserror::Error;

use crate::error::{render_report, Span};

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("undefined widget '{name}'{}", format_suggestions(.suggestions))]
    UndefinedWidget {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("undefined line '{name}'{}", format_suggestions(.suggestions))]
    UndefinedLine {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("{kind} '{name}' is already defined")]
    DuplicateName {
        kind: &'static str,
        name: String,
        span: Span,
    },

    #[error("expected a whole number, found {value}")]
    NotAnInteger { value: f64, span: Span },
}

impl SceneError {
    pub fn span(&self) -> &Span {
        match self {
            SceneError::UndefinedWidget { span, .. }
            | SceneError::UndefinedLine { span, .. }
            | SceneError::DuplicateName { span, .. }
            | SceneError::NotAnInteger { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let label = match self {
            SceneError::UndefinedWidget { .. } => "no widget with this name".to_string(),
            SceneError::UndefinedLine { .. } => "no custom line with this name".to_string(),
            SceneError::DuplicateName { .. } => "names must be unique".to_string(),
            SceneError::NotAnInteger { .. } => "pixel values are integers".to_string(),
        };
        render_report(source, filename, self.span(), &self.to_string(), &label)
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Calculate Levenshtein distance between two strings
pub(crate) fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if n == 0 {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut row = vec![0usize; n + 1];
    for (i, ca) in a_chars.iter().enumerate() {
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j + 1] + 1).min(row[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[n]
}

/// Names within `max_distance` edits of `target`, closest first, at most three
pub(crate) fn find_similar<'a>(
    defined: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = defined
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by_key(|(_, d)| *d);
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}

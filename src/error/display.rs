use std::fmt;

use owo_colors::OwoColorize;

use crate::scanning::ScanError;

/// A hard error together with the line it was raised against, for showing
/// to a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<'i> {
    pub error: &'i ScanError,
    pub origin: &'i str,
    pub source: &'i str,
}

impl<'i> Report<'i> {
    pub fn new(error: &'i ScanError, origin: &'i str, source: &'i str) -> Report<'i> {
        Report {
            error,
            origin,
            source,
        }
    }

    // Verbose detailed explanation
    pub fn full_details(&self) -> String {
        let column = calculate_column_number(self.source, self.error.offset) + 1;

        format!(
            r#"
{}: {}
{}:{}

{:>4} {}
{:>4} {:>column$}
            "#,
            "error".bright_red(),
            self.error
                .message
                .bold(),
            self.origin,
            column,
            '|'.bright_blue(),
            self.source,
            '|'.bright_blue(),
            '^'.bright_red(),
        )
        .trim_ascii()
        .to_string()
    }
}

// Concise version for internal use
impl<'i> fmt::Display for Report<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = calculate_column_number(self.source, self.error.offset) + 1;

        write!(f, "error: {}:{} {}", self.origin, column, self.error.message)
    }
}

// Zero-origin column in characters; for display to humans you'll have to
// add 1. Offsets past the end of the line land just after it.
fn calculate_column_number(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    content[..offset]
        .chars()
        .count()
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn counting_columns() {
        assert_eq!(calculate_column_number("12x", 2), 2);
        assert_eq!(calculate_column_number("6 ÷ x", 5), 4);
        assert_eq!(calculate_column_number("ab", 10), 2);
    }

    #[test]
    fn concise_report() {
        let error = ScanError {
            message: "expected end of line at position 3".to_string(),
            offset: 2,
            position: 3,
        };
        let report = Report::new(&error, "<stdin>", "12x");

        assert_eq!(
            report.to_string(),
            "error: <stdin>:3 expected end of line at position 3"
        );
    }

    // Drop ANSI colour sequences so columns can be compared.
    fn plain(text: &str) -> String {
        let mut result = String::new();
        let mut escaped = false;
        for c in text.chars() {
            if c == '\x1b' {
                escaped = true;
            } else if escaped {
                if c == 'm' {
                    escaped = false;
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    #[test]
    fn caret_sits_under_failing_character() {
        let error = ScanError {
            message: "expected end of line at position 3".to_string(),
            offset: 2,
            position: 3,
        };
        let details = plain(&Report::new(&error, "<stdin>", "12x").full_details());
        let lines: Vec<&str> = details
            .lines()
            .collect();

        let code = lines[lines.len() - 2];
        let caret = lines[lines.len() - 1];
        assert_eq!(code.find('|'), caret.find('|'));
        assert_eq!(code.find('x'), caret.find('^'));

        let error = ScanError {
            message: "syntax error at position 5".to_string(),
            offset: 5,
            position: 5,
        };
        let details = plain(&Report::new(&error, "<stdin>", "6 ÷ x").full_details());
        let lines: Vec<&str> = details
            .lines()
            .collect();

        let code = lines[lines.len() - 2];
        let caret = lines[lines.len() - 1];
        let x = code
            .chars()
            .position(|c| c == 'x');
        let hat = caret
            .chars()
            .position(|c| c == '^');
        assert_eq!(x, hat);
    }

    #[test]
    fn detailed_report_points_at_column() {
        let error = ScanError {
            message: "syntax error at position 4".to_string(),
            offset: 3,
            position: 4,
        };
        let report = Report::new(&error, "<stdin>", "3 +");
        let details = report.full_details();

        assert!(details.contains("syntax error at position 4"));
        assert!(details.contains("3 +"));
        assert!(details
            .lines()
            .last()
            .unwrap()
            .contains('^'));
    }
}

//! Terminal rendering of load failures.
//!
//! Every line is bounded so one long document path or value cannot wrap the
//! whole report; the JSON output keeps the unabridged errors.

use crate::core::error::LoadFailure;
use colored::Colorize;

/// Single-line form of `input`: whitespace runs become one space and anything
/// past `max_chars` characters is replaced by `...`.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let mut line = String::with_capacity(input.len().min(max_chars + 3));
    for (count, word) in input.split_whitespace().enumerate() {
        if count > 0 {
            line.push(' ');
        }
        line.push_str(word);
    }
    match line.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            line.truncate(cut);
            line.push_str("...");
            line
        }
        None => line,
    }
}

/// The first `max_items` errors of a failure on one line, with a count of the
/// rest.
pub fn failure_summary(failure: &LoadFailure, max_items: usize, max_chars: usize) -> String {
    let shown: Vec<String> = failure
        .errors
        .iter()
        .take(max_items)
        .map(|err| compact_line(&err.to_string(), max_chars))
        .collect();
    match failure.len().saturating_sub(shown.len()) {
        0 => shown.join(" | "),
        hidden => format!("{} (+{} more)", shown.join(" | "), hidden),
    }
}

/// One numbered line per error.
pub fn failure_lines(failure: &LoadFailure, max_chars: usize) -> Vec<String> {
    failure
        .errors
        .iter()
        .enumerate()
        .map(|(i, err)| {
            format!(
                "  {} {}",
                format!("{:>3}.", i + 1).bright_red(),
                compact_line(&err.to_string(), max_chars)
            )
        })
        .collect()
}

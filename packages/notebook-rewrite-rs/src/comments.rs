use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::first_match;
use crate::vocabulary::strip_forbidden_vocabulary;

static COMMENT_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"^#\s*TODO:.*",
            "# Import core libraries for analysis and modeling",
        ),
        (r"^#\s*Solution\b.*", "# Reference implementation for this step"),
        (
            r"^#\s*Define Property Characteristics.*",
            "# Define property features for valuation",
        ),
        (
            r"^#\s*Set Property Characteristics.*",
            "# Set property features for the scenario",
        ),
        (r"^#\s*Make prediction.*", "# Generate prediction"),
        (
            r"^#\s*Convert Log Prices.*",
            "# Convert log price back to dollar value",
        ),
        (
            r"^#\s*How close the property is to the river.*",
            "# CHAS indicates proximity to the Charles River (1=near, 0=far)",
        ),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("invalid comment rewrite regex"),
            replacement,
        )
    })
    .collect()
});

pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn rewrite_comment(line: &str) -> String {
    let trimmed = line.trim();
    let replaced = first_match(COMMENT_REWRITES.iter(), |(pattern, replacement)| {
        pattern.is_match(trimmed).then_some(*replacement)
    })
    .map(|(_, replacement)| replacement)
    .unwrap_or(trimmed);
    let cleaned = strip_forbidden_vocabulary(replaced);

    let body = cleaned.trim_start_matches('#').trim_start();
    let mut comment = format!("# {body}").trim_end().to_string();
    comment.push('\n');
    comment
}

/// Rewrites the full-line comments of a code cell. Code lines are copied
/// as-is and the output always has as many lines as the input.
pub fn rewrite_code_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if is_comment(line) {
                rewrite_comment(line)
            } else {
                line.clone()
            }
        })
        .collect()
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::notebook::Cell;
use crate::rules::PROJECT_OVERVIEW;

/// Written over the earliest of several "Multivariable Regression" cells.
pub const PRIMARY_HEADING_OVERVIEW: &str = PROJECT_OVERVIEW;

pub const MODEL_OVERVIEW: &str = "## Model Overview\n\n\
We fit a multivariable linear regression to quantify how features (rooms, accessibility, environment, neighborhood) relate to property prices, and use it for pricing and scenario analysis.\n";

static PRIMARY_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*#\s*Multivariable Regression\b").expect("invalid primary heading regex")
});
static PROJECT_OVERVIEW_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*##\s*Project Overview\b").expect("invalid overview heading regex")
});
static TRANSITION_COLLAPSES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"Next, we profile[^.]*\.\s+We profile", "We profile"),
        (r"Next, we examine[^.]*\.\s+We examine", "We examine"),
        (
            r"Next, we [^.]*\.\s+Next, we [^.]*\.",
            "We examine feature interactions to anticipate multicollinearity and non-linear effects.",
        ),
        (r"Next, we refit[^.]*\.\s+We refit", "We refit"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("invalid transition regex"),
            replacement,
        )
    })
    .collect()
});

/// What the document-wide pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub primary_heading_resolved: bool,
    pub overview_collapsed: bool,
    pub transitions_collapsed: usize,
}

impl ConsistencyReport {
    pub fn changed(&self) -> bool {
        self.primary_heading_resolved || self.overview_collapsed || self.transitions_collapsed > 0
    }
}

fn markdown_text(cell: &Cell) -> Option<String> {
    cell.is_markdown().then(|| cell.text())
}

/// With more than one top-level "Multivariable Regression" cell, the
/// earliest becomes the project overview.
fn resolve_duplicate_primary_heading(cells: &mut [Cell]) -> bool {
    let matches: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| {
            markdown_text(cell).is_some_and(|text| PRIMARY_HEADING_RE.is_match(&text))
        })
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [first, _, ..] => {
            tracing::debug!(cell = *first, duplicates = matches.len(), "resolving duplicate primary heading");
            cells[*first].replace_text(PRIMARY_HEADING_OVERVIEW.to_string())
        }
        _ => false,
    }
}

/// Cells 0 and 1 both opening with "## Project Overview": the second turns
/// into the shorter model overview.
fn collapse_adjacent_overviews(cells: &mut [Cell]) -> bool {
    let [first, second, ..] = cells else {
        return false;
    };
    let opens_with_overview =
        |cell: &Cell| markdown_text(cell).is_some_and(|text| PROJECT_OVERVIEW_START_RE.is_match(&text));
    if !(opens_with_overview(first) && opens_with_overview(second)) {
        return false;
    }
    second.replace_text(MODEL_OVERVIEW.to_string())
}

pub(crate) fn collapse_transitions(text: &str) -> String {
    TRANSITION_COLLAPSES
        .iter()
        .fold(text.to_string(), |current, (pattern, replacement)| {
            pattern.replace_all(&current, *replacement).into_owned()
        })
}

fn collapse_repeated_transitions(cells: &mut [Cell]) -> usize {
    let mut collapsed = 0;
    for cell in cells.iter_mut().filter(|cell| cell.is_markdown()) {
        let text = cell.text();
        let updated = collapse_transitions(&text);
        if updated != text {
            cell.set_text(updated);
            collapsed += 1;
        }
    }
    collapsed
}

/// Document-wide cleanup run after every cell has been rewritten on its own.
pub fn apply_consistency_pass(cells: &mut [Cell]) -> ConsistencyReport {
    let report = ConsistencyReport {
        primary_heading_resolved: resolve_duplicate_primary_heading(cells),
        overview_collapsed: collapse_adjacent_overviews(cells),
        transitions_collapsed: collapse_repeated_transitions(cells),
    };
    tracing::info!(
        primary_heading_resolved = report.primary_heading_resolved,
        overview_collapsed = report.overview_collapsed,
        transitions_collapsed = report.transitions_collapsed,
        "consistency pass finished"
    );
    report
}

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::replace_section;
use crate::vocabulary::strip_forbidden_vocabulary;

/// Pictograph block covering the emoji the notebooks tend to carry.
const EMOJI_RANGE: RangeInclusive<char> = '\u{1F300}'..='\u{1FAFF}';

static BOLD_CHALLENGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*?Challenge\*\*?:?").expect("invalid challenge label regex"));
static CHALLENGE_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)challenge\s*:?").expect("invalid challenge word regex"));
static EXCESS_NEWLINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("invalid newline regex"));

pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|ch| !EMOJI_RANGE.contains(ch)).collect()
}

/// Removes "Challenge" prompt labels, bold or plain, with an optional colon.
pub fn strip_challenge_prompts(text: &str) -> String {
    let mut current = BOLD_CHALLENGE_RE.replace_all(text, "").into_owned();
    while CHALLENGE_WORD_RE.is_match(&current) {
        current = CHALLENGE_WORD_RE.replace_all(&current, "").into_owned();
    }
    current
}

/// Challenge labels and classroom vocabulary, deleted until neither matches.
/// Either deletion can join its neighbours into the other's token
/// (`chalcourselenge` -> `challenge`).
fn scrub_prompts_and_vocabulary(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let scrubbed = strip_forbidden_vocabulary(&strip_challenge_prompts(&current));
        if scrubbed == current {
            return current;
        }
        current = scrubbed;
    }
}

fn normalize_whitespace(text: &str) -> String {
    let collapsed = EXCESS_NEWLINES_RE.replace_all(text, "\n\n");
    let mut normalized = collapsed.trim().to_string();
    normalized.push('\n');
    normalized
}

fn rewrite_pass(text: &str) -> String {
    let text = strip_emoji(text);
    let text = replace_section(&text);
    let text = scrub_prompts_and_vocabulary(&text);
    normalize_whitespace(&text)
}

/// Rewrites one markdown cell: emoji, section replacement, challenge prompts,
/// classroom vocabulary, then whitespace. Never fails.
///
/// Passes repeat until the text settles, so deletions that spell out a rule
/// trigger are caught. Canned sections are fixed points and every other stage
/// only shortens the text, so this terminates.
pub fn rewrite_markdown(text: &str) -> String {
    let mut current = rewrite_pass(text);
    loop {
        let next = rewrite_pass(&current);
        if next == current {
            return current;
        }
        tracing::debug!("markdown changed on a repeated pass");
        current = next;
    }
}

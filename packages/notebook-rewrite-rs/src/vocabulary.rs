use once_cell::sync::Lazy;
use regex::Regex;

static FORBIDDEN_WORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)assignment|exercise|course|university").expect("invalid vocabulary regex")
});

/// Deletes every case-insensitive occurrence of the classroom vocabulary.
///
/// Deletion runs until nothing matches, since removing one word can join its
/// neighbours into another (`courcoursese` -> `course`).
pub fn strip_forbidden_vocabulary(text: &str) -> String {
    let mut current = text.to_string();
    while FORBIDDEN_WORDS_RE.is_match(&current) {
        current = FORBIDDEN_WORDS_RE.replace_all(&current, "").into_owned();
    }
    current
}

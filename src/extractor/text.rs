use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Word boundary after "points" so "15 pointsXYZ" is left alone.
static CREDITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+ points\b").unwrap());

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Split a `"<n> points"` token out of a listed course title.
///
/// Returns `(title, credits)`; credits is empty when the title carries none.
/// Only the first occurrence is removed.
pub fn extract_credits(raw_title: &str) -> (String, String) {
    match CREDITS.find(raw_title) {
        Some(m) => {
            let mut title = String::with_capacity(raw_title.len());
            title.push_str(&raw_title[..m.start()]);
            title.push_str(&raw_title[m.end()..]);
            (title.trim().to_string(), m.as_str().to_string())
        }
        None => (raw_title.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(
            normalize_whitespace("\n\t COSC367 \u{a0}\r\n  Artificial   Intelligence "),
            "COSC367 Artificial Intelligence"
        );
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn splits_trailing_credits() {
        assert_eq!(
            extract_credits("Data Structures 15 points"),
            ("Data Structures".to_string(), "15 points".to_string())
        );
    }

    #[test]
    fn leaves_titles_without_credits() {
        assert_eq!(
            extract_credits("Intro to AI"),
            ("Intro to AI".to_string(), String::new())
        );
    }

    #[test]
    fn ignores_partial_matches() {
        assert_eq!(
            extract_credits("Lab 15 pointsXYZ"),
            ("Lab 15 pointsXYZ".to_string(), String::new())
        );
        assert_eq!(extract_credits("Points of View").1, "");
    }

    #[test]
    fn strips_only_first_occurrence() {
        assert_eq!(
            extract_credits("30 points Thesis 30 points"),
            ("Thesis 30 points".to_string(), "30 points".to_string())
        );
    }
}

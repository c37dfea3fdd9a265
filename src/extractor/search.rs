use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::courses::RawCourseRow;
use crate::extractor::ExtractError;
use crate::extractor::text::{extract_credits, normalize_whitespace};

static RESULTS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#GetCourses").expect("Invalid results table selector"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));
static SELECTOR_TD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid td selector"));

#[derive(Debug, PartialEq, Eq)]
enum RowKind {
    /// Code and title of a new course.
    Primary,
    /// Extra note for the course above it: two cells, first one blank.
    Continuation,
    /// Headers, spacers and anything else the table carries.
    Other,
}

fn classify(cells: &[String]) -> RowKind {
    match cells {
        [first, _, ..] if !first.is_empty() => RowKind::Primary,
        [first, _] if first.is_empty() => RowKind::Continuation,
        _ => RowKind::Other,
    }
}

fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.select(&SELECTOR_TD)
        .map(|cell| normalize_whitespace(&cell.text().collect::<String>()))
        .collect()
}

/// Pull course rows out of a keyword's search results page.
///
/// A continuation row overwrites the notes of the most recent primary row;
/// one that appears before any primary row is dropped.
pub fn parse_search_results(html: &str, keyword: &str) -> Result<Vec<RawCourseRow>, ExtractError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&RESULTS_TABLE)
        .next()
        .ok_or(ExtractError::NoResultsTable)?;

    let mut courses: Vec<RawCourseRow> = Vec::new();

    for row in table.select(&SELECTOR_TR) {
        let mut cells = cell_texts(row);
        match classify(&cells) {
            RowKind::Primary => {
                let (title, credits) = extract_credits(&cells[1]);
                let code = cells.swap_remove(0);
                courses.push(RawCourseRow::new(code, title, keyword, credits));
            }
            RowKind::Continuation => match courses.last_mut() {
                Some(current) => current.other_info = cells.swap_remove(1),
                None => debug!(keyword, "continuation row before any course, dropped"),
            },
            RowKind::Other => {}
        }
    }

    debug!(keyword, rows = courses.len(), "parsed search results");
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classifies_rows_by_shape() {
        assert_eq!(classify(&cells(&["COSC101", "Intro"])), RowKind::Primary);
        assert_eq!(classify(&cells(&["COSC101", "Intro", "x"])), RowKind::Primary);
        assert_eq!(classify(&cells(&["", "Offered in S1"])), RowKind::Continuation);
        assert_eq!(classify(&cells(&["", "a", "b"])), RowKind::Other);
        assert_eq!(classify(&cells(&["COSC101"])), RowKind::Other);
        assert_eq!(classify(&[]), RowKind::Other);
    }
}

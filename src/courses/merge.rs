//! Turning the rows of many overlapping keyword searches into one course list.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::courses::model::{MergedCourse, RawCourseRow};

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Keep the first row seen for each course code.
///
/// Title, keyword and notes of later rows are ignored even when they differ.
pub fn dedup_by_code(rows: Vec<RawCourseRow>) -> Vec<RawCourseRow> {
    let mut seen = HashSet::new();
    let before = rows.len();
    let unique: Vec<_> = rows
        .into_iter()
        .filter(|row| seen.insert(row.code.clone()))
        .collect();
    debug!(before, after = unique.len(), "deduplicated by course code");
    unique
}

/// Collapse rows with an identical title into one entry, in first-seen title order.
pub fn merge_by_title(rows: Vec<RawCourseRow>) -> Vec<MergedCourse> {
    let mut merged: Vec<MergedCourse> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match by_title.get(&row.title) {
            Some(&idx) => merged[idx].absorb(row),
            None => {
                by_title.insert(row.title.clone(), merged.len());
                merged.push(MergedCourse::from_row(row));
            }
        }
    }

    merged
}

/// An unbounded non-negative integer kept as its ASCII digits.
///
/// Leading zeros are dropped, so ordering by length and then lexically is
/// numeric order at any magnitude.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeNumber {
    len: usize,
    digits: String,
}

impl CodeNumber {
    fn from_digits(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Self {
            len: digits.len(),
            digits: digits.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

/// Number formed by the first run of ASCII digits anywhere in the joined codes.
///
/// `None` when there are no such digits, which sorts last.
pub fn code_number(codes: &str) -> Option<CodeNumber> {
    DIGIT_RUN
        .find(codes)
        .map(|run| CodeNumber::from_digits(run.as_str()))
}

/// Stable sort on [`code_number`]; entries without a number go to the end.
pub fn sort_by_code(courses: &mut [MergedCourse]) {
    courses.sort_by_cached_key(|course| {
        let number = code_number(&course.joined_codes());
        (number.is_none(), number)
    });
}

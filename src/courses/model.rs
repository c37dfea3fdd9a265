use std::collections::BTreeSet;

/// Separator used when several codes or notes share one merged entry.
pub const JOIN_SEPARATOR: &str = "/";

/// One course as it appeared in a keyword's search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCourseRow {
    pub code: String,
    pub title: String,
    /// Keyword whose search produced this row.
    pub keyword: String,
    /// `"<n> points"` split out of the listed title, or empty.
    pub credits: String,
    /// Text of the last continuation row seen for this course, or empty.
    pub other_info: String,
}

impl RawCourseRow {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        keyword: impl Into<String>,
        credits: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            keyword: keyword.into(),
            credits: credits.into(),
            other_info: String::new(),
        }
    }

    pub fn with_other_info(mut self, other_info: impl Into<String>) -> Self {
        self.other_info = other_info.into();
        self
    }
}

/// All course codes listed under one title.
///
/// `codes` and `other_info` are kept index-aligned in first-seen order and
/// only joined with `/` when written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCourse {
    pub codes: Vec<String>,
    pub title: String,
    pub credits: String,
    pub other_info: Vec<String>,
}

impl MergedCourse {
    pub fn from_row(row: RawCourseRow) -> Self {
        Self {
            codes: vec![row.code],
            title: row.title,
            credits: row.credits,
            other_info: vec![row.other_info],
        }
    }

    /// Fold another row with the same title into this entry.
    pub fn absorb(&mut self, row: RawCourseRow) {
        debug_assert_eq!(self.title, row.title);
        self.codes.push(row.code);
        self.other_info.push(row.other_info);
    }

    pub fn joined_codes(&self) -> String {
        self.codes.join(JOIN_SEPARATOR)
    }

    /// Notes of every constituent code; empty notes still contribute a separator.
    pub fn joined_other_info(&self) -> String {
        self.other_info.join(JOIN_SEPARATOR)
    }

    pub fn first_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

/// Facts scraped from a single course detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFacts {
    pub restrictions: Vec<String>,
    pub equivalents: Vec<String>,
    pub prerequisites: Vec<String>,
    pub contact_persons: Vec<String>,
}

/// Detail facts unioned across every code of a [`MergedCourse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDetail {
    pub restrictions: BTreeSet<String>,
    pub equivalents: BTreeSet<String>,
    pub prerequisites: BTreeSet<String>,
    pub contact_persons: BTreeSet<String>,
}

impl CourseDetail {
    pub fn merge(&mut self, facts: DetailFacts) {
        self.restrictions.extend(facts.restrictions);
        self.equivalents.extend(facts.equivalents);
        self.prerequisites.extend(facts.prerequisites);
        self.contact_persons.extend(facts.contact_persons);
    }
}

impl FromIterator<DetailFacts> for CourseDetail {
    fn from_iter<I: IntoIterator<Item = DetailFacts>>(iter: I) -> Self {
        let mut detail = Self::default();
        for facts in iter {
            detail.merge(facts);
        }
        detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_collapses_duplicates_across_codes() {
        let detail: CourseDetail = [
            DetailFacts {
                restrictions: vec!["COSC261".into(), "MATH120".into()],
                contact_persons: vec!["Jo Lee (https://x/p)".into()],
                ..Default::default()
            },
            DetailFacts {
                restrictions: vec!["MATH120".into(), "SENG201".into()],
                contact_persons: vec!["Jo Lee (https://x/p)".into()],
                ..Default::default()
            },
        ]
        .into_iter()
        .collect();

        let restrictions: Vec<_> = detail.restrictions.iter().map(String::as_str).collect();
        assert_eq!(restrictions, ["COSC261", "MATH120", "SENG201"]);
        assert_eq!(detail.contact_persons.len(), 1);
        assert!(detail.equivalents.is_empty());
    }

    #[test]
    fn joined_fields_keep_first_seen_order() {
        let mut course =
            MergedCourse::from_row(RawCourseRow::new("A101", "X", "kw1", "10 points"));
        course.absorb(RawCourseRow::new("A102", "X", "kw2", "10 points").with_other_info("note"));

        assert_eq!(course.joined_codes(), "A101/A102");
        assert_eq!(course.joined_other_info(), "/note");
        assert_eq!(course.first_code(), Some("A101"));
    }
}

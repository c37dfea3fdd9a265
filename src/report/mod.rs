//! CSV reports: the pre-enrichment summary and the final course sheet.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::courses::{CourseDetail, MergedCourse};

pub const SUMMARY_HEADER: [&str; 4] = ["Course Code", "Course Title", "Credits", "Other Info"];

pub const FINAL_HEADER: [&str; 10] = [
    "Course Code",
    "Course URL",
    "Course Title",
    "Credits",
    "Other Info",
    "Restrictions",
    "Equivalents",
    "Prerequisites",
    "Contact Person",
    "Mapping to Graduate Attributes",
];

const SET_SEPARATOR: &str = ", ";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create report {path}: {source}")]
    Create { path: String, source: io::Error },

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush report: {0}")]
    Io(#[from] io::Error),
}

/// A merged course before detail pages are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub code: String,
    pub title: String,
    pub credits: String,
    pub other_info: String,
}

impl From<&MergedCourse> for SummaryRecord {
    fn from(course: &MergedCourse) -> Self {
        Self {
            code: course.joined_codes(),
            title: course.title.clone(),
            credits: course.credits.clone(),
            other_info: course.joined_other_info(),
        }
    }
}

/// One row of the final sheet, fields in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalRecord {
    pub code: String,
    pub url: String,
    pub title: String,
    pub credits: String,
    pub other_info: String,
    pub restrictions: String,
    pub equivalents: String,
    pub prerequisites: String,
    pub contact_person: String,
    /// Filled in by hand downstream; always blank here.
    pub graduate_attributes: String,
}

impl FinalRecord {
    /// `course_url` is the detail page of the course's first code.
    pub fn new(course: &MergedCourse, course_url: String, detail: &CourseDetail) -> Self {
        Self {
            code: course.joined_codes(),
            url: course_url,
            title: course.title.clone(),
            credits: course.credits.clone(),
            other_info: course.joined_other_info(),
            restrictions: join_set(&detail.restrictions),
            equivalents: join_set(&detail.equivalents),
            prerequisites: join_set(&detail.prerequisites),
            contact_person: join_set(&detail.contact_persons),
            graduate_attributes: String::new(),
        }
    }
}

fn join_set(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SET_SEPARATOR)
}

/// Write a header row and then every record, even when there are none.
pub fn write_csv<W, R>(writer: W, header: &[&str], records: &[R]) -> Result<(), ReportError>
where
    W: io::Write,
    R: Serialize,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    csv.write_record(header)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the report into it.
pub fn write_csv_file<R: Serialize>(
    path: &Path,
    header: &[&str],
    records: &[R],
) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    write_csv(file, header, records)?;
    info!(path = %path.display(), rows = records.len(), "report written");
    Ok(())
}

pub fn write_summary(path: &Path, courses: &[MergedCourse]) -> Result<(), ReportError> {
    let records: Vec<SummaryRecord> = courses.iter().map(SummaryRecord::from).collect();
    write_csv_file(path, &SUMMARY_HEADER, &records)
}

pub fn write_final(path: &Path, records: &[FinalRecord]) -> Result<(), ReportError> {
    write_csv_file(path, &FINAL_HEADER, records)
}

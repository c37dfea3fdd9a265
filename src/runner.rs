//! The search → merge → enrich → report pipeline.
//!
//! Every request is made one at a time, in list order. A page that fails to
//! load or lacks the expected structure counts as "no data" for that keyword
//! or course code; the run carries on.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::courses::{self, CourseDetail, MergedCourse, RawCourseRow};
use crate::extractor::{ExtractError, parse_course_details, parse_search_results};
use crate::fetcher::{CatalogClient, FetchError};
use crate::progress::ProgressSink;
use crate::report::{self, FinalRecord, ReportError};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Client(#[from] FetchError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub keywords: usize,
    pub raw_rows: usize,
    pub courses: usize,
    pub output_path: PathBuf,
}

fn describe(err: &FetchError) -> String {
    match err.status() {
        Some(status) => format!("status code: {}", status.as_u16()),
        None => err.to_string(),
    }
}

/// Rows listed for one keyword; empty when the page can't be read.
pub async fn search_keyword<P>(
    client: &CatalogClient,
    keyword: &str,
    progress: &P,
) -> Vec<RawCourseRow>
where
    P: ProgressSink + ?Sized,
{
    progress.report(&format!("Searching for courses with keyword: {keyword}"));

    let page = match client.search(keyword).await {
        Ok(page) => page,
        Err(err) => {
            warn!(keyword, error = %err, "search page fetch failed");
            progress.report(&format!(
                "Failed to retrieve page for keyword: {keyword}, {}",
                describe(&err)
            ));
            return Vec::new();
        }
    };
    progress.report(&format!("Successfully retrieved data for keyword: {keyword}"));

    match parse_search_results(&page.body_utf8, keyword) {
        Ok(rows) => {
            info!(keyword, rows = rows.len(), "search results parsed");
            rows
        }
        Err(ExtractError::NoResultsTable) => {
            warn!(keyword, "no results table");
            progress.report(&format!("No course table found for keyword: {keyword}"));
            Vec::new()
        }
        Err(err) => {
            warn!(keyword, error = %err, "search page not understood");
            Vec::new()
        }
    }
}

/// Search every keyword in order and pool the rows.
pub async fn collect_rows<P>(
    client: &CatalogClient,
    keywords: &[String],
    progress: &P,
) -> Vec<RawCourseRow>
where
    P: ProgressSink + ?Sized,
{
    let mut rows = Vec::new();
    for keyword in keywords {
        rows.extend(search_keyword(client, keyword, progress).await);
    }
    rows
}

/// Dedup, merge and sort the pooled rows, reporting each phase.
pub fn consolidate<P>(rows: Vec<RawCourseRow>, progress: &P) -> Vec<MergedCourse>
where
    P: ProgressSink + ?Sized,
{
    progress.report("Deduplicating courses...");
    let unique = courses::dedup_by_code(rows);

    progress.report("Combining courses with the same title...");
    let mut merged = courses::merge_by_title(unique);

    progress.report("Sorting courses...");
    courses::sort_by_code(&mut merged);

    merged
}

/// Union of the detail facts of every code under one merged course.
pub async fn enrich<P>(client: &CatalogClient, course: &MergedCourse, progress: &P) -> CourseDetail
where
    P: ProgressSink + ?Sized,
{
    let mut detail = CourseDetail::default();

    for code in course.codes.iter().map(|code| code.trim()) {
        progress.report(&format!(
            "Finding contacts, restrictions, equivalents and prerequisites for {code}..."
        ));

        let page = match client.course_details(code).await {
            Ok(page) => page,
            Err(err) => {
                warn!(code, error = %err, "detail page fetch failed");
                progress.report(&format!(
                    "Failed to retrieve details for {code}, {}",
                    describe(&err)
                ));
                continue;
            }
        };

        match parse_course_details(&page.body_utf8, client.base_url()) {
            Ok(facts) => detail.merge(facts),
            Err(err) => {
                warn!(code, error = %err, "detail page not understood");
                progress.report(&format!("No course details found for {code}"));
            }
        }
    }

    detail
}

fn course_url(client: &CatalogClient, course: &MergedCourse) -> String {
    let Some(code) = course.first_code() else {
        return String::new();
    };
    match client.details_url(code.trim()) {
        Ok(url) => url.to_string(),
        Err(err) => {
            warn!(code, error = %err, "could not build course url");
            String::new()
        }
    }
}

/// Enrich each merged course in turn and shape it into a report row.
pub async fn build_records<P>(
    client: &CatalogClient,
    courses: &[MergedCourse],
    progress: &P,
) -> Vec<FinalRecord>
where
    P: ProgressSink + ?Sized,
{
    let mut records = Vec::with_capacity(courses.len());
    for course in courses {
        let detail = enrich(client, course, progress).await;
        records.push(FinalRecord::new(course, course_url(client, course), &detail));
    }
    records
}

/// Run the whole pipeline and write the report to the configured path.
///
/// When enabled, the pre-enrichment summary is written first and then
/// overwritten by the final sheet.
#[instrument(skip_all, fields(keywords = keywords.len()))]
pub async fn run<P>(config: &Config, keywords: &[String], progress: &P) -> Result<RunSummary, RunError>
where
    P: ProgressSink + ?Sized,
{
    let client = CatalogClient::new(config)?;
    let output = config.output_path();

    progress.report("Starting the course search process...");
    let rows = collect_rows(&client, keywords, progress).await;
    let raw_rows = rows.len();

    let courses = consolidate(rows, progress);
    info!(raw_rows, courses = courses.len(), "course list consolidated");

    if config.interim_report() {
        report::write_summary(output, &courses)?;
        progress.report(&format!(
            "Results from search saved to {}, parsing each course for lecturers and requirements now...",
            output.display()
        ));
    } else {
        progress.report("Parsing each course for lecturers and requirements...");
    }

    let records = build_records(&client, &courses, progress).await;
    report::write_final(output, &records)?;
    progress.report(&format!(
        "Final updated course info saved to {}",
        output.display()
    ));

    Ok(RunSummary {
        keywords: keywords.len(),
        raw_rows,
        courses: courses.len(),
        output_path: output.to_path_buf(),
    })
}

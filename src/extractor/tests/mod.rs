use std::fs;
use url::Url;

use crate::extractor::{ExtractError, parse_course_details, parse_search_results};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn catalog_root() -> Url {
    Url::parse("https://courseinfo.canterbury.ac.nz/").unwrap()
}

#[test]
fn test_search_results_table() {
    let html = fixture("search_results.html");
    let rows = parse_search_results(&html, "Artificial Intelligence").unwrap();

    // orphaned continuation, header and footer rows contribute nothing
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].code, "COSC367");
    assert_eq!(rows[0].title, "Computational Intelligence");
    assert_eq!(rows[0].credits, "15 points");
    assert_eq!(rows[0].keyword, "Artificial Intelligence");

    assert_eq!(rows[1].code, "DATA420");
    assert_eq!(rows[1].title, "Scalable Data Science");
    assert_eq!(rows[1].other_info, "");

    assert_eq!(rows[2].code, "PHIL");
    assert_eq!(rows[2].credits, "");
    assert_eq!(rows[2].other_info, "Not offered 2025");
}

#[test]
fn test_last_continuation_wins() {
    let html = fixture("search_results.html");
    let rows = parse_search_results(&html, "AI").unwrap();

    assert_eq!(rows[0].other_info, "Semester 2, Online");
}

#[test]
fn test_continuation_attaches_to_primary_row() {
    let html = r#"<table id="GetCourses">
        <tr><td>COSC101</td><td>Intro</td></tr>
        <tr><td></td><td>Offered in S1</td></tr>
    </table>"#;
    let rows = parse_search_results(html, "kw").unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, "COSC101");
    assert_eq!(rows[0].title, "Intro");
    assert_eq!(rows[0].keyword, "kw");
    assert_eq!(rows[0].credits, "");
    assert_eq!(rows[0].other_info, "Offered in S1");
}

#[test]
fn test_leading_continuation_is_dropped() {
    let html = r#"<table id="GetCourses">
        <tr><td></td><td>Nobody owns this</td></tr>
    </table>"#;
    let rows = parse_search_results(html, "kw").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_missing_results_table() {
    let html = "<html><body><p>No courses matched your search.</p></body></html>";
    let err = parse_search_results(html, "kw").unwrap_err();
    assert_eq!(err, ExtractError::NoResultsTable);
}

#[test]
fn test_empty_results_table() {
    let html = r#"<table id="GetCourses"><tr><th>Code</th><th>Course</th></tr></table>"#;
    assert!(parse_search_results(html, "kw").unwrap().is_empty());
}

#[test]
fn test_course_details_page() {
    let html = fixture("course_details.html");
    let facts = parse_course_details(&html, &catalog_root()).unwrap();

    assert_eq!(facts.restrictions, ["COSC261", "MATH120"]);
    assert_eq!(facts.equivalents, ["COSC367", "DATA367"]);
    assert_eq!(
        facts.contact_persons,
        ["Alex Morgan (https://courseinfo.canterbury.ac.nz/ShowPeopleDetails.aspx?id=1234)"]
    );
}

#[test]
fn test_prerequisites_read_the_restrictions_label() {
    let html = fixture("course_details.html");
    let facts = parse_course_details(&html, &catalog_root()).unwrap();

    assert_eq!(facts.prerequisites.len(), 3);
    assert!(facts.prerequisites[0].starts_with("Subject to approval of the Head of Department."));
    assert!(facts.prerequisites[0].ends_with("MATH120"));
    assert_eq!(facts.prerequisites[1..], facts.restrictions[..]);
}

#[test]
fn test_absolute_contact_link_is_kept() {
    let html = r#"<div id="ctl00_ContentPlaceHolder1_ContributorsDiv">
        <a href="https://staff.example.ac.nz/jo">Jo Lee</a>
    </div>"#;
    let facts = parse_course_details(html, &catalog_root()).unwrap();

    assert_eq!(facts.contact_persons, ["Jo Lee (https://staff.example.ac.nz/jo)"]);
    assert!(facts.restrictions.is_empty());
    assert!(facts.prerequisites.is_empty());
}

#[test]
fn test_contact_link_without_href_is_skipped() {
    let html = r#"<div id="ctl00_ContentPlaceHolder1_ContributorsDiv"><a>Jo Lee</a></div>"#;
    let facts = parse_course_details(html, &catalog_root()).unwrap();
    assert!(facts.contact_persons.is_empty());
}

#[test]
fn test_page_without_detail_sections() {
    let html = fixture("no_details.html");
    let err = parse_course_details(&html, &catalog_root()).unwrap_err();
    assert_eq!(err, ExtractError::NoDetailSection);
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use coursefinder::extractor::{parse_course_details, parse_search_results};
use coursefinder::progress::NullProgress;
use coursefinder::runner::consolidate;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let base = Url::parse("https://courseinfo.example.ac.nz/").unwrap();

    // Neither parser may panic, whatever the catalog sends back.
    if let Ok(rows) = parse_search_results(&html, "fuzz") {
        for row in &rows {
            assert!(!row.code.is_empty());
            assert_eq!(row.keyword, "fuzz");
        }
        let _ = consolidate(rows, &NullProgress);
    }
    let _ = parse_course_details(&html, &base);
});

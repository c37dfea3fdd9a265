pub mod merge;
pub mod model;

pub use merge::{CodeNumber, code_number, dedup_by_code, merge_by_title, sort_by_code};
pub use model::{CourseDetail, DetailFacts, MergedCourse, RawCourseRow};

//! Application services.
//!
//! The entry points request handlers call. Each service resolves identifiers,
//! wraps its writes in a transaction and delegates to the schedulers.

pub mod catalog;
pub mod homework;
pub mod students;

pub use catalog::{import_catalog_file, parse_catalog};
pub use homework::{
    ensure_week_generated, get_homework, mark_review, mark_task, set_plan_notes, week_view,
    GenerationReport,
};
pub use students::{configure_review, create_student, validate_review_window};

//! Student records and review configuration

use rusqlite::Connection;

use crate::config::PlannerConfig;
use crate::db;
use crate::domain::Student;
use crate::error::{Entity, PlannerError};

/// Check a review window against the catalog's page count.
///
/// The end of the window may run past the last page (it is clipped when
/// ranges are built), but the start and the page count may not.
pub fn validate_review_window(
    start_page: u32,
    pages_per_day: u32,
    max_page: u32,
) -> Result<(), PlannerError> {
    let valid = (1..=max_page).contains(&start_page) && (1..=max_page).contains(&pages_per_day);
    if valid {
        Ok(())
    } else {
        Err(PlannerError::InvalidRange {
            start_page,
            pages_per_day,
            max_page,
        })
    }
}

pub fn create_student(
    conn: &Connection,
    config: &PlannerConfig,
    name: &str,
) -> Result<Student, PlannerError> {
    validate_review_window(1, config.review_pages_per_day, config.max_page)?;

    let id = db::insert_student(conn, name, 1, config.review_pages_per_day)?;
    tracing::info!("Created student {} ({})", id, name);
    db::get_student(conn, id)?.ok_or(PlannerError::NotFound(Entity::Student(id)))
}

/// Set where review starts and how many pages a day covers.
///
/// Takes effect for days that have no earlier review to follow.
pub fn configure_review(
    conn: &Connection,
    config: &PlannerConfig,
    student_id: i64,
    start_page: u32,
    pages_per_day: u32,
) -> Result<Student, PlannerError> {
    validate_review_window(start_page, pages_per_day, config.max_page)?;

    let mut student =
        db::get_student(conn, student_id)?.ok_or(PlannerError::NotFound(Entity::Student(student_id)))?;
    db::update_review_settings(conn, student_id, start_page, pages_per_day)?;
    student.review_start_page = start_page;
    student.review_pages_per_day = pages_per_day;
    Ok(student)
}

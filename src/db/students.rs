//! Student records and their scheduling state

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Result, Row};

use crate::domain::Student;

use super::{day_to_sql, parse_day};

pub fn insert_student(
    conn: &Connection,
    name: &str,
    review_start_page: u32,
    review_pages_per_day: u32,
) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
    INSERT INTO students (name, review_start_page, review_pages_per_day, created_at)
    VALUES (?1, ?2, ?3, ?4)
    "#,
        params![name, review_start_page, review_pages_per_day, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_student(conn: &Connection, id: i64) -> Result<Option<Student>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, name, memorization_cursor, review_start_page, review_pages_per_day,
           last_plan_generated_on
    FROM students WHERE id = ?1
    "#,
    )?;

    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_student(row)?))
    } else {
        Ok(None)
    }
}

pub fn update_memorization_cursor(conn: &Connection, id: i64, cursor: Option<u32>) -> Result<()> {
    conn.execute(
        "UPDATE students SET memorization_cursor = ?1 WHERE id = ?2",
        params![cursor, id],
    )?;
    Ok(())
}

pub fn update_review_start_page(conn: &Connection, id: i64, start_page: u32) -> Result<()> {
    conn.execute(
        "UPDATE students SET review_start_page = ?1 WHERE id = ?2",
        params![start_page, id],
    )?;
    Ok(())
}

pub fn update_review_settings(
    conn: &Connection,
    id: i64,
    start_page: u32,
    pages_per_day: u32,
) -> Result<()> {
    conn.execute(
        "UPDATE students SET review_start_page = ?1, review_pages_per_day = ?2 WHERE id = ?3",
        params![start_page, pages_per_day, id],
    )?;
    Ok(())
}

/// Record that the week was generated on `day`
pub fn stamp_plan_generated(conn: &Connection, id: i64, day: NaiveDate) -> Result<()> {
    conn.execute(
        "UPDATE students SET last_plan_generated_on = ?1 WHERE id = ?2",
        params![day_to_sql(day), id],
    )?;
    Ok(())
}

fn row_to_student(row: &Row<'_>) -> Result<Student> {
    let last_generated: Option<String> = row.get(5)?;
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        memorization_cursor: row.get(2)?,
        review_start_page: row.get(3)?,
        review_pages_per_day: row.get(4)?,
        last_plan_generated_on: last_generated
            .map(|s| parse_day(5, &s))
            .transpose()?,
    })
}

//! Daily plans, memorization tasks and review assignments

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result, Row};

use crate::domain::{DailyPlan, MemorizationTask, PageRange, ReviewAssignment, TaskView};

use super::{day_to_sql, parse_day};

// ==================== Daily Plans ====================

/// Return the plan id for (student, day), creating the plan if needed
pub fn get_or_create_plan(conn: &Connection, student_id: i64, day: NaiveDate) -> Result<i64> {
    let day = day_to_sql(day);
    conn.execute(
        "INSERT OR IGNORE INTO daily_plans (student_id, day) VALUES (?1, ?2)",
        params![student_id, day],
    )?;
    conn.query_row(
        "SELECT id FROM daily_plans WHERE student_id = ?1 AND day = ?2",
        params![student_id, day],
        |row| row.get(0),
    )
}

pub fn find_plan(conn: &Connection, student_id: i64, day: NaiveDate) -> Result<Option<DailyPlan>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, day, topic, notes FROM daily_plans WHERE student_id = ?1 AND day = ?2",
    )?;
    let mut rows = stmt.query(params![student_id, day_to_sql(day)])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_plan(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_plan(conn: &Connection, plan_id: i64) -> Result<Option<DailyPlan>> {
    let mut stmt =
        conn.prepare("SELECT id, student_id, day, topic, notes FROM daily_plans WHERE id = ?1")?;
    let mut rows = stmt.query(params![plan_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_plan(row)?))
    } else {
        Ok(None)
    }
}

/// Plans with `from <= day < until`, oldest first
pub fn get_plans_between(
    conn: &Connection,
    student_id: i64,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<DailyPlan>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, student_id, day, topic, notes
    FROM daily_plans
    WHERE student_id = ?1 AND day >= ?2 AND day < ?3
    ORDER BY day ASC
    "#,
    )?;

    let plans = stmt
        .query_map(
            params![student_id, day_to_sql(from), day_to_sql(until)],
            |row| row_to_plan(row),
        )?
        .collect::<Result<Vec<_>>>()?;
    Ok(plans)
}

#[cfg(test)]
pub fn count_plans(conn: &Connection, student_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM daily_plans WHERE student_id = ?1",
        params![student_id],
        |row| row.get(0),
    )
}

pub fn set_plan_notes(conn: &Connection, plan_id: i64, notes: Option<&str>) -> Result<()> {
    conn.execute(
        "UPDATE daily_plans SET notes = ?1 WHERE id = ?2",
        params![notes, plan_id],
    )?;
    Ok(())
}

fn row_to_plan(row: &Row<'_>) -> Result<DailyPlan> {
    let day: String = row.get(2)?;
    Ok(DailyPlan {
        id: row.get(0)?,
        student_id: row.get(1)?,
        day: parse_day(2, &day)?,
        topic: row.get(3)?,
        notes: row.get(4)?,
    })
}

// ==================== Memorization Tasks ====================

pub fn insert_task(conn: &Connection, plan_id: i64, chapter_number: u32, verse_number: u32) -> Result<i64> {
    conn.execute(
        "INSERT INTO memorization_tasks (plan_id, chapter_number, verse_number) VALUES (?1, ?2, ?3)",
        params![plan_id, chapter_number, verse_number],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_tasks_for_plan(conn: &Connection, plan_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM memorization_tasks WHERE plan_id = ?1",
        params![plan_id],
    )
}

pub fn get_task(conn: &Connection, task_id: i64) -> Result<Option<MemorizationTask>> {
    let mut stmt = conn.prepare(
        "SELECT id, plan_id, chapter_number, verse_number, is_done FROM memorization_tasks WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![task_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_task(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_tasks_for_plan(conn: &Connection, plan_id: i64) -> Result<Vec<MemorizationTask>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, plan_id, chapter_number, verse_number, is_done
    FROM memorization_tasks
    WHERE plan_id = ?1
    ORDER BY verse_number ASC
    "#,
    )?;

    let tasks = stmt
        .query_map(params![plan_id], |row| row_to_task(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(tasks)
}

/// Tasks of a plan joined with chapter names and verse text
pub fn get_task_views(conn: &Connection, plan_id: i64) -> Result<Vec<TaskView>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT t.id, c.name, t.verse_number, v.text, t.is_done
    FROM memorization_tasks t
    JOIN verses v ON v.number = t.verse_number
    JOIN chapters c ON c.number = t.chapter_number
    WHERE t.plan_id = ?1
    ORDER BY t.verse_number ASC
    "#,
    )?;

    let views = stmt
        .query_map(params![plan_id], |row| {
            Ok(TaskView {
                id: row.get(0)?,
                chapter_name: row.get(1)?,
                verse_number: row.get(2)?,
                verse_text: row.get(3)?,
                is_done: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(views)
}

pub fn set_task_done(conn: &Connection, task_id: i64, is_done: bool) -> Result<()> {
    conn.execute(
        "UPDATE memorization_tasks SET is_done = ?1 WHERE id = ?2",
        params![is_done, task_id],
    )?;
    Ok(())
}

fn row_to_task(row: &Row<'_>) -> Result<MemorizationTask> {
    Ok(MemorizationTask {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        chapter_number: row.get(2)?,
        verse_number: row.get(3)?,
        is_done: row.get(4)?,
    })
}

// ==================== Review Assignments ====================

pub fn insert_review(conn: &Connection, plan_id: i64, range: PageRange) -> Result<i64> {
    conn.execute(
        "INSERT INTO review_assignments (plan_id, start_page, end_page) VALUES (?1, ?2, ?3)",
        params![plan_id, range.start, range.end],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_review(conn: &Connection, review_id: i64) -> Result<Option<ReviewAssignment>> {
    let mut stmt = conn.prepare(
        "SELECT id, plan_id, start_page, end_page, is_done FROM review_assignments WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![review_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_review(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_review_for_plan(conn: &Connection, plan_id: i64) -> Result<Option<ReviewAssignment>> {
    let mut stmt = conn.prepare(
        "SELECT id, plan_id, start_page, end_page, is_done FROM review_assignments WHERE plan_id = ?1",
    )?;
    let mut rows = stmt.query(params![plan_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_review(row)?))
    } else {
        Ok(None)
    }
}

pub fn update_review_range(conn: &Connection, review_id: i64, range: PageRange) -> Result<()> {
    conn.execute(
        "UPDATE review_assignments SET start_page = ?1, end_page = ?2 WHERE id = ?3",
        params![range.start, range.end, review_id],
    )?;
    Ok(())
}

pub fn set_review_done(conn: &Connection, review_id: i64, is_done: bool) -> Result<()> {
    conn.execute(
        "UPDATE review_assignments SET is_done = ?1 WHERE id = ?2",
        params![is_done, review_id],
    )?;
    Ok(())
}

fn row_to_review(row: &Row<'_>) -> Result<ReviewAssignment> {
    Ok(ReviewAssignment {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        range: PageRange {
            start: row.get(2)?,
            end: row.get(3)?,
        },
        is_done: row.get(4)?,
    })
}

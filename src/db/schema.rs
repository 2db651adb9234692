//! Planner database schema.
//!
//! Migrations are version-gated: each one checks the recorded schema version,
//! runs its SQL and records the new version in `db_version`, so running
//! `run_migrations` on an up-to-date database is a no-op.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// Current schema version
/// Increment this when adding a new migration
pub const SCHEMA_VERSION: i32 = 2;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Bootstrap: ensure db_version table exists (needed to check version)
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS db_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        );
        "#,
    )?;

    let current_version = get_schema_version(conn)?;
    tracing::debug!("planner schema version: {}", current_version);

    if current_version < 1 {
        migrate_v0_to_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v1_to_v2(conn)?;
    }

    Ok(())
}

/// v0→v1: Catalog, students, mastery buffer and daily plans
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v0→v1: Create planner tables");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            number INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS verses (
            number INTEGER PRIMARY KEY,
            chapter_number INTEGER NOT NULL,
            number_in_chapter INTEGER NOT NULL,
            text TEXT NOT NULL,
            transcription TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (chapter_number) REFERENCES chapters(number)
        );

        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            -- May point one past the last verse once the catalog is exhausted
            memorization_cursor INTEGER,
            review_start_page INTEGER NOT NULL DEFAULT 1,
            review_pages_per_day INTEGER NOT NULL DEFAULT 1,
            last_plan_generated_on TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS mastery_buffer (
            student_id INTEGER NOT NULL,
            verse_number INTEGER NOT NULL,
            added_at TEXT NOT NULL,
            PRIMARY KEY (student_id, verse_number),
            FOREIGN KEY (student_id) REFERENCES students(id),
            FOREIGN KEY (verse_number) REFERENCES verses(number)
        );

        CREATE TABLE IF NOT EXISTS daily_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL,
            day TEXT NOT NULL,
            UNIQUE (student_id, day),
            FOREIGN KEY (student_id) REFERENCES students(id)
        );

        CREATE TABLE IF NOT EXISTS memorization_tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plan_id INTEGER NOT NULL,
            chapter_number INTEGER NOT NULL,
            verse_number INTEGER NOT NULL,
            is_done INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (plan_id) REFERENCES daily_plans(id),
            FOREIGN KEY (verse_number) REFERENCES verses(number)
        );

        CREATE TABLE IF NOT EXISTS review_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plan_id INTEGER NOT NULL UNIQUE,
            start_page INTEGER NOT NULL,
            end_page INTEGER NOT NULL,
            is_done INTEGER NOT NULL DEFAULT 0,
            CHECK (end_page >= start_page),
            FOREIGN KEY (plan_id) REFERENCES daily_plans(id)
        );

        CREATE INDEX IF NOT EXISTS idx_verses_chapter ON verses(chapter_number);
        CREATE INDEX IF NOT EXISTS idx_daily_plans_student_day ON daily_plans(student_id, day);
        CREATE INDEX IF NOT EXISTS idx_memorization_tasks_plan ON memorization_tasks(plan_id);
        "#,
    )?;

    record_version(conn, 1, "Create planner tables")?;
    Ok(())
}

/// v1→v2: Topic and free-text notes on daily plans
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1→v2: Add plan topic and notes");

    add_column_if_missing(conn, "daily_plans", "topic", "TEXT NOT NULL DEFAULT 'Daily plan'")?;
    add_column_if_missing(conn, "daily_plans", "notes", "TEXT")?;

    record_version(conn, 2, "Add plan topic and notes")?;
    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, now, description],
    )?;
    tracing::info!("Recorded schema version {} - {}", version, description);
    Ok(())
}

/// Get current schema version (0 if no versions recorded)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM db_version",
        [],
        |row| row.get(0),
    )
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn.prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
    if !column_exists(conn, table, column) {
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(column_exists(&conn, "daily_plans", "notes"));
        assert!(column_exists(&conn, "daily_plans", "topic"));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let recorded: i64 = conn
            .query_row("SELECT COUNT(*) FROM db_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(recorded, SCHEMA_VERSION as i64);
    }

    #[test]
    fn test_review_range_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO review_assignments (plan_id, start_page, end_page) VALUES (1, 10, 5)",
            [],
        );
        assert!(result.is_err());
    }
}

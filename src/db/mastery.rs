//! Per-student mastery buffer

use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// Add a verse to the buffer; adding it twice keeps a single membership
pub fn add_mastered(conn: &Connection, student_id: i64, verse_number: u32) -> Result<bool> {
    let now = Utc::now().to_rfc3339();
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO mastery_buffer (student_id, verse_number, added_at) VALUES (?1, ?2, ?3)",
        params![student_id, verse_number, now],
    )?;
    Ok(inserted > 0)
}

pub fn remove_mastered(conn: &Connection, student_id: i64, verse_number: u32) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM mastery_buffer WHERE student_id = ?1 AND verse_number = ?2",
        params![student_id, verse_number],
    )?;
    Ok(removed > 0)
}

#[cfg(test)]
pub fn is_mastered(conn: &Connection, student_id: i64, verse_number: u32) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM mastery_buffer WHERE student_id = ?1 AND verse_number = ?2",
        params![student_id, verse_number],
        |row| row.get(0),
    )
}

pub fn get_mastered_verses(conn: &Connection, student_id: i64) -> Result<Vec<u32>> {
    let mut stmt = conn.prepare(
        "SELECT verse_number FROM mastery_buffer WHERE student_id = ?1 ORDER BY verse_number ASC",
    )?;
    let verses = stmt
        .query_map(params![student_id], |row| row.get(0))?
        .collect::<Result<Vec<u32>>>()?;
    Ok(verses)
}

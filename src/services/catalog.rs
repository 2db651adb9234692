//! Catalog import.
//!
//! The import document is a JSON array of chapters in reading order:
//! `[{"name": ..., "ayahs": [{"id": 1, "text": ..., "transcription": ...}]}]`.

use rusqlite::Connection;
use std::path::Path;

use crate::db;
use crate::domain::ChapterSeed;
use crate::error::PlannerError;

pub fn parse_catalog(json: &str) -> Result<Vec<ChapterSeed>, PlannerError> {
    Ok(serde_json::from_str(json)?)
}

/// Seed the catalog from a JSON file; returns the number of verses imported
pub fn import_catalog_file(conn: &Connection, path: &Path) -> Result<usize, PlannerError> {
    let contents = std::fs::read_to_string(path)?;
    let chapters = parse_catalog(&contents)?;
    let imported = db::seed_catalog(conn, &chapters)?;

    if imported == 0 {
        tracing::info!("Catalog already seeded, skipped {}", path.display());
    } else {
        tracing::info!(
            "Imported {} verses in {} chapters from {}",
            imported,
            chapters.len(),
            path.display()
        );
    }
    Ok(imported)
}

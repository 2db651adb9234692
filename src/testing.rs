//! Test utilities for database setup.
//!
//! Provides helpers that reuse the authoritative schema migrations,
//! eliminating schema duplication in test code.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::PlannerConfig;
use crate::db;
use crate::domain::{ChapterSeed, VerseSeed};

const DB_FILE: &str = "planner.db";

/// Verses per chapter in the synthetic catalog built by [`TestEnv::with_catalog`]
pub const VERSES_PER_TEST_CHAPTER: u32 = 7;

/// Test database backed by a file in a temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Connection with the full planner schema (all migrations)
    pub conn: Connection,
    pub config: PlannerConfig,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join(DB_FILE))?;
        db::run_migrations(&conn)?;

        Ok(Self {
            temp,
            conn,
            config: PlannerConfig::default(),
        })
    }

    /// Environment with a catalog of `verse_count` verses.
    ///
    /// Verses are grouped into chapters of [`VERSES_PER_TEST_CHAPTER`]; verse
    /// `n` has text `"Verse n"` and chapter `c` is named `"Chapter c"`.
    pub fn with_catalog(verse_count: u32) -> Self {
        let env = Self::new().expect("test database");
        db::seed_catalog(&env.conn, &test_catalog(verse_count)).expect("seed catalog");
        env
    }

    /// Path of the database file, for opening extra connections
    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join(DB_FILE)
    }

    /// Insert a student with review starting at page 1, one page per day
    pub fn add_student(&self, name: &str) -> i64 {
        db::insert_student(&self.conn, name, 1, 1).expect("insert student")
    }
}

pub fn test_catalog(verse_count: u32) -> Vec<ChapterSeed> {
    let mut chapters: Vec<ChapterSeed> = Vec::new();
    for number in 1..=verse_count {
        if (number - 1) % VERSES_PER_TEST_CHAPTER == 0 {
            chapters.push(ChapterSeed {
                name: format!("Chapter {}", chapters.len() + 1),
                ayahs: Vec::new(),
            });
        }
        if let Some(chapter) = chapters.last_mut() {
            chapter.ayahs.push(VerseSeed {
                id: chapter.ayahs.len() as u32 + 1,
                text: format!("Verse {}", number),
                transcription: String::new(),
            });
        }
    }
    chapters
}

/// A day in October 2026
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid October day")
}

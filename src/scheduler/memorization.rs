//! Weekly memorization schedule.
//!
//! Walks the catalog from the student's cursor and fills each day of the
//! horizon with the next verses that are not in the mastery buffer. Every
//! run regenerates the tasks of the whole horizon.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::config::PlannerConfig;
use crate::db;
use crate::domain::{CursorPolicy, Student, FIRST_VERSE};
use crate::error::{Entity, PlannerError};

use super::mastery::MasteryIndex;

/// Summary of one memorization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemorizationOutcome {
  pub tasks_created: usize,
  pub first_assigned: Option<u32>,
  pub last_assigned: Option<u32>,
  /// The catalog ran out before every slot of the horizon was filled
  pub exhausted: bool,
}

pub fn generate_memorization_week(
  conn: &Connection,
  student: &mut Student,
  config: &PlannerConfig,
  today: NaiveDate,
) -> Result<MemorizationOutcome, PlannerError> {
  let catalog_size = db::catalog_size(conn)?;
  let mastered = MasteryIndex::load(conn, student.id, catalog_size)?;

  let start = *student.memorization_cursor.get_or_insert(FIRST_VERSE);
  let mut candidate = start;
  let mut outcome = MemorizationOutcome::default();

  for offset in 0..config.horizon_days {
    let day = today + Duration::days(offset as i64);
    let plan_id = db::get_or_create_plan(conn, student.id, day)?;
    db::delete_tasks_for_plan(conn, plan_id)?;

    // Exhausted: later days stay empty rather than repeating the last verse
    if outcome.exhausted {
      continue;
    }

    for _ in 0..config.verses_per_day {
      let Some(verse_number) = mastered.next_unmastered(candidate) else {
        outcome.exhausted = true;
        break;
      };
      let verse = db::get_verse(conn, verse_number)?
        .ok_or(PlannerError::NotFound(Entity::Verse(verse_number)))?;

      db::insert_task(conn, plan_id, verse.chapter_number, verse.number)?;
      outcome.tasks_created += 1;
      outcome.first_assigned.get_or_insert(verse.number);
      outcome.last_assigned = Some(verse.number);
      candidate = verse.number + 1;
    }
  }

  // Every run rewrites the whole horizon, so forward progress is where today's
  // open work begins. Later slots are only a forecast.
  let cursor = match config.cursor_policy {
    CursorPolicy::RestartEachWeek => FIRST_VERSE,
    CursorPolicy::ContinueFromLastAssigned => outcome.first_assigned.unwrap_or(start),
  };
  student.memorization_cursor = Some(cursor);
  db::update_memorization_cursor(conn, student.id, student.memorization_cursor)?;

  if outcome.exhausted {
    tracing::info!(
      "Catalog exhausted for student {} after {} task(s)",
      student.id,
      outcome.tasks_created
    );
  }
  tracing::debug!(
    "Memorization week for student {} from {}: {} task(s), cursor now {}",
    student.id,
    today,
    outcome.tasks_created,
    cursor
  );

  Ok(outcome)
}

//! Mastery buffer lookups and synchronization.
//!
//! The memorization scheduler needs "first verse at or after N that is not
//! mastered" for every slot it fills. [`MasteryIndex`] answers that from a
//! bitset over verse numbers, skipping 64 mastered verses per word.

use rusqlite::Connection;

use crate::db;
use crate::error::{Entity, PlannerError};

/// Bitset of mastered verses for one student; bit `n - 1` is verse `n`.
#[derive(Debug, Clone)]
pub struct MasteryIndex {
  words: Vec<u64>,
  catalog_size: u32,
}

impl MasteryIndex {
  pub fn new(catalog_size: u32) -> Self {
    Self {
      words: vec![0; (catalog_size as usize).div_ceil(64)],
      catalog_size,
    }
  }

  pub fn from_verses(catalog_size: u32, verses: impl IntoIterator<Item = u32>) -> Self {
    let mut index = Self::new(catalog_size);
    for verse in verses {
      index.insert(verse);
    }
    index
  }

  /// Build the index from the student's stored buffer
  pub fn load(conn: &Connection, student_id: i64, catalog_size: u32) -> Result<Self, PlannerError> {
    let verses = db::get_mastered_verses(conn, student_id)?;
    Ok(Self::from_verses(catalog_size, verses))
  }

  /// Mark a verse as mastered; numbers outside the catalog are ignored
  pub fn insert(&mut self, verse: u32) {
    if let Some((word, bit)) = self.position(verse) {
      self.words[word] |= 1u64 << bit;
    }
  }

  #[cfg(test)]
  pub fn contains(&self, verse: u32) -> bool {
    self
      .position(verse)
      .is_some_and(|(word, bit)| self.words[word] & (1u64 << bit) != 0)
  }

  /// First verse at or after `from` that is not mastered, or None past the end of the catalog
  pub fn next_unmastered(&self, from: u32) -> Option<u32> {
    let total = self.catalog_size as usize;
    let mut bit = from.max(1) as usize - 1;

    while bit < total {
      let word = bit / 64;
      let free = !self.words[word] >> (bit % 64);
      if free != 0 {
        let found = bit + free.trailing_zeros() as usize;
        return (found < total).then(|| found as u32 + 1);
      }
      bit = (word + 1) * 64;
    }
    None
  }

  fn position(&self, verse: u32) -> Option<(usize, u32)> {
    if verse == 0 || verse > self.catalog_size {
      return None;
    }
    let bit = verse as usize - 1;
    Some((bit / 64, (bit % 64) as u32))
  }
}

/// Bring the owner's mastery buffer in line with the completion flags of a plan.
///
/// Done tasks add their verse, open tasks remove it. Both directions are
/// idempotent, so this can run after every flag change.
pub fn sync_buffer(conn: &Connection, plan_id: i64) -> Result<(), PlannerError> {
  let plan = db::get_plan(conn, plan_id)?.ok_or(PlannerError::NotFound(Entity::PlanId(plan_id)))?;

  for task in db::get_tasks_for_plan(conn, plan.id)? {
    if task.is_done {
      if db::add_mastered(conn, plan.student_id, task.verse_number)? {
        tracing::debug!("Student {} mastered verse {}", plan.student_id, task.verse_number);
      }
    } else if db::remove_mastered(conn, plan.student_id, task.verse_number)? {
      tracing::debug!("Student {} reopened verse {}", plan.student_id, task.verse_number);
    }
  }

  Ok(())
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Topic given to plans created by the schedulers
pub const DEFAULT_PLAN_TOPIC: &str = "Daily plan";

/// Container for one student's work on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
  pub id: i64,
  pub student_id: i64,
  pub day: NaiveDate,
  pub topic: String,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorizationTask {
  pub id: i64,
  pub plan_id: i64,
  pub chapter_number: u32,
  pub verse_number: u32,
  pub is_done: bool,
}

/// Inclusive page range of a review assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
  pub start: u32,
  pub end: u32,
}

impl PageRange {
  /// Range of `pages_per_day` pages from `start`, clipped at `max_page`.
  ///
  /// A start outside `1..=max_page` begins a new cycle at page 1.
  pub fn starting_at(start: u32, pages_per_day: u32, max_page: u32) -> Self {
    let start = if start == 0 || start > max_page { 1 } else { start };
    let end = start
      .saturating_add(pages_per_day.saturating_sub(1))
      .min(max_page)
      .max(start);
    Self { start, end }
  }

  /// The range that follows this one once it has been reviewed.
  ///
  /// Starting past the last page begins a new cycle at page 1.
  pub fn advanced(&self, pages_per_day: u32, max_page: u32) -> Self {
    let next = self.start.saturating_add(pages_per_day);
    let start = if next > max_page { 1 } else { next };
    Self::starting_at(start, pages_per_day, max_page)
  }

  pub fn fits(&self, max_page: u32) -> bool {
    self.start >= 1 && self.start <= self.end && self.end <= max_page
  }

  pub fn page_count(&self) -> u32 {
    self.end - self.start + 1
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAssignment {
  pub id: i64,
  pub plan_id: i64,
  pub range: PageRange,
  pub is_done: bool,
}

impl ReviewAssignment {
  /// Range the following day should carry: same pages until this one is finished.
  pub fn next_range(&self, pages_per_day: u32, max_page: u32) -> PageRange {
    if self.is_done {
      self.range.advanced(pages_per_day, max_page)
    } else if self.range.fits(max_page) {
      self.range
    } else {
      PageRange::starting_at(self.range.start, pages_per_day, max_page)
    }
  }
}

// ==================== Read model ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
  pub id: i64,
  pub chapter_name: String,
  pub verse_number: u32,
  pub verse_text: String,
  pub is_done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
  pub id: i64,
  pub start_page: u32,
  pub end_page: u32,
  pub is_done: bool,
}

impl From<&ReviewAssignment> for ReviewView {
  fn from(review: &ReviewAssignment) -> Self {
    Self {
      id: review.id,
      start_page: review.range.start,
      end_page: review.range.end,
      is_done: review.is_done,
    }
  }
}

/// One day of a student's plan as handed to request handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanView {
  pub id: i64,
  pub day: NaiveDate,
  pub topic: String,
  pub notes: Option<String>,
  pub tasks: Vec<TaskView>,
  pub review: Option<ReviewView>,
}

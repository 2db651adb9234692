use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What happens to the memorization cursor once a week has been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorPolicy {
  /// Reset the cursor to the first verse; mastered verses are skipped on the next run.
  #[default]
  RestartEachWeek,
  /// Keep the cursor right after the last verse assigned this week.
  ContinueFromLastAssigned,
}

impl CursorPolicy {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "restart-each-week" => Some(Self::RestartEachWeek),
      "continue-from-last-assigned" => Some(Self::ContinueFromLastAssigned),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::RestartEachWeek => "restart-each-week",
      Self::ContinueFromLastAssigned => "continue-from-last-assigned",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id: i64,
  pub name: String,
  /// Next verse to consider for memorization (None until the first generation)
  pub memorization_cursor: Option<u32>,
  pub review_start_page: u32,
  pub review_pages_per_day: u32,
  /// Guard against generating the week more than once per day
  pub last_plan_generated_on: Option<NaiveDate>,
}

impl Student {
  pub fn needs_generation(&self, today: NaiveDate) -> bool {
    self.last_plan_generated_on != Some(today)
  }
}

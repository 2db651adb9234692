pub mod catalog;
pub mod plan;
pub mod student;

pub use catalog::{Chapter, ChapterSeed, Verse, VerseSeed, FIRST_VERSE};
pub use plan::{
  DailyPlan, MemorizationTask, PageRange, PlanView, ReviewAssignment, ReviewView, TaskView,
  DEFAULT_PLAN_TOPIC,
};
pub use student::{CursorPolicy, Student};

//! Error type shared by the schedulers and the services built on them.

use chrono::NaiveDate;
use thiserror::Error;

/// Record that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Student(i64),
    Verse(u32),
    Plan { student_id: i64, day: NaiveDate },
    PlanId(i64),
    Task(i64),
    Review(i64),
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student(id) => write!(f, "student {}", id),
            Self::Verse(number) => write!(f, "verse {}", number),
            Self::Plan { student_id, day } => {
                write!(f, "plan for student {} on {}", student_id, day)
            }
            Self::PlanId(id) => write!(f, "plan {}", id),
            Self::Task(id) => write!(f, "task {}", id),
            Self::Review(id) => write!(f, "review {}", id),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error(
        "Invalid review window: start page {start_page} with {pages_per_day} pages per day (last page is {max_page})"
    )]
    InvalidRange {
        start_page: u32,
        pages_per_day: u32,
        max_page: u32,
    },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Database unavailable")]
    Unavailable,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// True for errors caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidRange { .. })
    }
}

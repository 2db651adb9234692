use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hifz_planner::config::{self, PlannerConfig};
use hifz_planner::db::{self, LogOnError};
use hifz_planner::scheduler::SystemClock;
use hifz_planner::{services, PlannerError};

/// Daily memorization and review planner
#[derive(Parser, Debug)]
#[command(name = "hifz-planner", version)]
struct Cli {
  /// Database file (overrides config.toml and DATABASE_PATH)
  #[arg(long)]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Seed the verse catalog from a JSON file (skipped if already seeded)
  Import { path: PathBuf },
  /// Register a student
  AddStudent { name: String },
  /// Set the review start page and pages per day
  ConfigureReview {
    student: i64,
    start_page: u32,
    pages_per_day: u32,
  },
  /// Show the student's plans for the coming week, generating them if needed
  Plan {
    student: i64,
    /// Only show this day (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// Mark one of today's memorization tasks
  MarkTask {
    student: i64,
    task: i64,
    #[arg(long)]
    undone: bool,
  },
  /// Mark today's review assignment
  MarkReview {
    student: i64,
    review: i64,
    #[arg(long)]
    undone: bool,
  },
  /// Set or clear the notes of a plan
  Notes {
    student: i64,
    date: NaiveDate,
    notes: Option<String>,
  },
}

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hifz_planner=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  if let Err(e) = run(cli) {
    tracing::error!("{}", e);
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<(), PlannerError> {
  let config = PlannerConfig::load()?;
  let db_path = cli.database.unwrap_or_else(config::load_database_path);
  let pool = db::init_db(&db_path)?;
  let mut conn = db::try_lock(&pool)?;

  if let Some(catalog) = config::load_catalog_path() {
    services::import_catalog_file(&conn, &catalog).log_warn("Failed to seed catalog");
  }

  execute(&mut conn, &config, cli.command)
}

fn execute(conn: &mut Connection, config: &PlannerConfig, command: Command) -> Result<(), PlannerError> {
  let clock = SystemClock;
  match command {
    Command::Import { path } => {
      let imported = services::import_catalog_file(conn, &path)?;
      print_json(&serde_json::json!({ "imported": imported }))
    }
    Command::AddStudent { name } => print_json(&services::create_student(conn, config, &name)?),
    Command::ConfigureReview {
      student,
      start_page,
      pages_per_day,
    } => print_json(&services::configure_review(
      conn,
      config,
      student,
      start_page,
      pages_per_day,
    )?),
    Command::Plan { student, date } => {
      print_json(&services::get_homework(conn, &clock, config, student, date)?)
    }
    Command::MarkTask {
      student,
      task,
      undone,
    } => print_json(&services::mark_task(conn, &clock, student, task, !undone)?),
    Command::MarkReview {
      student,
      review,
      undone,
    } => print_json(&services::mark_review(conn, &clock, student, review, !undone)?),
    Command::Notes {
      student,
      date,
      notes,
    } => print_json(&services::set_plan_notes(conn, student, date, notes.as_deref())?),
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), PlannerError> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

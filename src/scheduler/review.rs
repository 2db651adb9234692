//! Rolling murajaah (review) schedule.
//!
//! Each day of the horizon carries one page range. A day repeats the range of
//! the day before it until that range is marked done; only then does the
//! window move forward by the student's pages per day.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

use crate::config::PlannerConfig;
use crate::db;
use crate::domain::{PageRange, ReviewAssignment, Student};
use crate::error::PlannerError;

pub fn generate_review_week(
  conn: &Connection,
  student: &mut Student,
  config: &PlannerConfig,
  today: NaiveDate,
) -> Result<(), PlannerError> {
  let pages_per_day = student.review_pages_per_day;
  let max_page = config.max_page;
  let mut running_start = student.review_start_page;

  // The day before the run is only looked at, never created
  let mut previous = match db::find_plan(conn, student.id, today - Duration::days(1))? {
    Some(plan) => db::get_review_for_plan(conn, plan.id)?,
    None => None,
  };

  for offset in 0..config.horizon_days {
    let day = today + Duration::days(offset as i64);
    let plan_id = db::get_or_create_plan(conn, student.id, day)?;

    let expected = match &previous {
      Some(prev) => prev.next_range(pages_per_day, max_page),
      None => PageRange::starting_at(running_start, pages_per_day, max_page),
    };

    let current = match db::get_review_for_plan(conn, plan_id)? {
      None => {
        let id = db::insert_review(conn, plan_id, expected)?;
        ReviewAssignment {
          id,
          plan_id,
          range: expected,
          is_done: false,
        }
      }
      // Finished work is never rewritten; without a previous day there is nothing to follow
      Some(existing)
        if existing.is_done
          || existing.range == expected
          || (previous.is_none() && existing.range.fits(max_page)) =>
      {
        existing
      }
      Some(mut existing) => {
        tracing::debug!(
          "Review on {} for student {} moved from {:?} to {:?}",
          day,
          student.id,
          existing.range,
          expected
        );
        db::update_review_range(conn, existing.id, expected)?;
        existing.range = expected;
        existing
      }
    };

    running_start = current.range.start;
    previous = Some(current);
  }

  student.review_start_page = running_start;
  db::update_review_start_page(conn, student.id, running_start)?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{day, TestEnv};
  use proptest::prelude::*;

  fn student_with_window(env: &TestEnv, start_page: u32, pages_per_day: u32) -> Student {
    let id = db::insert_student(&env.conn, "Hamza", start_page, pages_per_day).unwrap();
    db::get_student(&env.conn, id).unwrap().unwrap()
  }

  fn review_on(env: &TestEnv, student_id: i64, d: NaiveDate) -> ReviewAssignment {
    let plan = db::find_plan(&env.conn, student_id, d).unwrap().unwrap();
    db::get_review_for_plan(&env.conn, plan.id).unwrap().unwrap()
  }

  #[test]
  fn test_first_run_repeats_window_until_done() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 1, 3);

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    for d in 18..25 {
      assert_eq!(review_on(&env, student.id, day(d)).range, PageRange { start: 1, end: 3 });
    }
    assert_eq!(student.review_start_page, 1);
  }

  #[test]
  fn test_range_clipped_at_last_page() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 600, 10);

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 600, end: 604 });
  }

  #[test]
  fn test_unfinished_yesterday_is_repeated() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 40, 2);
    let yesterday = db::get_or_create_plan(&env.conn, student.id, day(17)).unwrap();
    db::insert_review(&env.conn, yesterday, PageRange { start: 12, end: 13 }).unwrap();

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 12, end: 13 });
    assert_eq!(student.review_start_page, 12);
  }

  #[test]
  fn test_finished_yesterday_advances() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 1, 2);
    let yesterday = db::get_or_create_plan(&env.conn, student.id, day(17)).unwrap();
    let review = db::insert_review(&env.conn, yesterday, PageRange { start: 12, end: 13 }).unwrap();
    db::set_review_done(&env.conn, review, true).unwrap();

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 14, end: 15 });
    // Later days wait for day 18 to be finished
    assert_eq!(review_on(&env, student.id, day(24)).range, PageRange { start: 14, end: 15 });
    assert_eq!(student.review_start_page, 14);
    assert_eq!(db::get_student(&env.conn, student.id).unwrap().unwrap().review_start_page, 14);
  }

  #[test]
  fn test_existing_day_follows_unfinished_previous() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 1, 2);
    let yesterday = db::get_or_create_plan(&env.conn, student.id, day(17)).unwrap();
    db::insert_review(&env.conn, yesterday, PageRange { start: 5, end: 6 }).unwrap();
    let today = db::get_or_create_plan(&env.conn, student.id, day(18)).unwrap();
    db::insert_review(&env.conn, today, PageRange { start: 7, end: 8 }).unwrap();

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 5, end: 6 });
  }

  #[test]
  fn test_existing_day_catches_up_after_finish() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 1, 2);

    generate_review_week(&env.conn, &mut student, &env.config, day(17)).unwrap();
    let monday = review_on(&env, student.id, day(17));
    db::set_review_done(&env.conn, monday.id, true).unwrap();

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 3, end: 4 });
    assert_eq!(review_on(&env, student.id, day(23)).range, PageRange { start: 3, end: 4 });
    // Past days are not touched
    assert_eq!(review_on(&env, student.id, day(17)).range, PageRange { start: 1, end: 2 });
  }

  #[test]
  fn test_done_review_is_not_rewritten() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 1, 2);
    let yesterday = db::get_or_create_plan(&env.conn, student.id, day(17)).unwrap();
    db::insert_review(&env.conn, yesterday, PageRange { start: 5, end: 6 }).unwrap();
    let today = db::get_or_create_plan(&env.conn, student.id, day(18)).unwrap();
    let done = db::insert_review(&env.conn, today, PageRange { start: 9, end: 10 }).unwrap();
    db::set_review_done(&env.conn, done, true).unwrap();

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 9, end: 10 });
    assert_eq!(review_on(&env, student.id, day(19)).range, PageRange { start: 11, end: 12 });
  }

  #[test]
  fn test_cycle_restarts_after_last_page() {
    let env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 1, 4);
    let yesterday = db::get_or_create_plan(&env.conn, student.id, day(17)).unwrap();
    let review = db::insert_review(&env.conn, yesterday, PageRange { start: 601, end: 604 }).unwrap();
    db::set_review_done(&env.conn, review, true).unwrap();

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 1, end: 4 });
  }

  #[test]
  fn test_lowered_last_page_keeps_ranges_in_bounds() {
    let mut env = TestEnv::new().unwrap();
    let mut student = student_with_window(&env, 500, 5);

    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();
    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 500, end: 504 });

    env.config.max_page = 300;
    generate_review_week(&env.conn, &mut student, &env.config, day(18)).unwrap();

    for d in 18..25 {
      let range = review_on(&env, student.id, day(d)).range;
      assert!(range.fits(300), "{:?} on day {}", range, d);
    }
    assert_eq!(review_on(&env, student.id, day(18)).range, PageRange { start: 1, end: 5 });
    assert_eq!(student.review_start_page, 1);
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Over simulated days with random completion, every generated window
    /// repeats unfinished ranges and advances finished ones.
    #[test]
    fn review_windows_only_advance_after_completion(
      start_page in 1u32..=20,
      pages_per_day in 1u32..=8,
      completions in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
      let mut env = TestEnv::new().unwrap();
      env.config.max_page = 20;
      let mut student = student_with_window(&env, start_page, pages_per_day);
      let first_day = day(1);

      for (n, finished) in completions.iter().enumerate() {
        let today = first_day + Duration::days(n as i64);
        generate_review_week(&env.conn, &mut student, &env.config, today).unwrap();

        for offset in -1..(env.config.horizon_days as i64 - 1) {
          let this_day = today + Duration::days(offset);
          let Some(plan) = db::find_plan(&env.conn, student.id, this_day).unwrap() else {
            continue;
          };
          let this = db::get_review_for_plan(&env.conn, plan.id).unwrap().unwrap();
          let next = review_on(&env, student.id, this_day + Duration::days(1));

          prop_assert!(next.range.end <= 20);
          prop_assert!(next.range.page_count() <= pages_per_day);
          if this.is_done {
            let advanced = this.range.start + pages_per_day;
            let expected_start = if advanced > 20 { 1 } else { advanced };
            prop_assert_eq!(next.range.start, expected_start);
          } else {
            prop_assert_eq!(next.range, this.range);
          }
        }

        if *finished {
          let todays = review_on(&env, student.id, today);
          db::set_review_done(&env.conn, todays.id, true).unwrap();
        }
      }
    }
  }
}

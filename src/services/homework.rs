//! Daily homework: lazy weekly generation, plan views and completion updates.
//!
//! `get_homework` is what a student's client hits first each day. The week is
//! generated at most once per calendar day, guarded by the student's
//! `last_plan_generated_on` stamp, inside one immediate transaction so that a
//! failure leaves no half-generated week and concurrent requests serialize.

use chrono::{Duration, NaiveDate};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::config::PlannerConfig;
use crate::db;
use crate::domain::{DailyPlan, MemorizationTask, PlanView, ReviewAssignment, ReviewView};
use crate::error::{Entity, PlannerError};
use crate::scheduler::{
    generate_memorization_week, generate_review_week, sync_buffer, Clock, MemorizationOutcome,
};

/// What `ensure_week_generated` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub generated: bool,
    pub memorization: Option<MemorizationOutcome>,
}

/// Generate the student's week unless it was already generated today
pub fn ensure_week_generated(
    conn: &mut Connection,
    clock: &impl Clock,
    config: &PlannerConfig,
    student_id: i64,
) -> Result<GenerationReport, PlannerError> {
    let today = clock.today();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut student = db::get_student(&tx, student_id)?
        .ok_or(PlannerError::NotFound(Entity::Student(student_id)))?;
    if !student.needs_generation(today) {
        tracing::debug!("Week for student {} already generated on {}", student_id, today);
        return Ok(GenerationReport {
            generated: false,
            memorization: None,
        });
    }

    let outcome = generate_memorization_week(&tx, &mut student, config, today)?;
    generate_review_week(&tx, &mut student, config, today)?;
    db::stamp_plan_generated(&tx, student_id, today)?;
    tx.commit()?;

    tracing::info!(
        "Generated week for student {} starting {}: {} memorization task(s)",
        student_id,
        today,
        outcome.tasks_created
    );
    Ok(GenerationReport {
        generated: true,
        memorization: Some(outcome),
    })
}

/// Plans from `today` through the end of the horizon, optionally narrowed to one day
pub fn week_view(
    conn: &Connection,
    config: &PlannerConfig,
    student_id: i64,
    today: NaiveDate,
    only_day: Option<NaiveDate>,
) -> Result<Vec<PlanView>, PlannerError> {
    if db::get_student(conn, student_id)?.is_none() {
        return Err(PlannerError::NotFound(Entity::Student(student_id)));
    }

    let until = today + Duration::days(config.horizon_days as i64);
    let plans = db::get_plans_between(conn, student_id, today, until)?;

    plans
        .into_iter()
        .filter(|plan| only_day.is_none_or(|d| plan.day == d))
        .map(|plan| plan_view(conn, plan))
        .collect()
}

/// Generate if needed, then return the week
pub fn get_homework(
    conn: &mut Connection,
    clock: &impl Clock,
    config: &PlannerConfig,
    student_id: i64,
    only_day: Option<NaiveDate>,
) -> Result<Vec<PlanView>, PlannerError> {
    ensure_week_generated(conn, clock, config, student_id)?;
    week_view(conn, config, student_id, clock.today(), only_day)
}

fn plan_view(conn: &Connection, plan: DailyPlan) -> Result<PlanView, PlannerError> {
    let tasks = db::get_task_views(conn, plan.id)?;
    let review = db::get_review_for_plan(conn, plan.id)?;
    Ok(PlanView {
        id: plan.id,
        day: plan.day,
        topic: plan.topic,
        notes: plan.notes,
        tasks,
        review: review.as_ref().map(ReviewView::from),
    })
}

// ==================== Completion ====================

fn todays_plan(conn: &Connection, student_id: i64, today: NaiveDate) -> Result<DailyPlan, PlannerError> {
    if db::get_student(conn, student_id)?.is_none() {
        return Err(PlannerError::NotFound(Entity::Student(student_id)));
    }
    db::find_plan(conn, student_id, today)?.ok_or(PlannerError::NotFound(Entity::Plan {
        student_id,
        day: today,
    }))
}

/// Mark one of today's memorization tasks done or not done, then sync the mastery buffer
pub fn mark_task(
    conn: &mut Connection,
    clock: &impl Clock,
    student_id: i64,
    task_id: i64,
    is_done: bool,
) -> Result<MemorizationTask, PlannerError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let plan = todays_plan(&tx, student_id, clock.today())?;

    let mut task = db::get_task(&tx, task_id)?
        .filter(|task| task.plan_id == plan.id)
        .ok_or(PlannerError::NotFound(Entity::Task(task_id)))?;

    db::set_task_done(&tx, task.id, is_done)?;
    task.is_done = is_done;
    sync_buffer(&tx, plan.id)?;
    tx.commit()?;

    Ok(task)
}

/// Mark today's review assignment done or not done, then sync the mastery buffer
pub fn mark_review(
    conn: &mut Connection,
    clock: &impl Clock,
    student_id: i64,
    review_id: i64,
    is_done: bool,
) -> Result<ReviewAssignment, PlannerError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let plan = todays_plan(&tx, student_id, clock.today())?;

    let mut review = db::get_review(&tx, review_id)?
        .filter(|review| review.plan_id == plan.id)
        .ok_or(PlannerError::NotFound(Entity::Review(review_id)))?;

    db::set_review_done(&tx, review.id, is_done)?;
    review.is_done = is_done;
    sync_buffer(&tx, plan.id)?;
    tx.commit()?;

    Ok(review)
}

pub fn set_plan_notes(
    conn: &Connection,
    student_id: i64,
    day: NaiveDate,
    notes: Option<&str>,
) -> Result<DailyPlan, PlannerError> {
    let mut plan = db::find_plan(conn, student_id, day)?
        .ok_or(PlannerError::NotFound(Entity::Plan { student_id, day }))?;
    db::set_plan_notes(conn, plan.id, notes)?;
    plan.notes = notes.map(str::to_string);
    Ok(plan)
}

use crate::error::{AppError, AppResult};
use crate::model::{
    employee::Employee,
    leave_request::{CreateLeave, Leave, LeaveDetail, LeaveStatus, UpdateLeave},
};
use crate::utils::db_utils::{PartialUpdate, fetch_by_ids};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use validator::Validate;

/// Calendar days covered by a leave, both ends included.
pub fn days_requested(start: NaiveDate, end: NaiveDate) -> f64 {
    ((end - start).num_days().abs() + 1) as f64
}

async fn with_employees(pool: &SqlitePool, leaves: Vec<Leave>) -> AppResult<Vec<LeaveDetail>> {
    let employees = fetch_by_ids::<Employee>(
        pool,
        "SELECT * FROM employees",
        leaves.iter().map(|l| l.employee_id),
    )
    .await?;

    Ok(leaves
        .into_iter()
        .map(|leave| LeaveDetail {
            employee: employees.get(&leave.employee_id).cloned(),
            leave,
        })
        .collect())
}

async fn get(pool: &SqlitePool, id: i64) -> AppResult<Leave> {
    sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Leave", id))
}

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<LeaveDetail>> {
    let leaves =
        sqlx::query_as::<_, Leave>("SELECT * FROM leaves ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?;

    with_employees(pool, leaves).await
}

pub async fn find_by_status(pool: &SqlitePool, status: LeaveStatus) -> AppResult<Vec<LeaveDetail>> {
    let leaves = sqlx::query_as::<_, Leave>(
        "SELECT * FROM leaves WHERE status = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    with_employees(pool, leaves).await
}

pub async fn find_by_employee(pool: &SqlitePool, employee_id: i64) -> AppResult<Vec<Leave>> {
    let leaves = sqlx::query_as::<_, Leave>(
        "SELECT * FROM leaves WHERE employee_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<LeaveDetail> {
    let leave = get(pool, id).await?;
    with_employees(pool, vec![leave])
        .await?
        .pop()
        .ok_or(AppError::Internal)
}

/// New leaves always start out `pending`, with the day count derived from the dates.
pub async fn create(pool: &SqlitePool, input: CreateLeave) -> AppResult<Leave> {
    input.validate()?;

    let days = days_requested(input.start_date, input.end_date);
    let leave = sqlx::query_as::<_, Leave>(
        r#"
        INSERT INTO leaves (employee_id, start_date, end_date, leave_type, reason, status, days_requested)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.employee_id)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.leave_type)
    .bind(input.reason)
    .bind(LeaveStatus::Pending)
    .bind(days)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        leave_id = leave.id,
        employee_id = leave.employee_id,
        days = leave.days_requested,
        "Leave requested"
    );
    Ok(leave)
}

pub async fn update(pool: &SqlitePool, id: i64, input: UpdateLeave) -> AppResult<LeaveDetail> {
    input.validate()?;
    let current = get(pool, id).await?;

    let days = if input.start_date.is_some() || input.end_date.is_some() {
        Some(days_requested(
            input.start_date.unwrap_or(current.start_date),
            input.end_date.unwrap_or(current.end_date),
        ))
    } else {
        None
    };

    let mut update = PartialUpdate::new("leaves");
    update
        .set("start_date", input.start_date)
        .set("end_date", input.end_date)
        .set("leave_type", input.leave_type)
        .set("reason", input.reason)
        .set("status", input.status)
        .set_nullable("rejection_reason", input.rejection_reason)
        .set("days_requested", days)
        .touch("updated_at");
    update.execute(pool, id).await?;

    find_one(pool, id).await
}

pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM leaves WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Leave", id));
    }
    Ok(())
}

/// Marks the leave approved by `approved_by`, whatever its current status.
pub async fn approve(pool: &SqlitePool, id: i64, approved_by: i64) -> AppResult<LeaveDetail> {
    let mut update = PartialUpdate::new("leaves");
    update
        .set("status", Some(LeaveStatus::Approved))
        .set("approved_by", Some(approved_by))
        .set("approved_at", Some(Utc::now().naive_utc()))
        .touch("updated_at");

    if update.execute(pool, id).await? == 0 {
        return Err(AppError::not_found("Leave", id));
    }

    tracing::info!(leave_id = id, approved_by, "Leave approved");
    find_one(pool, id).await
}

pub async fn reject(pool: &SqlitePool, id: i64, rejection_reason: String) -> AppResult<LeaveDetail> {
    let mut update = PartialUpdate::new("leaves");
    update
        .set("status", Some(LeaveStatus::Rejected))
        .set("rejection_reason", Some(rejection_reason))
        .touch("updated_at");

    if update.execute(pool, id).await? == 0 {
        return Err(AppError::not_found("Leave", id));
    }

    tracing::info!(leave_id = id, "Leave rejected");
    find_one(pool, id).await
}

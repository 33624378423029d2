use crate::error::{AppError, AppResult};
use crate::model::{
    attendance::{Attendance, AttendanceDetail, AttendanceStatus, CreateAttendance, UpdateAttendance},
    employee::Employee,
};
use crate::service::employee;
use crate::utils::db_utils::{PartialUpdate, fetch_by_ids};
use chrono::{Local, NaiveDate, NaiveTime};
use sqlx::SqlitePool;

/// Hours between two clock times of the same day, rounded to 2 decimals
/// (09:00 to 09:20 stores `0.33`, not `0.3333…`).
///
/// Plain subtraction: a check-out earlier than the check-in yields a
/// negative value. Overnight shifts are not modelled.
pub fn hours_between(check_in: NaiveTime, check_out: NaiveTime) -> f64 {
    let seconds = check_out.signed_duration_since(check_in).num_seconds() as f64;
    (seconds / 36.0).round() / 100.0
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn with_employees(pool: &SqlitePool, rows: Vec<Attendance>) -> AppResult<Vec<AttendanceDetail>> {
    let employees = fetch_by_ids::<Employee>(
        pool,
        "SELECT * FROM employees",
        rows.iter().map(|a| a.employee_id),
    )
    .await?;

    Ok(rows
        .into_iter()
        .map(|attendance| AttendanceDetail {
            employee: employees.get(&attendance.employee_id).cloned(),
            attendance,
        })
        .collect())
}

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<AttendanceDetail>> {
    let rows = sqlx::query_as::<_, Attendance>("SELECT * FROM attendances ORDER BY date DESC, id DESC")
        .fetch_all(pool)
        .await?;

    with_employees(pool, rows).await
}

/// Rows dated from `start` through `end`, both days included whatever the time of day.
pub async fn find_by_date_range(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<AttendanceDetail>> {
    let rows = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT * FROM attendances
        WHERE date >= ? AND date <= ?
        ORDER BY date DESC, id DESC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    with_employees(pool, rows).await
}

pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<AttendanceDetail> {
    let row = sqlx::query_as::<_, Attendance>("SELECT * FROM attendances WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance", id))?;

    with_employees(pool, vec![row])
        .await?
        .pop()
        .ok_or(AppError::Internal)
}

pub async fn find_by_employee(pool: &SqlitePool, employee_id: i64) -> AppResult<Vec<Attendance>> {
    let rows = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendances WHERE employee_id = ? ORDER BY date DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, input: CreateAttendance) -> AppResult<Attendance> {
    let row = sqlx::query_as::<_, Attendance>(
        r#"
        INSERT INTO attendances (employee_id, date, check_in, check_out, hours_worked, status, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.employee_id)
    .bind(input.date)
    .bind(input.check_in)
    .bind(input.check_out)
    .bind(input.hours_worked)
    .bind(input.status)
    .bind(input.notes)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update(pool: &SqlitePool, id: i64, input: UpdateAttendance) -> AppResult<AttendanceDetail> {
    let mut update = PartialUpdate::new("attendances");
    update
        .set("date", input.date)
        .set_nullable("check_in", input.check_in)
        .set_nullable("check_out", input.check_out)
        .set_nullable("hours_worked", input.hours_worked)
        .set("status", input.status)
        .set_nullable("notes", input.notes);

    if update.execute(pool, id).await? == 0 {
        return Err(AppError::not_found("Attendance", id));
    }

    find_one(pool, id).await
}

pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM attendances WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Attendance", id));
    }
    Ok(())
}

async fn find_for_day(pool: &SqlitePool, employee_id: i64, day: NaiveDate) -> AppResult<Option<Attendance>> {
    let row = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendances WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(day)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn overwrite_check_in(
    pool: &SqlitePool,
    employee_id: i64,
    day: NaiveDate,
    time: NaiveTime,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"
        UPDATE attendances SET check_in = ?
        WHERE employee_id = ? AND date = ?
        RETURNING *
        "#,
    )
    .bind(time)
    .bind(employee_id)
    .bind(day)
    .fetch_optional(pool)
    .await
}

pub async fn check_in(pool: &SqlitePool, employee_id: i64, time: NaiveTime) -> AppResult<Attendance> {
    check_in_on(pool, employee_id, today(), time).await
}

/// Records `time` as the check-in of `employee_id` on `day`.
///
/// The first check-in of a day creates a `present` row; later ones overwrite
/// the check-in time of that same row.
pub async fn check_in_on(
    pool: &SqlitePool,
    employee_id: i64,
    day: NaiveDate,
    time: NaiveTime,
) -> AppResult<Attendance> {
    employee::get(pool, employee_id).await?;

    if let Some(row) = overwrite_check_in(pool, employee_id, day, time).await? {
        tracing::info!(employee_id, %day, %time, attendance_id = row.id, "Check-in updated");
        return Ok(row);
    }

    let inserted = sqlx::query_as::<_, Attendance>(
        r#"
        INSERT INTO attendances (employee_id, date, check_in, status)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(employee_id)
    .bind(day)
    .bind(time)
    .bind(AttendanceStatus::Present)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => {
            tracing::info!(employee_id, %day, %time, attendance_id = row.id, "Checked in");
            Ok(row)
        }
        // A concurrent check-in created the row first.
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            overwrite_check_in(pool, employee_id, day, time)
                .await?
                .ok_or(AppError::Internal)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn check_out(pool: &SqlitePool, employee_id: i64, time: NaiveTime) -> AppResult<Attendance> {
    check_out_on(pool, employee_id, today(), time).await
}

/// Records the check-out on `day` and derives `hoursWorked` from the stored check-in.
pub async fn check_out_on(
    pool: &SqlitePool,
    employee_id: i64,
    day: NaiveDate,
    time: NaiveTime,
) -> AppResult<Attendance> {
    let row = find_for_day(pool, employee_id, day)
        .await?
        .ok_or_else(|| AppError::NotFound("No check-in record found for today".into()))?;

    let hours_worked = row
        .check_in
        .map(|check_in| hours_between(check_in, time))
        .or(row.hours_worked);

    let updated = sqlx::query_as::<_, Attendance>(
        "UPDATE attendances SET check_out = ?, hours_worked = ? WHERE id = ? RETURNING *",
    )
    .bind(time)
    .bind(hours_worked)
    .bind(row.id)
    .fetch_one(pool)
    .await?;

    tracing::info!(employee_id, %day, %time, hours_worked = ?updated.hours_worked, "Checked out");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::service::employee::tests::new_employee;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn staff(pool: &SqlitePool, code: &str) -> i64 {
        employee::create(pool, new_employee(code)).await.unwrap().id
    }

    async fn count_rows(pool: &SqlitePool, employee_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM attendances WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn hours_between_is_plain_subtraction() {
        assert_eq!(hours_between(at(9, 0), at(17, 30)), 8.5);
        assert_eq!(hours_between(at(9, 0), at(8, 0)), -1.0);
        assert_eq!(hours_between(at(9, 0), at(9, 20)), 0.33);
    }

    #[actix_web::test]
    async fn first_check_in_creates_present_row_then_updates_it() {
        let pool = test_pool().await;
        let emp = staff(&pool, "EMP-300").await;
        let today = day(2024, 3, 1);

        let first = check_in_on(&pool, emp, today, at(9, 0)).await.unwrap();
        assert_eq!(first.status, AttendanceStatus::Present);
        assert_eq!(first.check_in, Some(at(9, 0)));
        assert_eq!(first.date, today);

        let second = check_in_on(&pool, emp, today, at(9, 15)).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.check_in, Some(at(9, 15)));
        assert_eq!(count_rows(&pool, emp).await, 1);
    }

    #[actix_web::test]
    async fn concurrent_check_ins_share_one_row() {
        // Separate connections, so inserts can actually race.
        let path = std::env::temp_dir().join(format!("attendance-{}.db", uuid::Uuid::new_v4()));
        let pool = crate::db::init_db(&format!("sqlite://{}", path.display()))
            .await
            .unwrap();
        let emp = staff(&pool, "EMP-310").await;
        let today = day(2024, 3, 4);

        let handles: Vec<_> = (0..8)
            .map(|minute| {
                let pool = pool.clone();
                actix_web::rt::spawn(async move { check_in_on(&pool, emp, today, at(9, minute)).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(count_rows(&pool, emp).await, 1);

        pool.close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[actix_web::test]
    async fn check_out_without_check_in_is_not_found() {
        let pool = test_pool().await;
        let emp = staff(&pool, "EMP-301").await;

        let err = check_out_on(&pool, emp, day(2024, 3, 1), at(17, 0)).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn check_out_computes_hours_worked() {
        let pool = test_pool().await;
        let emp = staff(&pool, "EMP-302").await;
        let today = day(2024, 3, 1);

        check_in_on(&pool, emp, today, at(9, 0)).await.unwrap();
        let row = check_out_on(&pool, emp, today, at(17, 30)).await.unwrap();
        assert_eq!(row.check_out, Some(at(17, 30)));
        assert_eq!(row.hours_worked, Some(8.5));
    }

    #[actix_web::test]
    async fn early_check_out_gives_negative_hours() {
        let pool = test_pool().await;
        let emp = staff(&pool, "EMP-303").await;
        let today = day(2024, 3, 1);

        check_in_on(&pool, emp, today, at(9, 0)).await.unwrap();
        let row = check_out_on(&pool, emp, today, at(8, 0)).await.unwrap();
        assert_eq!(row.hours_worked, Some(-1.0));
    }

    #[actix_web::test]
    async fn check_in_for_unknown_employee_is_not_found() {
        let pool = test_pool().await;
        let err = check_in_on(&pool, 999, day(2024, 3, 1), at(9, 0)).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn date_range_covers_whole_days() {
        let pool = test_pool().await;
        let emp = staff(&pool, "EMP-304").await;
        let other = staff(&pool, "EMP-305").await;

        check_in_on(&pool, emp, day(2024, 2, 29), at(9, 0)).await.unwrap();
        check_in_on(&pool, emp, day(2024, 3, 1), at(23, 59)).await.unwrap();
        check_in_on(&pool, other, day(2024, 3, 1), at(0, 0)).await.unwrap();
        check_in_on(&pool, emp, day(2024, 3, 2), at(9, 0)).await.unwrap();

        let rows = find_by_date_range(&pool, day(2024, 3, 1), day(2024, 3, 1))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.attendance.date == day(2024, 3, 1)));
        assert!(rows.iter().all(|r| r.employee.is_some()));

        let wide = find_by_date_range(&pool, day(2024, 2, 29), day(2024, 3, 2))
            .await
            .unwrap();
        assert_eq!(wide.len(), 4);
        assert_eq!(wide[0].attendance.date, day(2024, 3, 2));
    }

    #[actix_web::test]
    async fn crud_pass_through() {
        let pool = test_pool().await;
        let emp = staff(&pool, "EMP-306").await;

        let created = create(
            &pool,
            CreateAttendance {
                employee_id: emp,
                date: day(2024, 4, 2),
                check_in: None,
                check_out: None,
                hours_worked: None,
                status: AttendanceStatus::Absent,
                notes: Some("sick call".into()),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            created.id,
            UpdateAttendance {
                status: Some(AttendanceStatus::HalfDay),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.attendance.status, AttendanceStatus::HalfDay);
        assert_eq!(updated.attendance.notes.as_deref(), Some("sick call"));

        assert_eq!(find_by_employee(&pool, emp).await.unwrap().len(), 1);

        remove(&pool, created.id).await.unwrap();
        assert!(matches!(remove(&pool, created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(find_one(&pool, created.id).await, Err(AppError::NotFound(_))));
    }
}

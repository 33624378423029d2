use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::attendance::{AttendanceRange, CheckIn, CheckOut, CreateAttendance, UpdateAttendance},
    service::attendance,
};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::json;
use sqlx::SqlitePool;

/// Calendar day of a query bound: `YYYY-MM-DD` or an ISO timestamp.
fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .ok_or_else(|| AppError::Validation(format!("invalid date '{}'", raw)))
}

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 409, description = "A row already exists for that employee and day")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn create_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, AppError> {
    let row = attendance::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

/// List attendance; with both `startDate` and `endDate` only the days in between
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceRange),
    responses(
        (status = 200, description = "Attendance rows, newest day first", body = [AttendanceDetail]),
        (status = 400, description = "Unparseable date", body = Object, example = json!({
            "error": "invalid date 'yesterday'"
        }))
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceRange>,
) -> Result<HttpResponse, AppError> {
    let rows = match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            let (start, end) = (parse_day(start)?, parse_day(end)?);
            tracing::debug!(%start, %end, "Listing attendance by date range");
            attendance::find_by_date_range(pool.get_ref(), start, end).await?
        }
        _ => attendance::find_all(pool.get_ref()).await?,
    };
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = i64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance found", body = AttendanceDetail),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn get_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(attendance::find_one(pool.get_ref(), path.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/attendance/{id}",
    params(("id" = i64, Path, description = "Attendance ID")),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceDetail),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn update_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, AppError> {
    let row = attendance::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = i64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn delete_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    attendance::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(("employee_id" = i64, Path, description = "Employee ID")),
    responses((status = 200, description = "Attendance history of the employee", body = [Attendance])),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn attendance_by_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let rows = attendance::find_by_employee(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckIn,
    responses(
        (status = 201, description = "Today's row created or its check-in time replaced", body = Attendance),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee with ID 1 not found"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CheckIn>,
) -> Result<HttpResponse, AppError> {
    let CheckIn {
        employee_id,
        check_in_time,
    } = payload.into_inner();
    tracing::debug!(recorded_by = auth.user_id, employee_id, "Check-in requested");

    let row = attendance::check_in(pool.get_ref(), employee_id, check_in_time).await?;
    Ok(HttpResponse::Created().json(row))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = CheckOut,
    responses(
        (status = 201, description = "Checked out; hoursWorked derived from the check-in", body = Attendance),
        (status = 404, description = "No check-in record found for today", body = Object, example = json!({
            "error": "No check-in record found for today"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CheckOut>,
) -> Result<HttpResponse, AppError> {
    let CheckOut {
        employee_id,
        check_out_time,
    } = payload.into_inner();
    tracing::debug!(recorded_by = auth.user_id, employee_id, "Check-out requested");

    let row = attendance::check_out(pool.get_ref(), employee_id, check_out_time).await?;
    Ok(HttpResponse::Created().json(row))
}

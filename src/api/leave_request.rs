use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::leave_request::{ApproveLeave, CreateLeave, LeaveFilter, RejectLeave, UpdateLeave},
    service::leave_request,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

/// Request a leave
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave created as pending", body = Leave),
        (status = 409, description = "Unknown employee")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn create_leave(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, AppError> {
    let leave = leave_request::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(leave))
}

/// List leaves, newest first, optionally only one status
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leaves with their employee", body = [LeaveDetail])
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn leave_list(
    pool: web::Data<SqlitePool>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, AppError> {
    let leaves = match query.status {
        Some(status) => leave_request::find_by_status(pool.get_ref(), status).await?,
        None => leave_request::find_all(pool.get_ref()).await?,
    };
    Ok(HttpResponse::Ok().json(leaves))
}

#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(("id" = i64, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave found", body = LeaveDetail),
        (status = 404, description = "Leave not found", body = Object, example = json!({
            "error": "Leave with ID 1 not found"
        }))
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn get_leave(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(leave_request::find_one(pool.get_ref(), path.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/leaves/{id}",
    params(("id" = i64, Path, description = "Leave ID")),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave updated", body = LeaveDetail),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn update_leave(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateLeave>,
) -> Result<HttpResponse, AppError> {
    let leave = leave_request::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    params(("id" = i64, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn delete_leave(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    leave_request::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/leaves/employee/{employee_id}",
    params(("employee_id" = i64, Path, description = "Employee ID")),
    responses((status = 200, description = "Leave history of the employee", body = [Leave])),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn leaves_by_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let leaves = leave_request::find_by_employee(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leaves))
}

/// Approve a leave
#[utoipa::path(
    post,
    path = "/api/leaves/{id}/approve",
    params(("id" = i64, Path, description = "Leave ID")),
    request_body = ApproveLeave,
    responses(
        (status = 200, description = "Leave approved", body = LeaveDetail),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<ApproveLeave>,
) -> Result<HttpResponse, AppError> {
    let leave_id = path.into_inner();
    tracing::debug!(leave_id, decided_by = %auth.username, "Approving leave");

    let leave = leave_request::approve(pool.get_ref(), leave_id, body.approved_by).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/// Reject a leave
#[utoipa::path(
    post,
    path = "/api/leaves/{id}/reject",
    params(("id" = i64, Path, description = "Leave ID")),
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveDetail),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<RejectLeave>,
) -> Result<HttpResponse, AppError> {
    let leave_id = path.into_inner();
    tracing::debug!(leave_id, decided_by = %auth.username, "Rejecting leave");

    let leave =
        leave_request::reject(pool.get_ref(), leave_id, body.into_inner().rejection_reason).await?;
    Ok(HttpResponse::Ok().json(leave))
}

use crate::{
    error::AppError,
    model::department::{CreateDepartment, UpdateDepartment},
    service::department,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 409, description = "Name already used", body = Object, example = json!({
            "error": "Record already exists"
        }))
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn create_department(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateDepartment>,
) -> Result<HttpResponse, AppError> {
    let department = department::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(department))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, description = "All departments", body = [Department])),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn list_departments(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(department::find_all(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department with its employees", body = DepartmentDetail),
        (status = 404, description = "Department not found")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn get_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(department::find_one(pool.get_ref(), path.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/departments/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated", body = DepartmentDetail),
        (status = 404, description = "Department not found")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn update_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateDepartment>,
) -> Result<HttpResponse, AppError> {
    let detail = department::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Employees still belong to the department")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn delete_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    department::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

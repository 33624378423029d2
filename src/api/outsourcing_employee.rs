use crate::{
    error::AppError,
    model::outsourcing_employee::{CreateOutsourcingEmployee, UpdateOutsourcingEmployee},
    service::outsourcing_employee,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

#[utoipa::path(
    get,
    path = "/api/outsourcing-employees",
    responses((status = 200, description = "Contractors with their company", body = [OutsourcingEmployeeDetail])),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn list_contractors(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(outsourcing_employee::find_all(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/outsourcing-employees/{id}",
    params(("id" = i64, Path, description = "Contractor ID")),
    responses(
        (status = 200, description = "Contractor found", body = OutsourcingEmployeeDetail),
        (status = 404, description = "Contractor not found")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn get_contractor(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let contractor = outsourcing_employee::find_one(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(contractor))
}

#[utoipa::path(
    get,
    path = "/api/outsourcing-employees/company/{company_id}",
    params(("company_id" = i64, Path, description = "Company ID")),
    responses((status = 200, description = "Contractors of the company", body = [OutsourcingEmployeeDetail])),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn contractors_by_company(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let contractors =
        outsourcing_employee::find_by_company(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(contractors))
}

#[utoipa::path(
    post,
    path = "/api/outsourcing-employees",
    request_body = CreateOutsourcingEmployee,
    responses(
        (status = 201, description = "Contractor created", body = OutsourcingEmployee),
        (status = 400, description = "Invalid input", body = Object, example = json!({
            "error": "dailyRate: dailyRate must not be less than 0"
        })),
        (status = 409, description = "Unknown company")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn create_contractor(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateOutsourcingEmployee>,
) -> Result<HttpResponse, AppError> {
    let contractor = outsourcing_employee::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(contractor))
}

#[utoipa::path(
    patch,
    path = "/api/outsourcing-employees/{id}",
    params(("id" = i64, Path, description = "Contractor ID")),
    request_body = UpdateOutsourcingEmployee,
    responses(
        (status = 200, description = "Contractor updated", body = OutsourcingEmployeeDetail),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Contractor not found")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn update_contractor(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateOutsourcingEmployee>,
) -> Result<HttpResponse, AppError> {
    let contractor =
        outsourcing_employee::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(contractor))
}

#[utoipa::path(
    delete,
    path = "/api/outsourcing-employees/{id}",
    params(("id" = i64, Path, description = "Contractor ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Contractor not found")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn delete_contractor(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    outsourcing_employee::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

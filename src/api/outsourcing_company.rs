use crate::{
    error::AppError,
    model::outsourcing_company::{CreateOutsourcingCompany, UpdateOutsourcingCompany},
    service::outsourcing_company,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

#[utoipa::path(
    get,
    path = "/api/outsourcing-companies",
    responses((status = 200, description = "Companies, newest first", body = [OutsourcingCompany])),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn list_companies(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(outsourcing_company::find_all(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/outsourcing-companies/{id}",
    params(("id" = i64, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company with its contractors", body = OutsourcingCompanyDetail),
        (status = 404, description = "Company not found")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn get_company(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let company = outsourcing_company::find_one(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(company))
}

#[utoipa::path(
    post,
    path = "/api/outsourcing-companies",
    request_body = CreateOutsourcingCompany,
    responses(
        (status = 201, description = "Company created", body = OutsourcingCompany),
        (status = 400, description = "Invalid input", body = Object, example = json!({
            "error": "contactEmail: contactEmail must be an email"
        }))
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn create_company(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateOutsourcingCompany>,
) -> Result<HttpResponse, AppError> {
    let company = outsourcing_company::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(company))
}

#[utoipa::path(
    patch,
    path = "/api/outsourcing-companies/{id}",
    params(("id" = i64, Path, description = "Company ID")),
    request_body = UpdateOutsourcingCompany,
    responses(
        (status = 200, description = "Company updated", body = OutsourcingCompanyDetail),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Company not found")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn update_company(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateOutsourcingCompany>,
) -> Result<HttpResponse, AppError> {
    let company =
        outsourcing_company::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(company))
}

#[utoipa::path(
    delete,
    path = "/api/outsourcing-companies/{id}",
    params(("id" = i64, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Contractors still belong to the company")
    ),
    tag = "Outsourcing",
    security(("bearer_auth" = []))
)]
pub async fn delete_company(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    outsourcing_company::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

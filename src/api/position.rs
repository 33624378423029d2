use crate::{
    error::AppError,
    model::position::{CreatePosition, UpdatePosition},
    service::position,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

#[utoipa::path(
    post,
    path = "/api/positions",
    request_body = CreatePosition,
    responses(
        (status = 201, description = "Position created", body = Position),
        (status = 409, description = "Title already used")
    ),
    tag = "Position",
    security(("bearer_auth" = []))
)]
pub async fn create_position(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreatePosition>,
) -> Result<HttpResponse, AppError> {
    let position = position::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(position))
}

#[utoipa::path(
    get,
    path = "/api/positions",
    responses((status = 200, description = "All positions with their holders", body = [PositionDetail])),
    tag = "Position",
    security(("bearer_auth" = []))
)]
pub async fn list_positions(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(position::find_all(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/positions/{id}",
    params(("id" = i64, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position found", body = PositionDetail),
        (status = 404, description = "Position not found")
    ),
    tag = "Position",
    security(("bearer_auth" = []))
)]
pub async fn get_position(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(position::find_one(pool.get_ref(), path.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/positions/{id}",
    params(("id" = i64, Path, description = "Position ID")),
    request_body = UpdatePosition,
    responses(
        (status = 200, description = "Position updated", body = PositionDetail),
        (status = 404, description = "Position not found")
    ),
    tag = "Position",
    security(("bearer_auth" = []))
)]
pub async fn update_position(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdatePosition>,
) -> Result<HttpResponse, AppError> {
    let detail = position::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[utoipa::path(
    delete,
    path = "/api/positions/{id}",
    params(("id" = i64, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Position not found")
    ),
    tag = "Position",
    security(("bearer_auth" = []))
)]
pub async fn delete_position(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    position::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

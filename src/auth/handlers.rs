use crate::{
    auth::{auth::AuthUser, jwt::generate_access_token},
    config::Config,
    error::AppError,
    model::user::{LoginReq, LoginResponse, RegisterReq},
    service::user,
    utils::username_index::UsernameIndex,
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

// auth end points

/// Register a user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already taken", body = Object, example = json!({
            "error": "Username already taken"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip_all, fields(username = %payload.username))]
pub async fn register(
    payload: web::Json<RegisterReq>,
    pool: web::Data<SqlitePool>,
    index: web::Data<UsernameIndex>,
) -> Result<HttpResponse, AppError> {
    let user = user::register(pool.get_ref(), index.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, payload),
    fields(username = %payload.username)
)]
pub async fn login(
    payload: web::Json<LoginReq>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let user = user::authenticate(pool.get_ref(), &payload.username, &payload.password).await?;

    debug!(user_id = user.id, "Generating access token");
    let access_token = generate_access_token(
        user.id,
        user.username.clone(),
        user.role,
        &config.jwt_secret,
        config.access_token_ttl,
    )?;

    info!(user_id = user.id, "Login successful");
    Ok(HttpResponse::Ok().json(LoginResponse { access_token, user }))
}

/// The account behind the bearer token
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn profile(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let user = user::find_by_id(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("Account no longer exists".into()),
            other => other,
        })?;
    Ok(HttpResponse::Ok().json(user))
}

use crate::auth::auth::{AuthUser, bearer_token};
use crate::config::Config;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Rejects requests without a valid bearer token and stores the session for handlers.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?
        .clone();

    let auth_user = match bearer_token(req.request())
        .and_then(|token| AuthUser::from_token(token, &config))
    {
        Ok(user) => user,
        Err(err) => return Ok(reject(req, err)),
    };

    tracing::debug!(user_id = auth_user.user_id, role = %auth_user.role, "Authenticated request");
    req.extensions_mut().insert(auth_user);

    next.call(req).await
}

fn reject(req: ServiceRequest, err: AppError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web::Data};
use futures::future::{Ready, ready};

/// The caller's session for one request.
///
/// `auth_middleware` decodes the bearer token once and stores this in the
/// request extensions; handlers take it as an extractor argument.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".into()))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must start with Bearer".into()))
}

impl AuthUser {
    pub(crate) fn from_token(token: &str, config: &Config) -> Result<Self, AppError> {
        let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        })
    }

    fn authenticate(req: &HttpRequest) -> Result<Self, AppError> {
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return Ok(user.clone());
        }

        let config = req.app_data::<Data<Config>>().ok_or_else(|| {
            tracing::error!("Config missing from app data");
            AppError::Internal
        })?;

        AuthUser::from_token(bearer_token(req)?, config)
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(AuthUser::authenticate(req))
    }
}

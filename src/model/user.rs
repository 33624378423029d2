use crate::model::role::Role;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// argon2 PHC string
    #[serde(skip)]
    pub password: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterReq {
    #[validate(length(min = 1, message = "username must not be empty"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(email)]
    #[schema(example = "jdoe@company.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, sqlx::Type, ToSchema, Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Hr,
    Manager,
    #[default]
    Employee,
}

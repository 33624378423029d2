use crate::model::employee::Employee;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    #[schema(example = "Software Engineer")]
    pub title: String,
    pub description: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub requirements: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetail {
    #[serde(flatten)]
    pub position: Position,
    pub employees: Vec<Employee>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePosition {
    #[validate(length(min = 1))]
    #[schema(example = "Software Engineer")]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(example = 60000.0)]
    pub min_salary: Option<f64>,
    #[validate(range(min = 0.0))]
    #[schema(example = 100000.0)]
    pub max_salary: Option<f64>,
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePosition {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<f64>)]
    pub min_salary: Option<Option<f64>>,
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<f64>)]
    pub max_salary: Option<Option<f64>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub requirements: Option<Option<String>>,
    pub is_active: Option<bool>,
}

use crate::model::employee::Employee;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    #[schema(example = "Engineering")]
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub manager_id: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetail {
    #[serde(flatten)]
    pub department: Department,
    pub employees: Vec<Employee>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    #[validate(length(min = 1))]
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = "Software Development")]
    pub description: Option<String>,
    #[schema(example = "Building B")]
    pub location: Option<String>,
    pub manager_id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<i64>)]
    pub manager_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

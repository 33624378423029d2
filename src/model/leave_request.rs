use crate::model::employee::Employee;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Maternity,
    Paternity,
}

/// `pending` moves once to `approved` or `rejected`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema, Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: i64,
    pub employee_id: i64,
    #[schema(example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-03")]
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub reason: String,
    pub status: LeaveStatus,
    pub approved_by: Option<i64>,
    pub approved_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    #[schema(example = 3.0)]
    pub days_requested: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDetail {
    #[serde(flatten)]
    pub leave: Leave,
    pub employee: Option<Employee>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    pub employee_id: i64,
    #[schema(example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-03")]
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[validate(length(min = 1))]
    #[schema(example = "Family trip")]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeave {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub leave_type: Option<LeaveType>,
    #[validate(length(min = 1))]
    pub reason: Option<String>,
    pub status: Option<LeaveStatus>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub rejection_reason: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveLeave {
    #[schema(example = 1)]
    pub approved_by: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectLeave {
    #[schema(example = "Project deadline")]
    pub rejection_reason: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Only leaves in this status
    pub status: Option<LeaveStatus>,
}

use crate::model::{
    attendance::Attendance, department::Department, leave_request::Leave, position::Position,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema, Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "employeeId": "EMP-001",
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@company.com",
        "phone": "+8801712345678",
        "dateOfBirth": "1990-05-14",
        "hireDate": "2024-01-01",
        "salary": 75000.0,
        "departmentId": 2,
        "positionId": 1,
        "managerId": null,
        "status": "active"
    })
)]
pub struct Employee {
    pub id: i64,

    /// Human-facing employee code, distinct from the row id.
    #[serde(rename = "employeeId")]
    pub employee_code: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub status: EmployeeStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Employee with its references resolved.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub department: Option<Department>,
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<Employee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendances: Option<Vec<Attendance>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves: Option<Vec<Leave>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[serde(rename = "employeeId")]
    #[validate(length(min = 1))]
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    #[schema(example = "john@company.com")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "1990-05-14")]
    pub date_of_birth: NaiveDate,
    #[schema(example = "2024-01-01")]
    pub hire_date: NaiveDate,
    #[validate(range(min = 0.0))]
    pub salary: f64,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub status: EmployeeStatus,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[serde(rename = "employeeId")]
    #[validate(length(min = 1))]
    pub employee_code: Option<String>,
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    pub date_of_birth: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub emergency_contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub emergency_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<i64>)]
    pub department_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<i64>)]
    pub position_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<i64>)]
    pub manager_id: Option<Option<i64>>,
    pub status: Option<EmployeeStatus>,
}

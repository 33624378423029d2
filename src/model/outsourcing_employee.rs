use crate::model::outsourcing_company::OutsourcingCompany;
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
pub enum ContractorStatus {
    #[default]
    Active,
    Inactive,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutsourcingEmployee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub company_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ContractorStatus,
    #[schema(example = 350.0)]
    pub daily_rate: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutsourcingEmployeeDetail {
    #[serde(flatten)]
    pub employee: OutsourcingEmployee,
    pub company: Option<OutsourcingCompany>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutsourcingEmployee {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone should not be empty"))]
    pub phone: String,
    #[validate(length(min = 1, message = "position should not be empty"))]
    pub position: String,
    pub company_id: i64,
    #[schema(example = "2024-02-01")]
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ContractorStatus,
    #[validate(range(min = 0.0, message = "dailyRate must not be less than 0"))]
    pub daily_rate: f64,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutsourcingEmployee {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "phone should not be empty"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "position should not be empty"))]
    pub position: Option<String>,
    pub company_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::model::nullable")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<NaiveDate>>,
    pub status: Option<ContractorStatus>,
    #[validate(range(min = 0.0, message = "dailyRate must not be less than 0"))]
    pub daily_rate: Option<f64>,
}

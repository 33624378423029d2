use crate::model::outsourcing_employee::OutsourcingEmployee;
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
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutsourcingCompany {
    pub id: i64,
    pub name: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub contract_start_date: NaiveDate,
    pub contract_end_date: NaiveDate,
    pub status: CompanyStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutsourcingCompanyDetail {
    #[serde(flatten)]
    pub company: OutsourcingCompany,
    pub employees: Vec<OutsourcingEmployee>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutsourcingCompany {
    #[validate(length(min = 1, message = "name should not be empty"))]
    #[schema(example = "Acme Staffing")]
    pub name: String,
    #[validate(length(min = 1, message = "contactPerson should not be empty"))]
    pub contact_person: String,
    #[validate(email(message = "contactEmail must be an email"))]
    #[schema(example = "contact@acme.com")]
    pub contact_email: String,
    #[validate(length(min = 1, message = "contactPhone should not be empty"))]
    pub contact_phone: String,
    #[validate(length(min = 1, message = "address should not be empty"))]
    pub address: String,
    #[schema(example = "2024-01-01")]
    pub contract_start_date: NaiveDate,
    #[schema(example = "2024-12-31")]
    pub contract_end_date: NaiveDate,
    pub status: CompanyStatus,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutsourcingCompany {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "contactPerson should not be empty"))]
    pub contact_person: Option<String>,
    #[validate(email(message = "contactEmail must be an email"))]
    pub contact_email: Option<String>,
    #[validate(length(min = 1, message = "contactPhone should not be empty"))]
    pub contact_phone: Option<String>,
    #[validate(length(min = 1, message = "address should not be empty"))]
    pub address: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub status: Option<CompanyStatus>,
}

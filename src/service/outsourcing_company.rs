use crate::error::{AppError, AppResult};
use crate::model::{
    outsourcing_company::{
        CreateOutsourcingCompany, OutsourcingCompany, OutsourcingCompanyDetail,
        UpdateOutsourcingCompany,
    },
    outsourcing_employee::OutsourcingEmployee,
};
use crate::utils::db_utils::PartialUpdate;
use sqlx::SqlitePool;
use validator::Validate;

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<OutsourcingCompany>> {
    let companies = sqlx::query_as::<_, OutsourcingCompany>(
        "SELECT * FROM outsourcing_companies ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(companies)
}

pub(crate) async fn get(pool: &SqlitePool, id: i64) -> AppResult<OutsourcingCompany> {
    sqlx::query_as::<_, OutsourcingCompany>("SELECT * FROM outsourcing_companies WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Outsourcing company", id))
}

pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<OutsourcingCompanyDetail> {
    let company = get(pool, id).await?;
    let employees = sqlx::query_as::<_, OutsourcingEmployee>(
        "SELECT * FROM outsourcing_employees WHERE company_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(OutsourcingCompanyDetail { company, employees })
}

pub async fn create(
    pool: &SqlitePool,
    input: CreateOutsourcingCompany,
) -> AppResult<OutsourcingCompany> {
    input.validate()?;

    let company = sqlx::query_as::<_, OutsourcingCompany>(
        r#"
        INSERT INTO outsourcing_companies
            (name, contact_person, contact_email, contact_phone, address,
             contract_start_date, contract_end_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.name)
    .bind(input.contact_person)
    .bind(input.contact_email)
    .bind(input.contact_phone)
    .bind(input.address)
    .bind(input.contract_start_date)
    .bind(input.contract_end_date)
    .bind(input.status)
    .fetch_one(pool)
    .await?;

    tracing::info!(company_id = company.id, name = %company.name, "Outsourcing company created");
    Ok(company)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: UpdateOutsourcingCompany,
) -> AppResult<OutsourcingCompanyDetail> {
    get(pool, id).await?;
    input.validate()?;

    let mut update = PartialUpdate::new("outsourcing_companies");
    update
        .set("name", input.name)
        .set("contact_person", input.contact_person)
        .set("contact_email", input.contact_email)
        .set("contact_phone", input.contact_phone)
        .set("address", input.address)
        .set("contract_start_date", input.contract_start_date)
        .set("contract_end_date", input.contract_end_date)
        .set("status", input.status)
        .touch("updated_at");
    update.execute(pool, id).await?;

    find_one(pool, id).await
}

/// Fails with Conflict while contractors still belong to the company.
pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    get(pool, id).await?;

    sqlx::query("DELETE FROM outsourcing_companies WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::info!(company_id = id, "Outsourcing company deleted");
    Ok(())
}

use crate::error::{AppError, AppResult};
use crate::model::{
    outsourcing_company::OutsourcingCompany,
    outsourcing_employee::{
        CreateOutsourcingEmployee, OutsourcingEmployee, OutsourcingEmployeeDetail,
        UpdateOutsourcingEmployee,
    },
};
use crate::utils::db_utils::{PartialUpdate, fetch_by_ids};
use sqlx::SqlitePool;
use validator::Validate;

async fn with_companies(
    pool: &SqlitePool,
    contractors: Vec<OutsourcingEmployee>,
) -> AppResult<Vec<OutsourcingEmployeeDetail>> {
    let companies = fetch_by_ids::<OutsourcingCompany>(
        pool,
        "SELECT * FROM outsourcing_companies",
        contractors.iter().map(|c| c.company_id),
    )
    .await?;

    Ok(contractors
        .into_iter()
        .map(|employee| OutsourcingEmployeeDetail {
            company: companies.get(&employee.company_id).cloned(),
            employee,
        })
        .collect())
}

async fn get(pool: &SqlitePool, id: i64) -> AppResult<OutsourcingEmployee> {
    sqlx::query_as::<_, OutsourcingEmployee>("SELECT * FROM outsourcing_employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Outsourcing employee", id))
}

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<OutsourcingEmployeeDetail>> {
    let contractors = sqlx::query_as::<_, OutsourcingEmployee>(
        "SELECT * FROM outsourcing_employees ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    with_companies(pool, contractors).await
}

pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<OutsourcingEmployeeDetail> {
    let contractor = get(pool, id).await?;
    with_companies(pool, vec![contractor])
        .await?
        .pop()
        .ok_or(AppError::Internal)
}

pub async fn find_by_company(
    pool: &SqlitePool,
    company_id: i64,
) -> AppResult<Vec<OutsourcingEmployeeDetail>> {
    let contractors = sqlx::query_as::<_, OutsourcingEmployee>(
        "SELECT * FROM outsourcing_employees WHERE company_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    with_companies(pool, contractors).await
}

pub async fn create(
    pool: &SqlitePool,
    input: CreateOutsourcingEmployee,
) -> AppResult<OutsourcingEmployee> {
    input.validate()?;

    let contractor = sqlx::query_as::<_, OutsourcingEmployee>(
        r#"
        INSERT INTO outsourcing_employees
            (first_name, last_name, email, phone, position, company_id,
             start_date, end_date, status, daily_rate)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.first_name)
    .bind(input.last_name)
    .bind(input.email)
    .bind(input.phone)
    .bind(input.position)
    .bind(input.company_id)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.status)
    .bind(input.daily_rate)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        contractor_id = contractor.id,
        company_id = contractor.company_id,
        "Outsourcing employee created"
    );
    Ok(contractor)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: UpdateOutsourcingEmployee,
) -> AppResult<OutsourcingEmployeeDetail> {
    get(pool, id).await?;
    input.validate()?;

    let mut update = PartialUpdate::new("outsourcing_employees");
    update
        .set("first_name", input.first_name)
        .set("last_name", input.last_name)
        .set("email", input.email)
        .set("phone", input.phone)
        .set("position", input.position)
        .set("company_id", input.company_id)
        .set("start_date", input.start_date)
        .set_nullable("end_date", input.end_date)
        .set("status", input.status)
        .set("daily_rate", input.daily_rate)
        .touch("updated_at");
    update.execute(pool, id).await?;

    find_one(pool, id).await
}

pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    get(pool, id).await?;

    sqlx::query("DELETE FROM outsourcing_employees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::model::outsourcing_employee::ContractorStatus;
    use crate::service::outsourcing_company::{self, tests::acme};
    use chrono::NaiveDate;

    fn contractor(company_id: i64) -> CreateOutsourcingEmployee {
        CreateOutsourcingEmployee {
            first_name: "Alex".into(),
            last_name: "Kim".into(),
            email: "alex.kim@acme.com".into(),
            phone: "555-0199".into(),
            position: "QA Engineer".into(),
            company_id,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: None,
            status: ContractorStatus::Active,
            daily_rate: 350.0,
        }
    }

    #[actix_web::test]
    async fn negative_daily_rate_is_rejected() {
        let pool = test_pool().await;
        let company = outsourcing_company::create(&pool, acme()).await.unwrap();
        let mut input = contractor(company.id);
        input.daily_rate = -1.0;

        assert!(matches!(create(&pool, input).await, Err(AppError::Validation(_))));
    }

    #[actix_web::test]
    async fn listing_by_company_includes_company() {
        let pool = test_pool().await;
        let company = outsourcing_company::create(&pool, acme()).await.unwrap();
        let created = create(&pool, contractor(company.id)).await.unwrap();

        let listed = find_by_company(&pool, company.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].employee.id, created.id);
        assert_eq!(listed[0].company.as_ref().unwrap().name, "Acme Staffing");

        let detail = outsourcing_company::find_one(&pool, company.id).await.unwrap();
        assert_eq!(detail.employees.len(), 1);
    }

    #[actix_web::test]
    async fn company_with_contractors_cannot_be_deleted() {
        let pool = test_pool().await;
        let company = outsourcing_company::create(&pool, acme()).await.unwrap();
        let created = create(&pool, contractor(company.id)).await.unwrap();

        assert!(matches!(
            outsourcing_company::remove(&pool, company.id).await,
            Err(AppError::Conflict(_))
        ));

        remove(&pool, created.id).await.unwrap();
        outsourcing_company::remove(&pool, company.id).await.unwrap();
    }

    #[actix_web::test]
    async fn update_ends_contract() {
        let pool = test_pool().await;
        let company = outsourcing_company::create(&pool, acme()).await.unwrap();
        let created = create(&pool, contractor(company.id)).await.unwrap();

        let updated = update(
            &pool,
            created.id,
            UpdateOutsourcingEmployee {
                end_date: Some(NaiveDate::from_ymd_opt(2024, 6, 30)),
                status: Some(ContractorStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.employee.status, ContractorStatus::Completed);
        assert_eq!(updated.employee.daily_rate, 350.0);
    }

    #[actix_web::test]
    async fn unknown_company_reference_conflicts() {
        let pool = test_pool().await;
        assert!(matches!(
            create(&pool, contractor(42)).await,
            Err(AppError::Conflict(_))
        ));
    }
}

use crate::error::{AppError, AppResult};
use crate::model::{
    employee::Employee,
    position::{CreatePosition, Position, PositionDetail, UpdatePosition},
};
use crate::utils::db_utils::PartialUpdate;
use sqlx::SqlitePool;
use std::collections::HashMap;
use validator::Validate;

async fn with_employees(pool: &SqlitePool, positions: Vec<Position>) -> AppResult<Vec<PositionDetail>> {
    let holders = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE position_id IS NOT NULL ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut by_position: HashMap<i64, Vec<Employee>> = HashMap::new();
    for employee in holders {
        if let Some(position_id) = employee.position_id {
            by_position.entry(position_id).or_default().push(employee);
        }
    }

    Ok(positions
        .into_iter()
        .map(|position| PositionDetail {
            employees: by_position.remove(&position.id).unwrap_or_default(),
            position,
        })
        .collect())
}

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<PositionDetail>> {
    let positions = sqlx::query_as::<_, Position>("SELECT * FROM positions ORDER BY id")
        .fetch_all(pool)
        .await?;

    with_employees(pool, positions).await
}

pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<PositionDetail> {
    let position = sqlx::query_as::<_, Position>("SELECT * FROM positions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Position", id))?;

    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE position_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await?;

    Ok(PositionDetail {
        position,
        employees,
    })
}

pub async fn create(pool: &SqlitePool, input: CreatePosition) -> AppResult<Position> {
    input.validate()?;

    let position = sqlx::query_as::<_, Position>(
        r#"
        INSERT INTO positions (title, description, min_salary, max_salary, requirements, is_active)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.title)
    .bind(input.description)
    .bind(input.min_salary)
    .bind(input.max_salary)
    .bind(input.requirements)
    .bind(input.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await?;

    tracing::info!(position_id = position.id, title = %position.title, "Position created");
    Ok(position)
}

pub async fn update(pool: &SqlitePool, id: i64, input: UpdatePosition) -> AppResult<PositionDetail> {
    input.validate()?;

    let mut update = PartialUpdate::new("positions");
    update
        .set("title", input.title)
        .set_nullable("description", input.description)
        .set_nullable("min_salary", input.min_salary)
        .set_nullable("max_salary", input.max_salary)
        .set_nullable("requirements", input.requirements)
        .set("is_active", input.is_active)
        .touch("updated_at");

    if update.execute(pool, id).await? == 0 {
        return Err(AppError::not_found("Position", id));
    }

    find_one(pool, id).await
}

pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM positions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Position", id));
    }

    tracing::info!(position_id = id, "Position deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::service::employee::{self, tests::new_employee};

    fn engineer() -> CreatePosition {
        CreatePosition {
            title: "Software Engineer".into(),
            description: Some("Full-stack developer".into()),
            min_salary: Some(60000.0),
            max_salary: Some(100000.0),
            requirements: None,
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn find_all_groups_holders_by_position() {
        let pool = test_pool().await;
        let dev = create(&pool, engineer()).await.unwrap();
        let mut input = new_employee("EMP-200");
        input.position_id = Some(dev.id);
        employee::create(&pool, input).await.unwrap();

        let all = find_all(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].employees.len(), 1);
        assert_eq!(all[0].position.max_salary, Some(100000.0));
    }

    #[actix_web::test]
    async fn update_then_remove() {
        let pool = test_pool().await;
        let dev = create(&pool, engineer()).await.unwrap();

        let updated = update(
            &pool,
            dev.id,
            UpdatePosition {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.position.is_active);

        remove(&pool, dev.id).await.unwrap();
        assert!(matches!(find_one(&pool, dev.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(remove(&pool, dev.id).await, Err(AppError::NotFound(_))));
    }
}

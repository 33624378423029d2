use crate::error::{AppError, AppResult};
use crate::model::{
    department::{CreateDepartment, Department, DepartmentDetail, UpdateDepartment},
    employee::Employee,
};
use crate::utils::db_utils::PartialUpdate;
use sqlx::SqlitePool;
use validator::Validate;

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<Department>> {
    let departments = sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(departments)
}

pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<DepartmentDetail> {
    let department = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Department", id))?;

    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE department_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await?;

    Ok(DepartmentDetail {
        department,
        employees,
    })
}

pub async fn create(pool: &SqlitePool, input: CreateDepartment) -> AppResult<Department> {
    input.validate()?;

    let department = sqlx::query_as::<_, Department>(
        r#"
        INSERT INTO departments (name, description, location, manager_id, is_active)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.name)
    .bind(input.description)
    .bind(input.location)
    .bind(input.manager_id)
    .bind(input.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await?;

    tracing::info!(department_id = department.id, name = %department.name, "Department created");
    Ok(department)
}

pub async fn update(pool: &SqlitePool, id: i64, input: UpdateDepartment) -> AppResult<DepartmentDetail> {
    input.validate()?;

    let mut update = PartialUpdate::new("departments");
    update
        .set("name", input.name)
        .set_nullable("description", input.description)
        .set_nullable("location", input.location)
        .set_nullable("manager_id", input.manager_id)
        .set("is_active", input.is_active)
        .touch("updated_at");

    if update.execute(pool, id).await? == 0 {
        return Err(AppError::not_found("Department", id));
    }

    find_one(pool, id).await
}

/// Fails with Conflict while employees still reference the department.
pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Department", id));
    }

    tracing::info!(department_id = id, "Department deleted");
    Ok(())
}

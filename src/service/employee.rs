use crate::error::{AppError, AppResult};
use crate::model::{
    attendance::Attendance,
    department::Department,
    employee::{CreateEmployee, Employee, EmployeeDetail, UpdateEmployee},
    leave_request::Leave,
    position::Position,
};
use crate::utils::db_utils::{PartialUpdate, fetch_by_ids};
use sqlx::SqlitePool;
use validator::Validate;

/// Resolves department, position and (optionally) manager for each employee.
async fn expand(
    pool: &SqlitePool,
    employees: Vec<Employee>,
    with_manager: bool,
) -> AppResult<Vec<EmployeeDetail>> {
    let departments = fetch_by_ids::<Department>(
        pool,
        "SELECT * FROM departments",
        employees.iter().filter_map(|e| e.department_id),
    )
    .await?;
    let positions = fetch_by_ids::<Position>(
        pool,
        "SELECT * FROM positions",
        employees.iter().filter_map(|e| e.position_id),
    )
    .await?;
    let managers = if with_manager {
        fetch_by_ids::<Employee>(
            pool,
            "SELECT * FROM employees",
            employees.iter().filter_map(|e| e.manager_id),
        )
        .await?
    } else {
        Default::default()
    };

    Ok(employees
        .into_iter()
        .map(|employee| EmployeeDetail {
            department: employee
                .department_id
                .and_then(|id| departments.get(&id).cloned()),
            position: employee
                .position_id
                .and_then(|id| positions.get(&id).cloned()),
            manager: employee.manager_id.and_then(|id| managers.get(&id).cloned()),
            attendances: None,
            leaves: None,
            employee,
        })
        .collect())
}

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<EmployeeDetail>> {
    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
        .fetch_all(pool)
        .await?;

    expand(pool, employees, true).await
}

pub(crate) async fn get(pool: &SqlitePool, id: i64) -> AppResult<Employee> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))
}

/// One employee with references plus attendance and leave history.
pub async fn find_one(pool: &SqlitePool, id: i64) -> AppResult<EmployeeDetail> {
    let employee = get(pool, id).await?;

    let attendances = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendances WHERE employee_id = ? ORDER BY date DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let leaves = sqlx::query_as::<_, Leave>(
        "SELECT * FROM leaves WHERE employee_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut detail = expand(pool, vec![employee], true)
        .await?
        .pop()
        .ok_or(AppError::Internal)?;
    detail.attendances = Some(attendances);
    detail.leaves = Some(leaves);
    Ok(detail)
}

pub async fn create(pool: &SqlitePool, input: CreateEmployee) -> AppResult<Employee> {
    input.validate()?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees
            (employee_code, first_name, last_name, email, phone, date_of_birth, hire_date,
             salary, address, emergency_contact, emergency_phone,
             department_id, position_id, manager_id, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.employee_code)
    .bind(input.first_name)
    .bind(input.last_name)
    .bind(input.email)
    .bind(input.phone)
    .bind(input.date_of_birth)
    .bind(input.hire_date)
    .bind(input.salary)
    .bind(input.address)
    .bind(input.emergency_contact)
    .bind(input.emergency_phone)
    .bind(input.department_id)
    .bind(input.position_id)
    .bind(input.manager_id)
    .bind(input.status)
    .fetch_one(pool)
    .await?;

    tracing::info!(employee_id = employee.id, code = %employee.employee_code, "Employee created");
    Ok(employee)
}

pub async fn update(pool: &SqlitePool, id: i64, input: UpdateEmployee) -> AppResult<EmployeeDetail> {
    input.validate()?;

    let mut update = PartialUpdate::new("employees");
    update
        .set("employee_code", input.employee_code)
        .set("first_name", input.first_name)
        .set("last_name", input.last_name)
        .set("email", input.email)
        .set_nullable("phone", input.phone)
        .set("date_of_birth", input.date_of_birth)
        .set("hire_date", input.hire_date)
        .set("salary", input.salary)
        .set_nullable("address", input.address)
        .set_nullable("emergency_contact", input.emergency_contact)
        .set_nullable("emergency_phone", input.emergency_phone)
        .set_nullable("department_id", input.department_id)
        .set_nullable("position_id", input.position_id)
        .set_nullable("manager_id", input.manager_id)
        .set("status", input.status)
        .touch("updated_at");

    if update.execute(pool, id).await? == 0 {
        return Err(AppError::not_found("Employee", id));
    }

    find_one(pool, id).await
}

pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Employee", id));
    }

    tracing::info!(employee_id = id, "Employee deleted");
    Ok(())
}

pub async fn find_by_department(pool: &SqlitePool, department_id: i64) -> AppResult<Vec<EmployeeDetail>> {
    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE department_id = ? ORDER BY id")
            .bind(department_id)
            .fetch_all(pool)
            .await?;

    expand(pool, employees, false).await
}

pub async fn find_by_manager(pool: &SqlitePool, manager_id: i64) -> AppResult<Vec<EmployeeDetail>> {
    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE manager_id = ? ORDER BY id")
            .bind(manager_id)
            .fetch_all(pool)
            .await?;

    expand(pool, employees, false).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::model::employee::EmployeeStatus;
    use chrono::NaiveDate;

    pub(crate) fn new_employee(code: &str) -> CreateEmployee {
        CreateEmployee {
            employee_code: code.to_string(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: format!("{}@company.com", code.to_lowercase()),
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 14).unwrap(),
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            salary: 75000.0,
            address: None,
            emergency_contact: None,
            emergency_phone: None,
            department_id: None,
            position_id: None,
            manager_id: None,
            status: EmployeeStatus::Active,
        }
    }

    async fn department(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO departments (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn find_all_expands_department_and_manager() {
        let pool = test_pool().await;
        let eng = department(&pool, "Engineering").await;

        let boss = create(&pool, new_employee("EMP-001")).await.unwrap();
        let mut input = new_employee("EMP-002");
        input.department_id = Some(eng);
        input.manager_id = Some(boss.id);
        let report = create(&pool, input).await.unwrap();

        let all = find_all(&pool).await.unwrap();
        let detail = all.iter().find(|d| d.employee.id == report.id).unwrap();
        assert_eq!(detail.department.as_ref().unwrap().name, "Engineering");
        assert_eq!(detail.manager.as_ref().unwrap().id, boss.id);
        assert!(detail.position.is_none());

        let by_manager = find_by_manager(&pool, boss.id).await.unwrap();
        assert_eq!(by_manager.len(), 1);
        assert_eq!(by_manager[0].employee.id, report.id);

        let by_department = find_by_department(&pool, eng).await.unwrap();
        assert_eq!(by_department.len(), 1);
    }

    #[actix_web::test]
    async fn update_merges_only_given_fields() {
        let pool = test_pool().await;
        let created = create(&pool, new_employee("EMP-010")).await.unwrap();

        let updated = update(
            &pool,
            created.id,
            UpdateEmployee {
                salary: Some(80000.0),
                status: Some(EmployeeStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.employee.salary, 80000.0);
        assert_eq!(updated.employee.status, EmployeeStatus::Inactive);
        assert_eq!(updated.employee.first_name, "Jane");
        assert_eq!(updated.attendances.as_deref().map(|a| a.len()), Some(0));
    }

    #[actix_web::test]
    async fn update_with_null_unassigns_manager_and_department() {
        let pool = test_pool().await;
        let eng = department(&pool, "Engineering").await;
        let boss = create(&pool, new_employee("EMP-040")).await.unwrap();

        let mut input = new_employee("EMP-041");
        input.department_id = Some(eng);
        input.manager_id = Some(boss.id);
        input.phone = Some("+1234567890".into());
        let report = create(&pool, input).await.unwrap();

        let body: UpdateEmployee =
            serde_json::from_str(r#"{"managerId": null, "departmentId": null}"#).unwrap();
        let updated = update(&pool, report.id, body).await.unwrap();

        assert_eq!(updated.employee.manager_id, None);
        assert_eq!(updated.employee.department_id, None);
        assert!(updated.manager.is_none());
        assert_eq!(updated.employee.phone.as_deref(), Some("+1234567890"));
        assert!(find_by_manager(&pool, boss.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn missing_employee_is_not_found() {
        let pool = test_pool().await;

        assert!(matches!(find_one(&pool, 77).await, Err(AppError::NotFound(_))));
        assert!(matches!(remove(&pool, 77).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            update(&pool, 77, UpdateEmployee::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn duplicate_email_conflicts() {
        let pool = test_pool().await;
        create(&pool, new_employee("EMP-020")).await.unwrap();

        let mut again = new_employee("EMP-021");
        again.email = "emp-020@company.com".into();
        assert!(matches!(create(&pool, again).await, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn unknown_department_reference_is_rejected() {
        let pool = test_pool().await;
        let mut input = new_employee("EMP-030");
        input.department_id = Some(404);
        assert!(matches!(create(&pool, input).await, Err(AppError::Conflict(_))));
    }
}

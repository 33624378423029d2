use crate::{
    error::AppError,
    model::employee::{CreateEmployee, UpdateEmployee},
    service::employee,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Malformed body", body = Object, example = json!({
            "error": "email: Invalid email"
        })),
        (status = 409, description = "Email already used or unknown reference", body = Object, example = json!({
            "error": "Record already exists"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = employee::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// List Employees with department, position and manager
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [EmployeeDetail])
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let employees = employee::find_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID, including attendance and leave history
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDetail),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee with ID 1 not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = employee::find_one(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Update Employee
#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = EmployeeDetail),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee with ID 1 not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, AppError> {
    let detail = employee::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee with ID 1 not found"
        })),
        (status = 409, description = "Employee still referenced by other records")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    employee::remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// List Employees of a department
#[utoipa::path(
    get,
    path = "/api/employees/department/{department_id}",
    params(
        ("department_id" = i64, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Employees in the department", body = [EmployeeDetail])
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employees_by_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employees = employee::find_by_department(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// List direct reports of a manager
#[utoipa::path(
    get,
    path = "/api/employees/manager/{manager_id}",
    params(
        ("manager_id" = i64, Path, description = "Manager's employee ID")
    ),
    responses(
        (status = 200, description = "Employees reporting to the manager", body = [EmployeeDetail])
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employees_by_manager(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employees = employee::find_by_manager(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

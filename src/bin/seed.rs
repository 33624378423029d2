//! Fills an empty database with the demo accounts and reference data.
//! Re-running it skips whatever already exists.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use hr_management::{
    config,
    db::init_db,
    error::AppError,
    model::{
        department::CreateDepartment, employee::CreateEmployee, position::CreatePosition,
        role::Role,
    },
    service::{department, employee, position, user},
    utils::username_index::UsernameIndex,
};
use sqlx::SqlitePool;
use tracing::{info, warn};

const DEPARTMENTS: &[(&str, &str, &str)] = &[
    ("Human Resources", "HR Department", "Building A"),
    ("Engineering", "Software Development", "Building B"),
    ("Marketing", "Marketing and Sales", "Building C"),
    ("Finance", "Financial Operations", "Building A"),
];

const POSITIONS: &[(&str, &str, f64, f64)] = &[
    ("Software Engineer", "Full-stack developer", 60000.0, 100000.0),
    ("HR Manager", "Human Resources Manager", 70000.0, 90000.0),
    ("Marketing Specialist", "Marketing professional", 45000.0, 70000.0),
    ("Financial Analyst", "Financial analysis and reporting", 55000.0, 80000.0),
];

fn date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("bad seed date {}", raw))
}

async fn id_by(pool: &SqlitePool, sql: &str, key: &str) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(sql)
        .bind(key)
        .fetch_one(pool)
        .await
        .with_context(|| format!("{} not found after conflict", key))
}

async fn seed_departments(pool: &SqlitePool) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    for (name, description, location) in DEPARTMENTS {
        let input = CreateDepartment {
            name: name.to_string(),
            description: Some(description.to_string()),
            location: Some(location.to_string()),
            manager_id: None,
            is_active: None,
        };
        let id = match department::create(pool, input).await {
            Ok(created) => {
                info!(name, "Department created");
                created.id
            }
            Err(AppError::Conflict(_)) => {
                info!(name, "Department already exists");
                id_by(pool, "SELECT id FROM departments WHERE name = ?", name).await?
            }
            Err(e) => return Err(anyhow::anyhow!("department {}: {}", name, e)),
        };
        ids.push(id);
    }
    Ok(ids)
}

async fn seed_positions(pool: &SqlitePool) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    for (title, description, min_salary, max_salary) in POSITIONS {
        let input = CreatePosition {
            title: title.to_string(),
            description: Some(description.to_string()),
            min_salary: Some(*min_salary),
            max_salary: Some(*max_salary),
            requirements: None,
            is_active: None,
        };
        let id = match position::create(pool, input).await {
            Ok(created) => {
                info!(title, "Position created");
                created.id
            }
            Err(AppError::Conflict(_)) => {
                info!(title, "Position already exists");
                id_by(pool, "SELECT id FROM positions WHERE title = ?", title).await?
            }
            Err(e) => return Err(anyhow::anyhow!("position {}: {}", title, e)),
        };
        ids.push(id);
    }
    Ok(ids)
}

async fn seed_employees(pool: &SqlitePool, departments: &[i64], positions: &[i64]) -> Result<()> {
    let employees = [
        CreateEmployee {
            employee_code: "EMP001".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@company.com".into(),
            phone: Some("+1234567890".into()),
            date_of_birth: date("1990-01-15")?,
            hire_date: date("2023-01-01")?,
            salary: 75000.0,
            address: Some("123 Main St, City, State".into()),
            emergency_contact: None,
            emergency_phone: None,
            department_id: departments.get(1).copied(), // Engineering
            position_id: positions.first().copied(),    // Software Engineer
            manager_id: None,
            status: Default::default(),
        },
        CreateEmployee {
            employee_code: "EMP002".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane.smith@company.com".into(),
            phone: Some("+1234567891".into()),
            date_of_birth: date("1988-03-22")?,
            hire_date: date("2023-02-15")?,
            salary: 80000.0,
            address: Some("456 Oak Ave, City, State".into()),
            emergency_contact: None,
            emergency_phone: None,
            department_id: departments.first().copied(), // Human Resources
            position_id: positions.get(1).copied(),      // HR Manager
            manager_id: None,
            status: Default::default(),
        },
    ];

    for input in employees {
        let name = format!("{} {}", input.first_name, input.last_name);
        match employee::create(pool, input).await {
            Ok(_) => info!(%name, "Employee created"),
            Err(AppError::Conflict(_)) => info!(%name, "Employee already exists"),
            Err(e) => warn!(%name, error = %e, "Employee not created"),
        }
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let pool = init_db(&config::database_url()?).await?;
    let index = UsernameIndex::new();
    index.warmup(&pool, 30, 250).await?;

    info!("Seeding database...");

    for (username, email, password, role) in [
        ("admin", "admin@company.com", "admin123", Role::Admin),
        ("hr", "hr@company.com", "hr123", Role::Hr),
    ] {
        match user::ensure(&pool, &index, username, email, password, role).await {
            Ok(Some(_)) => info!(username, %role, "User created"),
            Ok(None) => info!(username, "User already exists"),
            Err(e) => warn!(username, error = %e, "User not created"),
        }
    }

    let departments = seed_departments(&pool).await?;
    let positions = seed_positions(&pool).await?;
    seed_employees(&pool, &departments, &positions).await?;

    info!("Database seeding completed");
    info!(r#"Test credentials: admin="admin"/"admin123", hr="hr"/"hr123""#);
    Ok(())
}

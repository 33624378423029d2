use actix_web::{
    App,
    http::{Method, StatusCode, header},
    middleware::NormalizePath,
    test,
    web::Data,
};
use hr_management::{
    config::Config, db::init_db, routes, utils::username_index::UsernameIndex,
};
use serde_json::{Value, json};
use std::net::SocketAddr;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        jwt_secret: "test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 3600,
        rate_login_per_min: 60,
        rate_register_per_min: 30,
        rate_protected_per_min: 1000,
        api_prefix: "/api".into(),
        cors_origins: vec!["http://localhost:3000".into()],
        log_dir: "logs".into(),
        log_level: tracing::Level::INFO,
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

macro_rules! app {
    () => {{
        let config = test_config();
        let pool = init_db(&config.database_url).await.unwrap();
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(routes::cors(&config))
                .app_data(Data::new(pool))
                .app_data(Data::new(config.clone()))
                .app_data(Data::new(UsernameIndex::new()))
                .configure(|cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.peer_addr(peer()).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! token {
    ($app:expr) => {{
        let (status, _) = call!(
            $app,
            test::TestRequest::post().uri("/api/auth/register").set_json(json!({
                "username": "admin",
                "email": "admin@company.com",
                "password": "admin123",
                "role": "admin"
            }))
        );
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "username": "admin", "password": "admin123" }))
        );
        assert_eq!(status, StatusCode::OK);
        format!("Bearer {}", body["access_token"].as_str().unwrap())
    }};
}

fn employee_body(code: &str) -> Value {
    json!({
        "employeeId": code,
        "firstName": "John",
        "lastName": "Doe",
        "email": format!("{}@company.com", code.to_lowercase()),
        "dateOfBirth": "1990-01-15",
        "hireDate": "2023-01-01",
        "salary": 75000
    })
}

#[actix_web::test]
async fn register_login_and_profile() {
    let app = app!();
    let bearer = token!(app);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/profile")
            .insert_header((header::AUTHORIZATION, bearer))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
    assert!(body.get("password").is_none());
    assert!(body["lastLoginAt"].is_string());

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "admin", "password": "nope" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "username": "admin",
            "email": "other@company.com",
            "password": "x"
        }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");
}

#[actix_web::test]
async fn protected_routes_need_a_valid_token() {
    let app = app!();

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/employees"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/profile")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn browser_preflight_is_answered_without_a_token() {
    let app = app!();

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/employees")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization"))
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

#[actix_web::test]
async fn employee_crud_over_http() {
    let app = app!();
    let bearer = token!(app);
    let auth = || (header::AUTHORIZATION, bearer.clone());

    let (status, created) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(auth())
            .set_json(employee_body("EMP001"))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["employeeId"], "EMP001");
    assert_eq!(created["status"], "active");
    let id = created["id"].as_i64().unwrap();

    let (status, patched) = call!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/employees/{}/", id))
            .insert_header(auth())
            .set_json(json!({ "salary": 82000.5 }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["salary"], 82000.5);
    assert_eq!(patched["firstName"], "John");

    let (status, detail) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/employees/{}", id))
            .insert_header(auth())
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["attendances"], json!([]));
    assert_eq!(detail["leaves"], json!([]));

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/employees/{}", id))
            .insert_header(auth())
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/employees/{}", id))
            .insert_header(auth())
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Employee with ID {} not found", id));
}

#[actix_web::test]
async fn malformed_input_is_a_bad_request() {
    let app = app!();
    let bearer = token!(app);
    let auth = || (header::AUTHORIZATION, bearer.clone());

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(auth())
            .set_json(json!({ "firstName": "missing everything else" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri("/api/employees/abc").insert_header(auth())
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/outsourcing-companies")
            .insert_header(auth())
            .set_json(json!({
                "name": "Acme Staffing",
                "contactPerson": "Sam Lee",
                "contactEmail": "not-an-email",
                "contactPhone": "555-0100",
                "address": "1 Main St",
                "contractStartDate": "2024-01-01",
                "contractEndDate": "2024-12-31",
                "status": "active"
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("contactEmail must be an email"));
}

#[actix_web::test]
async fn leave_request_and_approval() {
    let app = app!();
    let bearer = token!(app);
    let auth = || (header::AUTHORIZATION, bearer.clone());

    let (_, employee) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(auth())
            .set_json(employee_body("EMP010"))
    );

    let (status, leave) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/leaves")
            .insert_header(auth())
            .set_json(json!({
                "employeeId": employee["id"],
                "startDate": "2024-01-01",
                "endDate": "2024-01-03",
                "type": "vacation",
                "reason": "Family trip"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(leave["daysRequested"], 3.0);
    assert_eq!(leave["status"], "pending");

    let (status, approved) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/leaves/{}/approve", leave["id"]))
            .insert_header(auth())
            .set_json(json!({ "approvedBy": 1 }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approvedBy"], 1);
    assert!(approved["approvedAt"].is_string());
    assert_eq!(approved["employee"]["employeeId"], "EMP010");

    let (status, listed) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/leaves?status=approved")
            .insert_header(auth())
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, pending) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/leaves?status=pending")
            .insert_header(auth())
    );
    assert_eq!(pending, json!([]));
}

#[actix_web::test]
async fn check_in_and_out_over_http() {
    let app = app!();
    let bearer = token!(app);
    let auth = || (header::AUTHORIZATION, bearer.clone());

    let (_, employee) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(auth())
            .set_json(employee_body("EMP020"))
    );
    let employee_id = employee["id"].clone();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-out")
            .insert_header(auth())
            .set_json(json!({ "employeeId": employee_id, "checkOutTime": "17:30" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No check-in record found for today");

    let (status, checked_in) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(auth())
            .set_json(json!({ "employeeId": employee_id, "checkInTime": "09:00" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(checked_in["status"], "present");

    let (status, checked_out) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-out")
            .insert_header(auth())
            .set_json(json!({ "employeeId": employee_id, "checkOutTime": "17:30" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(checked_out["id"], checked_in["id"]);
    assert_eq!(checked_out["hoursWorked"], 8.5);

    let (status, history) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/employee/{}", employee_id))
            .insert_header(auth())
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance?startDate=2020-01-01&endDate=yesterday")
            .insert_header(auth())
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn patch_with_null_clears_manager() {
    let app = app!();
    let bearer = token!(app);
    let auth = || (header::AUTHORIZATION, bearer.clone());

    let (_, boss) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(auth())
            .set_json(employee_body("EMP030"))
    );

    let mut body = employee_body("EMP031");
    body["managerId"] = boss["id"].clone();
    let (status, report) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(auth())
            .set_json(body)
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["managerId"], boss["id"]);

    let (status, patched) = call!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/employees/{}", report["id"]))
            .insert_header(auth())
            .set_json(json!({ "managerId": null }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["managerId"], Value::Null);
    assert_eq!(patched["firstName"], "John");
}

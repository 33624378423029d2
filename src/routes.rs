use crate::{
    api::{
        attendance, department, employee, leave_request, outsourcing_company,
        outsourcing_employee, position,
    },
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{http::header, middleware::from_fn, web};

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request((60_000 / requests_per_min as u64).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

/// App-wide CORS; answers preflights before they reach the auth guard.
pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    config.cors_origins.iter().fold(cors, |cors, origin| {
        if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        }
    })
}

/// Malformed JSON bodies, query strings and path ids answer like any other validation failure.
fn extractor_errors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let prefix = config.api_prefix.trim_end_matches('/');

    extractor_errors(cfg);

    // Public routes; registered before the protected scope so `{prefix}/auth` wins.
    cfg.service(
        web::scope(&format!("{}/auth", prefix))
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(build_limiter(config.rate_register_per_min))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/profile")
                    .wrap(from_fn(auth_middleware))
                    .wrap(build_limiter(config.rate_protected_per_min))
                    .route(web::get().to(handlers::profile)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    .service(
                        web::resource("/department/{department_id}")
                            .route(web::get().to(employee::employees_by_department)),
                    )
                    .service(
                        web::resource("/manager/{manager_id}")
                            .route(web::get().to(employee::employees_by_manager)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::patch().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list_departments))
                            .route(web::post().to(department::create_department)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(department::get_department))
                            .route(web::patch().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    ),
            )
            .service(
                web::scope("/positions")
                    .service(
                        web::resource("")
                            .route(web::get().to(position::list_positions))
                            .route(web::post().to(position::create_position)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(position::get_position))
                            .route(web::patch().to(position::update_position))
                            .route(web::delete().to(position::delete_position)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // ?startDate&endDate narrows the listing
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    // static segments before /{id}
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(attendance::attendance_by_employee)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::patch().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // ?status= narrows the listing
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(leave_request::leaves_by_employee)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::patch().to(leave_request::update_leave))
                            .route(web::delete().to(leave_request::delete_leave)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::post().to(leave_request::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::post().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/outsourcing-companies")
                    .service(
                        web::resource("")
                            .route(web::get().to(outsourcing_company::list_companies))
                            .route(web::post().to(outsourcing_company::create_company)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(outsourcing_company::get_company))
                            .route(web::patch().to(outsourcing_company::update_company))
                            .route(web::delete().to(outsourcing_company::delete_company)),
                    ),
            )
            .service(
                web::scope("/outsourcing-employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(outsourcing_employee::list_contractors))
                            .route(web::post().to(outsourcing_employee::create_contractor)),
                    )
                    .service(
                        web::resource("/company/{company_id}")
                            .route(web::get().to(outsourcing_employee::contractors_by_company)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(outsourcing_employee::get_contractor))
                            .route(web::patch().to(outsourcing_employee::update_contractor))
                            .route(web::delete().to(outsourcing_employee::delete_contractor)),
                    ),
            ),
    );
}

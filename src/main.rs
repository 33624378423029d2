use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use hr_management::{
    config::Config, db::init_db, docs::ApiDoc, routes, utils::username_index::UsernameIndex,
};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HR Management API"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(
        addr = %config.server_addr,
        prefix = %config.api_prefix,
        origins = ?config.cors_origins,
        "Server starting..."
    );

    let pool = init_db(&config.database_url).await?;
    let usernames = Data::new(UsernameIndex::new());

    let pool_for_warmup = pool.clone();
    let index_for_warmup = usernames.clone();
    actix_web::rt::spawn(async move {
        // Every username into the filter, last 30 days of logins into the cache
        if let Err(e) = index_for_warmup.warmup(&pool_for_warmup, 30, 250).await {
            warn!(error = %e, "Failed to warm up username index");
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        let config = config_data.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(routes::cors(&config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(usernames.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("cannot bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use db_startup_probe::config::AppConfig;
use db_startup_probe::handlers::probe::StartupProbe;
use db_startup_probe::lifecycle::Lifecycle;
use log::info;
use sqlx::{postgres::PgPoolOptions, PgPool};

fn build_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    // Lazy so an unreachable database does not stop the server from starting;
    // the startup probe is where that shows up.
    PgPoolOptions::new()
        .max_connections(config.pool.max_connections)
        .acquire_timeout(config.pool.acquire_timeout)
        .idle_timeout(config.pool.idle_timeout)
        .max_lifetime(config.pool.max_lifetime)
        .connect_lazy(&config.database_url)
        .context("Invalid DATABASE_URL")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("=== Database Startup Probe Server Starting ===");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let pool = build_pool(&config)?;

    let mut lifecycle = Lifecycle::new();
    let probe = StartupProbe::with_log_reporter(pool.clone());
    lifecycle.on_ready(move || {
        // Fire and forget: the outcome only ever reaches the log.
        actix_web::rt::spawn(async move { probe.run().await });
    });

    let (host, port) = config.bind_addr();
    let server = HttpServer::new(|| {
        App::new()
            .wrap(Logger::new("%t [%s] \"%r\" %b %D ms %a"))
            .route(
                "/",
                web::get().to(|| async { HttpResponse::Ok().body("Database startup probe is running") }),
            )
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {}:{}", host, port))?
    .run();

    info!("Listening on {}:{}", host, port);
    lifecycle.notify_ready();

    server.await.context("Server error")?;

    pool.close().await;
    info!("Shut down");
    Ok(())
}

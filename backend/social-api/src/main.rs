use actix_web::{middleware::NormalizePath, middleware::TrailingSlash, web, App, HttpServer};
use anyhow::Context;
use db_pool::{create_pool, DbConfig};
use social_api::{routes, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting social-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_config = DbConfig::from_env("social-api")
        .map_err(anyhow::Error::msg)
        .context("Failed to load database configuration")?;
    db_config.log_config();
    let pool = create_pool(db_config)
        .await
        .context("Failed to connect to database")?;

    if config.app.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let bind_address = (config.app.host.clone(), config.app.port);
    let cors_config = config.cors.clone();
    let state = web::Data::new(AppState::postgres(config, pool)?);

    tracing::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(routes::json_config())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(routes::cors(&cors_config))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure_routes)
    })
    .bind(bind_address)?
    .run()
    .await?;

    tracing::info!("social-api shut down");
    Ok(())
}

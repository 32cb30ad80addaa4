use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use micro_market::application::seed::seed_demo_data;
use micro_market::infrastructure::config::{AppConfig, StorageBackend};
use micro_market::infrastructure::logging::init_logging;
use micro_market::presentation::handlers::{AppState, configure_routes};
use micro_market::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use tracing::{error, info, warn};

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging("info");

    let config = AppConfig::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set, using the development default");
    }
    if config.token_ttl.is_none() {
        info!("Issued tokens do not expire (JWT_TTL_SECONDS unset)");
    }

    let StorageBackend::Memory { name } = &config.storage;
    info!(storage = %name, "Using in-memory storage");

    let state = web::Data::new(AppState::in_memory(
        config.jwt_secret.clone(),
        config.token_ttl,
        config.product_update_policy,
    ));
    info!(policy = ?state.product_service.update_policy(), "Product update policy");

    if config.seed_demo_data {
        let report = seed_demo_data(
            &state.auth_service,
            state.user_repository.as_ref(),
            state.product_repository.as_ref(),
        )
        .await?;
        info!(users = report.users, products = report.products, "Demo data seeded");
    }

    let cors_origin = config.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
            .wrap(JwtAuthMiddleware::new(state.auth_service.clone()))
            .wrap(cors(cors_origin.as_deref()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
    });

    let (host, port) = config.bind_address();
    info!(host = %host, port = port, "Binding server to address");
    let server = server.bind((host.as_str(), port))?;

    info!(
        routes = %"POST /auth/register, POST /auth/login, GET /auth/me, GET|POST /products, GET|PUT|DELETE /products/{id}, GET /favorites, POST|DELETE /favorites/{productId}, GET /health",
        "Starting HTTP server"
    );
    server.run().await?;
    Ok(())
}

mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::error::set_expose_error_details;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::categories::{
    routes as categories_routes, CategoryService, MySqlCategoryRepository,
};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::line_auth::{routes as line_auth_routes, LineAuthService, LineClient};
use crate::features::places::{routes as places_routes, MySqlPlaceRepository, PlaceService};
use crate::features::reviews::{
    routes as reviews_routes, MySqlReviewRepository, ReviewAggregator, ReviewService,
};
use crate::features::traffy::{routes as traffy_routes, TraffyClient, TraffyService};
use crate::modules::images::{ImageProcessor, ReviewImageStore};
use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    set_expose_error_details(!config.app.is_production());

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}, environment={}",
        available_cpus,
        worker_threads,
        std::process::id(),
        config.app.environment
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Each enriched place issues up to four reads at once
    let enrich_connections = config.places.enrich_concurrency as u32 * 4;
    if enrich_connections > config.database.max_connections {
        tracing::warn!(
            "PLACES_ENRICH_CONCURRENCY={} may need {} connections but DB_MAX_CONNECTIONS={}",
            config.places.enrich_concurrency,
            enrich_connections,
            config.database.max_connections
        );
    }

    // Repositories
    let place_repository = Arc::new(MySqlPlaceRepository::new(pool.clone()));
    let review_repository = Arc::new(MySqlReviewRepository::new(pool.clone()));

    // Initialize MinIO client for review photos
    let minio_client = Arc::new(
        modules::storage::MinIOClient::new(config.minio.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    let image_store = Arc::new(ReviewImageStore::new(
        Arc::clone(&minio_client),
        ImageProcessor::new(&config.images),
    ));
    tracing::info!(
        "Review image store initialized (max_width={}, quality={})",
        config.images.max_width,
        config.images.jpeg_quality
    );

    // Initialize Place Service
    let review_aggregator = Arc::new(ReviewAggregator::new(review_repository.clone()));
    let place_service = Arc::new(PlaceService::new(
        place_repository.clone(),
        Arc::clone(&review_aggregator),
        config.places.clone(),
    ));
    tracing::info!(
        "Place service initialized (default_radius={}m, enrich_concurrency={})",
        config.places.default_radius_meters,
        config.places.enrich_concurrency
    );

    // Initialize Review Service
    let review_service = Arc::new(ReviewService::new(
        place_repository,
        review_repository.clone(),
        image_store,
    ));
    tracing::info!("Review service initialized");

    // Initialize Dashboard Service
    let dashboard_service = Arc::new(DashboardService::new(review_repository));
    tracing::info!("Dashboard service initialized");

    // Initialize Category Service
    let category_service = Arc::new(CategoryService::new(Arc::new(
        MySqlCategoryRepository::new(pool.clone()),
    )));
    tracing::info!("Category service initialized");

    // Initialize Traffy proxy
    let traffy_client = Arc::new(
        TraffyClient::new(&config.traffy)
            .map_err(|e| anyhow::anyhow!("Failed to create Traffy client: {}", e))?,
    );
    let traffy_service = Arc::new(TraffyService::new(
        traffy_client,
        config.places.default_radius_meters,
    ));
    tracing::info!("Traffy proxy initialized (org_key={})", config.traffy.org_key);

    // LINE Login is optional
    let line_routes = match config.line.clone() {
        Some(line_config) => {
            let client = LineClient::new(line_config)
                .map_err(|e| anyhow::anyhow!("Failed to create LINE client: {}", e))?;
            tracing::info!("LINE Login enabled");
            line_auth_routes(Arc::new(LineAuthService::new(client)))
        }
        None => {
            tracing::info!("LINE Login disabled (LINE_CHANNEL_ID/SECRET/CALLBACK_URL not set)");
            Router::new()
        }
    };

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new()
        .merge(places_routes::routes(place_service))
        .merge(reviews_routes::routes(review_service))
        .merge(dashboard_routes::routes(dashboard_service))
        .merge(categories_routes::routes(category_service))
        .merge(traffy_routes::routes(traffy_service))
        .merge(line_routes);

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped, database pool closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

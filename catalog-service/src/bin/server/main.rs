use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use catalog_service::config::Config;
use catalog_service::domain::category::service::CategoryService;
use catalog_service::domain::product::service::ProductService;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::inbound::http::router::AppState;
use catalog_service::outbound::repositories::PostgresCategoryRepository;
use catalog_service::outbound::repositories::PostgresProductRepository;
use catalog_service::outbound::repositories::PostgresUserRepository;
use catalog_service::outbound::storage::FilesystemImageStore;
use catalog_service::seed::initial_seed;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "catalog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        uploads_directory = %config.uploads.directory.display(),
        max_request_bytes = config.uploads.max_request_bytes,
        bcrypt_cost = config.password.bcrypt_cost,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    tokio::fs::create_dir_all(&config.uploads.directory).await?;

    let password_hasher = PasswordHasher::with_cost(config.password.bcrypt_cost)?;
    let authenticator = Arc::new(Authenticator::with_hasher(
        password_hasher,
        config.jwt.secret.as_bytes(),
    ));

    let user_service = Arc::new(UserService::new(
        Arc::new(PostgresUserRepository::new(pg_pool.clone())),
        password_hasher,
    ));
    let category_service = Arc::new(CategoryService::new(Arc::new(
        PostgresCategoryRepository::new(pg_pool.clone()),
    )));
    let product_service = Arc::new(ProductService::new(
        Arc::new(PostgresProductRepository::new(pg_pool)),
        Arc::new(FilesystemImageStore::new(&config.uploads.directory)),
    ));

    initial_seed(
        user_service.as_ref(),
        category_service.as_ref(),
        &config.admin,
        &config.seed,
    )
    .await?;
    tracing::info!("Initial seed completed");

    let state = AppState {
        user_service,
        category_service,
        product_service,
        authenticator,
        jwt_expiration_hours: config.jwt.expiration_hours,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state, &config.uploads)).await?;

    Ok(())
}

use std::sync::Arc;

use auth::JwtHandler;
use owner_service::config::Config;
use owner_service::domain::authentication::service::AuthenticationService;
use owner_service::domain::login::service::LoginService;
use owner_service::inbound::http::router::create_router;
use owner_service::outbound::repositories::PostgresOwnerRepository;
use sqlx::Connection;
use sqlx::PgConnection;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "owner_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "owner-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    let database = &config.database;
    tracing::info!(
        database_host = %database.primary.host,
        database_port = database.primary.port,
        database_name = %database.primary.database,
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    let mut migration_connection =
        PgConnection::connect_with(&database.migration_connect_options()).await?;
    sqlx::migrate!("./migrations")
        .run(&mut migration_connection)
        .await?;
    migration_connection.close().await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let pg_pool = database
        .connection
        .pool_options()
        .connect_with(database.connect_options())
        .await?;
    tracing::info!(
        max_connections = database.connection.max_open,
        max_idle = database.connection.max_idle,
        database = "postgresql",
        "Database connection pool created"
    );

    let jwt_handler = Arc::new(JwtHandler::new(
        config.authentication.signing_key.as_bytes(),
    ));
    let owner_repository = Arc::new(PostgresOwnerRepository::new(pg_pool));
    let authentication_service = Arc::new(AuthenticationService::new(owner_repository));
    let login_service = Arc::new(LoginService::new(
        authentication_service,
        Arc::clone(&jwt_handler),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(login_service, jwt_handler);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

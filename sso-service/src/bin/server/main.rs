use std::net::SocketAddr;
use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use sso_service::config::Config;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::repositories::PostgresStorage;
use sso_service::proto::auth_server::AuthServer;
use sso_service::shutdown::shutdown_signal;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.environment.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "sso-service",
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        "Service starting"
    );

    tracing::info!(
        grpc_port = config.server.grpc_port,
        request_timeout_seconds = config.server.timeout_seconds,
        token_ttl_seconds = config.token.ttl_seconds,
        max_connections = config.database.max_connections,
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

    let storage = Arc::new(PostgresStorage::new(pg_pool));
    let password_hasher = PasswordHasher::with_cost(config.password.cost())?;
    let token_issuer = TokenIssuer::new(config.token.ttl());
    tracing::info!(
        ttl_seconds = token_issuer.ttl().num_seconds(),
        memory_kib = config.password.memory_kib,
        iterations = config.password.iterations,
        "Credential primitives configured"
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&storage),
        Arc::clone(&storage),
        storage,
        password_hasher,
        token_issuer,
        tracing::info_span!("auth_service"),
    )?);

    let grpc_address: SocketAddr = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service);
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    Server::builder()
        .timeout(config.server.timeout())
        .add_service(AuthServer::new(grpc_service))
        .serve_with_shutdown(grpc_address, shutdown_signal())
        .await?;

    tracing::info!("gRpc server stopped");

    Ok(())
}

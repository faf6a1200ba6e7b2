use std::sync::Arc;
use std::time::Duration;

use account_service::config::Config;
use account_service::domain::user::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::session::SessionManager;
use account_service::outbound::mail::HttpMailer;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::outbound::sessions::RedisSessionStore;
use account_service::outbound::tokens::RedisTokenStore;
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        client_url = %config.app.client_url,
        token_ttl_seconds = config.tokens.ttl_seconds,
        environment = %config.environment,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = ConnectionManager::new(redis_client).await?;
    tracing::info!(store = "redis", "Ephemeral store connection established");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let token_store = Arc::new(RedisTokenStore::new(redis_conn.clone()));
    let mailer = Arc::new(HttpMailer::new(&config.mail)?);

    let account_service = Arc::new(AccountService::new(
        user_repository,
        token_store,
        mailer,
        config.app.client_url.clone(),
        Duration::from_secs(config.tokens.ttl_seconds),
    ));

    let session_store = Arc::new(RedisSessionStore::new(redis_conn));
    let session_manager = Arc::new(SessionManager::new(session_store, config.is_production()));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, session_manager);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}

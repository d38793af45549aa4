use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use webhook_chat::{
    db, handlers,
    middleware::{self, auth::JwtSessionVerifier},
    services::PgMessageStore,
    webhook_client::WebhookClient,
    AppConfig, AppState, ChatRelay,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting webhook chat relay");

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    if config.webhook_overridden {
        tracing::info!("Using webhook from N8N_WEBHOOK_URL");
    } else {
        tracing::warn!("N8N_WEBHOOK_URL not set, using the default webhook endpoint");
    }

    let db_pool = db::create_pool(&config).await.map_err(|e| {
        tracing::error!("Failed to create database pool: {}", e);
        e
    })?;

    let relay = ChatRelay::new(
        Arc::new(JwtSessionVerifier::new(
            &config.jwt_secret,
            config.session_cookie_name.clone(),
        )),
        Arc::new(PgMessageStore::new(db_pool.clone())),
        Arc::new(WebhookClient::new()),
        config.webhook_url.clone(),
    );

    let bind_addr = config.bind_addr;
    let shared_state = Arc::new(AppState {
        db_pool,
        config,
        relay,
    });

    let app = Router::new()
        .merge(handlers::chat::chat_routes())
        .merge(handlers::status::status_routes())
        .layer(CatchPanicLayer::custom(middleware::logging::panic_response))
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,webhook_chat=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,webhook_chat=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for log aggregation
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

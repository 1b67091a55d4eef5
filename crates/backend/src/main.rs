pub mod copilot;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use crate::copilot::remote::{http_client, RemoteEndpoint};
    use crate::copilot::{CopilotRuntime, SanitizingAdapter};
    use crate::shared::llm::openai_provider::OpenAiProvider;

    // .env is optional
    let _ = dotenvy::dotenv();

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = shared::config::load_config()?;

    if config.llm.api_key.is_empty() {
        tracing::warn!("No LLM API key configured; model calls will be rejected upstream");
    }

    let provider = OpenAiProvider::new_with_endpoint(
        config.llm.resolved_api_base(),
        config.llm.api_key.clone(),
        config.llm.model.clone(),
        config.llm.temperature,
        config.llm.max_tokens,
    );
    let adapter = SanitizingAdapter::new(Arc::new(provider));
    tracing::info!(
        "LLM provider: {} ({}, model {})",
        adapter.provider_name(),
        config.llm.resolved_api_base(),
        config.llm.model
    );

    let http = http_client(config.copilot.remote_connect_timeout())?;
    let remotes: Vec<RemoteEndpoint> = config
        .copilot
        .remote_endpoints
        .iter()
        .map(|url| {
            tracing::info!("Remote endpoint: {}", url);
            RemoteEndpoint::new(url.clone(), http.clone())
                .with_request_timeout(config.copilot.remote_request_timeout())
        })
        .collect();

    let app_state = state::AppState::new(CopilotRuntime::new(adapter, remotes));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes(app_state, &config.copilot.endpoint_path)
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(shared::request_log::request_logger))
        .layer(cors);

    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.host '{}': {e}", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", addr.port(), e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}

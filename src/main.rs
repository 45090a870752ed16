use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sea_backend::constants::ALERT_QUEUE_CAPACITY;
use sea_backend::outbound::{
    AlertQueue, LogSender, MessageSender, NominatimGeocoder, NotificationDispatcher, TwilioSender,
};
use sea_backend::services::accounts::ensure_volunteer_account;
use sea_backend::{open_store, router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sea_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting emergency request backend...");

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    let store = open_store(&config.database_path).await?;

    if let (Some(email), Some(password)) = (&config.volunteer_email, &config.volunteer_password) {
        ensure_volunteer_account(&store, email, password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed volunteer account: {}", e))?;
    }

    let geocoder = NominatimGeocoder::new(
        config.geocoder_url.clone(),
        Duration::from_secs(config.geocode_timeout_secs),
        &config.geocoder_user_agent,
    )?;

    let sender: Arc<dyn MessageSender> = match &config.twilio {
        Some(twilio) => Arc::new(TwilioSender::new(
            twilio.clone(),
            Duration::from_secs(config.notify_timeout_secs),
        )?),
        None => {
            tracing::warn!("Twilio not configured; alerts will only be logged");
            Arc::new(LogSender)
        }
    };

    if config.alert_recipients.is_empty() {
        tracing::warn!("ALERT_RECIPIENTS is empty; new requests will not be broadcast");
    }

    let dispatcher = NotificationDispatcher::new(sender, config.alert_recipients.clone());
    let (alerts, alert_worker) = AlertQueue::spawn(dispatcher, ALERT_QUEUE_CAPACITY);

    // Configure CORS
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let state = AppState::new(store, config.clone(), Arc::new(geocoder), alerts);

    let mut app = router(state).layer(cors);
    if config.log_requests {
        app = app.layer(TraceLayer::new_for_http());
    }

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it every queue handle) is gone; let queued alerts finish
    if let Err(e) = alert_worker.await {
        tracing::error!("Alert worker failed: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

use std::net::SocketAddr;
use std::sync::Arc;

use lendit_api::{app, state::AppState};
use lendit_core::clock::SystemClock;
use lendit_core::service::BookingService;
use lendit_store::{DbClient, PgBookingStore, PgItemDirectory, PgUserDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lendit_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = lendit_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Lendit API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let pool = db.pool.clone();
    let service = BookingService::new(
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgItemDirectory::new(pool.clone())),
        Arc::new(PgBookingStore::new(pool)),
        Arc::new(SystemClock),
    );
    let app_state = AppState {
        bookings: Arc::new(service),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

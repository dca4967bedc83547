use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfare_api::{app, state::AuthSettings, AppState};
use wayfare_booking::BookingService;
use wayfare_core::notify::{LogMailer, LogNotifier};
use wayfare_store::{DbClient, PgBookingRepository, PgPackageRepository, PgWalletRepository};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfare_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = wayfare_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Wayfare API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(wayfare_api::worker::run_dispatcher(
        events_rx,
        Arc::new(LogNotifier),
        Arc::new(LogMailer),
    ));

    let service = BookingService::new(
        Arc::new(PgPackageRepository::new(db.pool.clone())),
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        Arc::new(PgWalletRepository::new(db.pool.clone())),
        wayfare_catalog::PricingEngine::new(config.business_rules.pricing_config()),
        config.business_rules.refund_policy(),
        events_tx,
    );

    let app_state = AppState {
        service: Arc::new(service),
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            master_admin_email: config.auth.master_admin_email.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

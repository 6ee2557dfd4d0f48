//! GymHub HTTP server.
//!
//! Loads configuration from `GYMHUB__*` environment variables (and `.env`),
//! connects to Postgres, wires the adapters and serves the API.
//!
//! ```bash
//! GYMHUB__DATABASE__URL=postgres://localhost/gymhub \
//! GYMHUB__AUTH__ISSUER=https://auth.example.com \
//!   cargo run --bin gymhub
//! ```

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderName, HeaderValue};
use sqlx::postgres::PgPoolOptions;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use gymhub::adapters::auth::JwksSessionValidator;
use gymhub::adapters::email::{LoggingEmailSender, ResendEmailSender};
use gymhub::adapters::http::{api_router, AppState, HttpLimits};
use gymhub::adapters::media::CloudinaryStorage;
use gymhub::adapters::payment::RazorpayGateway;
use gymhub::adapters::postgres::{
    PostgresBookingRepository, PostgresCatalogRepository, PostgresMonetizationRepository,
    PostgresReviewRepository, PostgresTrainerRepository, PostgresUserRepository,
};
use gymhub::application::{CachedSettings, Notifier};
use gymhub::config::{AppConfig, ServerConfig};
use gymhub::domain::booking::CapacityPolicy;
use gymhub::domain::foundation::{CommissionRate, Money};
use gymhub::domain::settings::PlatformSettings;
use gymhub::ports::EmailSender;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    tracing::info!(environment = ?config.server.environment, "Starting GymHub");

    let db = &config.database;
    let pool = PgPoolOptions::new()
        .min_connections(db.min_connections)
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout())
        .idle_timeout(db.idle_timeout())
        .max_lifetime(db.max_lifetime())
        .connect(&db.url)
        .await?;
    if db.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let catalog = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let trainers = Arc::new(PostgresTrainerRepository::new(pool.clone()));
    let monetization = Arc::new(PostgresMonetizationRepository::new(pool.clone()));

    let email: Arc<dyn EmailSender> = if config.email.enabled {
        Arc::new(ResendEmailSender::new(&config.email)?)
    } else {
        tracing::warn!("Email delivery disabled; messages will only be logged");
        Arc::new(LoggingEmailSender)
    };

    let defaults = PlatformSettings {
        commission_rate: CommissionRate::try_from_bps(config.booking.default_commission_bps)?,
        featured_price_per_day: Money::from_minor(config.booking.featured_price_per_day),
    };
    let settings = Arc::new(CachedSettings::new(
        monetization.clone(),
        defaults,
        config.booking.settings_cache_ttl(),
    ));

    let state = AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        gyms: catalog.clone(),
        services: catalog.clone(),
        slots: catalog,
        bookings: Arc::new(PostgresBookingRepository::new(pool.clone())),
        trainers: trainers.clone(),
        trainer_bookings: trainers,
        reviews: Arc::new(PostgresReviewRepository::new(pool)),
        featured: monetization.clone(),
        payouts: monetization.clone(),
        earnings: monetization,
        payments: Arc::new(RazorpayGateway::new(&config.payment)?),
        media: Arc::new(CloudinaryStorage::new(&config.media)?),
        validator: Arc::new(JwksSessionValidator::new(&config.auth)?),
        settings,
        notifier: Notifier::new(email),
        policy: CapacityPolicy::new(config.booking.payment_hold()),
        super_admins: config.auth.super_admin_list(),
        limits: HttpLimits {
            search_default_radius_km: config.booking.search_default_radius_km,
            search_fallback_limit: config.booking.search_fallback_limit,
            max_upload_bytes: config.media.max_upload_bytes,
        },
    };

    let request_id = HeaderName::from_static("x-request-id");
    let app = api_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.server))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides
/// the configured level.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        if server.is_production() {
            return CorsLayer::new();
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

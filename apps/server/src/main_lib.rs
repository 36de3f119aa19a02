use std::sync::Arc;

use crate::config::Config;
use finclue_core::alerts::{AlertService, AlertServiceTrait, WatchlistRepositoryTrait};
use finclue_core::fx::{FxService, FxServiceTrait};
use finclue_core::notifications::{NotificationService, ResendMailer};
use finclue_core::portfolio::{PortfolioRepositoryTrait, ValuationService, ValuationServiceTrait};
use finclue_market_data::{FmpProvider, QuoteProvider};
use finclue_storage_sqlite::notification_log::NotificationLogRepository;
use finclue_storage_sqlite::portfolios::PortfolioRepository;
use finclue_storage_sqlite::recipients::RecipientRepository;
use finclue_storage_sqlite::watchlist::WatchlistRepository;
use finclue_storage_sqlite::{db, spawn_writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
    pub watchlist_repository: Arc<dyn WatchlistRepositoryTrait>,
    pub alert_service: Arc<dyn AlertServiceTrait>,
    pub notification_service: Arc<NotificationService>,
    pub recipient_repository: Arc<RecipientRepository>,
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub cron_secret: String,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("FINCLUE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let writer = spawn_writer(pool.clone());

    let quote_provider: Arc<dyn QuoteProvider> =
        Arc::new(FmpProvider::new(config.fmp_api_key.clone()));
    let fx_service: Arc<dyn FxServiceTrait> =
        Arc::new(FxService::new(quote_provider.clone()));

    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));
    let valuation_service: Arc<dyn ValuationServiceTrait> = Arc::new(ValuationService::new(
        quote_provider.clone(),
        fx_service.clone(),
    ));

    let watchlist_repository = Arc::new(WatchlistRepository::new(pool.clone(), writer.clone()));
    let alert_service: Arc<dyn AlertServiceTrait> = Arc::new(AlertService::new(
        watchlist_repository.clone(),
        quote_provider.clone(),
    ));

    let notification_log_repository =
        Arc::new(NotificationLogRepository::new(pool.clone(), writer.clone()));
    let recipient_repository = Arc::new(RecipientRepository::new(pool.clone(), writer.clone()));
    let mailer = Arc::new(ResendMailer::new(
        config.resend_api_key.clone(),
        config.mail_from.clone(),
    )?);
    let notification_service = Arc::new(NotificationService::new(
        alert_service.clone(),
        notification_log_repository,
        recipient_repository.clone(),
        mailer,
    ));

    Ok(Arc::new(AppState {
        portfolio_repository,
        valuation_service,
        watchlist_repository,
        alert_service,
        notification_service,
        recipient_repository,
        fx_service,
        cron_secret: config.cron_secret.clone(),
        db_path: config.db_path.clone(),
    }))
}

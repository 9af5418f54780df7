use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splikz_backend::controllers::{
    boost::BoostController, email::EmailController, feed::FeedController,
    profile::ProfileController, realtime::RealtimeController, social::SocialController,
    splik::SplikController, upload::UploadController,
};
use splikz_backend::domain::{
    auth::JwtManager,
    boost::{spawn_expiry_task, BoostService},
    email::{EmailService, Mailer},
    feed::{FeedService, FeedSettings},
    profile::ProfileService,
    realtime::RealtimeHub,
    social::SocialService,
    splik::SplikService,
    storage::UploadService,
};
use splikz_backend::infrastructure::config::{Config, LogFormat};
use splikz_backend::infrastructure::db::{check_connection, create_pool, PgReadinessProbe};
use splikz_backend::infrastructure::email::{LogMailer, ResendMailer};
use splikz_backend::infrastructure::http::{build_router, start_http_server, Controllers};
use splikz_backend::infrastructure::payments::StripeClient;
use splikz_backend::infrastructure::repositories::{
    PgBoostRepository, PgCommentRepository, PgMembershipRepository, PgProfileRepository,
    PgSplikRepository,
};
use splikz_backend::infrastructure::storage::SupabaseStorage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Splikz Backend on {}:{}", config.host, config.port);

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool)
    tracing::info!("Instantiating repositories...");
    let splik_repo = Arc::new(PgSplikRepository::new(pool.clone()));
    let profile_repo = Arc::new(PgProfileRepository::new(pool.clone()));
    let membership_repo = Arc::new(PgMembershipRepository::new(pool.clone()));
    let comment_repo = Arc::new(PgCommentRepository::new(pool.clone()));
    let boost_repo = Arc::new(PgBoostRepository::new(pool.clone()));

    // 2. Instantiate external clients
    tracing::info!("Instantiating external clients...");
    let payments = Arc::new(StripeClient::new(
        config.stripe_secret_key.clone(),
        config.stripe_api_base.clone(),
    ));
    let storage = Arc::new(SupabaseStorage::new(
        config.storage_url.clone(),
        config.storage_service_key.clone(),
    ));
    let mailer: Arc<dyn Mailer> = match &config.resend_api_key {
        Some(key) => Arc::new(ResendMailer::new(key.clone())),
        None => {
            tracing::warn!("RESEND_API_KEY not set, welcome emails will only be logged");
            Arc::new(LogMailer)
        }
    };
    let jwt = Arc::new(JwtManager::new(&config.jwt_secret));
    let hub = Arc::new(RealtimeHub::new());

    // 3. Instantiate services (inject repositories and clients)
    tracing::info!("Instantiating services...");
    let profile_service = Arc::new(ProfileService::new(
        profile_repo.clone(),
        config.profile_cache_enabled,
    ));
    let feed_settings = FeedSettings::new(
        config.feed_page_size,
        config.promoted_page_size,
        config.feed_promotion_interval,
    )?;
    let feed_service = Arc::new(FeedService::new(
        splik_repo.clone(),
        profile_service.clone(),
        boost_repo.clone(),
        feed_settings,
    ));
    let splik_service = Arc::new(SplikService::new(
        splik_repo.clone(),
        comment_repo.clone(),
        profile_service.clone(),
        hub.clone(),
    ));
    let social_service = Arc::new(SocialService::new(
        membership_repo.clone(),
        splik_repo.clone(),
        profile_service.clone(),
        hub.clone(),
    ));
    let boost_service = Arc::new(BoostService::new(
        boost_repo.clone(),
        splik_repo.clone(),
        payments,
    ));
    let upload_service = Arc::new(UploadService::new(storage, profile_service.clone()));
    let email_service = Arc::new(EmailService::new(
        mailer,
        config.email_from.clone(),
        config.app_base_url.clone(),
    ));

    // 4. Background jobs
    spawn_expiry_task(
        boost_service.clone(),
        Duration::from_secs(config.boost_expiry_interval_secs),
    );
    tracing::info!(
        every_secs = config.boost_expiry_interval_secs,
        "Boost expiry task started"
    );

    // 5. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let controllers = Controllers {
        feed: Arc::new(FeedController::new(feed_service)),
        splik: Arc::new(SplikController::new(splik_service)),
        social: Arc::new(SocialController::new(social_service)),
        profile: Arc::new(ProfileController::new(profile_service)),
        boost: Arc::new(BoostController::new(boost_service)),
        upload: Arc::new(UploadController::new(upload_service)),
        email: Arc::new(EmailController::new(email_service)),
        realtime: Arc::new(RealtimeController::new(hub)),
    };

    let probe = Arc::new(PgReadinessProbe::new(pool.clone()));
    let app = build_router(jwt, probe, controllers);

    // Start HTTP server with all routes
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "splikz_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "splikz_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

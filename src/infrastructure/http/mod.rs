use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    boost::BoostController, email::EmailController, feed::FeedController, health,
    profile::ProfileController, realtime::RealtimeController, social::SocialController,
    splik::SplikController, upload::UploadController,
};
use crate::domain::auth::JwtManager;
use crate::domain::splik::service::MAX_VIDEO_BYTES;
use crate::infrastructure::auth::{auth_middleware, request_id_middleware, session_middleware};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::ReadinessProbe;

/// Headroom over the largest accepted file for the raw upload body
const UPLOAD_BODY_SLACK: usize = 1024 * 1024;

pub struct Controllers {
    pub feed: Arc<FeedController>,
    pub splik: Arc<SplikController>,
    pub social: Arc<SocialController>,
    pub profile: Arc<ProfileController>,
    pub boost: Arc<BoostController>,
    pub upload: Arc<UploadController>,
    pub email: Arc<EmailController>,
    pub realtime: Arc<RealtimeController>,
}

/// Build the application router with all routes configured
pub fn build_router(
    jwt: Arc<JwtManager>,
    probe: Arc<dyn ReadinessProbe>,
    controllers: Controllers,
) -> Router {
    // Feed routes (session optional)
    let feed_routes = Router::new()
        .route("/api/feed", get(FeedController::home_feed))
        .route("/api/explore", get(FeedController::explore))
        .with_state(controllers.feed)
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            session_middleware,
        ));

    // Splik routes (session optional, writes check for a user)
    let splik_routes = Router::new()
        .route("/api/spliks", post(SplikController::create))
        .route("/api/spliks/:id", get(SplikController::get))
        .route("/api/creators/:id/spliks", get(SplikController::by_creator))
        .route("/api/spliks/:id/views", post(SplikController::record_view))
        .route(
            "/api/spliks/:id/comments",
            get(SplikController::list_comments).post(SplikController::add_comment),
        )
        .route(
            "/api/spliks/:id/comments/:comment_id",
            delete(SplikController::delete_comment),
        )
        .with_state(controllers.splik)
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            session_middleware,
        ));

    // Like / favorite / follow toggles
    let social_routes = Router::new()
        .route(
            "/api/spliks/:id/like",
            put(SocialController::like)
                .delete(SocialController::unlike)
                .get(SocialController::like_status),
        )
        .route(
            "/api/spliks/:id/favorite",
            put(SocialController::favorite)
                .delete(SocialController::unfavorite)
                .get(SocialController::favorite_status),
        )
        .route(
            "/api/profiles/:id/follow",
            put(SocialController::follow)
                .delete(SocialController::unfollow)
                .get(SocialController::follow_status),
        )
        .with_state(controllers.social.clone())
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            session_middleware,
        ));

    let favorites_routes = Router::new()
        .route("/api/me/favorites", get(SocialController::favorites))
        .with_state(controllers.social)
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            auth_middleware,
        ));

    // Profile routes (session optional, owners see their private lists)
    let profile_routes = Router::new()
        .route("/api/profiles/:id", get(ProfileController::get))
        .route("/api/profiles/:id/followers", get(ProfileController::followers))
        .route("/api/profiles/:id/following", get(ProfileController::following))
        .with_state(controllers.profile.clone())
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            session_middleware,
        ));

    let me_profile_routes = Router::new()
        .route("/api/me/profile", patch(ProfileController::update_me))
        .with_state(controllers.profile)
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            auth_middleware,
        ));

    // Boost routes (require authentication)
    let boost_routes = Router::new()
        .route(
            "/api/boosts/payment-intents",
            post(BoostController::create_payment_intent),
        )
        .route("/api/boosts/confirm", post(BoostController::confirm))
        .with_state(controllers.boost)
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            auth_middleware,
        ));

    // Upload routes (require authentication, large bodies)
    let upload_routes = Router::new()
        .route("/api/uploads/:bucket", post(UploadController::upload))
        .with_state(controllers.upload)
        .layer(DefaultBodyLimit::max(
            MAX_VIDEO_BYTES as usize + UPLOAD_BODY_SLACK,
        ))
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            auth_middleware,
        ));

    // Email routes (public, called right after signup)
    let email_routes = Router::new()
        .route("/api/emails/welcome", post(EmailController::welcome))
        .with_state(controllers.email);

    // Realtime routes (public server-sent events)
    let realtime_routes = Router::new()
        .route(
            "/api/realtime/spliks/:id",
            get(RealtimeController::splik_events),
        )
        .route(
            "/api/realtime/profiles/:id",
            get(RealtimeController::profile_events),
        )
        .with_state(controllers.realtime);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(probe)
        .merge(feed_routes)
        .merge(splik_routes)
        .merge(social_routes)
        .merge(favorites_routes)
        .merge(profile_routes)
        .merge(me_profile_routes)
        .merge(boost_routes)
        .merge(upload_routes)
        .merge(email_routes)
        .merge(realtime_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

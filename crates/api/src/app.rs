use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::NotificationService;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_operator,
    require_super_admin, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    about, activities, auth, checkin, contact, dashboard, gallery, health, logs, registrants,
    sponsors, uploads, users, years,
};
use crate::services::{DisabledNotificationService, FileStorage, WhatsAppNotificationService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub notifier: Arc<dyn NotificationService>,
    pub storage: Arc<FileStorage>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let notifier: Arc<dyn NotificationService> = if config.whatsapp.enabled {
        match WhatsAppNotificationService::new(config.whatsapp.clone()) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::warn!(error = %e, "WhatsApp gateway unavailable; confirmations disabled");
                Arc::new(DisabledNotificationService)
            }
        }
    } else {
        Arc::new(DisabledNotificationService)
    };

    create_app_with_notifier(config, pool, notifier)
}

/// Build the router with an explicit notifier. Tests inject a mock here.
pub fn create_app_with_notifier(
    config: Config,
    pool: PgPool,
    notifier: Arc<dyn NotificationService>,
) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let storage = Arc::new(FileStorage::new(&config.uploads));

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        notifier,
        storage,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/public/years/active", get(years::get_active_year))
        .route(
            "/api/v1/public/activities",
            get(activities::list_public_activities),
        )
        .route("/api/v1/public/activities/:id", get(activities::get_activity))
        .route(
            "/api/v1/public/activities/:id/guideline",
            get(activities::get_public_guideline),
        )
        .route(
            "/api/v1/public/checkin/:code",
            get(checkin::get_check_in).post(checkin::post_check_in),
        )
        .route("/api/v1/public/gallery", get(gallery::public_gallery))
        .route("/api/v1/public/sponsors", get(sponsors::public_sponsors))
        .route("/api/v1/public/about", get(about::get_about))
        .route("/uploads/:filename", get(uploads::serve_upload))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout));

    // Anonymous write endpoints share one per-IP throttle
    let throttled_routes = Router::new()
        .route(
            "/api/v1/public/activities/:id/register",
            post(activities::register_for_activity),
        )
        .route("/api/v1/public/contact", post(contact::submit_contact_message))
        .route("/api/v1/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Back-office routes for any admin role
    let operator_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/admin/years",
            get(years::list_years).post(years::create_year),
        )
        .route("/api/v1/admin/years/:id", put(years::update_year))
        .route("/api/v1/admin/years/:id/activate", post(years::activate_year))
        .route(
            "/api/v1/admin/years/:id/activities",
            get(activities::list_activities_for_year).post(activities::create_activity),
        )
        .route(
            "/api/v1/admin/activities/:id",
            get(activities::get_activity).put(activities::update_activity),
        )
        .route(
            "/api/v1/admin/activities/:id/registrants",
            get(registrants::list_registrants),
        )
        .route(
            "/api/v1/admin/activities/:id/registrants/export",
            get(registrants::export_registrants),
        )
        .route(
            "/api/v1/admin/registrants/:id/status",
            put(registrants::set_registrant_status),
        )
        .route(
            "/api/v1/admin/registrants/:id/verify",
            post(registrants::verify_registrant),
        )
        .route(
            "/api/v1/admin/registrants/:id/attend",
            post(registrants::attend_registrant),
        )
        .route("/api/v1/admin/registrants/:id/qr", get(registrants::registrant_qr))
        .route(
            "/api/v1/admin/gallery/:id/featured",
            put(gallery::set_featured),
        )
        .route("/api/v1/admin/gallery/:id", delete(gallery::delete_image))
        .route(
            "/api/v1/admin/about",
            get(about::get_about).put(about::update_about),
        )
        .route("/api/v1/admin/messages", get(contact::list_messages))
        .route("/api/v1/admin/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_operator,
        ));

    // Multipart uploads get the configured body limit instead of the default
    let operator_upload_routes = Router::new()
        .route(
            "/api/v1/admin/activities/:id/guideline",
            post(activities::upload_guideline),
        )
        .route(
            "/api/v1/admin/activities/:id/gallery",
            get(gallery::list_activity_gallery).post(gallery::upload_image),
        )
        .route_layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_operator,
        ));

    // Destructive and account-level operations
    let super_admin_routes = Router::new()
        .route("/api/v1/admin/years/:id", delete(years::delete_year))
        .route(
            "/api/v1/admin/activities/:id",
            delete(activities::delete_activity),
        )
        .route(
            "/api/v1/admin/sponsors",
            get(sponsors::list_sponsors).post(sponsors::create_sponsor),
        )
        .route(
            "/api/v1/admin/sponsors/:id",
            put(sponsors::update_sponsor).delete(sponsors::delete_sponsor),
        )
        .route(
            "/api/v1/admin/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/api/v1/admin/logs", get(logs::list_logs))
        .route_layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_super_admin,
        ));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(throttled_routes)
        .merge(operator_routes)
        .merge(operator_upload_routes)
        .merge(super_admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::{AuthError, Authenticator};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::models::{Activity, Advisory, Crop, Farm};
use crate::database::DocumentStore;
use crate::handlers::{protected, public};
use crate::services::OwnedCrud;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub auth: Authenticator,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self, AuthError> {
        let auth = Authenticator::new(store.clone(), &config.security)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            auth,
        })
    }

    pub fn farms(&self) -> OwnedCrud<Farm> {
        OwnedCrud::new(self.store.clone())
    }

    pub fn activities(&self) -> OwnedCrud<Activity> {
        OwnedCrud::new(self.store.clone())
    }

    pub fn crops(&self) -> OwnedCrud<Crop> {
        OwnedCrud::new(self.store.clone())
    }

    pub fn advisories(&self) -> OwnedCrud<Advisory> {
        OwnedCrud::new(self.store.clone())
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Owner-scoped resources
        .merge(farm_routes())
        .merge(activity_routes())
        .merge(crop_routes())
        .merge(advisory_routes())
        .merge(analytics_routes())
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config.security))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/login", post(public::auth::login))
        .route(
            "/api/auth/profile",
            get(protected::auth::profile_get).put(protected::auth::profile_put),
        )
        .route("/api/auth/change-password", put(protected::auth::change_password))
}

fn farm_routes() -> Router<AppState> {
    use protected::farms;

    Router::new()
        .route("/api/farms", get(farms::list).post(farms::create))
        .route(
            "/api/farms/:id",
            get(farms::get).put(farms::update).delete(farms::delete),
        )
}

fn activity_routes() -> Router<AppState> {
    use protected::activities;

    Router::new()
        .route("/api/activities", get(activities::list).post(activities::create))
        .route(
            "/api/activities/:id",
            get(activities::get)
                .put(activities::update)
                .delete(activities::delete),
        )
}

fn crop_routes() -> Router<AppState> {
    use protected::crops;

    Router::new()
        .route("/api/crops", get(crops::list).post(crops::create))
        .route("/api/crops/farm/:id", get(crops::list_for_farm))
        .route(
            "/api/crops/:id",
            get(crops::get).put(crops::update).delete(crops::delete),
        )
}

fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/advisories",
            get(public::advisories::list).post(protected::advisories::create),
        )
        .route("/api/advisories/mine", get(protected::advisories::mine))
        .route("/api/advisories/category/:category", get(public::advisories::by_category))
        .route(
            "/api/advisories/:id",
            get(public::advisories::get)
                .put(protected::advisories::update)
                .delete(protected::advisories::delete),
        )
}

fn analytics_routes() -> Router<AppState> {
    Router::new().route("/api/analytics/summary", get(protected::analytics::summary))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    // Browsers refuse credentials with a wildcard origin, and `AllowOrigin::list` rejects `*`.
    if security.allows_any_origin() {
        warn!("CORS open to any origin; credentialed requests are not allowed");
        return CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(methods)
            .allow_headers(headers);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Agrove API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Farm management backend: farms, field activities, crops and advisories",
            "endpoints": {
                "auth": "/api/auth/register, /api/auth/login (public); /api/auth/profile, /api/auth/change-password (protected)",
                "farms": "/api/farms[/:id] (protected)",
                "activities": "/api/activities[/:id] (protected)",
                "crops": "/api/crops[/:id], /api/crops/farm/:farmId (protected)",
                "advisories": "/api/advisories[/:id], /api/advisories/category/:category (public reads); /api/advisories/mine (protected)",
                "analytics": "/api/analytics/summary (protected)",
                "health": "/health (public)"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": backend
                }
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "Database temporarily unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": backend
                    }
                })),
            )
        }
    }
}

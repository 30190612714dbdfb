//! Keel Web Server
//!
//! Axum-based REST API for the Keel financial clarity application.
//!
//! Security posture:
//! - Bearer API-key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Input validation (body size limits, finite-number checks in the core)
//! - Audit logging for all mutating API access
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use keel_core::ai::{AdvisorBackend, AiClient};
use keel_core::db::Database;

mod handlers;


/// Maximum request body size for ordinary JSON endpoints (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Maximum statement upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys accepted as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

impl ServerConfig {
    /// Read API keys from the KEEL_API_KEYS environment variable
    /// (comma-separated)
    pub fn api_keys_from_env() -> Vec<String> {
        std::env::var("KEEL_API_KEYS")
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Advisor backend; None when no AI is configured
    pub ai: Option<AiClient>,
}

/// Authentication middleware - validates bearer API keys
///
/// API keys are compared using constant-time comparison to prevent timing
/// attacks. With `require_auth` off (local dev), every request passes.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time
/// comparison to prevent timing attacks.
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    for key in valid_keys {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        if provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes)) {
            return true;
        }
    }
    false
}

/// Extract the acting user from request headers (for audit logging)
///
/// Returns "api-key" for authenticated requests, "local-dev" otherwise.
pub fn get_user(headers: &axum::http::HeaderMap) -> String {
    if headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .is_some()
    {
        return "api-key".to_string();
    }

    "local-dev".to_string()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Health response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    ai_configured: bool,
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ai_configured: state.ai.is_some(),
    })
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let ai = AiClient::from_env();
    create_router_with_ai(db, static_dir, config, ai)
}

/// Create the application router with an explicit advisor client (for testing)
pub fn create_router_with_ai(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    ai: Option<AiClient>,
) -> Router {
    if let Some(ref client) = ai {
        info!(
            "Advisor backend configured: {} (model: {})",
            client.host(),
            client.model()
        );
    } else {
        info!("Advisor backend not configured (set OLLAMA_HOST to enable AI features)");
    }

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        ai,
    });

    use axum::routing::{get, post};

    let api_routes = Router::new()
        .route("/health", get(health))
        // Businesses
        .route(
            "/businesses",
            get(handlers::list_businesses).post(handlers::create_business),
        )
        .route(
            "/businesses/:id",
            get(handlers::get_business)
                .put(handlers::update_business)
                .delete(handlers::delete_business),
        )
        // Snapshots
        .route(
            "/businesses/:id/snapshots",
            get(handlers::list_snapshots).post(handlers::create_snapshot),
        )
        .route("/businesses/:id/summary", get(handlers::get_summary))
        // Forecast
        .route("/businesses/:id/forecast", post(handlers::run_forecast))
        .route(
            "/businesses/:id/forecast/review",
            post(handlers::review_forecast),
        )
        // Statements
        .route(
            "/businesses/:id/statements",
            get(handlers::list_statements).post(handlers::upload_statement),
        )
        .route("/statements/:id/items", get(handlers::list_line_items))
        .route("/statements/:id/confirm", post(handlers::confirm_statement))
        // Decisions
        .route(
            "/businesses/:id/decisions",
            get(handlers::list_decisions).post(handlers::create_decision),
        )
        .route(
            "/decisions/:id",
            axum::routing::patch(handlers::update_decision).delete(handlers::delete_decision),
        )
        .route("/decisions/:id/analyze", post(handlers::analyze_decision))
        // Advisor conversations
        .route(
            "/businesses/:id/conversations",
            get(handlers::list_conversations).post(handlers::create_conversation),
        )
        .route(
            "/conversations/:id",
            get(handlers::get_conversation).delete(handlers::delete_conversation),
        )
        .route(
            "/conversations/:id/messages",
            post(handlers::send_message),
        )
        // Audit log
        .route("/audit", get(handlers::list_audit_log))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    let mut router = Router::new().nest("/api", api_routes);

    // CORS: restrictive by default, explicit origins only
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("Authentication disabled - do not expose to network!");
    }

    // Check advisor backend connection
    check_ai_connection().await;

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log advisor backend connection status
async fn check_ai_connection() {
    match AiClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "Advisor backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "Advisor backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("Advisor backend not configured (set OLLAMA_HOST to enable AI features)");
        }
    }
}

/// API error with a sanitized public message
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<keel_core::Error> for AppError {
    fn from(err: keel_core::Error) -> Self {
        use keel_core::Error;

        match err {
            Error::InvalidInput(msg) => Self::bad_request(&msg),
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::Import(msg) => Self::bad_request(&msg),
            Error::Advisor(msg) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "The advisor backend returned an unusable response".to_string(),
                internal: Some(anyhow::anyhow!(msg)),
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::middleware::require_auth_session;
use auth::models::DecodedClaims;
use auth::router::{identity_router, session_routes};
use auth::{AuthConfig, EmulatorIdentityProvider, IdentityConfig};
use axum::{
    Extension, Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::config::{env_list, env_opt, env_or, env_parse, is_production};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

type AppState = auth::handlers::AuthAppState<EmulatorIdentityProvider>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let production = is_production();

    let auth_config = load_auth_config(production)?;
    auth_config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid session configuration: {e}"))?;

    let identity_config = load_identity_config(production)?;
    tracing::info!(
        project_id = %identity_config.project_id,
        production,
        "Identity emulator configured"
    );
    let idp = EmulatorIdentityProvider::in_memory(identity_config)
        .map_err(|e| anyhow::anyhow!("failed to start identity emulator: {e}"))?;

    let app = build_app(idp, auth_config)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    // Start server
    let addr: SocketAddr = env_or("BIND_ADDR", "0.0.0.0:31113")
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes: session pages at the root, emulator account API under
/// `/identity/v1`, and a sample protected endpoint.
fn build_app(idp: EmulatorIdentityProvider, auth_config: AuthConfig) -> Router {
    let state = AppState::new(Arc::new(idp.clone()), auth_config);

    let protected = Router::new()
        .route("/api/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth_session::<EmulatorIdentityProvider>,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(session_routes(state))
        .merge(protected)
        .nest("/identity/v1", identity_router(idp))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/me (requires a valid session)
async fn me(Extension(claims): Extension<DecodedClaims>) -> Json<DecodedClaims> {
    Json(claims)
}

fn load_auth_config(production: bool) -> anyhow::Result<AuthConfig> {
    let secrets = env_list("SESSION_SECRETS")
        .iter()
        .map(|s| decode_secret("SESSION_SECRETS", s))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut config = if production {
        if secrets.is_empty() {
            anyhow::bail!("SESSION_SECRETS must be set in production");
        }
        AuthConfig::production(secrets, env_opt("SESSION_COOKIE_DOMAIN"))
    } else if secrets.is_empty() {
        tracing::warn!("SESSION_SECRETS not set, using a random secret; sessions end on restart");
        AuthConfig::development()
    } else {
        AuthConfig {
            session_secrets: secrets,
            ..AuthConfig::development()
        }
    };

    config.session_cookie_name = env_or("SESSION_COOKIE_NAME", &config.session_cookie_name);

    if let Some(secs) = env_parse::<u64>("SESSION_VALIDITY_SECS")? {
        config.session_validity = Duration::from_secs(secs);
        config.cookie_max_age = config.session_validity;
    }
    if let Some(secs) = env_parse::<u64>("SESSION_COOKIE_MAX_AGE_SECS")? {
        config.cookie_max_age = Duration::from_secs(secs);
    }

    Ok(config)
}

fn load_identity_config(production: bool) -> anyhow::Result<IdentityConfig> {
    let project_id = env_or("IDENTITY_PROJECT_ID", "demo-project");

    match env_opt("IDENTITY_SIGNING_SECRET") {
        Some(secret) => Ok(IdentityConfig {
            project_id,
            signing_secret: decode_secret("IDENTITY_SIGNING_SECRET", &secret)?,
            ..IdentityConfig::default()
        }),
        None if production => anyhow::bail!("IDENTITY_SIGNING_SECRET must be set in production"),
        None => Ok(IdentityConfig::with_random_secret(project_id)),
    }
}

/// Secrets are configured as standard base64 (`openssl rand -base64 32`)
fn decode_secret(name: &str, value: &str) -> anyhow::Result<Vec<u8>> {
    let bytes = Engine::decode(&general_purpose::STANDARD, value)
        .with_context(|| format!("{name} entries must be base64"))?;
    if bytes.len() < 32 {
        anyhow::bail!("{name} entries must decode to at least 32 bytes");
    }
    Ok(bytes)
}

fn cors_layer() -> CorsLayer {
    let mut frontend_origins = env_list("FRONTEND_ORIGINS");
    if frontend_origins.is_empty() {
        frontend_origins = vec![
            "http://localhost:40922".to_string(),
            "http://127.0.0.1:40922".to_string(),
        ];
    }

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ]))
        .allow_credentials(true)
}

//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! auth crate.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};
use auth::{
    AuthAppState, AuthConfig, Clock, InMemoryAuthRepository, PgAuthRepository, SystemClock,
    auth_router,
    domain::repository::{SessionRepository, UserRepository},
};
use axum::{
    Router,
    http::{self, Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

    let config = load_auth_config()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cors = cors_layer();

    let app = match env::var("AUTH_STORE").as_deref() {
        Ok("memory") => {
            tracing::warn!("Using in-memory auth store; data is lost on restart");
            build_app(InMemoryAuthRepository::new(), config, clock)
        }
        Ok("postgres") | Err(_) => build_app(connect_postgres().await?, config, clock),
        Ok(other) => bail!("AUTH_STORE must be `postgres` or `memory`, got `{other}`"),
    };

    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_app<R>(repo: R, config: AuthConfig, clock: Arc<dyn Clock>) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    auth_router(AuthAppState::new(repo, config, clock))
}

async fn connect_postgres() -> anyhow::Result<PgAuthRepository> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let repo = PgAuthRepository::new(pool);
    if let Err(e) = repo.cleanup_expired(chrono::Utc::now()).await {
        tracing::warn!(
            error = %e,
            "Session cleanup failed, continuing anyway"
        );
    }

    Ok(repo)
}

fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("SESSION_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("SESSION_SECRET must be base64")?;
            let secret: [u8; 32] = secret_bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes"))?;
            AuthConfig {
                session_secret: secret,
                ..AuthConfig::default()
            }
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set; using a random secret and insecure cookies");
            AuthConfig::development()
        }
        Err(_) => bail!("SESSION_SECRET must be set in production"),
    };

    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    Ok(config)
}

fn cors_layer() -> CorsLayer {
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            http::HeaderName::from_static("x-csrf-token"),
        ]))
        .allow_credentials(true)
}

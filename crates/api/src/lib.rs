//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Authentication middleware for provider-issued tokens
//! - The identity provider client
//! - The background reconciliation monitor

pub mod error;
pub mod middleware;
pub mod monitor;
pub mod routes;
pub mod supabase;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use assessoria_core::monitoring::AlertLog;
use assessoria_core::reconciliation::PaginationOptions;
use assessoria_db::{RlsConnection, RlsExt};
use assessoria_shared::config::{AppConfig, AuthConfig, ReconciliationConfig};
use assessoria_shared::{Claims, JwtConfig, JwtService};
use axum::Router;
use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiResult;
use crate::supabase::GoTrueClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Identity provider client.
    pub identity: Arc<GoTrueClient>,
    /// Login gating.
    pub auth: Arc<AuthConfig>,
    /// Pagination and tolerance settings.
    pub reconciliation: Arc<ReconciliationConfig>,
    /// Alerts raised by checks, newest last.
    pub alerts: Arc<RwLock<AlertLog>>,
    /// Set while the background monitor runs.
    pub monitoring_active: Arc<AtomicBool>,
}

impl AppState {
    /// Builds the state from configuration and a connected pool.
    #[must_use]
    pub fn new(config: &AppConfig, db: DatabaseConnection) -> Self {
        let jwt_service = JwtService::new(JwtConfig {
            secret: config.supabase.jwt_secret.clone(),
            ..JwtConfig::default()
        });

        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            identity: Arc::new(GoTrueClient::new(&config.supabase)),
            auth: Arc::new(config.auth.clone()),
            reconciliation: Arc::new(config.reconciliation.clone()),
            alerts: Arc::new(RwLock::new(AlertLog::default())),
            monitoring_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Page size and page limit for paginated reads.
    #[must_use]
    pub fn pagination(&self) -> PaginationOptions {
        PaginationOptions {
            page_size: self.reconciliation.page_size,
            max_pages: self.reconciliation.max_pages,
        }
    }

    /// Whether the background monitor is running.
    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.monitoring_active.load(Ordering::Relaxed)
    }

    /// Opens a transaction under the caller's RLS context.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub async fn begin(&self, claims: &Claims) -> ApiResult<RlsConnection> {
        Ok(self.db.with_rls(claims).await?)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

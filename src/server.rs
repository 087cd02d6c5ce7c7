//! # Server Configuration
//!
//! This module contains the router setup, shared application state and
//! OpenAPI documentation for the Estates API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::events::EventBus;
use crate::handlers;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub events: Arc<EventBus>,
    pub started_at: Instant,
}

/// Assigns a trace context to every request so errors and logs share one
/// correlation ID.
async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let context = TraceContext {
        trace_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(context.clone());
    telemetry::with_trace_context(context, next.run(request)).await
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/v1/apartments",
            get(handlers::apartments::list_apartments).post(handlers::apartments::create_apartment),
        )
        .route(
            "/api/v1/apartments/{id}",
            delete(handlers::apartments::delete_apartment),
        )
        .route(
            "/api/v1/units",
            get(handlers::units::list_units)
                .post(handlers::units::create_unit)
                .patch(handlers::units::update_unit_status),
        )
        .route(
            "/api/v1/tenants",
            get(handlers::tenants::list_tenants).post(handlers::tenants::create_tenant),
        )
        .route(
            "/api/v1/payments",
            get(handlers::payments::list_payments).post(handlers::payments::record_payment),
        )
        .route(
            "/api/v1/dashboard/stats",
            get(handlers::dashboard::dashboard_stats),
        )
        .route("/api/v1/events", get(handlers::ws::events_ws))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let profile = config.profile.clone();
    let events = Arc::new(EventBus::new(config.events.channel_capacity));
    let state = AppState {
        db,
        config: Arc::new(config),
        events,
        started_at: Instant::now(),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Builds an [`AppState`] for tests without binding a listener.
pub fn create_test_app_state(config: AppConfig, db: DatabaseConnection) -> AppState {
    let events = Arc::new(EventBus::new(config.events.channel_capacity));
    AppState {
        db,
        config: Arc::new(config),
        events,
        started_at: Instant::now(),
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::apartments::list_apartments,
        crate::handlers::apartments::create_apartment,
        crate::handlers::apartments::delete_apartment,
        crate::handlers::units::list_units,
        crate::handlers::units::create_unit,
        crate::handlers::units::update_unit_status,
        crate::handlers::tenants::list_tenants,
        crate::handlers::tenants::create_tenant,
        crate::handlers::payments::list_payments,
        crate::handlers::payments::record_payment,
        crate::handlers::dashboard::dashboard_stats,
        crate::handlers::ws::events_ws,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthStatus,
            crate::handlers::types::ApartmentDto,
            crate::handlers::types::UnitDto,
            crate::handlers::types::UnitBriefDto,
            crate::handlers::types::TenantDto,
            crate::handlers::types::PaymentDto,
            crate::handlers::apartments::CreateApartmentRequestDto,
            crate::handlers::apartments::ApartmentListItemDto,
            crate::handlers::units::CreateUnitRequestDto,
            crate::handlers::units::UpdateUnitStatusRequestDto,
            crate::handlers::units::UnitListItemDto,
            crate::handlers::tenants::CreateTenantRequestDto,
            crate::handlers::tenants::TenantListItemDto,
            crate::handlers::tenants::TenantListResponseDto,
            crate::handlers::tenants::PaginationDto,
            crate::handlers::payments::RecordPaymentRequestDto,
            crate::handlers::payments::TenantLedgerDto,
            crate::handlers::dashboard::DashboardStatsDto,
            crate::handlers::dashboard::DashboardApartmentDto,
            crate::handlers::dashboard::MonthlyRevenueDto,
            crate::models::unit::UnitStatus,
            crate::models::unit::UnitType,
            crate::models::tenant::TenantStatus,
            crate::models::payment::PaymentMethod,
            crate::models::payment::PaymentPlan,
            crate::events::EventKind,
            crate::events::Envelope,
            crate::error::ApiError,
        )
    ),
    info(
        title = "Estates API",
        description = "Property management API for apartment units, tenants and payments",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;

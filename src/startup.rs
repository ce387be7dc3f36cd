//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;

use crate::application::services::{
    CustomerExperienceService, CustomerExperienceServiceImpl, FraudDetectionService,
    FraudDetectionServiceImpl, LeadConversionService, LeadConversionServiceImpl,
    ListingPolicyService, ListingPolicyServiceImpl, OperationalExcellenceService,
    OperationalExcellenceServiceImpl, PerformanceTrackingService, PerformanceTrackingServiceImpl,
    RiskManagementService, RiskManagementServiceImpl,
};
use crate::config::Settings;
use crate::domain::policies::{ListingPolicies, PolicyThresholds};
use crate::infrastructure::models::{FileModelStore, ModelStore, RetryingModelStore};
use crate::presentation::http::handlers::health;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::retry::RetryRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub models: Arc<RetryingModelStore<FileModelStore>>,
    pub fraud_detection: Arc<dyn FraudDetectionService>,
    pub risk_management: Arc<dyn RiskManagementService>,
    pub customer_experience: Arc<dyn CustomerExperienceService>,
    pub lead_conversion: Arc<dyn LeadConversionService>,
    pub performance_tracking: Arc<dyn PerformanceTrackingService>,
    pub operational_excellence: Arc<dyn OperationalExcellenceService>,
    pub listing_policies: Arc<dyn ListingPolicyService>,
}

impl AppState {
    /// Wire every service from settings
    pub fn new(settings: Settings) -> Self {
        let retry = Arc::new(RetryRegistry::from_settings(&settings.retry));
        for rule in retry.rules() {
            tracing::debug!(
                pattern = rule.pattern(),
                max_attempts = rule.policy().max_attempts(),
                "Retry rule registered"
            );
        }
        let models = Arc::new(RetryingModelStore::new(
            FileModelStore::new(&settings.models.directory),
            retry,
        ));
        let store: Arc<dyn ModelStore> = models.clone();
        let policies = ListingPolicies::new(PolicyThresholds::from(&settings.policies));

        Self {
            settings: Arc::new(settings),
            fraud_detection: Arc::new(FraudDetectionServiceImpl::new(store.clone())),
            risk_management: Arc::new(RiskManagementServiceImpl::new(store.clone())),
            customer_experience: Arc::new(CustomerExperienceServiceImpl::new(store.clone())),
            lead_conversion: Arc::new(LeadConversionServiceImpl::new(store.clone())),
            performance_tracking: Arc::new(PerformanceTrackingServiceImpl::new(store.clone())),
            operational_excellence: Arc::new(OperationalExcellenceServiceImpl::new(store)),
            listing_policies: Arc::new(ListingPolicyServiceImpl::new(policies)),
            models,
        }
    }
}

/// Router with every route and middleware layer, without a listener
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state).layer(
        ServiceBuilder::new()
            .layer(logging::create_trace_layer())
            .layer(cors)
            .layer(CompressionLayer::new()),
    )
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let addr: SocketAddr = settings.server_addr().parse()?;
        tracing::info!(
            models = %settings.models.directory,
            retry_rules = settings.retry.rules.len(),
            "Services configured"
        );

        let router = build_router(AppState::new(settings));

        // Bind to address
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the same handler code runs
//! against the production `AppState` and the in-memory test state.

use crate::config::Config;
use crate::repository::BranchOfficeRepository;
use crate::service::BranchOfficeService;
use metrics_exporter_prometheus::PrometheusHandle;

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The branch office repository type
    type BranchOfficeRepo: BranchOfficeRepository + 'static;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the branch office service
    fn branch_office_service(&self) -> &BranchOfficeService<Self::BranchOfficeRepo>;

    /// Prometheus handle, present when metrics are enabled
    fn prometheus_handle(&self) -> Option<&PrometheusHandle>;

    /// Whether backing stores are reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}

// =====================================================================================
// DASHBOARD CELL - PORTFOLIO SUMMARY CARDS
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{DashboardError, DashboardSummary, PerformerCard, RiskCard};
pub use router::create_dashboard_router;
pub use services::DashboardService;

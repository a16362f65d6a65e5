//! Projection engine turning an assumption set into a monthly cash ledger

mod state;
mod engine;
mod cashflows;

pub use state::{round_half_up, GrowthStep, RevenueState};
pub use engine::{project, steady_state_mrr, ProjectionConfig, ProjectionEngine, PAYROLL_LOADING_FACTOR};
pub use cashflows::{ProjectionPeriod, ProjectionResult, ProjectionSummary};

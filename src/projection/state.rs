//! Revenue state carried from one period to the next

use crate::assumptions::AssumptionSet;

/// Compounding state at a point in the projection
///
/// Values are kept unrounded; rounding happens only when a period is written
/// to the ledger.
#[derive(Debug, Clone)]
pub struct RevenueState {
    /// Current period index (0-based)
    pub period: u32,

    /// Monthly recurring revenue
    pub mrr: f64,

    /// Active customers, may be fractional
    pub customers: f64,

    /// Non-subscription revenue, compounding at the growth rate
    pub additional_revenue: f64,

    /// Running cash balance after the last completed period
    pub cash_balance: f64,
}

/// Movement of the subscription base during one period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrowthStep {
    pub new_customers: f64,
    pub churned_customers: f64,
    pub new_revenue: f64,
    pub churned_revenue: f64,
}

impl RevenueState {
    /// State for period 0, before any cashflow is applied
    pub fn from_assumptions(assumptions: &AssumptionSet) -> Self {
        let customers = if assumptions.arpu > 0.0 {
            round_half_up(assumptions.starting_mrr / assumptions.arpu)
        } else {
            0.0
        };

        Self {
            period: 0,
            mrr: assumptions.starting_mrr,
            customers,
            additional_revenue: assumptions.additional_revenue,
            cash_balance: assumptions.initial_cash,
        }
    }

    /// Advance to the next period, applying churn, acquisition and growth
    pub fn advance_month(&mut self, assumptions: &AssumptionSet) -> GrowthStep {
        self.period += 1;

        let churn = assumptions.monthly_churn_rate / 100.0;
        let step = GrowthStep {
            new_customers: assumptions.new_customers_per_month,
            churned_customers: round_half_up(self.customers * churn),
            new_revenue: assumptions.new_customers_per_month * assumptions.arpu,
            churned_revenue: self.mrr * churn,
        };

        self.mrr = self.mrr - step.churned_revenue + step.new_revenue;
        self.customers = self.customers - step.churned_customers + step.new_customers;
        self.additional_revenue *= 1.0 + assumptions.additional_revenue_growth / 100.0;

        step
    }
}

/// Round to the nearest whole unit, halves toward positive infinity
///
/// `-2.5` rounds to `-2`, `2.5` to `3`. Non-finite values pass through.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

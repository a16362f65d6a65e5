//! Ledger output structures for projections

use serde::{Deserialize, Serialize};

/// One period of the projected ledger
///
/// Money fields are whole currency units, rounded per category before they are
/// summed. `cash_balance` is the exact running sum of `net_cashflow` on top of
/// the initial cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPeriod {
    // Timing
    pub month: u32,

    // Revenue state
    pub mrr: f64,
    pub additional_revenue: f64,

    // Inflows
    pub annual_plan_revenue: f64,
    pub capital_injections: f64,
    pub total_inflows: f64,

    // Outflows
    pub payroll: f64,
    pub recurring_expenses: f64,
    pub one_time_expenses: f64,
    pub variable_expenses: f64,
    pub refunds: f64,
    pub estimated_taxes: f64,
    pub owners_draw: f64,
    #[serde(rename = "owners401k")]
    pub owners_401k: f64,
    pub total_outflows: f64,

    // Summary
    pub net_cashflow: f64,
    pub cash_balance: f64,

    // Customer and MRR decomposition
    pub new_customers: f64,
    pub churned_customers: f64,
    pub total_customers: f64,
    pub new_revenue_from_growth: f64,
    pub churned_revenue_amount: f64,
}

impl ProjectionPeriod {
    /// Create a zeroed period
    pub fn new(month: u32) -> Self {
        Self {
            month,
            mrr: 0.0,
            additional_revenue: 0.0,
            annual_plan_revenue: 0.0,
            capital_injections: 0.0,
            total_inflows: 0.0,
            payroll: 0.0,
            recurring_expenses: 0.0,
            one_time_expenses: 0.0,
            variable_expenses: 0.0,
            refunds: 0.0,
            estimated_taxes: 0.0,
            owners_draw: 0.0,
            owners_401k: 0.0,
            total_outflows: 0.0,
            net_cashflow: 0.0,
            cash_balance: 0.0,
            new_customers: 0.0,
            churned_customers: 0.0,
            total_customers: 0.0,
            new_revenue_from_growth: 0.0,
            churned_revenue_amount: 0.0,
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Cash on hand before period 0
    pub initial_cash: f64,

    /// Steady-state MRR implied by acquisition and churn
    pub steady_state_mrr: f64,

    /// Ledger rows, one per period
    pub periods: Vec<ProjectionPeriod>,
}

impl ProjectionResult {
    pub fn new(initial_cash: f64, steady_state_mrr: f64) -> Self {
        Self {
            initial_cash,
            steady_state_mrr,
            periods: Vec::new(),
        }
    }

    /// Add a ledger row
    pub fn add_period(&mut self, period: ProjectionPeriod) {
        self.periods.push(period);
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_inflows: f64 = self.periods.iter().map(|p| p.total_inflows).sum();
        let total_outflows: f64 = self.periods.iter().map(|p| p.total_outflows).sum();

        let ending_cash = self
            .periods
            .last()
            .map(|p| p.cash_balance)
            .unwrap_or(self.initial_cash);

        let lowest = self
            .periods
            .iter()
            .min_by(|a, b| a.cash_balance.total_cmp(&b.cash_balance));

        ProjectionSummary {
            total_months: self.periods.len() as u32,
            total_inflows,
            total_outflows,
            ending_cash,
            lowest_cash_balance: lowest.map(|p| p.cash_balance).unwrap_or(self.initial_cash),
            lowest_cash_month: lowest.map(|p| p.month),
            cash_out_month: self
                .periods
                .iter()
                .find(|p| p.cash_balance < 0.0)
                .map(|p| p.month),
            break_even_month: self
                .periods
                .iter()
                .find(|p| p.net_cashflow >= 0.0)
                .map(|p| p.month),
            ending_mrr: self.periods.last().map(|p| p.mrr).unwrap_or(0.0),
            ending_customers: self.periods.last().map(|p| p.total_customers).unwrap_or(0.0),
            steady_state_mrr: self.steady_state_mrr,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_inflows: f64,
    pub total_outflows: f64,
    pub ending_cash: f64,
    pub lowest_cash_balance: f64,
    pub lowest_cash_month: Option<u32>,
    /// First period that ends with a negative balance
    pub cash_out_month: Option<u32>,
    /// First period whose net cashflow is non-negative
    pub break_even_month: Option<u32>,
    pub ending_mrr: f64,
    pub ending_customers: f64,
    /// `f64::INFINITY` when churn is zero; serializes as `null`
    pub steady_state_mrr: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(month: u32, net: f64, balance: f64) -> ProjectionPeriod {
        ProjectionPeriod {
            net_cashflow: net,
            cash_balance: balance,
            total_inflows: net.max(0.0),
            total_outflows: (-net).max(0.0),
            ..ProjectionPeriod::new(month)
        }
    }

    #[test]
    fn test_summary_of_empty_result() {
        let result = ProjectionResult::new(5_000.0, 0.0);
        let summary = result.summary();
        assert_eq!(summary.total_months, 0);
        assert_eq!(summary.ending_cash, 5_000.0);
        assert_eq!(summary.lowest_cash_balance, 5_000.0);
        assert_eq!(summary.lowest_cash_month, None);
        assert_eq!(summary.cash_out_month, None);
    }

    #[test]
    fn test_summary_runway_and_break_even() {
        let mut result = ProjectionResult::new(1_000.0, f64::INFINITY);
        result.add_period(period(0, -600.0, 400.0));
        result.add_period(period(1, -700.0, -300.0));
        result.add_period(period(2, 200.0, -100.0));

        let summary = result.summary();
        assert_eq!(summary.total_months, 3);
        assert_eq!(summary.total_inflows, 200.0);
        assert_eq!(summary.total_outflows, 1_300.0);
        assert_eq!(summary.ending_cash, -100.0);
        assert_eq!(summary.lowest_cash_balance, -300.0);
        assert_eq!(summary.lowest_cash_month, Some(1));
        assert_eq!(summary.cash_out_month, Some(1));
        assert_eq!(summary.break_even_month, Some(2));
        assert!(summary.steady_state_mrr.is_infinite());
    }
}

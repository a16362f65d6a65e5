//! Core projection engine for monthly cash ledger projections

use log::debug;

use crate::assumptions::{AssumptionSet, ItemRecord};
use super::state::{round_half_up, GrowthStep, RevenueState};
use super::cashflows::{ProjectionPeriod, ProjectionResult};

/// All-in employment cost multiplier applied to base salaries
pub const PAYROLL_LOADING_FACTOR: f64 = 1.15;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Multiplier turning base salary into loaded payroll cost
    pub payroll_loading: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            payroll_loading: PAYROLL_LOADING_FACTOR,
        }
    }
}

/// Main projection engine
pub struct ProjectionEngine<'a> {
    assumptions: &'a AssumptionSet,
    config: ProjectionConfig,
}

impl<'a> ProjectionEngine<'a> {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: &'a AssumptionSet, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    /// Run the projection over `number_of_months` periods
    pub fn run(&self) -> ProjectionResult {
        let a = self.assumptions;
        let mut result = ProjectionResult::new(a.initial_cash, steady_state_mrr(a));
        let mut state = RevenueState::from_assumptions(a);

        debug!(
            "projecting {} months over {} line items",
            a.number_of_months,
            a.item_count()
        );

        for month in 0..a.number_of_months {
            // Subscription base only moves from period 1 on
            let step = if month == 0 {
                GrowthStep::default()
            } else {
                state.advance_month(a)
            };

            let period = self.calculate_month(&mut state, &step);
            result.add_period(period);
        }

        result
    }

    /// Build one ledger row from the current state
    fn calculate_month(&self, state: &mut RevenueState, step: &GrowthStep) -> ProjectionPeriod {
        let a = self.assumptions;
        let m = i64::from(state.period);
        let mut row = ProjectionPeriod::new(state.period);

        // Revenue state
        row.mrr = round_half_up(state.mrr);
        row.additional_revenue = round_half_up(state.additional_revenue);
        row.new_customers = step.new_customers;
        row.churned_customers = step.churned_customers;
        row.total_customers = state.customers;
        row.new_revenue_from_growth = round_half_up(step.new_revenue);
        row.churned_revenue_amount = round_half_up(step.churned_revenue);

        // Dated inflows
        let annual_plan = sum_visible(&a.annual_plan_revenue, |item| item.amount_in(m));
        row.annual_plan_revenue = round_half_up(annual_plan);
        row.capital_injections =
            round_half_up(sum_visible(&a.capital_injections, |item| item.amount_in(m)));

        // Variable expenses are a share of operating revenue; capital is excluded
        let revenue_base = state.mrr + state.additional_revenue + annual_plan;

        // Outflows
        row.payroll = round_half_up(sum_visible(&a.employees, |emp| {
            if emp.is_paid_in(m) {
                emp.salary * self.config.payroll_loading
            } else {
                0.0
            }
        }));
        row.recurring_expenses = round_half_up(sum_visible(&a.recurring_expenses, |item| item.amount));
        row.one_time_expenses =
            round_half_up(sum_visible(&a.one_time_expenses, |item| item.amount_in(m)));
        row.variable_expenses = round_half_up(sum_visible(&a.variable_expenses, |item| {
            item.share_of(revenue_base)
        }));
        row.refunds = round_half_up(sum_visible(&a.refunds, |item| item.amount));
        row.estimated_taxes =
            round_half_up(sum_visible(&a.estimated_taxes, |item| item.amount_in(m)));
        row.owners_draw = round_half_up(sum_visible(&a.owners_draw, |item| item.amount));
        row.owners_401k = round_half_up(sum_visible(&a.owners_401k, |item| item.amount_in(m)));

        // Totals from the already rounded categories
        row.total_inflows =
            row.mrr + row.additional_revenue + row.annual_plan_revenue + row.capital_injections;
        row.total_outflows = row.payroll
            + row.recurring_expenses
            + row.one_time_expenses
            + row.variable_expenses
            + row.refunds
            + row.estimated_taxes
            + row.owners_draw
            + row.owners_401k;
        row.net_cashflow = row.total_inflows - row.total_outflows;

        state.cash_balance += row.net_cashflow;
        row.cash_balance = state.cash_balance;

        row
    }
}

/// Sum `value` over the items not marked hidden
fn sum_visible<T: ItemRecord>(items: &[T], value: impl Fn(&T) -> f64) -> f64 {
    items
        .iter()
        .filter(|item| !item.is_hidden())
        .map(value)
        .sum()
}

/// MRR at which churn exactly offsets acquisition
///
/// Infinite when churn is zero (or negative), i.e. MRR grows without bound.
pub fn steady_state_mrr(assumptions: &AssumptionSet) -> f64 {
    let churn = assumptions.monthly_churn_rate / 100.0;
    if churn <= 0.0 {
        f64::INFINITY
    } else {
        assumptions.new_customers_per_month * assumptions.arpu / churn
    }
}

/// Project an assumption set with the default configuration
///
/// Returns exactly `number_of_months` periods; never fails.
pub fn project(assumptions: &AssumptionSet) -> Vec<ProjectionPeriod> {
    ProjectionEngine::new(assumptions, ProjectionConfig::default())
        .run()
        .periods
}

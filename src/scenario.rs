//! Scenario runner for batch and what-if projections
//!
//! Every projection is pure, so independent assumption sets are projected in
//! parallel without coordination.

use rayon::prelude::*;

use crate::assumptions::{AssumptionSet, CollectionKind, ItemId};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Runs projections with a shared configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// // Lean, base and aggressive hiring plans side by side
/// let results = runner.run_batch(&[lean, base, aggressive]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ProjectionConfig,
}

/// Per-period effect of one line item on the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct ItemContribution {
    pub month: u32,
    /// Change in net cashflow caused by the item (negative for costs)
    pub net_cashflow: f64,
    /// Change in the running cash balance caused by the item
    pub cash_balance: f64,
}

impl ScenarioRunner {
    /// Create runner with the default projection config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with a custom projection config
    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Run a single projection
    pub fn run(&self, assumptions: &AssumptionSet) -> ProjectionResult {
        ProjectionEngine::new(assumptions, self.config.clone()).run()
    }

    /// Run many assumption sets in parallel; results keep input order
    pub fn run_batch(&self, scenarios: &[AssumptionSet]) -> Vec<ProjectionResult> {
        scenarios
            .par_iter()
            .map(|assumptions| self.run(assumptions))
            .collect()
    }

    /// What one item adds to each period, found by projecting with the item
    /// visible and hidden and changing nothing else
    ///
    /// Returns `None` if the item does not exist.
    pub fn item_contribution(
        &self,
        assumptions: &AssumptionSet,
        kind: CollectionKind,
        id: ItemId,
    ) -> Option<Vec<ItemContribution>> {
        let mut with_item = assumptions.clone();
        let mut without_item = assumptions.clone();
        if !with_item.set_hidden(kind, id, false) || !without_item.set_hidden(kind, id, true) {
            return None;
        }

        let (with, without) = rayon::join(|| self.run(&with_item), || self.run(&without_item));

        Some(
            with.periods
                .iter()
                .zip(&without.periods)
                .map(|(a, b)| ItemContribution {
                    month: a.month,
                    net_cashflow: a.net_cashflow - b.net_cashflow,
                    cash_balance: a.cash_balance - b.cash_balance,
                })
                .collect(),
        )
    }

    /// Get reference to the projection config
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{DatedAmount, Employee, EndMonth};

    fn plan_with_hiring(salary: f64) -> AssumptionSet {
        let mut plan = AssumptionSet::default_plan();
        plan.starting_mrr = 20_000.0;
        plan.arpu = 100.0;
        plan.new_customers_per_month = 10.0;
        plan.monthly_churn_rate = 3.0;
        plan.employees.push(Employee::new(3, "Hire", salary, 6));
        plan
    }

    #[test]
    fn test_run_batch_keeps_order() {
        let runner = ScenarioRunner::new();
        let scenarios: Vec<_> = [5_000.0, 10_000.0, 20_000.0]
            .iter()
            .map(|&salary| plan_with_hiring(salary))
            .collect();

        let results = runner.run_batch(&scenarios);
        assert_eq!(results.len(), 3);
        for (scenario, result) in scenarios.iter().zip(&results) {
            assert_eq!(result, &runner.run(scenario));
        }

        // Higher salary should leave less cash at the end
        let ending: Vec<f64> = results.iter().map(|r| r.summary().ending_cash).collect();
        assert!(ending[0] > ending[1]);
        assert!(ending[1] > ending[2]);
    }

    #[test]
    fn test_item_contribution_of_employee() {
        let mut plan = AssumptionSet::empty();
        plan.number_of_months = 10;
        let mut emp = Employee::new(4, "Engineer", 10_000.0, 2);
        emp.end_month = EndMonth::Month(5);
        emp.severance_months = 1;
        plan.employees.push(emp);

        let runner = ScenarioRunner::new();
        let contribution = runner
            .item_contribution(&plan, CollectionKind::Employees, 4)
            .unwrap();

        let net: Vec<f64> = contribution.iter().map(|c| c.net_cashflow).collect();
        assert_eq!(
            net,
            vec![0.0, 0.0, -11_500.0, -11_500.0, -11_500.0, -11_500.0, -11_500.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(contribution.last().unwrap().cash_balance, -57_500.0);
    }

    #[test]
    fn test_item_contribution_of_hidden_item() {
        let mut plan = AssumptionSet::empty();
        plan.number_of_months = 4;
        let mut injection = DatedAmount::new(1, "Bridge", 2, 40_000.0);
        injection.hidden = true;
        plan.capital_injections.push(injection);

        let contribution = ScenarioRunner::new()
            .item_contribution(&plan, CollectionKind::CapitalInjections, 1)
            .unwrap();
        assert_eq!(contribution[1].net_cashflow, 0.0);
        assert_eq!(contribution[2].net_cashflow, 40_000.0);
        assert_eq!(contribution[3].cash_balance, 40_000.0);
    }

    #[test]
    fn test_item_contribution_unknown_item() {
        let plan = AssumptionSet::default_plan();
        assert!(ScenarioRunner::new()
            .item_contribution(&plan, CollectionKind::Refunds, 42)
            .is_none());
    }
}

//! Revenue and expense assumptions that drive a projection

mod calendar;
mod editing;
mod line_items;

pub use calendar::YearMonth;
pub use editing::{IdAllocator, MAX_MONTHS, MIN_MONTHS};
pub use line_items::{
    CollectionKind, DatedAmount, Employee, EndMonth, ItemId, ItemRecord, LineItem,
    RecurringAmount, RecurringPercentage,
};

use serde::{Deserialize, Serialize};

/// Default projection horizon in months
pub const DEFAULT_NUMBER_OF_MONTHS: u32 = 24;

/// Complete input to a projection run
///
/// Percent fields hold whole percentages (`5.0` is 5%). Month fields on line
/// items are period indices; values outside `0..number_of_months` are kept but
/// never contribute to a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionSet {
    pub initial_cash: f64,
    #[serde(rename = "startingMRR")]
    pub starting_mrr: f64,
    pub new_customers_per_month: f64,
    pub arpu: f64,
    pub monthly_churn_rate: f64,
    pub additional_revenue: f64,
    /// Signed monthly growth of `additional_revenue`, negative for decay
    pub additional_revenue_growth: f64,
    pub number_of_months: u32,
    /// `None` means the current month, resolved by the caller
    #[serde(rename = "forecastStartDate", default)]
    pub forecast_start: Option<YearMonth>,

    // Display bounds, carried for round-tripping only
    #[serde(default)]
    pub chart_y_min: Option<f64>,
    #[serde(default)]
    pub chart_y_max: Option<f64>,

    pub annual_plan_revenue: Vec<DatedAmount>,
    pub capital_injections: Vec<DatedAmount>,
    pub employees: Vec<Employee>,
    pub recurring_expenses: Vec<RecurringAmount>,
    pub one_time_expenses: Vec<DatedAmount>,
    pub variable_expenses: Vec<RecurringPercentage>,
    pub refunds: Vec<RecurringAmount>,
    pub owners_draw: Vec<RecurringAmount>,
    #[serde(rename = "owners401k")]
    pub owners_401k: Vec<DatedAmount>,
    pub estimated_taxes: Vec<DatedAmount>,
}

impl AssumptionSet {
    /// Starting plan: a small team and a few running costs, no revenue yet
    pub fn default_plan() -> Self {
        Self {
            initial_cash: 100_000.0,
            starting_mrr: 0.0,
            new_customers_per_month: 0.0,
            arpu: 0.0,
            monthly_churn_rate: 0.0,
            additional_revenue: 0.0,
            additional_revenue_growth: 0.0,
            number_of_months: DEFAULT_NUMBER_OF_MONTHS,
            forecast_start: None,
            chart_y_min: None,
            chart_y_max: None,
            annual_plan_revenue: Vec::new(),
            capital_injections: Vec::new(),
            employees: vec![
                Employee::new(1, "Founder", 8_000.0, 0),
                Employee::new(2, "Engineer", 10_000.0, 0),
            ],
            recurring_expenses: vec![
                RecurringAmount::new(1, "Software & Tools", 500.0),
                RecurringAmount::new(2, "Office", 2_000.0),
            ],
            one_time_expenses: vec![DatedAmount::new(1, "Equipment", 0, 5_000.0)],
            variable_expenses: vec![RecurringPercentage::new(1, "Payment processing", 3.0)],
            refunds: Vec::new(),
            owners_draw: Vec::new(),
            owners_401k: Vec::new(),
            estimated_taxes: Vec::new(),
        }
    }

    /// Empty plan with no line items and zeroed scalars
    pub fn empty() -> Self {
        Self {
            initial_cash: 0.0,
            employees: Vec::new(),
            recurring_expenses: Vec::new(),
            one_time_expenses: Vec::new(),
            variable_expenses: Vec::new(),
            ..Self::default_plan()
        }
    }

    /// Start month, falling back to the current month when unset
    pub fn resolved_start(&self) -> YearMonth {
        self.forecast_start.unwrap_or_else(YearMonth::current)
    }

    /// Snapshot of one collection as tagged line items
    pub fn line_items(&self, kind: CollectionKind) -> Vec<LineItem> {
        fn wrap<T: Clone>(items: &[T], f: fn(T) -> LineItem) -> Vec<LineItem> {
            items.iter().cloned().map(f).collect()
        }

        match kind {
            CollectionKind::AnnualPlanRevenue => wrap(&self.annual_plan_revenue, LineItem::DatedAmount),
            CollectionKind::CapitalInjections => wrap(&self.capital_injections, LineItem::DatedAmount),
            CollectionKind::Employees => wrap(&self.employees, LineItem::Employee),
            CollectionKind::RecurringExpenses => wrap(&self.recurring_expenses, LineItem::RecurringAmount),
            CollectionKind::OneTimeExpenses => wrap(&self.one_time_expenses, LineItem::DatedAmount),
            CollectionKind::VariableExpenses => {
                wrap(&self.variable_expenses, LineItem::RecurringPercentage)
            }
            CollectionKind::Refunds => wrap(&self.refunds, LineItem::RecurringAmount),
            CollectionKind::OwnersDraw => wrap(&self.owners_draw, LineItem::RecurringAmount),
            CollectionKind::Owners401k => wrap(&self.owners_401k, LineItem::DatedAmount),
            CollectionKind::EstimatedTaxes => wrap(&self.estimated_taxes, LineItem::DatedAmount),
        }
    }

    /// Total number of line items across all collections, hidden included
    pub fn item_count(&self) -> usize {
        self.annual_plan_revenue.len()
            + self.capital_injections.len()
            + self.employees.len()
            + self.recurring_expenses.len()
            + self.one_time_expenses.len()
            + self.variable_expenses.len()
            + self.refunds.len()
            + self.owners_draw.len()
            + self.owners_401k.len()
            + self.estimated_taxes.len()
    }
}

impl Default for AssumptionSet {
    fn default() -> Self {
        Self::default_plan()
    }
}

//! Short keys of the flat state encoding
//!
//! These names are baked into existing links and saved scenarios and must not
//! change.

use crate::assumptions::CollectionKind;

pub const INITIAL_CASH: &str = "ic";
pub const STARTING_MRR: &str = "mrr";
pub const NEW_CUSTOMERS: &str = "nc";
pub const ARPU: &str = "arpu";
pub const CHURN: &str = "churn";
pub const ADDITIONAL_REVENUE: &str = "ar";
pub const ADDITIONAL_REVENUE_GROWTH: &str = "arg";
pub const CHART_Y_MIN: &str = "cymin";
pub const CHART_Y_MAX: &str = "cymax";
pub const NUMBER_OF_MONTHS: &str = "nm";
pub const FORECAST_START: &str = "fsd";

/// Keys whose presence marks a string as encoded state
pub const PRESENCE_MARKERS: [&str; 2] = [INITIAL_CASH, STARTING_MRR];

/// Key holding the blob for a collection
pub fn collection_key(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::AnnualPlanRevenue => "apr",
        CollectionKind::CapitalInjections => "ci",
        CollectionKind::Employees => "emp",
        CollectionKind::RecurringExpenses => "rec",
        CollectionKind::OneTimeExpenses => "one",
        CollectionKind::VariableExpenses => "var",
        CollectionKind::Refunds => "ref",
        CollectionKind::OwnersDraw => "odr",
        CollectionKind::Owners401k => "o4k",
        CollectionKind::EstimatedTaxes => "etx",
    }
}

/// Collection stored under `key`, if any
pub fn collection_for_key(key: &str) -> Option<CollectionKind> {
    CollectionKind::ALL
        .iter()
        .copied()
        .find(|&kind| collection_key(kind) == key)
}

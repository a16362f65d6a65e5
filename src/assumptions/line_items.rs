//! Line item variants that make up the inflow and outflow collections

use serde::{Deserialize, Serialize};

/// Synthetic identifier, unique within one collection
pub type ItemId = u64;

/// Fields every line item carries regardless of variant
pub trait ItemRecord {
    fn id(&self) -> ItemId;
    fn is_hidden(&self) -> bool;
    fn set_hidden(&mut self, hidden: bool);
}

/// Amount that lands in a single period (one-time expenses, annual plans,
/// capital injections, 401k contributions, estimated taxes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedAmount {
    pub id: ItemId,
    pub description: String,
    /// Period index the amount lands in
    pub month: i32,
    pub amount: f64,
    #[serde(default)]
    pub hidden: bool,
}

impl DatedAmount {
    pub fn new(id: ItemId, description: impl Into<String>, month: i32, amount: f64) -> Self {
        Self {
            id,
            description: description.into(),
            month,
            amount,
            hidden: false,
        }
    }

    /// Amount contributed to `period`; zero unless the item is dated in it
    pub fn amount_in(&self, period: i64) -> f64 {
        if i64::from(self.month) == period {
            self.amount
        } else {
            0.0
        }
    }
}

/// Flat amount charged every period (recurring expenses, refunds, owner's draw)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringAmount {
    pub id: ItemId,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub hidden: bool,
}

impl RecurringAmount {
    pub fn new(id: ItemId, category: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            category: category.into(),
            amount,
            hidden: false,
        }
    }
}

/// Expense proportional to the period's revenue base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPercentage {
    pub id: ItemId,
    pub category: String,
    /// Percent of revenue, e.g. 3.0 for 3%
    pub percentage: f64,
    #[serde(default)]
    pub hidden: bool,
}

impl RecurringPercentage {
    pub fn new(id: ItemId, category: impl Into<String>, percentage: f64) -> Self {
        Self {
            id,
            category: category.into(),
            percentage,
            hidden: false,
        }
    }

    /// Share of `revenue_base` this item claims
    pub fn share_of(&self, revenue_base: f64) -> f64 {
        self.percentage / 100.0 * revenue_base
    }
}

/// Last period an employee is on payroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i32>", into = "Option<i32>")]
pub enum EndMonth {
    /// Employed through the end of the horizon
    Indefinite,
    Month(i32),
}

impl From<Option<i32>> for EndMonth {
    fn from(value: Option<i32>) -> Self {
        match value {
            Some(month) => EndMonth::Month(month),
            None => EndMonth::Indefinite,
        }
    }
}

impl From<EndMonth> for Option<i32> {
    fn from(value: EndMonth) -> Self {
        match value {
            EndMonth::Indefinite => None,
            EndMonth::Month(month) => Some(month),
        }
    }
}

/// Employee on payroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: ItemId,
    pub name: String,
    /// Base monthly salary before loading
    pub salary: f64,
    #[serde(default)]
    pub hidden: bool,
    pub start_month: i32,
    pub end_month: EndMonth,
    /// Periods after `end_month` that are still paid
    #[serde(default)]
    pub severance_months: u32,
}

impl Employee {
    pub fn new(id: ItemId, name: impl Into<String>, salary: f64, start_month: i32) -> Self {
        Self {
            id,
            name: name.into(),
            salary,
            hidden: false,
            start_month,
            end_month: EndMonth::Indefinite,
            severance_months: 0,
        }
    }

    /// Whether the employee draws pay in `period`, severance included
    pub fn is_paid_in(&self, period: i64) -> bool {
        if period < i64::from(self.start_month) {
            return false;
        }
        match self.end_month {
            EndMonth::Indefinite => true,
            EndMonth::Month(end) => {
                let end = i64::from(end);
                period <= end || period - end <= i64::from(self.severance_months)
            }
        }
    }
}

macro_rules! impl_item_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ItemRecord for $ty {
                fn id(&self) -> ItemId {
                    self.id
                }

                fn is_hidden(&self) -> bool {
                    self.hidden
                }

                fn set_hidden(&mut self, hidden: bool) {
                    self.hidden = hidden;
                }
            }
        )+
    };
}

impl_item_record!(DatedAmount, RecurringAmount, RecurringPercentage, Employee);

/// Any line item, tagged by variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineItem {
    DatedAmount(DatedAmount),
    RecurringAmount(RecurringAmount),
    RecurringPercentage(RecurringPercentage),
    Employee(Employee),
}

impl LineItem {
    fn record(&self) -> &dyn ItemRecord {
        match self {
            LineItem::DatedAmount(item) => item,
            LineItem::RecurringAmount(item) => item,
            LineItem::RecurringPercentage(item) => item,
            LineItem::Employee(item) => item,
        }
    }

    pub fn id(&self) -> ItemId {
        self.record().id()
    }

    pub fn is_hidden(&self) -> bool {
        self.record().is_hidden()
    }

    /// Display label (description, category or name depending on variant)
    pub fn label(&self) -> &str {
        match self {
            LineItem::DatedAmount(item) => &item.description,
            LineItem::RecurringAmount(item) => &item.category,
            LineItem::RecurringPercentage(item) => &item.category,
            LineItem::Employee(item) => &item.name,
        }
    }
}

/// The ten named collections of an assumption set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    AnnualPlanRevenue,
    CapitalInjections,
    Employees,
    RecurringExpenses,
    OneTimeExpenses,
    VariableExpenses,
    Refunds,
    OwnersDraw,
    #[serde(rename = "owners401k")]
    Owners401k,
    EstimatedTaxes,
}

impl CollectionKind {
    /// All collections in encoding order
    pub const ALL: [CollectionKind; 10] = [
        CollectionKind::AnnualPlanRevenue,
        CollectionKind::CapitalInjections,
        CollectionKind::Employees,
        CollectionKind::RecurringExpenses,
        CollectionKind::OneTimeExpenses,
        CollectionKind::VariableExpenses,
        CollectionKind::Refunds,
        CollectionKind::OwnersDraw,
        CollectionKind::Owners401k,
        CollectionKind::EstimatedTaxes,
    ];
}

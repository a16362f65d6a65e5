//! Editing operations owned by the calling layer
//!
//! The engine never mutates an assumption set. These helpers apply the
//! editing-layer conventions: ids are assigned once and never reused,
//! hidden items stay in their collection, and an indefinite end month
//! clears severance.

use super::line_items::{
    CollectionKind, DatedAmount, Employee, EndMonth, ItemId, ItemRecord, RecurringAmount,
    RecurringPercentage,
};
use super::AssumptionSet;

/// Smallest horizon the editing layer allows
pub const MIN_MONTHS: u32 = 6;
/// Largest horizon the editing layer allows
pub const MAX_MONTHS: u32 = 60;

/// Hands out item ids, monotonically increasing
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: ItemId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocator whose ids are above every id already in `set`
    pub fn seeded_from(set: &AssumptionSet) -> Self {
        let max = CollectionKind::ALL
            .iter()
            .flat_map(|&kind| set.line_items(kind))
            .map(|item| item.id())
            .max()
            .unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self) -> ItemId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `$body` with `$items` bound to the mutable collection for `$kind`
macro_rules! with_collection_mut {
    ($set:expr, $kind:expr, $items:ident => $body:expr) => {
        match $kind {
            CollectionKind::AnnualPlanRevenue => { let $items = &mut $set.annual_plan_revenue; $body }
            CollectionKind::CapitalInjections => { let $items = &mut $set.capital_injections; $body }
            CollectionKind::Employees => { let $items = &mut $set.employees; $body }
            CollectionKind::RecurringExpenses => { let $items = &mut $set.recurring_expenses; $body }
            CollectionKind::OneTimeExpenses => { let $items = &mut $set.one_time_expenses; $body }
            CollectionKind::VariableExpenses => { let $items = &mut $set.variable_expenses; $body }
            CollectionKind::Refunds => { let $items = &mut $set.refunds; $body }
            CollectionKind::OwnersDraw => { let $items = &mut $set.owners_draw; $body }
            CollectionKind::Owners401k => { let $items = &mut $set.owners_401k; $body }
            CollectionKind::EstimatedTaxes => { let $items = &mut $set.estimated_taxes; $body }
        }
    };
}

fn remove_by_id<T: ItemRecord>(items: &mut Vec<T>, id: ItemId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

fn find_mut<T: ItemRecord>(items: &mut [T], id: ItemId) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

impl AssumptionSet {
    /// Add a dated amount to a dated collection; returns `None` if `kind`
    /// holds another variant
    pub fn add_dated(
        &mut self,
        ids: &mut IdAllocator,
        kind: CollectionKind,
        description: impl Into<String>,
        month: i32,
        amount: f64,
    ) -> Option<ItemId> {
        let target = match kind {
            CollectionKind::AnnualPlanRevenue => &mut self.annual_plan_revenue,
            CollectionKind::CapitalInjections => &mut self.capital_injections,
            CollectionKind::OneTimeExpenses => &mut self.one_time_expenses,
            CollectionKind::Owners401k => &mut self.owners_401k,
            CollectionKind::EstimatedTaxes => &mut self.estimated_taxes,
            _ => return None,
        };
        let id = ids.next_id();
        target.push(DatedAmount::new(id, description, month, amount));
        Some(id)
    }

    /// Add a recurring amount to a recurring collection; returns `None` if
    /// `kind` holds another variant
    pub fn add_recurring(
        &mut self,
        ids: &mut IdAllocator,
        kind: CollectionKind,
        category: impl Into<String>,
        amount: f64,
    ) -> Option<ItemId> {
        let target = match kind {
            CollectionKind::RecurringExpenses => &mut self.recurring_expenses,
            CollectionKind::Refunds => &mut self.refunds,
            CollectionKind::OwnersDraw => &mut self.owners_draw,
            _ => return None,
        };
        let id = ids.next_id();
        target.push(RecurringAmount::new(id, category, amount));
        Some(id)
    }

    pub fn add_variable_expense(
        &mut self,
        ids: &mut IdAllocator,
        category: impl Into<String>,
        percentage: f64,
    ) -> ItemId {
        let id = ids.next_id();
        self.variable_expenses
            .push(RecurringPercentage::new(id, category, percentage));
        id
    }

    pub fn add_employee(
        &mut self,
        ids: &mut IdAllocator,
        name: impl Into<String>,
        salary: f64,
        start_month: i32,
    ) -> ItemId {
        let id = ids.next_id();
        self.employees.push(Employee::new(id, name, salary, start_month));
        id
    }

    /// Delete an item; returns whether anything was removed
    pub fn remove(&mut self, kind: CollectionKind, id: ItemId) -> bool {
        with_collection_mut!(self, kind, items => remove_by_id(items, id))
    }

    /// Set the what-if flag; returns whether the item exists
    pub fn set_hidden(&mut self, kind: CollectionKind, id: ItemId, hidden: bool) -> bool {
        with_collection_mut!(self, kind, items => match find_mut(items, id) {
            Some(item) => {
                item.set_hidden(hidden);
                true
            }
            None => false,
        })
    }

    /// Flip the what-if flag; returns the new state, `None` if not found
    pub fn toggle_hidden(&mut self, kind: CollectionKind, id: ItemId) -> Option<bool> {
        with_collection_mut!(self, kind, items => find_mut(items, id).map(|item| {
            let hidden = !item.is_hidden();
            item.set_hidden(hidden);
            hidden
        }))
    }

    /// Change an employee's end month. Indefinite employment has no
    /// severance, so it resets `severance_months` to 0.
    pub fn set_employee_end(&mut self, id: ItemId, end_month: EndMonth) -> bool {
        match find_mut(&mut self.employees, id) {
            Some(employee) => {
                employee.end_month = end_month;
                if end_month == EndMonth::Indefinite {
                    employee.severance_months = 0;
                }
                true
            }
            None => false,
        }
    }

    /// Clamp the horizon into the range the editor allows
    pub fn clamp_months(&mut self) {
        self.number_of_months = self.number_of_months.clamp(MIN_MONTHS, MAX_MONTHS);
    }
}

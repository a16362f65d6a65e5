//! CSV export of a projected ledger

use std::io::Write;

use crate::assumptions::YearMonth;
use crate::projection::ProjectionPeriod;

const HEADER: [&str; 22] = [
    "Month",
    "MRR",
    "AdditionalRevenue",
    "AnnualPlanRevenue",
    "CapitalInjections",
    "TotalInflows",
    "Payroll",
    "RecurringExpenses",
    "OneTimeExpenses",
    "VariableExpenses",
    "Refunds",
    "EstimatedTaxes",
    "OwnersDraw",
    "Owners401k",
    "TotalOutflows",
    "NetCashflow",
    "CashBalance",
    "NewCustomers",
    "ChurnedCustomers",
    "TotalCustomers",
    "NewRevenueFromGrowth",
    "ChurnedRevenue",
];

/// Write one header row and one row per period
///
/// With a `start` month an extra `Label` column (`Jan 2026`) follows `Month`.
pub fn write_ledger<W: Write>(
    writer: W,
    periods: &[ProjectionPeriod],
    start: Option<YearMonth>,
) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = HEADER.to_vec();
    if start.is_some() {
        header.insert(1, "Label");
    }
    csv.write_record(&header)?;

    for p in periods {
        let mut record = vec![p.month.to_string()];
        if let Some(start) = start {
            record.push(start.offset(p.month).label());
        }
        record.extend(
            [
                p.mrr,
                p.additional_revenue,
                p.annual_plan_revenue,
                p.capital_injections,
                p.total_inflows,
                p.payroll,
                p.recurring_expenses,
                p.one_time_expenses,
                p.variable_expenses,
                p.refunds,
                p.estimated_taxes,
                p.owners_draw,
                p.owners_401k,
                p.total_outflows,
                p.net_cashflow,
                p.cash_balance,
                p.new_customers,
                p.churned_customers,
                p.total_customers,
                p.new_revenue_from_growth,
                p.churned_revenue_amount,
            ]
            .iter()
            .map(|v| v.to_string()),
        );
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AssumptionSet;
    use crate::projection::project;

    #[test]
    fn test_write_ledger_rows() {
        let mut plan = AssumptionSet::default_plan();
        plan.number_of_months = 3;
        let periods = project(&plan);

        let mut out = Vec::new();
        write_ledger(&mut out, &periods, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Month,MRR,AdditionalRevenue"));
        assert_eq!(lines[0].split(',').count(), 22);
        assert!(lines[1].starts_with("0,"));
        let balance = lines[3].split(',').nth(16).unwrap();
        assert_eq!(balance, periods[2].cash_balance.to_string());
    }

    #[test]
    fn test_write_ledger_with_labels() {
        let mut plan = AssumptionSet::empty();
        plan.number_of_months = 2;
        let periods = project(&plan);

        let mut out = Vec::new();
        write_ledger(&mut out, &periods, YearMonth::new(2025, 12)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Month,Label,MRR"));
        assert!(lines[1].starts_with("0,Dec 2025,"));
        assert!(lines[2].starts_with("1,Jan 2026,"));
    }
}

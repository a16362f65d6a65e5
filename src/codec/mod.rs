//! Compact state codec for shareable links and saved scenarios
//!
//! An assumption set is written as a URL query string. Scalars get a short key
//! each; every collection is one key holding a JSON array of compact items.
//!
//! Decoding overlays recognized keys onto a caller-supplied default set:
//! - without `ic` or `mrr` the string is not ours and nothing is overridden
//! - optional scalars (`cymin`, `cymax`, `fsd`) absent from the string are
//!   unset, never taken from the defaults
//! - unknown keys are skipped so newer links still load
//! - `apr` and `ci` fall back to the legacy `month:amount` form when the JSON
//!   parse fails
//! - any other parse failure rejects the whole string; a partially applied
//!   decode is never returned

pub mod keys;
mod items;
mod legacy;

pub use items::CompactForm;
pub use legacy::{LEGACY_ANNUAL_PLAN_DESCRIPTION, LEGACY_CAPITAL_INJECTION_DESCRIPTION};

use log::{debug, warn};

use crate::assumptions::{AssumptionSet, CollectionKind, DatedAmount, YearMonth};
use crate::error::DecodeError;
use items::{decode_items, encode_items};

/// Encode an assumption set as `key=value&key=value`
///
/// Optional scalars are left out when unset. Collections always use the JSON
/// array form.
pub fn encode(assumptions: &AssumptionSet) -> String {
    let a = assumptions;
    let mut query = form_urlencoded::Serializer::new(String::new());

    query
        .append_pair(keys::INITIAL_CASH, &a.initial_cash.to_string())
        .append_pair(keys::STARTING_MRR, &a.starting_mrr.to_string())
        .append_pair(keys::NEW_CUSTOMERS, &a.new_customers_per_month.to_string())
        .append_pair(keys::ARPU, &a.arpu.to_string())
        .append_pair(keys::CHURN, &a.monthly_churn_rate.to_string())
        .append_pair(keys::ADDITIONAL_REVENUE, &a.additional_revenue.to_string())
        .append_pair(keys::ADDITIONAL_REVENUE_GROWTH, &a.additional_revenue_growth.to_string());

    if let Some(min) = a.chart_y_min {
        query.append_pair(keys::CHART_Y_MIN, &min.to_string());
    }
    if let Some(max) = a.chart_y_max {
        query.append_pair(keys::CHART_Y_MAX, &max.to_string());
    }
    query.append_pair(keys::NUMBER_OF_MONTHS, &a.number_of_months.to_string());
    if let Some(start) = a.forecast_start {
        query.append_pair(keys::FORECAST_START, &start.to_string());
    }

    for kind in CollectionKind::ALL {
        query.append_pair(keys::collection_key(kind), &encode_collection(a, kind));
    }

    query.finish()
}

fn encode_collection(a: &AssumptionSet, kind: CollectionKind) -> String {
    match kind {
        CollectionKind::AnnualPlanRevenue => encode_items(&a.annual_plan_revenue),
        CollectionKind::CapitalInjections => encode_items(&a.capital_injections),
        CollectionKind::Employees => encode_items(&a.employees),
        CollectionKind::RecurringExpenses => encode_items(&a.recurring_expenses),
        CollectionKind::OneTimeExpenses => encode_items(&a.one_time_expenses),
        CollectionKind::VariableExpenses => encode_items(&a.variable_expenses),
        CollectionKind::Refunds => encode_items(&a.refunds),
        CollectionKind::OwnersDraw => encode_items(&a.owners_draw),
        CollectionKind::Owners401k => encode_items(&a.owners_401k),
        CollectionKind::EstimatedTaxes => encode_items(&a.estimated_taxes),
    }
}

/// Decode a query string (leading `?` allowed) over `defaults`
///
/// `Ok(None)` means the string carries no state and the defaults apply.
pub fn decode(
    serialized: &str,
    defaults: &AssumptionSet,
) -> Result<Option<AssumptionSet>, DecodeError> {
    let query = serialized.trim().trim_start_matches('?');
    decode_pairs(form_urlencoded::parse(query.as_bytes()).into_owned(), defaults)
}

/// Decode already split key/value pairs; later duplicates win
pub fn decode_pairs<I, K, V>(
    pairs: I,
    defaults: &AssumptionSet,
) -> Result<Option<AssumptionSet>, DecodeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let pairs: Vec<(K, V)> = pairs.into_iter().collect();
    let has_marker = pairs
        .iter()
        .any(|(key, _)| keys::PRESENCE_MARKERS.iter().any(|marker| *marker == key.as_ref()));
    if !has_marker {
        return Ok(None);
    }

    // Optional scalars are omitted when unset, so absence here means unset
    let mut decoded = AssumptionSet {
        chart_y_min: None,
        chart_y_max: None,
        forecast_start: None,
        ..defaults.clone()
    };
    for (key, value) in &pairs {
        apply_pair(&mut decoded, key.as_ref(), value.as_ref())?;
    }
    Ok(Some(decoded))
}

/// Decode with the documented recovery policy: anything that is not valid
/// state yields `defaults`
pub fn decode_or_default(serialized: &str, defaults: &AssumptionSet) -> AssumptionSet {
    match decode(serialized, defaults) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => defaults.clone(),
        Err(e) => {
            warn!("discarding saved state, using defaults: {}", e);
            defaults.clone()
        }
    }
}

fn apply_pair(a: &mut AssumptionSet, key: &str, value: &str) -> Result<(), DecodeError> {
    match key {
        keys::INITIAL_CASH => a.initial_cash = parse_number(key, value)?,
        keys::STARTING_MRR => a.starting_mrr = parse_number(key, value)?,
        keys::NEW_CUSTOMERS => a.new_customers_per_month = parse_number(key, value)?,
        keys::ARPU => a.arpu = parse_number(key, value)?,
        keys::CHURN => a.monthly_churn_rate = parse_number(key, value)?,
        keys::ADDITIONAL_REVENUE => a.additional_revenue = parse_number(key, value)?,
        keys::ADDITIONAL_REVENUE_GROWTH => a.additional_revenue_growth = parse_number(key, value)?,
        keys::CHART_Y_MIN => a.chart_y_min = parse_optional_number(key, value)?,
        keys::CHART_Y_MAX => a.chart_y_max = parse_optional_number(key, value)?,
        // Any number is a horizon; below 1 is an empty ledger, fractions truncate
        keys::NUMBER_OF_MONTHS => a.number_of_months = parse_number(key, value)?.max(0.0) as u32,
        keys::FORECAST_START => {
            a.forecast_start = if value.trim().is_empty() {
                None
            } else {
                Some(value.parse::<YearMonth>().map_err(|e| DecodeError::new(key, e))?)
            }
        }
        _ => match keys::collection_for_key(key) {
            Some(kind) => apply_collection(a, kind, key, value)?,
            None => debug!("ignoring unknown state key `{}`", key),
        },
    }
    Ok(())
}

fn apply_collection(
    a: &mut AssumptionSet,
    kind: CollectionKind,
    key: &str,
    blob: &str,
) -> Result<(), DecodeError> {
    match kind {
        CollectionKind::AnnualPlanRevenue => {
            a.annual_plan_revenue =
                decode_dated_with_legacy(key, blob, LEGACY_ANNUAL_PLAN_DESCRIPTION)?
        }
        CollectionKind::CapitalInjections => {
            a.capital_injections =
                decode_dated_with_legacy(key, blob, LEGACY_CAPITAL_INJECTION_DESCRIPTION)?
        }
        CollectionKind::Employees => a.employees = decode_items(key, blob)?,
        CollectionKind::RecurringExpenses => a.recurring_expenses = decode_items(key, blob)?,
        CollectionKind::OneTimeExpenses => a.one_time_expenses = decode_items(key, blob)?,
        CollectionKind::VariableExpenses => a.variable_expenses = decode_items(key, blob)?,
        CollectionKind::Refunds => a.refunds = decode_items(key, blob)?,
        CollectionKind::OwnersDraw => a.owners_draw = decode_items(key, blob)?,
        CollectionKind::Owners401k => a.owners_401k = decode_items(key, blob)?,
        CollectionKind::EstimatedTaxes => a.estimated_taxes = decode_items(key, blob)?,
    }
    Ok(())
}

/// JSON array first, then the legacy `month:amount` list; both failing is an error
fn decode_dated_with_legacy(
    key: &str,
    blob: &str,
    description: &str,
) -> Result<Vec<DatedAmount>, DecodeError> {
    match decode_items(key, blob) {
        Ok(items) => Ok(items),
        Err(structured) => {
            let items = legacy::parse_pairs(blob, description).map_err(|reason| {
                DecodeError::new(
                    key,
                    format!("{}; not legacy pairs either: {}", structured.reason, reason),
                )
            })?;
            debug!("decoded `{}` from legacy pairs ({} items)", key, items.len());
            Ok(items)
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64, DecodeError> {
    value.trim().parse().map_err(|e| DecodeError::new(key, e))
}

fn parse_optional_number(key: &str, value: &str) -> Result<Option<f64>, DecodeError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_number(key, value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{
        Employee, EndMonth, IdAllocator, ItemRecord, RecurringAmount, RecurringPercentage,
    };

    /// Ids are not part of the encoding; renumber the way decode does
    fn renumbered(mut a: AssumptionSet) -> AssumptionSet {
        fn renumber<T: ItemRecord>(items: &mut [T], set_id: fn(&mut T, u64)) {
            for (item, id) in items.iter_mut().zip(1..) {
                set_id(item, id);
            }
        }
        renumber(&mut a.annual_plan_revenue, |i, id| i.id = id);
        renumber(&mut a.capital_injections, |i, id| i.id = id);
        renumber(&mut a.employees, |i, id| i.id = id);
        renumber(&mut a.recurring_expenses, |i, id| i.id = id);
        renumber(&mut a.one_time_expenses, |i, id| i.id = id);
        renumber(&mut a.variable_expenses, |i, id| i.id = id);
        renumber(&mut a.refunds, |i, id| i.id = id);
        renumber(&mut a.owners_draw, |i, id| i.id = id);
        renumber(&mut a.owners_401k, |i, id| i.id = id);
        renumber(&mut a.estimated_taxes, |i, id| i.id = id);
        a
    }

    fn edited_plan() -> AssumptionSet {
        let mut plan = AssumptionSet::default_plan();
        let mut ids = IdAllocator::seeded_from(&plan);
        plan.initial_cash = 250_000.5;
        plan.starting_mrr = 12_345.0;
        plan.new_customers_per_month = 7.5;
        plan.arpu = 49.0;
        plan.monthly_churn_rate = 2.25;
        plan.additional_revenue = 800.0;
        plan.additional_revenue_growth = -4.0;
        plan.number_of_months = 36;
        plan.forecast_start = YearMonth::new(2025, 9);
        plan.chart_y_min = Some(-50_000.0);
        plan.chart_y_max = Some(1_000_000.0);
        plan.add_dated(&mut ids, CollectionKind::AnnualPlanRevenue, "Acme & Co annual", 5, 24_000.0);
        plan.add_dated(&mut ids, CollectionKind::CapitalInjections, "Seed, round 1", 0, 500_000.0);
        plan.add_dated(&mut ids, CollectionKind::Owners401k, "401k", 11, 6_500.0);
        plan.add_dated(&mut ids, CollectionKind::EstimatedTaxes, "Q2 = est.", 6, 3_000.0);
        plan.add_recurring(&mut ids, CollectionKind::Refunds, "Chargebacks", 120.0);
        plan.add_recurring(&mut ids, CollectionKind::OwnersDraw, "Draw", 3_000.0);
        let hire = plan.add_employee(&mut ids, "Ünal O'Brien", 11_000.0, 3);
        plan.set_employee_end(hire, EndMonth::Month(20));
        plan.employees.last_mut().unwrap().severance_months = 2;
        plan.set_hidden(CollectionKind::RecurringExpenses, 2, true);
        plan
    }

    #[test]
    fn test_round_trip_edited_plan() {
        let plan = edited_plan();
        let encoded = encode(&plan);
        let decoded = decode(&encoded, &AssumptionSet::empty()).unwrap().unwrap();
        assert_eq!(decoded, renumbered(plan));
    }

    #[test]
    fn test_round_trip_default_plan_ignores_defaults_argument() {
        let plan = AssumptionSet::default_plan();
        let other_defaults = edited_plan();
        let decoded = decode(&encode(&plan), &other_defaults).unwrap().unwrap();
        assert_eq!(decoded, plan);
    }

    #[test]
    fn test_optional_scalars_omitted() {
        let encoded = encode(&AssumptionSet::default_plan());
        let keys: Vec<String> = form_urlencoded::parse(encoded.as_bytes())
            .map(|(k, _)| k.into_owned())
            .collect();
        assert!(!keys.iter().any(|k| k == "cymin" || k == "cymax" || k == "fsd"));
        for expected in ["ic", "mrr", "nc", "arpu", "churn", "ar", "arg", "nm", "apr", "ci",
            "emp", "rec", "one", "var", "ref", "odr", "o4k", "etx"]
        {
            assert!(keys.iter().any(|k| k == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_no_marker_means_no_override() {
        let defaults = AssumptionSet::default_plan();
        assert_eq!(decode("", &defaults).unwrap(), None);
        assert_eq!(decode("?utm_source=newsletter&nc=5", &defaults).unwrap(), None);
        assert_eq!(decode_or_default("utm_source=x", &defaults), defaults);
    }

    #[test]
    fn test_single_marker_is_enough_and_overlays_defaults() {
        let defaults = AssumptionSet::default_plan();
        let decoded = decode("?mrr=5000&future_key=1", &defaults).unwrap().unwrap();
        assert_eq!(decoded.starting_mrr, 5_000.0);
        assert_eq!(decoded.initial_cash, defaults.initial_cash);
        assert_eq!(decoded.employees, defaults.employees);
    }

    #[test]
    fn test_legacy_annual_plan_pairs() {
        let decoded = decode("ic=1000&apr=0:500,3:1200", &AssumptionSet::empty())
            .unwrap()
            .unwrap();
        let items = &decoded.annual_plan_revenue;
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].id, items[0].month, items[0].amount), (1, 0, 500.0));
        assert_eq!((items[1].id, items[1].month, items[1].amount), (2, 3, 1_200.0));
        assert!(items
            .iter()
            .all(|i| i.description == LEGACY_ANNUAL_PLAN_DESCRIPTION && !i.hidden));
    }

    #[test]
    fn test_legacy_capital_injections_url_encoded() {
        let decoded = decode("ic=0&ci=2%3A100000", &AssumptionSet::empty())
            .unwrap()
            .unwrap();
        assert_eq!(decoded.capital_injections.len(), 1);
        assert_eq!(decoded.capital_injections[0].month, 2);
        assert_eq!(decoded.capital_injections[0].amount, 100_000.0);
        assert_eq!(
            decoded.capital_injections[0].description,
            LEGACY_CAPITAL_INJECTION_DESCRIPTION
        );
    }

    #[test]
    fn test_corrupt_collection_rejects_everything() {
        let defaults = AssumptionSet::default_plan();
        let err = decode("ic=1&mrr=2&emp=0:500", &defaults).unwrap_err();
        assert_eq!(err.key, "emp");
        assert_eq!(decode_or_default("ic=1&mrr=2&emp=0:500", &defaults), defaults);

        let err = decode("ic=1&apr=%5B%7Bbroken", &defaults).unwrap_err();
        assert_eq!(err.key, "apr");
    }

    #[test]
    fn test_bad_scalar_rejects_everything() {
        let defaults = AssumptionSet::default_plan();
        assert!(decode("ic=lots", &defaults).is_err());
        assert!(decode("ic=1&nm=six", &defaults).is_err());
        assert!(decode("ic=1&fsd=2025-14", &defaults).is_err());
    }

    #[test]
    fn test_out_of_range_horizon_clamps_instead_of_failing() {
        let defaults = AssumptionSet::default_plan();
        let months = |query: &str| decode(query, &defaults).unwrap().unwrap().number_of_months;
        assert_eq!(months("ic=1&nm=-3"), 0);
        assert_eq!(months("ic=1&nm=24.0"), 24);
        assert_eq!(months("ic=1&nm=12.7"), 12);

        let mut plan = decode("ic=1&nm=-3", &defaults).unwrap().unwrap();
        assert!(crate::projection::project(&plan).is_empty());
        plan.number_of_months = 3;
        assert_eq!(crate::projection::project(&plan).len(), 3);
    }

    #[test]
    fn test_non_finite_item_amounts_survive_round_trip() {
        let mut plan = AssumptionSet::empty();
        plan.refunds = vec![RecurringAmount::new(1, "Chargebacks", f64::INFINITY)];
        plan.variable_expenses = vec![RecurringPercentage::new(1, "Fees", f64::NAN)];
        plan.employees = vec![Employee::new(1, "Contractor", f64::NEG_INFINITY, 0)];

        let decoded = decode(&encode(&plan), &AssumptionSet::default_plan())
            .unwrap()
            .unwrap();
        assert_eq!(decoded.refunds[0].amount, f64::INFINITY);
        assert!(decoded.variable_expenses[0].percentage.is_nan());
        assert_eq!(decoded.employees[0].salary, f64::NEG_INFINITY);

        let mut library = crate::ScenarioLibrary::new();
        library.save("Edge", None, &plan, chrono::Utc::now());
        let loaded = library.load("Edge", &AssumptionSet::default_plan()).unwrap();
        assert_eq!(loaded.refunds[0].amount, f64::INFINITY);
        assert!(loaded.employees.iter().all(|e| e.name == "Contractor"));
    }

    #[test]
    fn test_empty_optional_scalars_decode_as_unset() {
        let mut defaults = AssumptionSet::default_plan();
        defaults.chart_y_max = Some(10.0);
        let decoded = decode("ic=1&cymax=&fsd=", &defaults).unwrap().unwrap();
        assert_eq!(decoded.chart_y_max, None);
        assert_eq!(decoded.forecast_start, None);
    }
}

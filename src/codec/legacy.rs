//! Legacy `index:value` encoding of dated inflows
//!
//! Early links stored annual plan revenue and capital injections as
//! comma-separated `month:amount` pairs, e.g. `0:500,3:1200`. Descriptions and
//! hidden flags did not exist yet, so decoded items get a fixed description,
//! sequential ids from 1 and are visible.

use crate::assumptions::DatedAmount;

/// Description given to annual plan revenue read from the legacy form
pub const LEGACY_ANNUAL_PLAN_DESCRIPTION: &str = "Annual Plan";
/// Description given to capital injections read from the legacy form
pub const LEGACY_CAPITAL_INJECTION_DESCRIPTION: &str = "Capital Injection";

/// Parse `month:amount` pairs; an empty blob is an empty collection
pub fn parse_pairs(blob: &str, description: &str) -> Result<Vec<DatedAmount>, String> {
    blob.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .zip(1..)
        .map(|(pair, id)| -> Result<DatedAmount, String> {
            let (month, amount) = pair
                .split_once(':')
                .ok_or_else(|| format!("pair `{}` has no `:`", pair))?;
            let month: i32 = month
                .trim()
                .parse()
                .map_err(|e| format!("bad month in `{}`: {}", pair, e))?;
            let amount: f64 = amount
                .trim()
                .parse()
                .map_err(|e| format!("bad amount in `{}`: {}", pair, e))?;
            Ok(DatedAmount::new(id, description, month, amount))
        })
        .collect()
}

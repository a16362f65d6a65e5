//! Compact wire forms of line items
//!
//! Each collection is stored as a JSON array of objects with one- or two-letter
//! field names. Ids are not stored; decoding numbers items from 1 in order.
//! Missing fields fall back to defaults so older blobs (written before a field
//! existed) still load.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::assumptions::{
    DatedAmount, Employee, EndMonth, ItemId, RecurringAmount, RecurringPercentage,
};
use crate::error::DecodeError;

/// `hidden` is written as `0`/`1`; `true`/`false` is accepted on read
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Number(f64),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => value,
            Flag::Number(value) => value != 0.0,
        })
    }
}

/// Money and percentage fields. JSON has no infinity or NaN, so non-finite
/// values are written as the strings `inf`, `-inf` and `NaN`. On read a string
/// is parsed and `null` is NaN.
mod amount {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Amount {
            Number(f64),
            Text(String),
        }

        match Option::<Amount>::deserialize(deserializer)? {
            Some(Amount::Number(value)) => Ok(value),
            Some(Amount::Text(text)) => text
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid amount `{}`", text))),
            None => Ok(f64::NAN),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompactDated {
    #[serde(default)]
    d: String,
    #[serde(default)]
    m: i32,
    #[serde(default, with = "amount")]
    a: f64,
    #[serde(default, with = "flag")]
    h: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompactRecurring {
    #[serde(default)]
    c: String,
    #[serde(default, with = "amount")]
    a: f64,
    #[serde(default, with = "flag")]
    h: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompactPercentage {
    #[serde(default)]
    c: String,
    #[serde(default, with = "amount")]
    p: f64,
    #[serde(default, with = "flag")]
    h: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompactEmployee {
    #[serde(default)]
    n: String,
    #[serde(default, with = "amount")]
    s: f64,
    #[serde(default, with = "flag")]
    h: bool,
    #[serde(default)]
    sm: i32,
    /// `null` or absent means indefinite
    #[serde(default)]
    em: Option<i32>,
    #[serde(default)]
    sv: u32,
}

/// Line item with a compact wire representation
pub trait CompactForm: Sized {
    type Wire: Serialize + DeserializeOwned;

    fn to_wire(&self) -> Self::Wire;
    fn from_wire(id: ItemId, wire: Self::Wire) -> Self;
}

impl CompactForm for DatedAmount {
    type Wire = CompactDated;

    fn to_wire(&self) -> CompactDated {
        CompactDated {
            d: self.description.clone(),
            m: self.month,
            a: self.amount,
            h: self.hidden,
        }
    }

    fn from_wire(id: ItemId, wire: CompactDated) -> Self {
        Self {
            id,
            description: wire.d,
            month: wire.m,
            amount: wire.a,
            hidden: wire.h,
        }
    }
}

impl CompactForm for RecurringAmount {
    type Wire = CompactRecurring;

    fn to_wire(&self) -> CompactRecurring {
        CompactRecurring {
            c: self.category.clone(),
            a: self.amount,
            h: self.hidden,
        }
    }

    fn from_wire(id: ItemId, wire: CompactRecurring) -> Self {
        Self {
            id,
            category: wire.c,
            amount: wire.a,
            hidden: wire.h,
        }
    }
}

impl CompactForm for RecurringPercentage {
    type Wire = CompactPercentage;

    fn to_wire(&self) -> CompactPercentage {
        CompactPercentage {
            c: self.category.clone(),
            p: self.percentage,
            h: self.hidden,
        }
    }

    fn from_wire(id: ItemId, wire: CompactPercentage) -> Self {
        Self {
            id,
            category: wire.c,
            percentage: wire.p,
            hidden: wire.h,
        }
    }
}

impl CompactForm for Employee {
    type Wire = CompactEmployee;

    fn to_wire(&self) -> CompactEmployee {
        CompactEmployee {
            n: self.name.clone(),
            s: self.salary,
            h: self.hidden,
            sm: self.start_month,
            em: self.end_month.into(),
            sv: self.severance_months,
        }
    }

    fn from_wire(id: ItemId, wire: CompactEmployee) -> Self {
        Self {
            id,
            name: wire.n,
            salary: wire.s,
            hidden: wire.h,
            start_month: wire.sm,
            end_month: EndMonth::from(wire.em),
            severance_months: wire.sv,
        }
    }
}

/// JSON array blob for a collection
pub fn encode_items<T: CompactForm>(items: &[T]) -> String {
    let wire: Vec<T::Wire> = items.iter().map(T::to_wire).collect();
    match serde_json::to_string(&wire) {
        Ok(blob) => blob,
        Err(e) => {
            warn!("could not encode {} items, writing an empty collection: {}", wire.len(), e);
            String::from("[]")
        }
    }
}

/// Parse a JSON array blob, numbering items from 1
pub fn decode_items<T: CompactForm>(key: &str, blob: &str) -> Result<Vec<T>, DecodeError> {
    let wire: Vec<T::Wire> =
        serde_json::from_str(blob).map_err(|e| DecodeError::new(key, e))?;
    Ok(wire
        .into_iter()
        .zip(1..)
        .map(|(item, id)| T::from_wire(id, item))
        .collect())
}

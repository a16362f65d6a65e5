//! Saved scenario library
//!
//! Named scenarios are kept in save order. Each record stores the encoded
//! state string, so the library file uses the same format as shareable links.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionSet;
use crate::codec;
use crate::error::LibraryError;

/// One saved scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScenario {
    /// Unique, case-sensitive
    pub name: String,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Encoded assumption set
    pub data: String,
}

impl SavedScenario {
    /// Decoded assumptions, or `defaults` if the stored state is unusable
    pub fn assumptions(&self, defaults: &AssumptionSet) -> AssumptionSet {
        codec::decode_or_default(&self.data, defaults)
    }
}

/// Ordered collection of saved scenarios keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioLibrary {
    scenarios: Vec<SavedScenario>,
}

impl ScenarioLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `assumptions` under `name`, replacing an existing scenario of the
    /// same name in place
    pub fn save(
        &mut self,
        name: impl Into<String>,
        note: Option<String>,
        assumptions: &AssumptionSet,
        saved_at: DateTime<Utc>,
    ) {
        let record = SavedScenario {
            name: name.into(),
            saved_at,
            note,
            data: codec::encode(assumptions),
        };

        match self.scenarios.iter_mut().find(|s| s.name == record.name) {
            Some(existing) => *existing = record,
            None => self.scenarios.push(record),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SavedScenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Remove a scenario, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<SavedScenario> {
        let idx = self.scenarios.iter().position(|s| s.name == name)?;
        Some(self.scenarios.remove(idx))
    }

    /// Decoded assumptions of a saved scenario
    ///
    /// Unusable stored state falls back to `defaults`; only a missing name is
    /// an error.
    pub fn load(&self, name: &str, defaults: &AssumptionSet) -> Result<AssumptionSet, LibraryError> {
        self.get(name)
            .map(|s| s.assumptions(defaults))
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedScenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn to_json(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a library file; a missing file is an empty library
    pub fn load_from(path: &Path) -> Result<Self, LibraryError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let library = Self::from_json(&fs::read_to_string(path)?)?;
        info!("loaded {} scenarios from {}", library.len(), path.display());
        Ok(library)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LibraryError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_save_overwrites_in_place() {
        let mut library = ScenarioLibrary::new();
        let mut plan = AssumptionSet::default_plan();
        library.save("Base", None, &plan, at(9));
        library.save("Lean", Some("no hires".into()), &plan, at(10));

        plan.initial_cash = 42.0;
        library.save("Base", Some("updated".into()), &plan, at(11));

        assert_eq!(library.names(), vec!["Base", "Lean"]);
        let base = library.get("Base").unwrap();
        assert_eq!(base.saved_at, at(11));
        assert_eq!(base.note.as_deref(), Some("updated"));
        let loaded = library.load("Base", &AssumptionSet::empty()).unwrap();
        assert_eq!(loaded.initial_cash, 42.0);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut library = ScenarioLibrary::new();
        let plan = AssumptionSet::default_plan();
        library.save("base", None, &plan, at(9));
        library.save("Base", None, &plan, at(9));
        assert_eq!(library.len(), 2);
        assert!(library.get("BASE").is_none());
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let mut library = ScenarioLibrary::new();
        let defaults = AssumptionSet::default_plan();
        assert!(matches!(
            library.load("nope", &defaults),
            Err(LibraryError::NotFound(_))
        ));

        library.scenarios.push(SavedScenario {
            name: "Broken".into(),
            saved_at: at(8),
            note: None,
            data: "ic=1&emp=%7Bnot-json".into(),
        });
        assert_eq!(library.load("Broken", &defaults).unwrap(), defaults);
    }

    #[test]
    fn test_json_round_trip_and_shape() {
        let mut library = ScenarioLibrary::new();
        library.save("Base", None, &AssumptionSet::default_plan(), at(9));
        let json = library.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        assert_eq!(first["name"], "Base");
        assert_eq!(first["savedAt"], "2025-06-01T09:00:00Z");
        assert!(first.get("note").is_none());
        assert!(first["data"].as_str().unwrap().starts_with("ic="));

        assert_eq!(ScenarioLibrary::from_json(&json).unwrap(), library);
    }

    #[test]
    fn test_remove() {
        let mut library = ScenarioLibrary::new();
        library.save("A", None, &AssumptionSet::empty(), at(1));
        assert!(library.remove("A").is_some());
        assert!(library.remove("A").is_none());
        assert!(library.is_empty());
    }
}

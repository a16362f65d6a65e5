//! SaaS Forecast - Deterministic monthly cash projection engine
//!
//! This library provides:
//! - Revenue and expense assumptions (subscription growth, payroll, expenses)
//! - A pure monthly projection producing a cash ledger
//! - A compact query-string codec for shareable links, with legacy decoding
//! - Batch and what-if scenario runs
//! - A saved scenario library and CSV ledger export

pub mod error;
pub mod assumptions;
pub mod projection;
pub mod codec;
pub mod scenario;
pub mod library;
pub mod report;

// Re-export commonly used types
pub use assumptions::{AssumptionSet, CollectionKind, LineItem, YearMonth};
pub use projection::{project, ProjectionEngine, ProjectionPeriod, ProjectionResult};
pub use codec::{decode, decode_or_default, encode};
pub use error::{DecodeError, LibraryError};
pub use scenario::ScenarioRunner;
pub use library::{SavedScenario, ScenarioLibrary};

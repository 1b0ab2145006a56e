//! Core types for palm oil yield and climate data.
//!
//! Records are keyed by `(year, month)` and are immutable once parsed.
//! Climate rows come either from the historical observation set or from
//! one of the four fixed scenario projections.

pub mod error;
pub mod lookup;
pub mod month;
pub mod record;
pub mod scenario;

pub use error::{PalmError, Result};
pub use lookup::{ProjectionLookup, ProjectionTable};
pub use record::{ClimateRecord, YearMonth, YieldRecord};
pub use scenario::{ClimateSource, Scenario};

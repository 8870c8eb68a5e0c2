//! School Plan - Deterministic financial projection engine for a private-school venture
//!
//! This library provides:
//! - Parameter sets, scenario presets and per-year overrides
//! - Year-by-year private projections (revenue channels, cost lines, cash flow)
//! - Summary metrics (IRR, NPV, payback) and CAPEX scenario comparison
//! - Monthly flagship break-even and one-at-a-time sensitivity analysis
//! - Public-partnership projections and private/public consolidation
//! - Tabular report sheets for export

pub mod analysis;
pub mod consolidated;
pub mod error;
pub mod growth;
pub mod parameters;
pub mod projection;
pub mod public;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use error::{ModelError, ParameterError, Result};
pub use parameters::{CapexCatalog, ParameterName, ParameterPatch, ParameterSet, ScenarioPresets};
pub use projection::{Projection, ProjectionConfig, ProjectionEngine, Summary, YearRecord};
pub use public::{PublicModelGenerator, PublicYearRecord};
pub use session::{FinancialData, PlanSession};

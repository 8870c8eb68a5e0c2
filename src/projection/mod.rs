//! Private-track projection: year records, the engine and return metrics

mod engine;
pub mod irr;
mod records;
mod state;
mod year;

pub use engine::{CapexComparison, ProjectionConfig, ProjectionEngine};
pub use irr::IrrConfig;
pub use records::{
    CapexSummary, CostBreakdown, Payback, Pricing, Projection, RevenueBreakdown, StudentCounts,
    Summary, YearRecord,
};
pub use state::ProjectionState;
pub use year::YearProjector;

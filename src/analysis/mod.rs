//! Read-only analyses over the parameter set: break-even and sensitivity

pub mod breakeven;
pub mod sensitivity;

pub use breakeven::{BreakEvenConfig, BreakEvenMonth, BreakEvenResult, BreakEvenSimulator, MonthRecord};
pub use sensitivity::{SensitivityAnalyzer, SensitivityPoint, SensitivityReport};

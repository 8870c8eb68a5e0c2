//! One-at-a-time sensitivity of the summary to a single assumption

use crate::error::Result;
use crate::parameters::{ParameterName, ParameterSet};
use crate::projection::{ProjectionEngine, Summary};
use serde::{Deserialize, Serialize};

/// Result of one perturbed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    /// Multiplier applied to the base value
    pub factor: f64,
    /// The parameter's value in this run
    pub parameter_value: f64,
    pub summary: Summary,
    /// %ΔNPV / %Δparameter against the unperturbed run
    pub npv_elasticity: Option<f64>,
    /// %Δyear-10 revenue / %Δparameter against the unperturbed run
    pub revenue_elasticity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityReport {
    pub parameter: ParameterName,
    pub base_value: f64,
    pub base_summary: Summary,
    pub points: Vec<SensitivityPoint>,
}

/// Re-runs the engine with one assumption scaled by each factor
pub struct SensitivityAnalyzer<'a> {
    engine: &'a ProjectionEngine,
}

impl<'a> SensitivityAnalyzer<'a> {
    pub fn new(engine: &'a ProjectionEngine) -> Self {
        Self { engine }
    }

    /// Scale `parameter` by each factor in turn; `base` is never modified.
    ///
    /// # Errors
    /// `InvalidParameter` when a scaled value leaves its domain (for example
    /// a rate pushed above 1).
    pub fn analyze(
        &self,
        base: &ParameterSet,
        parameter: ParameterName,
        factors: &[f64],
    ) -> Result<SensitivityReport> {
        let (_, base_summary) = self.engine.run(base)?;
        let base_value = base.get(parameter);

        let points = factors
            .iter()
            .map(|&factor| {
                let perturbed = base.scaled(parameter, factor);
                let (_, summary) = self.engine.run(&perturbed)?;
                let change = factor - 1.0;

                Ok(SensitivityPoint {
                    factor,
                    parameter_value: perturbed.get(parameter),
                    npv_elasticity: elasticity(base_summary.npv, summary.npv, change),
                    revenue_elasticity: elasticity(
                        base_summary.year10_revenue,
                        summary.year10_revenue,
                        change,
                    ),
                    summary,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Sensitivity of {} over {} factors", parameter, points.len());
        Ok(SensitivityReport {
            parameter,
            base_value,
            base_summary,
            points,
        })
    }
}

fn elasticity(base: f64, value: f64, change: f64) -> Option<f64> {
    if change.abs() < 1e-12 || base.abs() < 1e-12 {
        return None;
    }
    Some(((value - base) / base) / change)
}

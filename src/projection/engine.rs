//! Core projection engine for annual private-track projections

use super::irr::{calculate_irr, npv, payback_period, IrrConfig};
use super::records::{CapexSummary, Projection, Summary};
use super::year::YearProjector;
use crate::error::{ModelError, Result};
use crate::parameters::{CapexCatalog, ParameterSet};
use serde::{Deserialize, Serialize};

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Number of years to project, launch year included
    pub horizon_years: u32,

    /// Annual rate used for NPV
    pub discount_rate: f64,

    /// IRR solver limits
    pub irr: IrrConfig,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: 11, // Years 0-10
            discount_rate: 0.10,
            irr: IrrConfig::default(),
        }
    }
}

/// Summary of one CAPEX scenario in a side-by-side comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapexComparison {
    pub scenario: CapexSummary,
    pub summary: Summary,
}

/// Main projection engine.
///
/// Holds only configuration; every call is a pure function of the parameter
/// set it is given.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    catalog: CapexCatalog,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given CAPEX catalog and config
    pub fn new(catalog: CapexCatalog, config: ProjectionConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &CapexCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project the configured horizon
    pub fn project(&self, params: &ParameterSet) -> Result<Projection> {
        self.project_horizon(params, self.config.horizon_years)
    }

    /// Project years `0..horizon_years`.
    ///
    /// Years run strictly in order; each record feeds the next one's pricing
    /// and new-franchise count.
    pub fn project_horizon(&self, params: &ParameterSet, horizon_years: u32) -> Result<Projection> {
        params.validate(&self.catalog)?;

        let scenario = self.catalog.get(&params.capex_scenario)?;
        let mut projection = Projection::new(CapexSummary {
            key: scenario.key.clone(),
            name: scenario.name.clone(),
            initial_capex: scenario.initial_capex,
            total_capex: scenario.total_capex(horizon_years),
        });

        let projector = YearProjector::new(&self.catalog);
        for year in 0..horizon_years {
            let record = projector.compute(year, params, projection.years.last())?;
            projection.add_year(record);
        }

        log::debug!(
            "Projected {} years under CAPEX scenario '{}'",
            projection.len(),
            projection.capex_scenario.key
        );
        Ok(projection)
    }

    /// Horizon-level aggregates.
    ///
    /// IRR non-convergence is not an error here: it is logged and reported as
    /// `irr: None` while the other fields are still filled in.
    pub fn summary(&self, projection: &Projection) -> Summary {
        let cashflows = projection.free_cash_flows();

        // Year 10, or the last year when the horizon is shorter
        let year10 = projection.year(10).or_else(|| projection.years.last());

        let irr = match calculate_irr(&cashflows, &self.config.irr) {
            Ok(rate) => Some(rate),
            Err(ModelError::NoConvergence { reason }) => {
                log::warn!("IRR undefined for this projection: {}", reason);
                None
            }
            Err(e) => {
                log::warn!("IRR calculation failed: {}", e);
                None
            }
        };

        Summary {
            year10_revenue: year10.map(|r| r.revenue.total).unwrap_or(0.0),
            year10_ebitda: year10.map(|r| r.ebitda).unwrap_or(0.0),
            year10_students: year10.map(|r| r.students.total).unwrap_or(0),
            irr,
            npv: npv(&cashflows, self.config.discount_rate),
            payback_period: payback_period(&cashflows),
            cumulative_fcf: cashflows.iter().sum(),
            cumulative_ebitda: projection.iter().map(|r| r.ebitda).sum(),
            capex_scenario: projection.capex_scenario.clone(),
        }
    }

    /// Projection and its summary in one call
    pub fn run(&self, params: &ParameterSet) -> Result<(Projection, Summary)> {
        let projection = self.project(params)?;
        let summary = self.summary(&projection);
        Ok((projection, summary))
    }

    /// Summaries for every catalog scenario with all else held equal
    pub fn compare_capex_scenarios(&self, params: &ParameterSet) -> Result<Vec<CapexComparison>> {
        self.catalog
            .scenarios()
            .iter()
            .map(|scenario| {
                let mut variant = params.clone();
                variant.capex_scenario = scenario.key.clone();
                let (projection, summary) = self.run(&variant)?;
                Ok(CapexComparison {
                    scenario: projection.capex_scenario,
                    summary,
                })
            })
            .collect()
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(CapexCatalog::default(), ProjectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ParameterName, ParameterPatch};
    use crate::projection::Payback;
    use approx::assert_relative_eq;

    #[test]
    fn test_projection_runs() {
        let engine = ProjectionEngine::default();
        let projection = engine.project(&ParameterSet::default()).unwrap();
        assert_eq!(projection.len(), 11);
        for (i, record) in projection.iter().enumerate() {
            assert_eq!(record.year, i as u32);
        }
        assert_eq!(projection.capex_scenario.key, "standard");
        assert_eq!(projection.capex_scenario.initial_capex, 8_000_000.0);
        let standard = engine.catalog().get("standard").unwrap();
        assert_eq!(projection.capex_scenario.total_capex, standard.total_capex(11));
        assert!(projection.capex_scenario.total_capex > 8_000_000.0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let engine = ProjectionEngine::default();
        let params = ParameterSet::default();
        let first = engine.run(&params).unwrap();
        let second = engine.run(&params).unwrap();
        assert_eq!(first, second);
        assert_eq!(params, ParameterSet::default());
    }

    #[test]
    fn test_realistic_golden_values() {
        let engine = ProjectionEngine::default();
        let (_, summary) = engine.run(&ParameterSet::default()).unwrap();

        assert_eq!(summary.year10_students, 35_400);
        assert_relative_eq!(summary.year10_revenue, 233_956_152.703_818_7, epsilon = 1e-3);
        assert_relative_eq!(summary.npv, 236_421_461.376_497_3, epsilon = 1e-2);
        assert_eq!(summary.payback_period, Payback::Year(2));
        assert!(summary.irr.is_some());
    }

    #[test]
    fn test_summary_fields() {
        let engine = ProjectionEngine::default();
        let (projection, summary) = engine.run(&ParameterSet::default()).unwrap();

        let fcf: f64 = projection.iter().map(|r| r.free_cash_flow).sum();
        assert_relative_eq!(summary.cumulative_fcf, fcf);
        assert_eq!(summary.year10_ebitda, projection.years[10].ebitda);
        assert_eq!(summary.capex_scenario.name, "Standard Campus");

        let irr = summary.irr.unwrap();
        assert!(npv(&projection.free_cash_flows(), irr).abs() < 1e-3);
    }

    #[test]
    fn test_short_horizon_uses_last_year() {
        let engine = ProjectionEngine::default();
        let projection = engine.project_horizon(&ParameterSet::default(), 6).unwrap();
        let summary = engine.summary(&projection);
        assert_eq!(summary.year10_revenue, projection.years[5].revenue.total);
    }

    #[test]
    fn test_payback_beyond_horizon() {
        let params = ParameterSet {
            corporate_staff_cost: 500_000_000.0,
            ..ParameterSet::default()
        };
        let engine = ProjectionEngine::default();
        let (projection, summary) = engine.run(&params).unwrap();

        assert!(projection.iter().all(|r| r.free_cash_flow < 0.0));
        assert_eq!(summary.payback_period, Payback::BeyondHorizon);
        assert_eq!(summary.payback_period.year(), None);
        // All outflows: no rate zeroes the NPV
        assert_eq!(summary.irr, None);
        assert!(summary.npv.is_finite());
    }

    #[test]
    fn test_override_isolation() {
        let engine = ProjectionEngine::default();
        let base = ParameterSet::default();
        let mut overridden = base.clone();
        overridden
            .yearly_overrides
            .insert(5, ParameterPatch::new().with(ParameterName::MarketingRate, 0.15));

        let a = engine.project(&base).unwrap();
        let b = engine.project(&overridden).unwrap();

        for year in 0..11 {
            if year == 5 {
                assert!(b.years[5].costs.marketing > a.years[5].costs.marketing);
            } else {
                assert_eq!(a.years[year], b.years[year], "year {}", year);
            }
        }
        assert!(overridden.marketing_rate == base.marketing_rate);
    }

    #[test]
    fn test_invalid_parameters_fail_projection() {
        let engine = ProjectionEngine::default();
        let params = ParameterSet {
            tax_rate: -0.1,
            ..ParameterSet::default()
        };
        assert!(engine.project(&params).unwrap_err().is_invalid_parameter());

        let huge = ParameterSet {
            adoption_students: 1e20,
            ..ParameterSet::default()
        };
        assert!(engine.run(&huge).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_compare_capex_scenarios() {
        let engine = ProjectionEngine::default();
        let comparisons = engine.compare_capex_scenarios(&ParameterSet::default()).unwrap();

        let keys: Vec<_> = comparisons.iter().map(|c| c.scenario.key.as_str()).collect();
        assert_eq!(keys, vec!["lean", "standard", "premium"]);

        // Same operations, heavier investment
        assert!(comparisons[0].summary.npv > comparisons[1].summary.npv);
        assert!(comparisons[1].summary.npv > comparisons[2].summary.npv);
        assert_eq!(
            comparisons[0].summary.year10_revenue,
            comparisons[2].summary.year10_revenue
        );
    }
}

//! Session-held planning state
//!
//! Owns the working parameter set, the active scenario key and the cached
//! outputs for those parameters. Every edit is applied to a candidate copy,
//! projected, and only then committed, so a rejected edit leaves the session
//! exactly as it was.
//!
//! # Example
//! ```ignore
//! let mut session = PlanSession::new()?;
//! session.update_parameters(&ParameterPatch::new().with(ParameterName::FlagshipTuition, 5_000.0))?;
//! println!("NPV: {:.0}", session.summary().npv);
//! ```

use crate::analysis::{BreakEvenResult, BreakEvenSimulator, SensitivityAnalyzer, SensitivityReport};
use crate::error::Result;
use crate::parameters::{ParameterName, ParameterPatch, ParameterSet, ScenarioPresets};
use crate::projection::{CapexComparison, Projection, ProjectionEngine, Summary, YearRecord};
use crate::public::{PublicModelGenerator, PublicYearRecord};
use serde::{Deserialize, Serialize};

/// Scenario a new session starts from
pub const DEFAULT_SCENARIO: &str = "realistic";

/// Everything derived from the current parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub projection: Projection,
    pub summary: Summary,
    pub flagship_breakeven: BreakEvenResult,
}

#[derive(Debug, Clone)]
pub struct PlanSession {
    engine: ProjectionEngine,
    presets: ScenarioPresets,
    breakeven: BreakEvenSimulator,

    parameters: ParameterSet,
    current_scenario: String,

    /// Outputs for `parameters`; replaced wholesale on every commit
    data: FinancialData,
}

impl PlanSession {
    /// Session on the default engine, started from the realistic preset
    pub fn new() -> Result<Self> {
        Self::with_components(
            ProjectionEngine::default(),
            ScenarioPresets::builtin(),
            BreakEvenSimulator::default(),
        )
    }

    /// Session with explicit engine, preset table and break-even settings
    pub fn with_components(
        engine: ProjectionEngine,
        presets: ScenarioPresets,
        breakeven: BreakEvenSimulator,
    ) -> Result<Self> {
        let parameters = presets.get(DEFAULT_SCENARIO)?.parameters.clone();
        let data = compute(&engine, &breakeven, &parameters)?;
        Ok(Self {
            engine,
            presets,
            breakeven,
            parameters,
            current_scenario: DEFAULT_SCENARIO.to_string(),
            data,
        })
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn current_scenario(&self) -> &str {
        &self.current_scenario
    }

    pub fn presets(&self) -> &ScenarioPresets {
        &self.presets
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Cached projection, summary and flagship break-even
    pub fn financial_data(&self) -> &FinancialData {
        &self.data
    }

    pub fn summary(&self) -> &Summary {
        &self.data.summary
    }

    /// Cached record for one year of the configured horizon
    pub fn year_data(&self, year: u32) -> Option<&YearRecord> {
        self.data.projection.year(year)
    }

    /// Fresh projection over an arbitrary horizon
    pub fn project(&self, horizon_years: u32) -> Result<Projection> {
        self.engine.project_horizon(&self.parameters, horizon_years)
    }

    /// Merge a patch into the working parameters
    pub fn update_parameters(&mut self, patch: &ParameterPatch) -> Result<()> {
        let mut candidate = self.parameters.clone();
        candidate.apply_patch(patch);
        self.commit(candidate, None)
    }

    /// Replace the working parameters with `explicit`, or with the named preset.
    ///
    /// Any yearly overrides are dropped along with the old parameters.
    pub fn switch_scenario(&mut self, key: &str, explicit: Option<ParameterSet>) -> Result<()> {
        let candidate = match explicit {
            Some(params) => params,
            None => self.presets.get(key)?.parameters.clone(),
        };
        self.commit(candidate, Some(key))
    }

    /// Merge `patch` into the override for `year`, creating it if needed
    pub fn update_year_override(&mut self, year: u32, patch: &ParameterPatch) -> Result<()> {
        let mut candidate = self.parameters.clone();
        candidate
            .yearly_overrides
            .entry(year)
            .or_default()
            .merge(patch);
        self.commit(candidate, None)
    }

    /// Remove the override for `year`; a no-op when there is none
    pub fn clear_year_override(&mut self, year: u32) -> Result<()> {
        if !self.parameters.yearly_overrides.contains_key(&year) {
            return Ok(());
        }
        let mut candidate = self.parameters.clone();
        candidate.yearly_overrides.remove(&year);
        self.commit(candidate, None)
    }

    pub fn perform_sensitivity_analysis(
        &self,
        parameter: ParameterName,
        factors: &[f64],
    ) -> Result<SensitivityReport> {
        SensitivityAnalyzer::new(&self.engine).analyze(&self.parameters, parameter, factors)
    }

    pub fn compare_capex_scenarios(&self) -> Result<Vec<CapexComparison>> {
        self.engine.compare_capex_scenarios(&self.parameters)
    }

    /// Public-track projection; independent of any session state
    pub fn generate_public_financial_data(scenario_key: &str) -> Result<Vec<PublicYearRecord>> {
        PublicModelGenerator::default().generate(scenario_key)
    }

    fn commit(&mut self, candidate: ParameterSet, scenario: Option<&str>) -> Result<()> {
        let data = match compute(&self.engine, &self.breakeven, &candidate) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Rejected parameter change: {}", e);
                return Err(e);
            }
        };

        self.parameters = candidate;
        self.data = data;
        if let Some(key) = scenario {
            self.current_scenario = key.to_string();
        }
        Ok(())
    }
}

fn compute(
    engine: &ProjectionEngine,
    breakeven: &BreakEvenSimulator,
    params: &ParameterSet,
) -> Result<FinancialData> {
    let (projection, summary) = engine.run(params)?;
    let flagship_breakeven = breakeven.simulate(params, engine.catalog())?;
    Ok(FinancialData {
        projection,
        summary,
        flagship_breakeven,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::presets::pessimistic_parameters;

    #[test]
    fn test_new_session_uses_realistic() {
        let session = PlanSession::new().unwrap();
        assert_eq!(session.current_scenario(), "realistic");
        assert_eq!(session.parameters(), &ParameterSet::default());
        assert_eq!(session.financial_data().projection.len(), 11);
        assert_eq!(session.summary().year10_students, 35_400);
    }

    #[test]
    fn test_update_parameters() {
        let mut session = PlanSession::new().unwrap();
        let before = session.summary().clone();

        session
            .update_parameters(&ParameterPatch::new().with(ParameterName::FlagshipTuition, 5_000.0))
            .unwrap();

        assert_eq!(session.parameters().flagship_tuition, 5_000.0);
        assert!(session.summary().year10_revenue > before.year10_revenue);
    }

    #[test]
    fn test_rejected_edit_leaves_state_untouched() {
        let mut session = PlanSession::new().unwrap();
        let params = session.parameters().clone();
        let data = session.financial_data().clone();

        let bad = ParameterPatch::new()
            .with(ParameterName::FlagshipTuition, 9_000.0)
            .with(ParameterName::TaxRate, -0.5);
        assert!(session.update_parameters(&bad).unwrap_err().is_invalid_parameter());

        let bad_capex = ParameterPatch::new().with_capex("castle");
        assert!(session.update_year_override(4, &bad_capex).is_err());

        assert_eq!(session.parameters(), &params);
        assert_eq!(session.financial_data(), &data);
    }

    #[test]
    fn test_switch_to_same_scenario_is_stable() {
        let mut session = PlanSession::new().unwrap();
        session.switch_scenario("pessimistic", None).unwrap();

        session.switch_scenario("realistic", None).unwrap();
        let first = serde_json::to_string(session.summary()).unwrap();
        session.switch_scenario("realistic", None).unwrap();
        let second = serde_json::to_string(session.summary()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_switch_scenario_explicit_and_unknown() {
        let mut session = PlanSession::new().unwrap();

        session
            .switch_scenario("custom", Some(pessimistic_parameters()))
            .unwrap();
        assert_eq!(session.current_scenario(), "custom");
        assert_eq!(session.parameters(), &pessimistic_parameters());

        assert!(session.switch_scenario("moonshot", None).is_err());
        assert_eq!(session.current_scenario(), "custom");
    }

    #[test]
    fn test_year_override_merge_and_clear() {
        let mut session = PlanSession::new().unwrap();
        let base_year5 = session.year_data(5).unwrap().clone();

        session
            .update_year_override(5, &ParameterPatch::new().with(ParameterName::MarketingRate, 0.12))
            .unwrap();
        session
            .update_year_override(5, &ParameterPatch::new().with(ParameterName::LegalCost, 300_000.0))
            .unwrap();

        let patch = session.parameters().year_override(5).unwrap();
        assert_eq!(patch.get(ParameterName::MarketingRate), Some(0.12));
        assert_eq!(patch.get(ParameterName::LegalCost), Some(300_000.0));
        assert!(session.year_data(5).unwrap().costs.total > base_year5.costs.total);

        session.clear_year_override(5).unwrap();
        assert!(session.parameters().yearly_overrides.is_empty());
        assert_eq!(session.year_data(5).unwrap(), &base_year5);

        // Clearing a missing override is fine
        session.clear_year_override(7).unwrap();
    }

    #[test]
    fn test_analysis_entry_points() {
        let session = PlanSession::new().unwrap();

        let report = session
            .perform_sensitivity_analysis(ParameterName::FranchiseCount, &[0.5, 1.5])
            .unwrap();
        assert_eq!(report.points.len(), 2);

        let capex = session.compare_capex_scenarios().unwrap();
        assert_eq!(capex.len(), 3);

        let public = PlanSession::generate_public_financial_data("optimistic").unwrap();
        assert_eq!(public.len(), 10);
        assert!(PlanSession::generate_public_financial_data("nowhere").is_err());
    }

    #[test]
    fn test_project_custom_horizon() {
        let session = PlanSession::new().unwrap();
        let projection = session.project(15).unwrap();
        assert_eq!(projection.len(), 15);
        assert_eq!(projection.years[14].capex, 0.0);
    }
}

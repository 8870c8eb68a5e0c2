//! Named private-track scenario presets

use super::ParameterSet;
use crate::error::ParameterError;
use std::collections::BTreeMap;

/// An immutable, named parameter bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: ParameterSet,
}

/// The preset table handed to a session.
///
/// Built once per session instead of living in a process-wide table.
#[derive(Debug, Clone)]
pub struct ScenarioPresets {
    presets: Vec<ScenarioPreset>,
}

impl ScenarioPresets {
    /// Optimistic, realistic and pessimistic private presets
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                ScenarioPreset {
                    key: "optimistic",
                    name: "Optimistic",
                    description: "Fast franchise roll-out and strong adoption demand",
                    parameters: optimistic_parameters(),
                },
                ScenarioPreset {
                    key: "realistic",
                    name: "Realistic",
                    description: "Base case used for the business plan",
                    parameters: realistic_parameters(),
                },
                ScenarioPreset {
                    key: "pessimistic",
                    name: "Pessimistic",
                    description: "Slow enrollment, fewer franchises and higher acquisition costs",
                    parameters: pessimistic_parameters(),
                },
            ],
        }
    }

    pub fn get(&self, key: &str) -> Result<&ScenarioPreset, ParameterError> {
        self.presets
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| ParameterError::UnknownScenario(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioPreset> {
        self.presets.iter()
    }
}

impl Default for ScenarioPresets {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Base case
pub fn realistic_parameters() -> ParameterSet {
    ParameterSet {
        flagship_students: 400.0,
        flagship_initial_fill: 0.4,
        flagship_growth_rate: 0.8,
        franchise_count: 60.0,
        franchise_growth_rate: 1.5,
        students_per_franchise: 250.0,
        adoption_students: 20_000.0,
        adoption_growth_rate: 2.0,

        flagship_tuition: 4_500.0,
        adoption_license_fee: 80.0,
        kit_cost_per_student: 600.0,
        tuition_increase_rate: 0.05,
        franchise_royalty_rate: 0.08,
        marketing_fee_rate: 0.02,
        franchise_fee: 150_000.0,

        technology_base_cost: 600_000.0,
        technology_cost_per_student: 120.0,
        marketing_rate: 0.08,
        corporate_staff_cost: 1_800_000.0,
        salary_increase_rate: 0.05,
        students_per_teacher: 15.0,
        teacher_annual_salary: 96_000.0,
        franchise_support_cost_per_unit: 40_000.0,
        adoption_support_cost_per_student: 10.0,
        facilities_cost: 720_000.0,
        cost_inflation_rate: 0.045,
        curriculum_rate: 0.03,
        teacher_training_cost_per_unit: 25_000.0,
        student_support_cost_per_student: 150.0,
        quality_assurance_cost_per_unit: 12_000.0,
        regulatory_compliance_cost: 150_000.0,
        bad_debt_rate: 0.02,
        payment_processing_rate: 0.025,
        platform_rd_rate: 0.05,
        content_development_cost: 400_000.0,
        legal_cost: 200_000.0,
        insurance_rate: 0.005,
        travel_cost_per_unit: 8_000.0,
        working_capital_rate: 0.01,
        data_management_cost_per_student: 20.0,
        parent_engagement_cost_per_student: 60.0,
        contingency_rate: 0.03,
        tax_rate: 0.25,

        capex_scenario: "standard".to_string(),
        yearly_overrides: BTreeMap::new(),
    }
}

pub fn optimistic_parameters() -> ParameterSet {
    ParameterSet {
        flagship_students: 450.0,
        flagship_initial_fill: 0.5,
        flagship_growth_rate: 1.0,
        franchise_count: 80.0,
        franchise_growth_rate: 1.3,
        students_per_franchise: 280.0,
        adoption_students: 30_000.0,
        adoption_growth_rate: 1.8,
        flagship_tuition: 4_800.0,
        adoption_license_fee: 90.0,
        tuition_increase_rate: 0.06,
        marketing_rate: 0.07,
        ..realistic_parameters()
    }
}

pub fn pessimistic_parameters() -> ParameterSet {
    ParameterSet {
        flagship_students: 350.0,
        flagship_initial_fill: 0.3,
        flagship_growth_rate: 0.6,
        franchise_count: 30.0,
        franchise_growth_rate: 1.8,
        students_per_franchise: 200.0,
        adoption_students: 8_000.0,
        adoption_growth_rate: 2.2,
        flagship_tuition: 4_200.0,
        adoption_license_fee: 70.0,
        tuition_increase_rate: 0.04,
        marketing_rate: 0.10,
        bad_debt_rate: 0.035,
        ..realistic_parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::CapexCatalog;

    #[test]
    fn test_builtin_presets_are_valid() {
        let presets = ScenarioPresets::builtin();
        let catalog = CapexCatalog::default();
        for preset in presets.iter() {
            assert!(preset.parameters.validate(&catalog).is_ok(), "{}", preset.key);
        }
    }

    #[test]
    fn test_lookup() {
        let presets = ScenarioPresets::builtin();
        assert_eq!(presets.get("realistic").unwrap().parameters, ParameterSet::default());
        assert_eq!(
            presets.get("moonshot").unwrap_err(),
            ParameterError::UnknownScenario("moonshot".to_string())
        );
    }

    #[test]
    fn test_presets_are_ordered_by_ambition() {
        let opt = optimistic_parameters();
        let real = realistic_parameters();
        let pess = pessimistic_parameters();
        assert!(opt.franchise_count > real.franchise_count);
        assert!(real.franchise_count > pess.franchise_count);
        assert!(opt.adoption_students > pess.adoption_students);
    }
}

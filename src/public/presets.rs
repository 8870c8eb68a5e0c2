//! Government-partnership scenario presets

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Public-track scenario: growth targets, pricing and margin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicScenarioPreset {
    pub key: String,
    pub name: String,
    pub description: String,

    /// Curve base for students
    pub year1_students: f64,
    /// Reference point; the curve itself is fixed by year 1 and year 10
    pub year5_students: f64,
    /// Student cap
    pub year10_students: f64,
    pub year1_municipalities: f64,
    pub year10_municipalities: f64,

    /// Monthly license fee per student
    pub monthly_fee_per_student: f64,
    /// One-time fee per newly signed municipality
    pub setup_fee_per_municipality: f64,
    /// Annual platform fee per active municipality
    pub technology_fee_per_municipality: f64,
    /// One-time fee per trained teacher
    pub training_fee_per_teacher: f64,
    pub schools_per_municipality: f64,
    pub teachers_per_school: f64,

    /// EBITDA margin; costs are `revenue * (1 - margin)`
    pub margin: f64,
}

/// Built-in public presets
#[derive(Debug, Clone)]
pub struct PublicScenarioPresets {
    presets: Vec<PublicScenarioPreset>,
}

impl PublicScenarioPresets {
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                PublicScenarioPreset {
                    key: "optimistic".to_string(),
                    name: "Optimistic".to_string(),
                    description: "State-level agreements accelerate municipal adoption".to_string(),
                    year1_students: 120_000.0,
                    year5_students: 2_170_000.0,
                    year10_students: 7_500_000.0,
                    year1_municipalities: 15.0,
                    year10_municipalities: 450.0,
                    monthly_fee_per_student: 14.0,
                    setup_fee_per_municipality: 60_000.0,
                    technology_fee_per_municipality: 30_000.0,
                    training_fee_per_teacher: 1_800.0,
                    schools_per_municipality: 20.0,
                    teachers_per_school: 15.0,
                    margin: 0.40,
                },
                PublicScenarioPreset {
                    key: "realistic".to_string(),
                    name: "Realistic".to_string(),
                    description: "Steady municipal contracts through public tenders".to_string(),
                    year1_students: 80_000.0,
                    year5_students: 1_450_000.0,
                    year10_students: 5_000_000.0,
                    year1_municipalities: 10.0,
                    year10_municipalities: 300.0,
                    monthly_fee_per_student: 12.0,
                    setup_fee_per_municipality: 50_000.0,
                    technology_fee_per_municipality: 24_000.0,
                    training_fee_per_teacher: 1_500.0,
                    schools_per_municipality: 20.0,
                    teachers_per_school: 15.0,
                    margin: 0.35,
                },
                PublicScenarioPreset {
                    key: "pessimistic".to_string(),
                    name: "Pessimistic".to_string(),
                    description: "Slow procurement cycles and budget constraints".to_string(),
                    year1_students: 40_000.0,
                    year5_students: 725_000.0,
                    year10_students: 2_500_000.0,
                    year1_municipalities: 5.0,
                    year10_municipalities: 150.0,
                    monthly_fee_per_student: 10.0,
                    setup_fee_per_municipality: 40_000.0,
                    technology_fee_per_municipality: 20_000.0,
                    training_fee_per_teacher: 1_200.0,
                    schools_per_municipality: 15.0,
                    teachers_per_school: 12.0,
                    margin: 0.30,
                },
            ],
        }
    }

    pub fn get(&self, key: &str) -> Result<&PublicScenarioPreset, ParameterError> {
        self.presets
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| ParameterError::UnknownScenario(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PublicScenarioPreset> {
        self.presets.iter()
    }
}

impl Default for PublicScenarioPresets {
    fn default() -> Self {
        Self::builtin()
    }
}

//! CAPEX scenarios: initial investment plus a year-indexed reinvestment schedule

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// One named investment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapexScenario {
    pub key: String,
    pub name: String,
    pub description: String,

    /// Outlay in year 0 (flagship build-out, platform, launch)
    pub initial_capex: f64,

    /// Outlays for years 1.. (index 0 = year 1); years past the end are 0
    pub annual_capex: Vec<f64>,
}

impl CapexScenario {
    /// CAPEX for a given projection year
    pub fn capex_for_year(&self, year: u32) -> f64 {
        if year == 0 {
            return self.initial_capex;
        }
        let idx = (year as usize).saturating_sub(1);
        self.annual_capex.get(idx).copied().unwrap_or(0.0)
    }

    /// Sum of all outlays in years `0..horizon_years`
    pub fn total_capex(&self, horizon_years: u32) -> f64 {
        (0..horizon_years).map(|y| self.capex_for_year(y)).sum()
    }
}

/// The set of CAPEX scenarios a parameter set may reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexCatalog {
    scenarios: Vec<CapexScenario>,
}

impl CapexCatalog {
    pub fn new(scenarios: Vec<CapexScenario>) -> Self {
        Self { scenarios }
    }

    /// Look up a scenario by key
    pub fn get(&self, key: &str) -> Result<&CapexScenario, ParameterError> {
        self.scenarios
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| ParameterError::UnknownCapexScenario(key.to_string()))
    }

    pub fn scenarios(&self) -> &[CapexScenario] {
        &self.scenarios
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.key.as_str())
    }
}

impl Default for CapexCatalog {
    /// Lean, standard and premium launch plans
    fn default() -> Self {
        Self::new(vec![
            CapexScenario {
                key: "lean".to_string(),
                name: "Lean Launch".to_string(),
                description: "Leased building, minimal fit-out, off-the-shelf platform".to_string(),
                initial_capex: 4_500_000.0,
                annual_capex: vec![500_000.0; 10],
            },
            CapexScenario {
                key: "standard".to_string(),
                name: "Standard Campus".to_string(),
                description: "Renovated campus with labs and a proprietary learning platform"
                    .to_string(),
                initial_capex: 8_000_000.0,
                annual_capex: vec![
                    1_000_000.0, // Year 1
                    1_000_000.0, // Year 2
                    1_500_000.0, // Year 3
                    1_500_000.0, // Year 4
                    2_000_000.0, // Year 5
                    2_000_000.0, // Year 6
                    2_000_000.0, // Year 7
                    2_000_000.0, // Year 8
                    2_000_000.0, // Year 9
                    2_000_000.0, // Year 10
                ],
            },
            CapexScenario {
                key: "premium".to_string(),
                name: "Premium Flagship".to_string(),
                description: "Purpose-built flagship campus and full platform build".to_string(),
                initial_capex: 14_000_000.0,
                annual_capex: vec![
                    1_500_000.0, // Year 1
                    2_000_000.0, // Year 2
                    2_000_000.0, // Year 3
                    2_500_000.0, // Year 4
                    2_500_000.0, // Year 5
                    2_500_000.0, // Year 6
                    2_500_000.0, // Year 7
                    2_500_000.0, // Year 8
                    2_500_000.0, // Year 9
                    2_500_000.0, // Year 10
                ],
            },
        ])
    }
}

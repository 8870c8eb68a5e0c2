//! Public-sector (government partnership) growth model
//!
//! A closed-form model over years 1..=10: students and municipalities follow
//! bounded power-law curves anchored at the preset's year-1 values and capped
//! at its year-10 targets. There are no yearly overrides on this track.

mod presets;

pub use presets::{PublicScenarioPreset, PublicScenarioPresets};

use crate::error::{ParameterError, Result};
use crate::growth::bounded_count;
use serde::{Deserialize, Serialize};

/// Public-school enrollment the penetration figure is measured against
pub const PUBLIC_MARKET_STUDENTS: f64 = 46_700_000.0;

/// Last projected year of the public track
pub const PUBLIC_HORIZON_YEARS: u32 = 10;

/// Growth exponent of the student curve
pub const STUDENT_GROWTH_EXPONENT: f64 = 1.8;

/// Growth exponent of the municipality curve
pub const MUNICIPALITY_GROWTH_EXPONENT: f64 = 1.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicRevenue {
    pub monthly: f64,
    pub setup: f64,
    pub technology: f64,
    pub training: f64,
    pub total: f64,
}

/// One year of the public track (year 1 is the first contract year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicYearRecord {
    pub year: u32,
    pub students: u64,
    pub municipalities: u64,
    pub new_municipalities: u64,
    pub teachers_trained: u64,
    pub revenue: PublicRevenue,
    pub costs: f64,
    pub ebitda: f64,
    /// Recomputed as `ebitda / revenue.total`
    pub margin: f64,
    /// Share of the national public-school market
    pub market_penetration: f64,
}

impl PublicYearRecord {
    /// All-zero record, used where a year has no public counterpart
    pub fn empty(year: u32) -> Self {
        Self {
            year,
            students: 0,
            municipalities: 0,
            new_municipalities: 0,
            teachers_trained: 0,
            revenue: PublicRevenue::default(),
            costs: 0.0,
            ebitda: 0.0,
            margin: 0.0,
            market_penetration: 0.0,
        }
    }
}

/// Generates public-track projections from the preset table
#[derive(Debug, Clone, Default)]
pub struct PublicModelGenerator {
    presets: PublicScenarioPresets,
}

impl PublicModelGenerator {
    pub fn new(presets: PublicScenarioPresets) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &PublicScenarioPresets {
        &self.presets
    }

    /// Years 1..=10 for a named preset.
    ///
    /// # Errors
    /// `InvalidParameter(UnknownScenario)` for an unrecognized key.
    pub fn generate(&self, scenario_key: &str) -> Result<Vec<PublicYearRecord>> {
        let preset = self.presets.get(scenario_key)?;
        generate_from_preset(preset)
    }
}

/// Years 1..=10 for an explicit preset
pub fn generate_from_preset(preset: &PublicScenarioPreset) -> Result<Vec<PublicYearRecord>> {
    validate_preset(preset)?;

    let mut records = Vec::with_capacity(PUBLIC_HORIZON_YEARS as usize);
    let mut prior_municipalities = 0u64;

    for year in 1..=PUBLIC_HORIZON_YEARS {
        let t = year as f64;
        let students = bounded_count(
            preset.year1_students,
            STUDENT_GROWTH_EXPONENT,
            preset.year10_students,
            t,
        );
        let municipalities = bounded_count(
            preset.year1_municipalities,
            MUNICIPALITY_GROWTH_EXPONENT,
            preset.year10_municipalities,
            t,
        );
        let new_municipalities = municipalities.saturating_sub(prior_municipalities);
        prior_municipalities = municipalities;

        let teachers_trained = (new_municipalities as f64
            * preset.schools_per_municipality
            * preset.teachers_per_school)
            .round() as u64;

        let mut revenue = PublicRevenue {
            monthly: students as f64 * preset.monthly_fee_per_student * 12.0,
            setup: new_municipalities as f64 * preset.setup_fee_per_municipality,
            technology: municipalities as f64 * preset.technology_fee_per_municipality,
            training: teachers_trained as f64 * preset.training_fee_per_teacher,
            total: 0.0,
        };
        revenue.total = revenue.monthly + revenue.setup + revenue.technology + revenue.training;

        let costs = revenue.total * (1.0 - preset.margin);
        let ebitda = revenue.total - costs;
        let margin = if revenue.total > 0.0 {
            ebitda / revenue.total
        } else {
            0.0
        };

        records.push(PublicYearRecord {
            year,
            students,
            municipalities,
            new_municipalities,
            teachers_trained,
            revenue,
            costs,
            ebitda,
            margin,
            market_penetration: students as f64 / PUBLIC_MARKET_STUDENTS,
        });
    }

    log::debug!("Generated public track for preset '{}'", preset.key);
    Ok(records)
}

fn validate_preset(preset: &PublicScenarioPreset) -> std::result::Result<(), ParameterError> {
    let values = [
        ("year1Students", preset.year1_students),
        ("year5Students", preset.year5_students),
        ("year10Students", preset.year10_students),
        ("year1Municipalities", preset.year1_municipalities),
        ("year10Municipalities", preset.year10_municipalities),
        ("monthlyFeePerStudent", preset.monthly_fee_per_student),
        ("setupFeePerMunicipality", preset.setup_fee_per_municipality),
        ("technologyFeePerMunicipality", preset.technology_fee_per_municipality),
        ("trainingFeePerTeacher", preset.training_fee_per_teacher),
        ("schoolsPerMunicipality", preset.schools_per_municipality),
        ("teachersPerSchool", preset.teachers_per_school),
        ("margin", preset.margin),
    ];
    for (name, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(ParameterError::OutOfDomain {
                name: name.to_string(),
                value,
                reason: "must be a finite, non-negative number",
            });
        }
    }
    if preset.margin > 1.0 {
        return Err(ParameterError::OutOfDomain {
            name: "margin".to_string(),
            value: preset.margin,
            reason: "must be between 0 and 1",
        });
    }
    Ok(())
}

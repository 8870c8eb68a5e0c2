//! State carried from one projection year into the next

use super::records::{Pricing, YearRecord};
use crate::growth::{base_for_target, bounded_count};
use crate::parameters::ParameterSet;

/// Year in which the franchise and adoption curves reach their targets
pub const TARGET_YEAR: f64 = 10.0;

/// The part of a prior year the next year depends on.
///
/// Pricing is a recurrence; the franchise count is needed to derive new
/// openings. Everything else in a year is a closed form of the year index.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionState {
    /// Year about to be projected
    pub year: u32,

    /// Prices in force in the previous year; None before launch
    pub prior_pricing: Option<Pricing>,

    /// Franchise units open at the end of the previous year
    pub prior_franchise_count: u64,
}

impl ProjectionState {
    /// State at the start of `year`, given the record for `year - 1`.
    ///
    /// Without a previous record the prior values are rebuilt from `params`:
    /// base prices compounded `year - 1` times and the closed-form franchise
    /// count of the previous year.
    pub fn for_year(year: u32, params: &ParameterSet, previous: Option<&YearRecord>) -> Self {
        if year == 0 {
            return Self {
                year,
                prior_pricing: None,
                prior_franchise_count: 0,
            };
        }

        match previous {
            Some(record) => Self {
                year,
                prior_pricing: Some(record.pricing.clone()),
                prior_franchise_count: record.franchise_count,
            },
            None => {
                let growth = (1.0 + params.tuition_increase_rate).powi(year as i32 - 1);
                Self {
                    year,
                    prior_pricing: Some(Pricing {
                        tuition: params.flagship_tuition * growth,
                        adoption_fee: params.adoption_license_fee * growth,
                        kit_cost: params.kit_cost_per_student * growth,
                    }),
                    prior_franchise_count: franchise_units(params, year - 1),
                }
            }
        }
    }

    /// Prices for the year being projected, before any explicit override
    pub fn compounded_pricing(&self, params: &ParameterSet) -> Pricing {
        match &self.prior_pricing {
            None => Pricing {
                tuition: params.flagship_tuition,
                adoption_fee: params.adoption_license_fee,
                kit_cost: params.kit_cost_per_student,
            },
            Some(prior) => {
                let step = 1.0 + params.tuition_increase_rate;
                Pricing {
                    tuition: prior.tuition * step,
                    adoption_fee: prior.adoption_fee * step,
                    kit_cost: prior.kit_cost * step,
                }
            }
        }
    }
}

/// Franchise units open in `year` (0 at launch, `franchise_count` from year 10)
pub fn franchise_units(params: &ParameterSet, year: u32) -> u64 {
    let exponent = params.franchise_growth_rate;
    let base = base_for_target(params.franchise_count, exponent, TARGET_YEAR);
    bounded_count(base, exponent, params.franchise_count, year as f64)
}

/// Adoption students licensed in `year`
pub fn adoption_students(params: &ParameterSet, year: u32) -> u64 {
    let exponent = params.adoption_growth_rate;
    let base = base_for_target(params.adoption_students, exponent, TARGET_YEAR);
    bounded_count(base, exponent, params.adoption_students, year as f64)
}

/// Flagship students enrolled in `year`; the flagship opens in year 0
pub fn flagship_students(params: &ParameterSet, year: u32) -> u64 {
    let capacity = params.flagship_students;
    let opening = capacity * params.flagship_initial_fill;
    bounded_count(opening, params.flagship_growth_rate, capacity, year as f64 + 1.0)
}

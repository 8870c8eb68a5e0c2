//! Monthly break-even simulation for a single flagship school
//!
//! Runs independently of the annual engine: enrollment ramps linearly from
//! the opening fill to capacity, and the running result starts at minus the
//! selected scenario's initial CAPEX.

use crate::error::Result;
use crate::parameters::{CapexCatalog, ParameterSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation window settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakEvenConfig {
    /// Months simulated
    pub horizon_months: u32,

    /// Month at which enrollment reaches capacity
    pub ramp_months: u32,
}

impl Default for BreakEvenConfig {
    fn default() -> Self {
        Self {
            horizon_months: 60,
            ramp_months: 36,
        }
    }
}

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    /// 1-indexed month since opening
    pub month: u32,
    pub students: u64,
    pub monthly_revenue: f64,
    pub monthly_operating_costs: f64,
    pub monthly_result: f64,
    pub cumulative_result: f64,
}

/// First month whose cumulative result is non-negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakEvenMonth {
    Month(u32),
    NotReached,
}

impl BreakEvenMonth {
    pub fn month(&self) -> Option<u32> {
        match self {
            BreakEvenMonth::Month(m) => Some(*m),
            BreakEvenMonth::NotReached => None,
        }
    }
}

impl fmt::Display for BreakEvenMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEvenMonth::Month(m) => write!(f, "month {}", m),
            BreakEvenMonth::NotReached => f.write_str("not reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenResult {
    pub break_even_month: BreakEvenMonth,
    pub monthly_data: Vec<MonthRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct BreakEvenSimulator {
    config: BreakEvenConfig,
}

impl BreakEvenSimulator {
    pub fn new(config: BreakEvenConfig) -> Self {
        Self { config }
    }

    /// Simulate the flagship month by month.
    ///
    /// Uses the base parameters; yearly overrides belong to the annual engine.
    pub fn simulate(&self, params: &ParameterSet, catalog: &CapexCatalog) -> Result<BreakEvenResult> {
        params.validate(catalog)?;
        let initial_capex = catalog.get(&params.capex_scenario)?.initial_capex;

        let fixed_monthly = (params.facilities_cost + params.regulatory_compliance_cost) / 12.0;
        let per_student_monthly = (params.student_support_cost_per_student
            + params.data_management_cost_per_student
            + params.parent_engagement_cost_per_student)
            / 12.0;
        let revenue_rate = params.bad_debt_rate + params.payment_processing_rate + params.curriculum_rate;

        let mut cumulative = -initial_capex;
        let mut break_even_month = BreakEvenMonth::NotReached;
        let mut monthly_data = Vec::with_capacity(self.config.horizon_months as usize);

        for month in 1..=self.config.horizon_months {
            let students = self.students_in_month(params, month);
            let tuition = params.flagship_tuition
                * (1.0 + params.tuition_increase_rate).powi(((month - 1) / 12) as i32);

            let teachers = (students as f64 / params.students_per_teacher).ceil();
            let revenue = students as f64 * tuition;
            let costs = teachers * params.teacher_annual_salary / 12.0
                + fixed_monthly
                + per_student_monthly * students as f64
                + revenue_rate * revenue;

            let result = revenue - costs;
            cumulative += result;

            if break_even_month == BreakEvenMonth::NotReached && cumulative >= 0.0 {
                break_even_month = BreakEvenMonth::Month(month);
            }

            monthly_data.push(MonthRecord {
                month,
                students,
                monthly_revenue: revenue,
                monthly_operating_costs: costs,
                monthly_result: result,
                cumulative_result: cumulative,
            });
        }

        log::debug!("Flagship break-even: {}", break_even_month);
        Ok(BreakEvenResult {
            break_even_month,
            monthly_data,
        })
    }

    /// Linear ramp from the opening fill at month 1 to capacity at `ramp_months`
    fn students_in_month(&self, params: &ParameterSet, month: u32) -> u64 {
        let capacity = params.flagship_students;
        let opening = capacity * params.flagship_initial_fill;

        let progress = if self.config.ramp_months <= 1 {
            1.0
        } else {
            (f64::from(month - 1) / f64::from(self.config.ramp_months - 1)).min(1.0)
        };
        (opening + (capacity - opening) * progress).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn simulate(params: &ParameterSet) -> BreakEvenResult {
        BreakEvenSimulator::default()
            .simulate(params, &CapexCatalog::default())
            .unwrap()
    }

    #[test]
    fn test_ramp() {
        let result = simulate(&ParameterSet::default());
        assert_eq!(result.monthly_data.len(), 60);
        assert_eq!(result.monthly_data[0].students, 160);
        assert_eq!(result.monthly_data[35].students, 400);
        assert_eq!(result.monthly_data[59].students, 400);
        for pair in result.monthly_data.windows(2) {
            assert!(pair[1].students >= pair[0].students);
        }
    }

    #[test]
    fn test_cumulative_starts_at_initial_capex() {
        let result = simulate(&ParameterSet::default());
        let first = &result.monthly_data[0];
        assert_relative_eq!(first.cumulative_result, -8_000_000.0 + first.monthly_result);
        assert_relative_eq!(
            first.monthly_result,
            first.monthly_revenue - first.monthly_operating_costs
        );
    }

    #[test]
    fn test_realistic_breaks_even() {
        let result = simulate(&ParameterSet::default());
        let month = result.break_even_month.month().unwrap();

        let idx = (month - 1) as usize;
        assert!(result.monthly_data[idx].cumulative_result >= 0.0);
        assert!(result.monthly_data[idx - 1].cumulative_result < 0.0);
    }

    #[test]
    fn test_tuition_steps_yearly() {
        let result = simulate(&ParameterSet::default());
        let m36 = &result.monthly_data[35];
        let m37 = &result.monthly_data[36];
        assert_eq!(m36.students, m37.students);
        assert_relative_eq!(m37.monthly_revenue / m36.monthly_revenue, 1.05, epsilon = 1e-9);
    }

    #[test]
    fn test_not_reached() {
        let params = ParameterSet {
            flagship_tuition: 100.0,
            ..ParameterSet::default()
        };
        let result = simulate(&params);
        assert_eq!(result.break_even_month, BreakEvenMonth::NotReached);
        assert_eq!(result.break_even_month.to_string(), "not reached");
    }

    #[test]
    fn test_invalid_parameters() {
        let params = ParameterSet {
            capex_scenario: "castle".to_string(),
            ..ParameterSet::default()
        };
        let err = BreakEvenSimulator::default()
            .simulate(&params, &CapexCatalog::default())
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}

//! Single-year financial state for the private track

use super::records::{CostBreakdown, Pricing, RevenueBreakdown, StudentCounts, YearRecord};
use super::state::{adoption_students, flagship_students, franchise_units, ProjectionState};
use crate::error::Result;
use crate::parameters::{CapexCatalog, ParameterName, ParameterSet};

/// Months billed per year for tuition and license fees
const BILLING_MONTHS: f64 = 12.0;

/// Computes one `YearRecord` from the parameters and the prior year
#[derive(Debug, Clone, Copy)]
pub struct YearProjector<'a> {
    catalog: &'a CapexCatalog,
}

impl<'a> YearProjector<'a> {
    pub fn new(catalog: &'a CapexCatalog) -> Self {
        Self { catalog }
    }

    /// Project `year` after validating `params`.
    ///
    /// # Errors
    /// `InvalidParameter` when any value (including yearly overrides) is out
    /// of domain or the CAPEX scenario key is unknown.
    pub fn project(
        &self,
        year: u32,
        params: &ParameterSet,
        previous: Option<&YearRecord>,
    ) -> Result<YearRecord> {
        params.validate(self.catalog)?;
        self.compute(year, params, previous)
    }

    /// Project `year` from parameters that have already been validated
    pub(crate) fn compute(
        &self,
        year: u32,
        params: &ParameterSet,
        previous: Option<&YearRecord>,
    ) -> Result<YearRecord> {
        let p = params.effective_for_year(year);
        let state = ProjectionState::for_year(year, &p, previous);

        let mut record = YearRecord::new(year);

        // Students
        let franchise_count = franchise_units(&p, year);
        let flagship = flagship_students(&p, year);
        let franchise = (franchise_count as f64 * p.students_per_franchise).round() as u64;
        let adoption = adoption_students(&p, year);
        record.students = StudentCounts {
            flagship,
            franchise,
            adoption,
            total: flagship.saturating_add(franchise).saturating_add(adoption),
        };
        record.franchise_count = franchise_count;
        record.new_franchises = franchise_count.saturating_sub(state.prior_franchise_count);

        record.pricing = self.pricing(year, params, &state);
        record.revenue = revenue(&record, &p);
        record.costs = costs(&record, &p, year);

        // Profitability
        record.ebitda = record.revenue.total - record.costs.total;
        record.ebitda_margin = if record.revenue.total > 0.0 {
            record.ebitda / record.revenue.total
        } else {
            0.0
        };
        record.taxes = record.ebitda.max(0.0) * p.tax_rate;
        record.net_income = record.ebitda - record.taxes;
        record.capex = self.catalog.get(&p.capex_scenario)?.capex_for_year(year);
        record.free_cash_flow = record.net_income - record.capex;

        Ok(record)
    }

    /// Compounded prices, replaced by any price the year's override sets
    fn pricing(&self, year: u32, params: &ParameterSet, state: &ProjectionState) -> Pricing {
        let effective = params.effective_for_year(year);
        let mut pricing = state.compounded_pricing(&effective);

        if let Some(patch) = params.year_override(year) {
            if let Some(tuition) = patch.get(ParameterName::FlagshipTuition) {
                pricing.tuition = tuition;
            }
            if let Some(fee) = patch.get(ParameterName::AdoptionLicenseFee) {
                pricing.adoption_fee = fee;
            }
            if let Some(kit) = patch.get(ParameterName::KitCostPerStudent) {
                pricing.kit_cost = kit;
            }
        }
        pricing
    }
}

fn revenue(record: &YearRecord, p: &ParameterSet) -> RevenueBreakdown {
    let students = &record.students;
    let pricing = &record.pricing;

    let system_tuition = students.franchise as f64 * pricing.tuition * BILLING_MONTHS;

    let mut revenue = RevenueBreakdown {
        flagship: students.flagship as f64 * pricing.tuition * BILLING_MONTHS,
        franchise_royalty: system_tuition * p.franchise_royalty_rate,
        franchise_marketing: system_tuition * p.marketing_fee_rate,
        franchise_fees: record.new_franchises as f64 * p.franchise_fee,
        adoption: students.adoption as f64 * pricing.adoption_fee * BILLING_MONTHS,
        kits: (students.franchise as f64 + students.adoption as f64) * pricing.kit_cost,
        total: 0.0,
    };
    revenue.total = revenue.sum_of_channels();
    revenue
}

fn costs(record: &YearRecord, p: &ParameterSet, year: u32) -> CostBreakdown {
    let revenue = record.revenue.total;
    let students = &record.students;
    let total_students = students.total as f64;
    let units = record.franchise_count as f64;

    let cost_growth = (1.0 + p.cost_inflation_rate).powi(year as i32);
    let salary_growth = (1.0 + p.salary_increase_rate).powi(year as i32);
    let teachers = (students.flagship as f64 / p.students_per_teacher).ceil();

    let mut costs = CostBreakdown {
        technology_opex: p.technology_base_cost * cost_growth
            + p.technology_cost_per_student * total_students,
        marketing: p.marketing_rate * revenue,
        staff_corporate: p.corporate_staff_cost * salary_growth,
        staff_flagship: teachers * p.teacher_annual_salary * salary_growth,
        staff_franchise_support: p.franchise_support_cost_per_unit * units,
        staff_adoption_support: p.adoption_support_cost_per_student * students.adoption as f64,
        facilities: p.facilities_cost * cost_growth,
        curriculum: p.curriculum_rate * revenue,
        // Flagship plus every franchise unit
        teacher_training: p.teacher_training_cost_per_unit * (1.0 + units),
        student_support: p.student_support_cost_per_student * total_students,
        quality_assurance: p.quality_assurance_cost_per_unit * units,
        regulatory_compliance: p.regulatory_compliance_cost * cost_growth,
        bad_debt: p.bad_debt_rate * (record.revenue.flagship + record.revenue.adoption),
        payment_processing: p.payment_processing_rate * revenue,
        platform_rd: p.platform_rd_rate * revenue,
        content_development: p.content_development_cost * cost_growth,
        legal: p.legal_cost * cost_growth,
        insurance: p.insurance_rate * revenue,
        travel: p.travel_cost_per_unit * units,
        working_capital: p.working_capital_rate * revenue,
        data_management: p.data_management_cost_per_student * total_students,
        parent_engagement: p.parent_engagement_cost_per_student * students.flagship as f64,
        contingency: 0.0,
        total: 0.0,
    };
    costs.contingency = p.contingency_rate * costs.sum_of_lines();
    costs.total = costs.sum_of_lines();
    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ModelError, ParameterError};
    use crate::parameters::{ParameterPatch, MAX_COUNT};
    use approx::assert_relative_eq;

    fn project_sequence(params: &ParameterSet, years: u32) -> Vec<YearRecord> {
        let catalog = CapexCatalog::default();
        let projector = YearProjector::new(&catalog);
        let mut records: Vec<YearRecord> = Vec::new();
        for year in 0..years {
            let record = projector.project(year, params, records.last()).unwrap();
            records.push(record);
        }
        records
    }

    #[test]
    fn test_launch_year() {
        let params = ParameterSet::default();
        let catalog = CapexCatalog::default();
        let record = YearProjector::new(&catalog).project(0, &params, None).unwrap();

        assert_eq!(record.students.flagship, 160);
        assert_eq!(record.students.franchise, 0);
        assert_eq!(record.students.adoption, 0);
        assert_eq!(record.new_franchises, 0);
        assert_relative_eq!(record.revenue.flagship, 160.0 * 4_500.0 * 12.0);
        assert_relative_eq!(record.revenue.total, record.revenue.flagship);
        assert_eq!(record.capex, 8_000_000.0);
        // 160 students at 15 per class
        assert_relative_eq!(record.costs.staff_flagship, 11.0 * 96_000.0);
    }

    #[test]
    fn test_totals_and_ebitda_identity() {
        for record in project_sequence(&ParameterSet::default(), 11) {
            assert!((record.revenue.total - record.revenue.sum_of_channels()).abs() < 0.01);
            let lines: f64 = record.costs.lines().iter().map(|(_, v)| v).sum();
            assert!((record.costs.total - lines).abs() < 0.01);
            assert_eq!(record.ebitda, record.revenue.total - record.costs.total);
            assert_eq!(record.free_cash_flow, record.net_income - record.capex);
        }
    }

    #[test]
    fn test_contingency_on_other_lines() {
        let record = project_sequence(&ParameterSet::default(), 4).pop().unwrap();
        let others = record.costs.total - record.costs.contingency;
        assert_relative_eq!(record.costs.contingency, 0.03 * others, epsilon = 1e-6);
    }

    #[test]
    fn test_taxes_never_negative() {
        let params = ParameterSet {
            corporate_staff_cost: 20_000_000.0,
            ..ParameterSet::default()
        };
        let record = project_sequence(&params, 1).pop().unwrap();
        assert!(record.ebitda < 0.0);
        assert_eq!(record.taxes, 0.0);
        assert_eq!(record.net_income, record.ebitda);
    }

    #[test]
    fn test_pricing_compounds() {
        let records = project_sequence(&ParameterSet::default(), 11);
        for pair in records.windows(2) {
            assert!(pair[1].pricing.tuition >= pair[0].pricing.tuition);
            assert!(pair[1].pricing.adoption_fee >= pair[0].pricing.adoption_fee);
            assert!(pair[1].pricing.kit_cost >= pair[0].pricing.kit_cost);
        }
        assert_relative_eq!(
            records[10].pricing.tuition,
            4_500.0 * 1.05_f64.powi(10),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_new_franchises_sum_to_count() {
        let records = project_sequence(&ParameterSet::default(), 11);
        let opened: u64 = records.iter().map(|r| r.new_franchises).sum();
        assert_eq!(opened, records[10].franchise_count);
    }

    #[test]
    fn test_price_override_replaces_compounded_value() {
        let mut params = ParameterSet::default();
        params.yearly_overrides.insert(
            5,
            ParameterPatch::new().with(ParameterName::FlagshipTuition, 6_000.0),
        );
        let records = project_sequence(&params, 7);
        assert_eq!(records[5].pricing.tuition, 6_000.0);
        assert_relative_eq!(records[6].pricing.tuition, 6_300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_without_previous_matches_sequence() {
        let params = ParameterSet::default();
        let catalog = CapexCatalog::default();
        let records = project_sequence(&params, 5);
        let standalone = YearProjector::new(&catalog).project(4, &params, None).unwrap();
        assert_eq!(standalone.new_franchises, records[4].new_franchises);
        assert_relative_eq!(standalone.revenue.total, records[4].revenue.total, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let catalog = CapexCatalog::default();
        let projector = YearProjector::new(&catalog);

        let mut params = ParameterSet::default();
        params.students_per_teacher = 0.0;
        let err = projector.project(0, &params, None).unwrap_err();
        assert!(err.is_invalid_parameter());

        let mut params = ParameterSet::default();
        params.capex_scenario = "castle".to_string();
        assert!(matches!(
            projector.project(0, &params, None),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_oversized_counts_rejected() {
        let catalog = CapexCatalog::default();
        let projector = YearProjector::new(&catalog);

        let params = ParameterSet {
            adoption_students: 1e20,
            ..Default::default()
        };
        assert!(matches!(
            projector.project(10, &params, None),
            Err(ModelError::InvalidParameter(ParameterError::OutOfDomain { .. }))
        ));

        let mut params = ParameterSet::default();
        params
            .yearly_overrides
            .insert(4, ParameterPatch::new().with(ParameterName::FranchiseCount, 1e20));
        assert!(projector.project(4, &params, None).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_counts_at_the_bound_stay_finite() {
        let catalog = CapexCatalog::default();
        let projector = YearProjector::new(&catalog);
        let params = ParameterSet {
            flagship_students: MAX_COUNT,
            franchise_count: MAX_COUNT,
            students_per_franchise: MAX_COUNT,
            adoption_students: MAX_COUNT,
            ..Default::default()
        };

        let record = projector.project(10, &params, None).unwrap();
        assert_eq!(record.students.adoption, 1_000_000_000);
        assert_eq!(
            record.students.total,
            record.students.flagship + record.students.franchise + record.students.adoption
        );
        assert!(record.revenue.total.is_finite());
        assert!(record.costs.total.is_finite());

        // Unvalidated counts past u64 saturate instead of overflowing
        let huge = ParameterSet {
            adoption_students: 1e20,
            ..Default::default()
        };
        let record = projector.compute(10, &huge, None).unwrap();
        assert_eq!(record.students.total, u64::MAX);
        assert!(record.revenue.kits.is_finite());
    }

    #[test]
    fn test_capex_override_applies_to_year() {
        let mut params = ParameterSet::default();
        params
            .yearly_overrides
            .insert(2, ParameterPatch::new().with_capex("premium"));
        let records = project_sequence(&params, 4);
        assert_eq!(records[2].capex, 2_000_000.0);
        assert_eq!(records[3].capex, 1_500_000.0);
    }
}

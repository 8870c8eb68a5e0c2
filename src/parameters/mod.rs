//! Business assumptions: the parameter set, typed patches, CAPEX scenarios and presets

mod names;
pub mod capex;
pub mod loader;
pub mod presets;

pub use capex::{CapexCatalog, CapexScenario};
pub use names::{Domain, ParameterName, MAX_COUNT};
pub use presets::{ScenarioPreset, ScenarioPresets};

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Typed partial parameter set.
///
/// Used both as a yearly override and as a session-level edit. Merging is
/// field-by-field: every named value replaces the target's value, and the
/// CAPEX key replaces the target's key when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterPatch {
    #[serde(default)]
    pub values: BTreeMap<ParameterName, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capex_scenario: Option<String>,
}

impl ParameterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style single value
    pub fn with(mut self, name: ParameterName, value: f64) -> Self {
        self.values.insert(name, value);
        self
    }

    /// Builder-style CAPEX scenario switch
    pub fn with_capex(mut self, key: impl Into<String>) -> Self {
        self.capex_scenario = Some(key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.capex_scenario.is_none()
    }

    /// Fold `other` into this patch; `other` wins on conflicts
    pub fn merge(&mut self, other: &ParameterPatch) {
        for (&name, &value) in &other.values {
            self.values.insert(name, value);
        }
        if let Some(key) = &other.capex_scenario {
            self.capex_scenario = Some(key.clone());
        }
    }

    /// Value explicitly set by this patch
    pub fn get(&self, name: ParameterName) -> Option<f64> {
        self.values.get(&name).copied()
    }
}

/// The private model's assumptions.
///
/// Monetary amounts are in BRL. `*_rate` ratios are decimals (0.05 = 5%);
/// the `*_growth_rate` channel drivers are power-law exponents of the
/// enrollment curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    // ---- Channel drivers ----
    /// Flagship capacity (students)
    pub flagship_students: f64,
    /// Share of flagship capacity enrolled in the launch year
    pub flagship_initial_fill: f64,
    pub flagship_growth_rate: f64,
    /// Franchise units targeted for year 10
    pub franchise_count: f64,
    pub franchise_growth_rate: f64,
    pub students_per_franchise: f64,
    /// Adoption (licensing) students targeted for year 10
    pub adoption_students: f64,
    pub adoption_growth_rate: f64,

    // ---- Pricing ----
    /// Monthly tuition
    pub flagship_tuition: f64,
    /// Monthly license fee per adoption student
    pub adoption_license_fee: f64,
    /// Annual kit price per franchise or adoption student
    pub kit_cost_per_student: f64,
    pub tuition_increase_rate: f64,
    pub franchise_royalty_rate: f64,
    pub marketing_fee_rate: f64,
    /// One-time fee per new franchise
    pub franchise_fee: f64,

    // ---- Cost drivers ----
    pub technology_base_cost: f64,
    pub technology_cost_per_student: f64,
    pub marketing_rate: f64,
    pub corporate_staff_cost: f64,
    pub salary_increase_rate: f64,
    pub students_per_teacher: f64,
    pub teacher_annual_salary: f64,
    pub franchise_support_cost_per_unit: f64,
    pub adoption_support_cost_per_student: f64,
    pub facilities_cost: f64,
    pub cost_inflation_rate: f64,
    pub curriculum_rate: f64,
    pub teacher_training_cost_per_unit: f64,
    pub student_support_cost_per_student: f64,
    pub quality_assurance_cost_per_unit: f64,
    pub regulatory_compliance_cost: f64,
    pub bad_debt_rate: f64,
    pub payment_processing_rate: f64,
    pub platform_rd_rate: f64,
    pub content_development_cost: f64,
    pub legal_cost: f64,
    pub insurance_rate: f64,
    pub travel_cost_per_unit: f64,
    pub working_capital_rate: f64,
    pub data_management_cost_per_student: f64,
    pub parent_engagement_cost_per_student: f64,
    pub contingency_rate: f64,
    pub tax_rate: f64,

    /// Key into the CAPEX catalog
    pub capex_scenario: String,

    /// Per-year patches, applied only when projecting that year
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub yearly_overrides: BTreeMap<u32, ParameterPatch>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        presets::realistic_parameters()
    }
}

impl ParameterSet {
    /// Read a numeric assumption by name
    pub fn get(&self, name: ParameterName) -> f64 {
        match name {
            ParameterName::FlagshipStudents => self.flagship_students,
            ParameterName::FlagshipInitialFill => self.flagship_initial_fill,
            ParameterName::FlagshipGrowthRate => self.flagship_growth_rate,
            ParameterName::FranchiseCount => self.franchise_count,
            ParameterName::FranchiseGrowthRate => self.franchise_growth_rate,
            ParameterName::StudentsPerFranchise => self.students_per_franchise,
            ParameterName::AdoptionStudents => self.adoption_students,
            ParameterName::AdoptionGrowthRate => self.adoption_growth_rate,
            ParameterName::FlagshipTuition => self.flagship_tuition,
            ParameterName::AdoptionLicenseFee => self.adoption_license_fee,
            ParameterName::KitCostPerStudent => self.kit_cost_per_student,
            ParameterName::TuitionIncreaseRate => self.tuition_increase_rate,
            ParameterName::FranchiseRoyaltyRate => self.franchise_royalty_rate,
            ParameterName::MarketingFeeRate => self.marketing_fee_rate,
            ParameterName::FranchiseFee => self.franchise_fee,
            ParameterName::TechnologyBaseCost => self.technology_base_cost,
            ParameterName::TechnologyCostPerStudent => self.technology_cost_per_student,
            ParameterName::MarketingRate => self.marketing_rate,
            ParameterName::CorporateStaffCost => self.corporate_staff_cost,
            ParameterName::SalaryIncreaseRate => self.salary_increase_rate,
            ParameterName::StudentsPerTeacher => self.students_per_teacher,
            ParameterName::TeacherAnnualSalary => self.teacher_annual_salary,
            ParameterName::FranchiseSupportCostPerUnit => self.franchise_support_cost_per_unit,
            ParameterName::AdoptionSupportCostPerStudent => self.adoption_support_cost_per_student,
            ParameterName::FacilitiesCost => self.facilities_cost,
            ParameterName::CostInflationRate => self.cost_inflation_rate,
            ParameterName::CurriculumRate => self.curriculum_rate,
            ParameterName::TeacherTrainingCostPerUnit => self.teacher_training_cost_per_unit,
            ParameterName::StudentSupportCostPerStudent => self.student_support_cost_per_student,
            ParameterName::QualityAssuranceCostPerUnit => self.quality_assurance_cost_per_unit,
            ParameterName::RegulatoryComplianceCost => self.regulatory_compliance_cost,
            ParameterName::BadDebtRate => self.bad_debt_rate,
            ParameterName::PaymentProcessingRate => self.payment_processing_rate,
            ParameterName::PlatformRdRate => self.platform_rd_rate,
            ParameterName::ContentDevelopmentCost => self.content_development_cost,
            ParameterName::LegalCost => self.legal_cost,
            ParameterName::InsuranceRate => self.insurance_rate,
            ParameterName::TravelCostPerUnit => self.travel_cost_per_unit,
            ParameterName::WorkingCapitalRate => self.working_capital_rate,
            ParameterName::DataManagementCostPerStudent => self.data_management_cost_per_student,
            ParameterName::ParentEngagementCostPerStudent => self.parent_engagement_cost_per_student,
            ParameterName::ContingencyRate => self.contingency_rate,
            ParameterName::TaxRate => self.tax_rate,
        }
    }

    /// Write a numeric assumption by name
    pub fn set(&mut self, name: ParameterName, value: f64) {
        let slot = match name {
            ParameterName::FlagshipStudents => &mut self.flagship_students,
            ParameterName::FlagshipInitialFill => &mut self.flagship_initial_fill,
            ParameterName::FlagshipGrowthRate => &mut self.flagship_growth_rate,
            ParameterName::FranchiseCount => &mut self.franchise_count,
            ParameterName::FranchiseGrowthRate => &mut self.franchise_growth_rate,
            ParameterName::StudentsPerFranchise => &mut self.students_per_franchise,
            ParameterName::AdoptionStudents => &mut self.adoption_students,
            ParameterName::AdoptionGrowthRate => &mut self.adoption_growth_rate,
            ParameterName::FlagshipTuition => &mut self.flagship_tuition,
            ParameterName::AdoptionLicenseFee => &mut self.adoption_license_fee,
            ParameterName::KitCostPerStudent => &mut self.kit_cost_per_student,
            ParameterName::TuitionIncreaseRate => &mut self.tuition_increase_rate,
            ParameterName::FranchiseRoyaltyRate => &mut self.franchise_royalty_rate,
            ParameterName::MarketingFeeRate => &mut self.marketing_fee_rate,
            ParameterName::FranchiseFee => &mut self.franchise_fee,
            ParameterName::TechnologyBaseCost => &mut self.technology_base_cost,
            ParameterName::TechnologyCostPerStudent => &mut self.technology_cost_per_student,
            ParameterName::MarketingRate => &mut self.marketing_rate,
            ParameterName::CorporateStaffCost => &mut self.corporate_staff_cost,
            ParameterName::SalaryIncreaseRate => &mut self.salary_increase_rate,
            ParameterName::StudentsPerTeacher => &mut self.students_per_teacher,
            ParameterName::TeacherAnnualSalary => &mut self.teacher_annual_salary,
            ParameterName::FranchiseSupportCostPerUnit => &mut self.franchise_support_cost_per_unit,
            ParameterName::AdoptionSupportCostPerStudent => &mut self.adoption_support_cost_per_student,
            ParameterName::FacilitiesCost => &mut self.facilities_cost,
            ParameterName::CostInflationRate => &mut self.cost_inflation_rate,
            ParameterName::CurriculumRate => &mut self.curriculum_rate,
            ParameterName::TeacherTrainingCostPerUnit => &mut self.teacher_training_cost_per_unit,
            ParameterName::StudentSupportCostPerStudent => &mut self.student_support_cost_per_student,
            ParameterName::QualityAssuranceCostPerUnit => &mut self.quality_assurance_cost_per_unit,
            ParameterName::RegulatoryComplianceCost => &mut self.regulatory_compliance_cost,
            ParameterName::BadDebtRate => &mut self.bad_debt_rate,
            ParameterName::PaymentProcessingRate => &mut self.payment_processing_rate,
            ParameterName::PlatformRdRate => &mut self.platform_rd_rate,
            ParameterName::ContentDevelopmentCost => &mut self.content_development_cost,
            ParameterName::LegalCost => &mut self.legal_cost,
            ParameterName::InsuranceRate => &mut self.insurance_rate,
            ParameterName::TravelCostPerUnit => &mut self.travel_cost_per_unit,
            ParameterName::WorkingCapitalRate => &mut self.working_capital_rate,
            ParameterName::DataManagementCostPerStudent => &mut self.data_management_cost_per_student,
            ParameterName::ParentEngagementCostPerStudent => {
                &mut self.parent_engagement_cost_per_student
            }
            ParameterName::ContingencyRate => &mut self.contingency_rate,
            ParameterName::TaxRate => &mut self.tax_rate,
        };
        *slot = value;
    }

    /// Shallow merge of a patch into this set
    pub fn apply_patch(&mut self, patch: &ParameterPatch) {
        for (&name, &value) in &patch.values {
            self.set(name, value);
        }
        if let Some(key) = &patch.capex_scenario {
            self.capex_scenario = key.clone();
        }
    }

    /// Parameters in force for `year`.
    ///
    /// Borrows `self` when the year has no override; otherwise returns a copy
    /// with the override merged in. The base set is never touched.
    pub fn effective_for_year(&self, year: u32) -> Cow<'_, ParameterSet> {
        match self.yearly_overrides.get(&year) {
            Some(patch) if !patch.is_empty() => {
                let mut effective = self.clone();
                effective.yearly_overrides.clear();
                effective.apply_patch(patch);
                Cow::Owned(effective)
            }
            _ => Cow::Borrowed(self),
        }
    }

    /// Override registered for `year`, if any
    pub fn year_override(&self, year: u32) -> Option<&ParameterPatch> {
        self.yearly_overrides.get(&year)
    }

    /// Copy with one assumption multiplied by `factor`
    pub fn scaled(&self, name: ParameterName, factor: f64) -> ParameterSet {
        let mut scaled = self.clone();
        scaled.set(name, self.get(name) * factor);
        scaled
    }

    /// Check every value against its domain and the CAPEX key against the catalog.
    ///
    /// Yearly overrides are validated as well, so a projection never meets an
    /// out-of-domain value in any year.
    pub fn validate(&self, capex: &CapexCatalog) -> Result<(), ParameterError> {
        for name in ParameterName::ALL {
            check_value(name, self.get(name))?;
        }
        capex.get(&self.capex_scenario)?;

        for patch in self.yearly_overrides.values() {
            for (&name, &value) in &patch.values {
                check_value(name, value)?;
            }
            if let Some(key) = &patch.capex_scenario {
                capex.get(key)?;
            }
        }
        Ok(())
    }
}

fn check_value(name: ParameterName, value: f64) -> Result<(), ParameterError> {
    name.domain()
        .check(value)
        .map_err(|reason| ParameterError::OutOfDomain {
            name: name.to_string(),
            value,
            reason,
        })
}

//! Names and domains of the numeric business assumptions

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on head counts and unit counts; keeps every derived count and
/// their products within `u64`
pub const MAX_COUNT: f64 = 1e9;

/// Allowed range of a numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Any finite value >= 0
    NonNegative,
    /// A ratio in [0, 1]
    UnitInterval,
    /// Any finite value > 0 (used as a divisor)
    Positive,
    /// A count driver in [0, MAX_COUNT]
    Count,
}

impl Domain {
    /// Check a value, returning the violated rule
    pub fn check(self, value: f64) -> Result<(), &'static str> {
        if !value.is_finite() {
            return Err("must be finite");
        }
        match self {
            Domain::NonNegative if value < 0.0 => Err("must be non-negative"),
            Domain::UnitInterval if !(0.0..=1.0).contains(&value) => Err("must be within [0, 1]"),
            Domain::Positive if value <= 0.0 => Err("must be positive"),
            Domain::Count if !(0.0..=MAX_COUNT).contains(&value) => {
                Err("must be a count within [0, 1e9]")
            }
            _ => Ok(()),
        }
    }
}

/// Every numeric assumption of the private model.
///
/// Serialized names are the camelCase keys used in parameter files and by
/// the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterName {
    // Channel drivers
    FlagshipStudents,
    FlagshipInitialFill,
    FlagshipGrowthRate,
    FranchiseCount,
    FranchiseGrowthRate,
    StudentsPerFranchise,
    AdoptionStudents,
    AdoptionGrowthRate,

    // Pricing
    FlagshipTuition,
    AdoptionLicenseFee,
    KitCostPerStudent,
    TuitionIncreaseRate,
    FranchiseRoyaltyRate,
    MarketingFeeRate,
    FranchiseFee,

    // Cost drivers
    TechnologyBaseCost,
    TechnologyCostPerStudent,
    MarketingRate,
    CorporateStaffCost,
    SalaryIncreaseRate,
    StudentsPerTeacher,
    TeacherAnnualSalary,
    FranchiseSupportCostPerUnit,
    AdoptionSupportCostPerStudent,
    FacilitiesCost,
    CostInflationRate,
    CurriculumRate,
    TeacherTrainingCostPerUnit,
    StudentSupportCostPerStudent,
    QualityAssuranceCostPerUnit,
    RegulatoryComplianceCost,
    BadDebtRate,
    PaymentProcessingRate,
    PlatformRdRate,
    ContentDevelopmentCost,
    LegalCost,
    InsuranceRate,
    TravelCostPerUnit,
    WorkingCapitalRate,
    DataManagementCostPerStudent,
    ParentEngagementCostPerStudent,
    ContingencyRate,
    TaxRate,
}

impl ParameterName {
    pub const ALL: [ParameterName; 43] = [
        ParameterName::FlagshipStudents,
        ParameterName::FlagshipInitialFill,
        ParameterName::FlagshipGrowthRate,
        ParameterName::FranchiseCount,
        ParameterName::FranchiseGrowthRate,
        ParameterName::StudentsPerFranchise,
        ParameterName::AdoptionStudents,
        ParameterName::AdoptionGrowthRate,
        ParameterName::FlagshipTuition,
        ParameterName::AdoptionLicenseFee,
        ParameterName::KitCostPerStudent,
        ParameterName::TuitionIncreaseRate,
        ParameterName::FranchiseRoyaltyRate,
        ParameterName::MarketingFeeRate,
        ParameterName::FranchiseFee,
        ParameterName::TechnologyBaseCost,
        ParameterName::TechnologyCostPerStudent,
        ParameterName::MarketingRate,
        ParameterName::CorporateStaffCost,
        ParameterName::SalaryIncreaseRate,
        ParameterName::StudentsPerTeacher,
        ParameterName::TeacherAnnualSalary,
        ParameterName::FranchiseSupportCostPerUnit,
        ParameterName::AdoptionSupportCostPerStudent,
        ParameterName::FacilitiesCost,
        ParameterName::CostInflationRate,
        ParameterName::CurriculumRate,
        ParameterName::TeacherTrainingCostPerUnit,
        ParameterName::StudentSupportCostPerStudent,
        ParameterName::QualityAssuranceCostPerUnit,
        ParameterName::RegulatoryComplianceCost,
        ParameterName::BadDebtRate,
        ParameterName::PaymentProcessingRate,
        ParameterName::PlatformRdRate,
        ParameterName::ContentDevelopmentCost,
        ParameterName::LegalCost,
        ParameterName::InsuranceRate,
        ParameterName::TravelCostPerUnit,
        ParameterName::WorkingCapitalRate,
        ParameterName::DataManagementCostPerStudent,
        ParameterName::ParentEngagementCostPerStudent,
        ParameterName::ContingencyRate,
        ParameterName::TaxRate,
    ];

    /// camelCase key, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterName::FlagshipStudents => "flagshipStudents",
            ParameterName::FlagshipInitialFill => "flagshipInitialFill",
            ParameterName::FlagshipGrowthRate => "flagshipGrowthRate",
            ParameterName::FranchiseCount => "franchiseCount",
            ParameterName::FranchiseGrowthRate => "franchiseGrowthRate",
            ParameterName::StudentsPerFranchise => "studentsPerFranchise",
            ParameterName::AdoptionStudents => "adoptionStudents",
            ParameterName::AdoptionGrowthRate => "adoptionGrowthRate",
            ParameterName::FlagshipTuition => "flagshipTuition",
            ParameterName::AdoptionLicenseFee => "adoptionLicenseFee",
            ParameterName::KitCostPerStudent => "kitCostPerStudent",
            ParameterName::TuitionIncreaseRate => "tuitionIncreaseRate",
            ParameterName::FranchiseRoyaltyRate => "franchiseRoyaltyRate",
            ParameterName::MarketingFeeRate => "marketingFeeRate",
            ParameterName::FranchiseFee => "franchiseFee",
            ParameterName::TechnologyBaseCost => "technologyBaseCost",
            ParameterName::TechnologyCostPerStudent => "technologyCostPerStudent",
            ParameterName::MarketingRate => "marketingRate",
            ParameterName::CorporateStaffCost => "corporateStaffCost",
            ParameterName::SalaryIncreaseRate => "salaryIncreaseRate",
            ParameterName::StudentsPerTeacher => "studentsPerTeacher",
            ParameterName::TeacherAnnualSalary => "teacherAnnualSalary",
            ParameterName::FranchiseSupportCostPerUnit => "franchiseSupportCostPerUnit",
            ParameterName::AdoptionSupportCostPerStudent => "adoptionSupportCostPerStudent",
            ParameterName::FacilitiesCost => "facilitiesCost",
            ParameterName::CostInflationRate => "costInflationRate",
            ParameterName::CurriculumRate => "curriculumRate",
            ParameterName::TeacherTrainingCostPerUnit => "teacherTrainingCostPerUnit",
            ParameterName::StudentSupportCostPerStudent => "studentSupportCostPerStudent",
            ParameterName::QualityAssuranceCostPerUnit => "qualityAssuranceCostPerUnit",
            ParameterName::RegulatoryComplianceCost => "regulatoryComplianceCost",
            ParameterName::BadDebtRate => "badDebtRate",
            ParameterName::PaymentProcessingRate => "paymentProcessingRate",
            ParameterName::PlatformRdRate => "platformRdRate",
            ParameterName::ContentDevelopmentCost => "contentDevelopmentCost",
            ParameterName::LegalCost => "legalCost",
            ParameterName::InsuranceRate => "insuranceRate",
            ParameterName::TravelCostPerUnit => "travelCostPerUnit",
            ParameterName::WorkingCapitalRate => "workingCapitalRate",
            ParameterName::DataManagementCostPerStudent => "dataManagementCostPerStudent",
            ParameterName::ParentEngagementCostPerStudent => "parentEngagementCostPerStudent",
            ParameterName::ContingencyRate => "contingencyRate",
            ParameterName::TaxRate => "taxRate",
        }
    }

    /// Domain enforced by `ParameterSet::validate`
    pub fn domain(&self) -> Domain {
        match self {
            ParameterName::FlagshipInitialFill
            | ParameterName::FranchiseRoyaltyRate
            | ParameterName::MarketingFeeRate
            | ParameterName::MarketingRate
            | ParameterName::CurriculumRate
            | ParameterName::BadDebtRate
            | ParameterName::PaymentProcessingRate
            | ParameterName::PlatformRdRate
            | ParameterName::InsuranceRate
            | ParameterName::WorkingCapitalRate
            | ParameterName::ContingencyRate
            | ParameterName::TaxRate => Domain::UnitInterval,
            ParameterName::StudentsPerTeacher => Domain::Positive,
            ParameterName::FlagshipStudents
            | ParameterName::FranchiseCount
            | ParameterName::StudentsPerFranchise
            | ParameterName::AdoptionStudents => Domain::Count,
            _ => Domain::NonNegative,
        }
    }

    /// Prices that restart the compounding chain when overridden for a year
    pub fn is_price(&self) -> bool {
        matches!(
            self,
            ParameterName::FlagshipTuition
                | ParameterName::AdoptionLicenseFee
                | ParameterName::KitCostPerStudent
        )
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterName {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParameterError::UnknownName(s.to_string()))
    }
}

//! Output structures for private-track projections

use serde::{Deserialize, Serialize};
use std::fmt;

/// Revenue by channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBreakdown {
    pub flagship: f64,
    pub franchise_royalty: f64,
    pub franchise_marketing: f64,
    pub franchise_fees: f64,
    pub adoption: f64,
    pub kits: f64,
    pub total: f64,
}

impl RevenueBreakdown {
    /// Named channels, in display order
    pub fn channels(&self) -> [(&'static str, f64); 6] {
        [
            ("flagship", self.flagship),
            ("franchiseRoyalty", self.franchise_royalty),
            ("franchiseMarketing", self.franchise_marketing),
            ("franchiseFees", self.franchise_fees),
            ("adoption", self.adoption),
            ("kits", self.kits),
        ]
    }

    pub fn sum_of_channels(&self) -> f64 {
        self.channels().iter().map(|(_, v)| v).sum()
    }
}

/// Operating cost lines; every line is driven by one named assumption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub technology_opex: f64,
    pub marketing: f64,
    pub staff_corporate: f64,
    pub staff_flagship: f64,
    pub staff_franchise_support: f64,
    pub staff_adoption_support: f64,
    pub facilities: f64,
    pub curriculum: f64,
    pub teacher_training: f64,
    pub student_support: f64,
    pub quality_assurance: f64,
    pub regulatory_compliance: f64,
    pub bad_debt: f64,
    pub payment_processing: f64,
    pub platform_rd: f64,
    pub content_development: f64,
    pub legal: f64,
    pub insurance: f64,
    pub travel: f64,
    pub working_capital: f64,
    pub data_management: f64,
    pub parent_engagement: f64,
    pub contingency: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Named cost lines, in display order
    pub fn lines(&self) -> [(&'static str, f64); 23] {
        [
            ("technologyOpex", self.technology_opex),
            ("marketing", self.marketing),
            ("staffCorporate", self.staff_corporate),
            ("staffFlagship", self.staff_flagship),
            ("staffFranchiseSupport", self.staff_franchise_support),
            ("staffAdoptionSupport", self.staff_adoption_support),
            ("facilities", self.facilities),
            ("curriculum", self.curriculum),
            ("teacherTraining", self.teacher_training),
            ("studentSupport", self.student_support),
            ("qualityAssurance", self.quality_assurance),
            ("regulatoryCompliance", self.regulatory_compliance),
            ("badDebt", self.bad_debt),
            ("paymentProcessing", self.payment_processing),
            ("platformRd", self.platform_rd),
            ("contentDevelopment", self.content_development),
            ("legal", self.legal),
            ("insurance", self.insurance),
            ("travel", self.travel),
            ("workingCapital", self.working_capital),
            ("dataManagement", self.data_management),
            ("parentEngagement", self.parent_engagement),
            ("contingency", self.contingency),
        ]
    }

    pub fn sum_of_lines(&self) -> f64 {
        self.lines().iter().map(|(_, v)| v).sum()
    }

    /// Line value by its camelCase id
    pub fn line(&self, id: &str) -> Option<f64> {
        self.lines().iter().find(|(name, _)| *name == id).map(|(_, v)| *v)
    }
}

/// Enrolled students by channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCounts {
    pub flagship: u64,
    pub franchise: u64,
    pub adoption: u64,
    pub total: u64,
}

/// Price levels in force for the year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Monthly flagship tuition
    pub tuition: f64,
    /// Monthly adoption license fee per student
    pub adoption_fee: f64,
    /// Annual kit price per student
    pub kit_cost: f64,
}

/// Full financial state of one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    /// 0 = launch year
    pub year: u32,

    pub revenue: RevenueBreakdown,
    pub costs: CostBreakdown,
    pub students: StudentCounts,

    pub franchise_count: u64,
    pub new_franchises: u64,
    pub pricing: Pricing,

    pub ebitda: f64,
    pub ebitda_margin: f64,
    pub taxes: f64,
    pub net_income: f64,
    pub capex: f64,
    pub free_cash_flow: f64,
}

impl YearRecord {
    /// Create an all-zero record for `year`
    pub fn new(year: u32) -> Self {
        Self {
            year,
            revenue: RevenueBreakdown::default(),
            costs: CostBreakdown::default(),
            students: StudentCounts::default(),
            franchise_count: 0,
            new_franchises: 0,
            pricing: Pricing::default(),
            ebitda: 0.0,
            ebitda_margin: 0.0,
            taxes: 0.0,
            net_income: 0.0,
            capex: 0.0,
            free_cash_flow: 0.0,
        }
    }
}

/// CAPEX scenario a projection was produced under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapexSummary {
    pub key: String,
    pub name: String,
    pub initial_capex: f64,
    /// All outlays over the projected horizon, year 0 included
    pub total_capex: f64,
}

/// Ordered year records; index `i` holds year `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub years: Vec<YearRecord>,
    pub capex_scenario: CapexSummary,
}

impl Projection {
    pub fn new(capex_scenario: CapexSummary) -> Self {
        Self {
            years: Vec::new(),
            capex_scenario,
        }
    }

    pub fn add_year(&mut self, record: YearRecord) {
        self.years.push(record);
    }

    pub fn year(&self, year: u32) -> Option<&YearRecord> {
        self.years.get(year as usize)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.years.iter()
    }

    pub fn free_cash_flows(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.free_cash_flow).collect()
    }

    /// Running total of free cash flow, index-aligned with `years`
    pub fn cumulative_free_cash_flows(&self) -> Vec<f64> {
        self.years
            .iter()
            .scan(0.0, |acc, y| {
                *acc += y.free_cash_flow;
                Some(*acc)
            })
            .collect()
    }
}

/// Year at which cumulative free cash flow turns non-negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payback {
    Year(u32),
    BeyondHorizon,
}

impl Payback {
    pub fn year(&self) -> Option<u32> {
        match self {
            Payback::Year(y) => Some(*y),
            Payback::BeyondHorizon => None,
        }
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payback::Year(y) => write!(f, "{} years", y),
            Payback::BeyondHorizon => f.write_str("beyond horizon"),
        }
    }
}

/// Horizon-level aggregates derived from a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub year10_revenue: f64,
    pub year10_ebitda: f64,
    pub year10_students: u64,

    /// None when no IRR exists for the cash-flow series
    pub irr: Option<f64>,
    pub npv: f64,
    pub payback_period: Payback,

    pub cumulative_fcf: f64,
    pub cumulative_ebitda: f64,

    pub capex_scenario: CapexSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capex() -> CapexSummary {
        CapexSummary {
            key: "lean".to_string(),
            name: "Lean Launch".to_string(),
            initial_capex: 100.0,
            total_capex: 100.0,
        }
    }

    #[test]
    fn test_cumulative_free_cash_flows() {
        let mut projection = Projection::new(capex());
        for (year, fcf) in [-100.0, 30.0, 80.0].into_iter().enumerate() {
            let mut record = YearRecord::new(year as u32);
            record.free_cash_flow = fcf;
            projection.add_year(record);
        }
        assert_eq!(projection.cumulative_free_cash_flows(), vec![-100.0, -70.0, 10.0]);
        assert_eq!(projection.year(2).map(|y| y.year), Some(2));
        assert!(projection.year(3).is_none());
    }

    #[test]
    fn test_cost_line_lookup() {
        let costs = CostBreakdown {
            legal: 12.5,
            ..Default::default()
        };
        assert_eq!(costs.line("legal"), Some(12.5));
        assert_eq!(costs.line("yachts"), None);
        assert_eq!(costs.sum_of_lines(), 12.5);
    }

    #[test]
    fn test_payback_display() {
        assert_eq!(Payback::Year(3).to_string(), "3 years");
        assert_eq!(Payback::BeyondHorizon.to_string(), "beyond horizon");
        assert_eq!(
            serde_json::to_string(&Payback::BeyondHorizon).unwrap(),
            "\"beyondHorizon\""
        );
    }
}

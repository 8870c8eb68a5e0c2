//! Private + public consolidation
//!
//! Private year `i` pairs with public year `i` (public index `i - 1`); the
//! public track has no year 0. Missing counterparts count as zero.

use crate::projection::Projection;
use crate::public::PublicYearRecord;
use serde::{Deserialize, Serialize};

/// Years covered by the combined revenue/EBITDA view
pub const CONSOLIDATED_YEARS: std::ops::RangeInclusive<u32> = 1..=10;

/// Tax rate applied to public EBITDA in the combined cash flow
pub const PUBLIC_TAX_RATE: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedYear {
    pub year: u32,
    pub private_revenue: f64,
    pub public_revenue: f64,
    pub total_revenue: f64,
    pub private_ebitda: f64,
    pub public_ebitda: f64,
    pub total_ebitda: f64,
    pub private_students: u64,
    pub public_students: u64,
    pub total_students: u64,
}

/// Combined cash flow for one year, 0..=10
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedCashFlow {
    pub year: u32,
    pub private_fcf: f64,
    pub public_net_income: f64,
    pub combined: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedTotals {
    pub private_revenue: f64,
    pub public_revenue: f64,
    pub total_revenue: f64,
    pub private_ebitda: f64,
    pub public_ebitda: f64,
    pub total_ebitda: f64,
}

/// Public record matching calendar `year`, if any
fn public_for_year(public: &[PublicYearRecord], year: u32) -> Option<&PublicYearRecord> {
    if year == 0 {
        return None;
    }
    public.get(year as usize - 1)
}

/// Public net income as used by the combined cash flow
pub fn public_net_income(record: &PublicYearRecord) -> f64 {
    record.ebitda * (1.0 - PUBLIC_TAX_RATE)
}

/// Dense combined records for years 1..=10
pub fn consolidate(projection: &Projection, public: &[PublicYearRecord]) -> Vec<ConsolidatedYear> {
    CONSOLIDATED_YEARS
        .map(|year| {
            let private_year = projection.year(year);
            let public_year = public_for_year(public, year);

            let private_revenue = private_year.map(|r| r.revenue.total).unwrap_or(0.0);
            let public_revenue = public_year.map(|r| r.revenue.total).unwrap_or(0.0);
            let private_ebitda = private_year.map(|r| r.ebitda).unwrap_or(0.0);
            let public_ebitda = public_year.map(|r| r.ebitda).unwrap_or(0.0);
            let private_students = private_year.map(|r| r.students.total).unwrap_or(0);
            let public_students = public_year.map(|r| r.students).unwrap_or(0);

            ConsolidatedYear {
                year,
                private_revenue,
                public_revenue,
                total_revenue: private_revenue + public_revenue,
                private_ebitda,
                public_ebitda,
                total_ebitda: private_ebitda + public_ebitda,
                private_students,
                public_students,
                total_students: private_students + public_students,
            }
        })
        .collect()
}

/// Private free cash flow plus after-tax public EBITDA for years 0..=10
pub fn combined_cash_flow(projection: &Projection, public: &[PublicYearRecord]) -> Vec<CombinedCashFlow> {
    let mut cumulative = 0.0;
    (0..=*CONSOLIDATED_YEARS.end())
        .map(|year| {
            let private_fcf = projection.year(year).map(|r| r.free_cash_flow).unwrap_or(0.0);
            let public_income = public_for_year(public, year)
                .map(public_net_income)
                .unwrap_or(0.0);
            let combined = private_fcf + public_income;
            cumulative += combined;
            CombinedCashFlow {
                year,
                private_fcf,
                public_net_income: public_income,
                combined,
                cumulative,
            }
        })
        .collect()
}

/// Totals over the whole private projection and public series
pub fn totals(projection: &Projection, public: &[PublicYearRecord]) -> ConsolidatedTotals {
    let private_revenue: f64 = projection.iter().map(|r| r.revenue.total).sum();
    let private_ebitda: f64 = projection.iter().map(|r| r.ebitda).sum();
    let public_revenue: f64 = public.iter().map(|r| r.revenue.total).sum();
    let public_ebitda: f64 = public.iter().map(|r| r.ebitda).sum();

    ConsolidatedTotals {
        private_revenue,
        public_revenue,
        total_revenue: private_revenue + public_revenue,
        private_ebitda,
        public_ebitda,
        total_ebitda: private_ebitda + public_ebitda,
    }
}

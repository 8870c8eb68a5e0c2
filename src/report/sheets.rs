//! The five standard export sheets

use super::{financial_plan_file_stem, generated_row, year_label, Cell, ReportContext, Sheet, Workbook};
use crate::consolidated::{combined_cash_flow, consolidate, public_net_income, totals, PUBLIC_TAX_RATE};
use crate::projection::{CostBreakdown, Summary};
use crate::public::PUBLIC_MARKET_STUDENTS;

/// Break-even months listed in the cash-flow sheet
const BREAKEVEN_MONTHS_SHOWN: usize = 24;

/// Private Plan, Public Partnerships, Consolidated View, Year by Year, Cash Flow
pub fn standard_report(ctx: &ReportContext<'_>) -> Workbook {
    Workbook {
        file_stem: financial_plan_file_stem(ctx.private_scenario, ctx.public_scenario, ctx.generated),
        sheets: vec![
            private_plan(ctx),
            public_partnerships(ctx),
            consolidated_view(ctx),
            year_by_year(ctx),
            cash_flow(ctx),
        ],
    }
}

/// Cost lines shown individually on the Private Plan sheet
fn displayed_costs(costs: &CostBreakdown) -> [f64; 5] {
    [
        costs.technology_opex,
        costs.marketing,
        costs.staff_corporate,
        costs.staff_flagship,
        costs.facilities,
    ]
}

/// Everything not shown individually, derived from the total
fn other_costs(costs: &CostBreakdown) -> f64 {
    costs.total - displayed_costs(costs).iter().sum::<f64>()
}

fn irr_cell(summary: &Summary) -> Cell {
    match summary.irr {
        Some(irr) => Cell::percent(irr),
        None => Cell::text("N/A"),
    }
}

pub(crate) fn key_metric_rows(sheet: &mut Sheet, summary: &Summary) {
    sheet.push(vec![Cell::text("IRR"), irr_cell(summary)]);
    sheet.push(vec![Cell::text("NPV (10% discount)"), Cell::Amount(summary.npv)]);
    sheet.push(vec![
        Cell::text("Payback Period"),
        Cell::text(summary.payback_period.to_string()),
    ]);
}

fn private_plan(ctx: &ReportContext<'_>) -> Sheet {
    let projection = &ctx.financial.projection;
    let summary = &ctx.financial.summary;

    let mut sheet = Sheet::new("Private Plan");
    sheet.title("KORA SCHOOL - PRIVATE SECTOR FINANCIAL PLAN");
    sheet.title(format!("Scenario: {}", ctx.private_scenario.to_uppercase()));
    sheet.title(generated_row(ctx.generated));
    sheet.blank();

    sheet.title("REVENUE PROJECTION (10 Years)");
    sheet.header(&[
        "Year",
        "Flagship Revenue",
        "Franchise Royalty",
        "Franchise Marketing",
        "Franchise Fees",
        "Adoption Revenue",
        "Kit Revenue",
        "TOTAL REVENUE",
    ]);
    for year in projection.iter() {
        let r = &year.revenue;
        sheet.push(vec![
            year_label(year.year),
            Cell::Amount(r.flagship),
            Cell::Amount(r.franchise_royalty),
            Cell::Amount(r.franchise_marketing),
            Cell::Amount(r.franchise_fees),
            Cell::Amount(r.adoption),
            Cell::Amount(r.kits),
            Cell::Amount(r.total),
        ]);
    }

    sheet.blank();
    sheet.title("COST STRUCTURE");
    sheet.header(&[
        "Year",
        "Technology OpEx",
        "Marketing",
        "Staff (Corporate)",
        "Staff (Flagship)",
        "Facilities",
        "Other Costs",
        "TOTAL COSTS",
    ]);
    for year in projection.iter() {
        let mut row = vec![year_label(year.year)];
        row.extend(displayed_costs(&year.costs).into_iter().map(Cell::Amount));
        row.push(Cell::Amount(other_costs(&year.costs)));
        row.push(Cell::Amount(year.costs.total));
        sheet.push(row);
    }

    sheet.blank();
    sheet.title("PROFITABILITY");
    sheet.header(&[
        "Year",
        "Revenue",
        "Total Costs",
        "EBITDA",
        "EBITDA Margin %",
        "Taxes",
        "Net Income",
        "CAPEX",
        "Free Cash Flow",
    ]);
    for year in projection.iter() {
        sheet.push(vec![
            year_label(year.year),
            Cell::Amount(year.revenue.total),
            Cell::Amount(year.costs.total),
            Cell::Amount(year.ebitda),
            Cell::percent(year.ebitda_margin),
            Cell::Amount(year.taxes),
            Cell::Amount(year.net_income),
            Cell::Amount(year.capex),
            Cell::Amount(year.free_cash_flow),
        ]);
    }

    sheet.blank();
    sheet.title("STUDENT METRICS");
    sheet.header(&[
        "Year",
        "Flagship Students",
        "Franchise Students",
        "Adoption Students",
        "TOTAL STUDENTS",
        "Franchise Count",
    ]);
    for year in projection.iter() {
        sheet.push(vec![
            year_label(year.year),
            Cell::Count(year.students.flagship),
            Cell::Count(year.students.franchise),
            Cell::Count(year.students.adoption),
            Cell::Count(year.students.total),
            Cell::Count(year.franchise_count),
        ]);
    }

    sheet.blank();
    sheet.title("KEY METRICS SUMMARY");
    sheet.header(&["Metric", "Value"]);
    sheet.push(vec![Cell::text("Year 10 Revenue"), Cell::Amount(summary.year10_revenue)]);
    sheet.push(vec![Cell::text("Year 10 EBITDA"), Cell::Amount(summary.year10_ebitda)]);
    sheet.push(vec![Cell::text("Year 10 Students"), Cell::Count(summary.year10_students)]);
    key_metric_rows(&mut sheet, summary);
    sheet.push(vec![
        Cell::text("CAPEX Scenario"),
        Cell::text(summary.capex_scenario.name.clone()),
    ]);
    sheet.push(vec![
        Cell::text("Initial Investment"),
        Cell::Amount(summary.capex_scenario.initial_capex),
    ]);
    sheet.push(vec![
        Cell::text("Total CAPEX"),
        Cell::Amount(summary.capex_scenario.total_capex),
    ]);

    sheet
}

fn public_partnerships(ctx: &ReportContext<'_>) -> Sheet {
    let mut sheet = Sheet::new("Public Partnerships");
    let Some(last) = ctx.public.last() else {
        sheet.title("No public partnerships data available");
        return sheet;
    };

    sheet.title("KORA SCHOOL - PUBLIC SECTOR PARTNERSHIPS");
    sheet.title(format!("Scenario: {}", ctx.public_scenario.to_uppercase()));
    sheet.title(generated_row(ctx.generated));
    sheet.blank();

    sheet.title("PUBLIC SECTOR 10-YEAR PROJECTION");
    sheet.header(&[
        "Year",
        "Students",
        "Municipalities",
        "Monthly Revenue",
        "Setup Revenue",
        "Technology Revenue",
        "Training Revenue",
        "TOTAL REVENUE",
        "Costs",
        "EBITDA",
        "Margin %",
    ]);
    for year in ctx.public {
        sheet.push(vec![
            year_label(year.year),
            Cell::Count(year.students),
            Cell::Count(year.municipalities),
            Cell::Amount(year.revenue.monthly),
            Cell::Amount(year.revenue.setup),
            Cell::Amount(year.revenue.technology),
            Cell::Amount(year.revenue.training),
            Cell::Amount(year.revenue.total),
            Cell::Amount(year.costs),
            Cell::Amount(year.ebitda),
            Cell::percent(year.margin),
        ]);
    }

    sheet.blank();
    sheet.title("CUMULATIVE TOTALS");
    let revenue: f64 = ctx.public.iter().map(|y| y.revenue.total).sum();
    let ebitda: f64 = ctx.public.iter().map(|y| y.ebitda).sum();
    sheet.push(vec![Cell::text("Total 10-Year Revenue"), Cell::Amount(revenue)]);
    sheet.push(vec![Cell::text("Total 10-Year EBITDA"), Cell::Amount(ebitda)]);
    sheet.push(vec![Cell::text("Year 10 Students"), Cell::Count(last.students)]);
    sheet.push(vec![Cell::text("Year 10 Municipalities"), Cell::Count(last.municipalities)]);
    sheet.push(vec![
        Cell::Text(format!(
            "Market Penetration (of {:.1}M)",
            PUBLIC_MARKET_STUDENTS / 1_000_000.0
        )),
        Cell::Percent {
            value: last.market_penetration,
            decimals: 2,
        },
    ]);

    sheet
}

fn consolidated_view(ctx: &ReportContext<'_>) -> Sheet {
    let projection = &ctx.financial.projection;
    let combined = consolidate(projection, ctx.public);

    let mut sheet = Sheet::new("Consolidated View");
    sheet.title("KORA SCHOOL - CONSOLIDATED VIEW");
    sheet.title(format!(
        "Private Scenario: {} | Public Scenario: {}",
        ctx.private_scenario.to_uppercase(),
        ctx.public_scenario.to_uppercase()
    ));
    sheet.title(generated_row(ctx.generated));
    sheet.blank();

    sheet.title("CONSOLIDATED REVENUE (Private + Public)");
    sheet.header(&[
        "Year",
        "Private Revenue",
        "Public Revenue",
        "CONSOLIDATED REVENUE",
        "Private EBITDA",
        "Public EBITDA",
        "CONSOLIDATED EBITDA",
    ]);
    for year in &combined {
        sheet.push(vec![
            year_label(year.year),
            Cell::Amount(year.private_revenue),
            Cell::Amount(year.public_revenue),
            Cell::Amount(year.total_revenue),
            Cell::Amount(year.private_ebitda),
            Cell::Amount(year.public_ebitda),
            Cell::Amount(year.total_ebitda),
        ]);
    }

    sheet.blank();
    sheet.title("10-YEAR TOTALS");
    let sums = totals(projection, ctx.public);
    sheet.push(vec![Cell::text("Total Private Revenue"), Cell::Amount(sums.private_revenue)]);
    sheet.push(vec![Cell::text("Total Public Revenue"), Cell::Amount(sums.public_revenue)]);
    sheet.push(vec![Cell::text("TOTAL CONSOLIDATED REVENUE"), Cell::Amount(sums.total_revenue)]);
    sheet.push(vec![Cell::text("Total Private EBITDA"), Cell::Amount(sums.private_ebitda)]);
    sheet.push(vec![Cell::text("Total Public EBITDA"), Cell::Amount(sums.public_ebitda)]);
    sheet.push(vec![Cell::text("TOTAL CONSOLIDATED EBITDA"), Cell::Amount(sums.total_ebitda)]);

    sheet.blank();
    sheet.title("STUDENT REACH");
    sheet.header(&["Year", "Private Students", "Public Students", "TOTAL STUDENTS"]);
    for year in &combined {
        sheet.push(vec![
            year_label(year.year),
            Cell::Count(year.private_students),
            Cell::Count(year.public_students),
            Cell::Count(year.total_students),
        ]);
    }

    sheet
}

fn year_by_year(ctx: &ReportContext<'_>) -> Sheet {
    let projection = &ctx.financial.projection;
    let params = ctx.parameters;

    let mut sheet = Sheet::new("Year by Year");
    sheet.title("KORA SCHOOL - YEAR BY YEAR DETAILED BREAKDOWN");
    sheet.title(generated_row(ctx.generated));
    sheet.blank();

    sheet.title("PRICING EVOLUTION");
    sheet.header(&["Year", "Monthly Tuition (R$)", "Adoption Fee (R$)", "Kit Cost (R$)"]);
    for year in projection.iter() {
        sheet.push(vec![
            year_label(year.year),
            Cell::Amount(year.pricing.tuition),
            Cell::Amount(year.pricing.adoption_fee),
            Cell::Amount(year.pricing.kit_cost),
        ]);
    }

    // Every line, so nothing has to be derived here
    sheet.blank();
    sheet.title("DETAILED COST BREAKDOWN");
    if let Some(first) = projection.years.first() {
        let mut header = vec![Cell::text("Year")];
        header.extend(first.costs.lines().iter().map(|(id, _)| Cell::text(*id)));
        header.push(Cell::text("total"));
        sheet.push(header);
    }
    for year in projection.iter() {
        let mut row = vec![year_label(year.year)];
        row.extend(year.costs.lines().iter().map(|(_, v)| Cell::Amount(*v)));
        row.push(Cell::Amount(year.costs.total));
        sheet.push(row);
    }

    sheet.blank();
    sheet.title("DETAILED REVENUE BREAKDOWN");
    sheet.header(&[
        "Year",
        "Flagship",
        "Franchise Royalty",
        "Franchise Marketing",
        "Franchise Fees",
        "Adoption",
        "Kits",
        "TOTAL",
    ]);
    for year in projection.iter() {
        let mut row = vec![year_label(year.year)];
        row.extend(year.revenue.channels().iter().map(|(_, v)| Cell::Amount(*v)));
        row.push(Cell::Amount(year.revenue.total));
        sheet.push(row);
    }

    sheet.blank();
    sheet.title("MODEL PARAMETERS");
    sheet.header(&["Parameter", "Value"]);
    sheet.push(vec![Cell::text("Flagship Students Target"), Cell::Amount(params.flagship_students)]);
    sheet.push(vec![Cell::text("Franchise Count Target"), Cell::Amount(params.franchise_count)]);
    sheet.push(vec![Cell::text("Students per Franchise"), Cell::Amount(params.students_per_franchise)]);
    sheet.push(vec![Cell::text("Adoption Students Target"), Cell::Amount(params.adoption_students)]);
    sheet.push(vec![Cell::text("Flagship Tuition (Monthly)"), Cell::Amount(params.flagship_tuition)]);
    sheet.push(vec![Cell::text("Adoption License Fee"), Cell::Amount(params.adoption_license_fee)]);
    sheet.push(vec![Cell::text("Franchise Royalty Rate"), Cell::percent(params.franchise_royalty_rate)]);
    sheet.push(vec![Cell::text("Marketing Fee Rate"), Cell::percent(params.marketing_fee_rate)]);
    sheet.push(vec![Cell::text("Franchise Fee"), Cell::Amount(params.franchise_fee)]);
    sheet.push(vec![Cell::text("Kit Cost per Student"), Cell::Amount(params.kit_cost_per_student)]);
    sheet.push(vec![Cell::text("Tuition Increase Rate"), Cell::percent(params.tuition_increase_rate)]);
    sheet.push(vec![
        Cell::text("Franchise Growth Exponent"),
        Cell::Text(format!("{}", params.franchise_growth_rate)),
    ]);
    sheet.push(vec![
        Cell::text("Adoption Growth Exponent"),
        Cell::Text(format!("{}", params.adoption_growth_rate)),
    ]);
    sheet.push(vec![Cell::text("CAPEX Scenario"), Cell::text(params.capex_scenario.clone())]);

    sheet
}

fn cash_flow(ctx: &ReportContext<'_>) -> Sheet {
    let projection = &ctx.financial.projection;
    let summary = &ctx.financial.summary;

    let mut sheet = Sheet::new("Cash Flow");
    sheet.title("KORA SCHOOL - CASH FLOW ANALYSIS");
    sheet.title(format!(
        "Private Scenario: {} | Public Scenario: {}",
        ctx.private_scenario.to_uppercase(),
        ctx.public_scenario.to_uppercase()
    ));
    sheet.title(generated_row(ctx.generated));
    sheet.blank();

    sheet.title("PRIVATE SECTOR CASH FLOW");
    sheet.header(&[
        "Year",
        "Revenue",
        "Operating Costs",
        "EBITDA",
        "Taxes",
        "Net Income",
        "CAPEX",
        "FREE CASH FLOW",
        "Cumulative FCF",
    ]);
    for (year, cumulative) in projection.iter().zip(projection.cumulative_free_cash_flows()) {
        sheet.push(vec![
            year_label(year.year),
            Cell::Amount(year.revenue.total),
            Cell::Amount(year.costs.total),
            Cell::Amount(year.ebitda),
            Cell::Amount(year.taxes),
            Cell::Amount(year.net_income),
            Cell::Amount(year.capex),
            Cell::Amount(year.free_cash_flow),
            Cell::Amount(cumulative),
        ]);
    }

    if !ctx.public.is_empty() {
        sheet.blank();
        sheet.title("PUBLIC SECTOR CASH FLOW");
        sheet.header(&[
            "Year",
            "Revenue",
            "Operating Costs",
            "EBITDA",
            "Taxes",
            "Net Income",
            "Cumulative",
        ]);
        let mut cumulative = 0.0;
        for year in ctx.public {
            let net_income = public_net_income(year);
            cumulative += net_income;
            sheet.push(vec![
                year_label(year.year),
                Cell::Amount(year.revenue.total),
                Cell::Amount(year.costs),
                Cell::Amount(year.ebitda),
                Cell::Amount(year.ebitda * PUBLIC_TAX_RATE),
                Cell::Amount(net_income),
                Cell::Amount(cumulative),
            ]);
        }
    }

    sheet.blank();
    sheet.title("CONSOLIDATED CASH FLOW SUMMARY");
    sheet.header(&[
        "Year",
        "Private FCF",
        "Public Net Income",
        "COMBINED CASH FLOW",
        "Cumulative Combined",
    ]);
    for flow in combined_cash_flow(projection, ctx.public) {
        sheet.push(vec![
            year_label(flow.year),
            Cell::Amount(flow.private_fcf),
            Cell::Amount(flow.public_net_income),
            Cell::Amount(flow.combined),
            Cell::Amount(flow.cumulative),
        ]);
    }

    sheet.blank();
    sheet.title("KEY CASH FLOW METRICS");
    sheet.header(&["Metric", "Value"]);
    sheet.push(vec![
        Cell::text("Initial Investment (CAPEX)"),
        Cell::Amount(summary.capex_scenario.initial_capex),
    ]);
    key_metric_rows(&mut sheet, summary);
    sheet.push(vec![
        Cell::text("Cumulative Free Cash Flow"),
        Cell::Amount(summary.cumulative_fcf),
    ]);
    sheet.push(vec![Cell::text("Cumulative EBITDA"), Cell::Amount(summary.cumulative_ebitda)]);

    let breakeven = &ctx.financial.flagship_breakeven;
    sheet.blank();
    sheet.title("FLAGSHIP BREAK-EVEN ANALYSIS");
    sheet.push(vec![
        Cell::text("Break-even Month"),
        match breakeven.break_even_month.month() {
            Some(m) => Cell::Count(u64::from(m)),
            None => Cell::text(breakeven.break_even_month.to_string()),
        },
    ]);
    sheet.blank();
    sheet.header(&[
        "Month",
        "Students",
        "Monthly Revenue",
        "Monthly Costs",
        "Monthly Result",
        "Cumulative",
    ]);
    for month in breakeven.monthly_data.iter().take(BREAKEVEN_MONTHS_SHOWN) {
        sheet.push(vec![
            Cell::Text(format!("Month {}", month.month)),
            Cell::Count(month.students),
            Cell::Amount(month.monthly_revenue),
            Cell::Amount(month.monthly_operating_costs),
            Cell::Amount(month.monthly_result),
            Cell::Amount(month.cumulative_result),
        ]);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportContext;
    use crate::session::PlanSession;
    use chrono::NaiveDate;

    fn with_report<F: FnOnce(&Workbook)>(public_key: Option<&str>, check: F) {
        let session = PlanSession::new().unwrap();
        let public = match public_key {
            Some(key) => PlanSession::generate_public_financial_data(key).unwrap(),
            None => Vec::new(),
        };
        let ctx = ReportContext {
            financial: session.financial_data(),
            parameters: session.parameters(),
            private_scenario: session.current_scenario(),
            public: &public,
            public_scenario: public_key.unwrap_or("none"),
            generated: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        check(&standard_report(&ctx));
    }

    #[test]
    fn test_standard_sheets() {
        with_report(Some("realistic"), |book| {
            let names: Vec<_> = book.sheets.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(
                names,
                vec![
                    "Private Plan",
                    "Public Partnerships",
                    "Consolidated View",
                    "Year by Year",
                    "Cash Flow"
                ]
            );
            assert_eq!(
                book.file_stem,
                "Kora_School_Financial_Plan_realistic_realistic_2025-01-15"
            );
        });
    }

    #[test]
    fn test_other_costs_close_the_total() {
        let session = PlanSession::new().unwrap();
        for year in session.financial_data().projection.iter() {
            let shown: f64 = displayed_costs(&year.costs).iter().sum();
            let sum = shown + other_costs(&year.costs);
            assert!((sum - year.costs.total).abs() < 1e-6);
            assert!(other_costs(&year.costs) > 0.0);
        }
    }

    #[test]
    fn test_private_plan_rows() {
        with_report(Some("realistic"), |book| {
            let sheet = book.sheet("Private Plan").unwrap();
            let header = sheet.find_row("REVENUE PROJECTION (10 Years)").unwrap() + 1;
            // 11 year rows follow the header
            assert_eq!(sheet.rows[header + 1][0], Cell::text("Year 0"));
            assert_eq!(sheet.rows[header + 11][0], Cell::text("Year 10"));
            assert_eq!(sheet.rows[header].len(), sheet.rows[header + 1].len());
        });
    }

    #[test]
    fn test_private_plan_capex_metrics() {
        with_report(Some("realistic"), |book| {
            let sheet = book.sheet("Private Plan").unwrap();
            let initial = sheet.find_row("Initial Investment").unwrap();
            assert_eq!(sheet.rows[initial][1], Cell::Amount(8_000_000.0));
            // 8M up front plus 17M of reinvestment over years 1..=10
            let total = sheet.find_row("Total CAPEX").unwrap();
            assert_eq!(sheet.rows[total][1], Cell::Amount(25_000_000.0));
        });
    }

    #[test]
    fn test_consolidated_view_has_ten_years() {
        with_report(Some("pessimistic"), |book| {
            let sheet = book.sheet("Consolidated View").unwrap();
            let header = sheet.find_row("CONSOLIDATED REVENUE (Private + Public)").unwrap() + 1;
            assert_eq!(sheet.rows[header + 1][0], Cell::text("Year 1"));
            assert_eq!(sheet.rows[header + 10][0], Cell::text("Year 10"));
            assert!(sheet.rows[header + 11].is_empty());
        });
    }

    #[test]
    fn test_missing_public_data() {
        with_report(None, |book| {
            let sheet = book.sheet("Public Partnerships").unwrap();
            assert_eq!(sheet.rows.len(), 1);
            let cash = book.sheet("Cash Flow").unwrap();
            assert!(cash.find_row("PUBLIC SECTOR CASH FLOW").is_none());
            assert!(cash.find_row("CONSOLIDATED CASH FLOW SUMMARY").is_some());
        });
    }
}

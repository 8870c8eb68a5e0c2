//! User-configured reports: a year range plus a field selection

use super::sheets::key_metric_rows;
use super::{custom_report_file_stem, generated_row, year_label, Cell, ReportContext, Sheet, Workbook};
use crate::consolidated::{consolidate, public_net_income, ConsolidatedYear, CONSOLIDATED_YEARS};
use crate::error::{ParameterError, Result};
use crate::projection::YearRecord;
use crate::public::PublicYearRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// category -> section -> variable id -> selected
pub type Selection = BTreeMap<String, BTreeMap<String, BTreeMap<String, bool>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub year_from: u32,
    pub year_to: u32,
    pub selection: Selection,
}

impl ReportConfig {
    /// Every known variable selected for the given range
    pub fn all_selected(year_from: u32, year_to: u32) -> Self {
        let mut selection = Selection::new();
        for (category, section, ids) in catalog() {
            let vars = selection
                .entry(category.to_string())
                .or_default()
                .entry(section.to_string())
                .or_default();
            for id in ids {
                vars.insert(id.to_string(), true);
            }
        }
        Self {
            year_from,
            year_to,
            selection,
        }
    }

    pub fn is_selected(&self, category: &str, section: &str, variable: &str) -> bool {
        self.selection
            .get(category)
            .and_then(|sections| sections.get(section))
            .and_then(|vars| vars.get(variable))
            .copied()
            .unwrap_or(false)
    }

    fn category_selected(&self, category: &str) -> bool {
        self.selection
            .get(category)
            .map(|sections| sections.values().any(|vars| vars.values().any(|&on| on)))
            .unwrap_or(false)
    }

    fn contains(&self, year: u32) -> bool {
        (self.year_from..=self.year_to).contains(&year)
    }

    fn validate(&self) -> std::result::Result<(), ParameterError> {
        if self.year_from > self.year_to {
            return Err(ParameterError::OutOfDomain {
                name: "yearTo".to_string(),
                value: f64::from(self.year_to),
                reason: "must not precede yearFrom",
            });
        }
        Ok(())
    }
}

/// A selectable column: variable id, header label, value
struct Column<T> {
    id: &'static str,
    header: &'static str,
    value: fn(&T) -> Cell,
}

fn col<T>(id: &'static str, header: &'static str, value: fn(&T) -> Cell) -> Column<T> {
    Column { id, header, value }
}

/// Private cash-flow row with its running total inside the range
struct PrivateCashRow<'a> {
    record: Option<&'a YearRecord>,
    cumulative: f64,
}

struct PublicCashRow<'a> {
    record: &'a PublicYearRecord,
    net_income: f64,
    cumulative: f64,
}

struct CombinedRow {
    combined: f64,
    cumulative: f64,
}

fn private_revenue() -> Vec<Column<YearRecord>> {
    let col = col::<YearRecord>;
    vec![
        col("flagship", "Flagship Revenue", |y| Cell::Amount(y.revenue.flagship)),
        col("franchiseRoyalty", "Franchise Royalty", |y| Cell::Amount(y.revenue.franchise_royalty)),
        col("franchiseFees", "Franchise Fees", |y| Cell::Amount(y.revenue.franchise_fees)),
        col("franchiseMarketing", "Franchise Marketing", |y| {
            Cell::Amount(y.revenue.franchise_marketing)
        }),
        col("adoption", "Adoption Revenue", |y| Cell::Amount(y.revenue.adoption)),
        col("kits", "Kit Revenue", |y| Cell::Amount(y.revenue.kits)),
        col("totalRevenue", "Total Revenue", |y| Cell::Amount(y.revenue.total)),
    ]
}

fn private_costs() -> Vec<Column<YearRecord>> {
    let col = col::<YearRecord>;
    vec![
        col("technologyOpex", "Technology OpEx", |y| Cell::Amount(y.costs.technology_opex)),
        col("marketing", "Marketing", |y| Cell::Amount(y.costs.marketing)),
        col("staffCorporate", "Staff Corporate", |y| Cell::Amount(y.costs.staff_corporate)),
        col("staffFlagship", "Staff Flagship", |y| Cell::Amount(y.costs.staff_flagship)),
        col("staffFranchiseSupport", "Staff Franchise Support", |y| {
            Cell::Amount(y.costs.staff_franchise_support)
        }),
        col("staffAdoptionSupport", "Staff Adoption Support", |y| {
            Cell::Amount(y.costs.staff_adoption_support)
        }),
        col("facilities", "Facilities", |y| Cell::Amount(y.costs.facilities)),
        col("curriculum", "Curriculum", |y| Cell::Amount(y.costs.curriculum)),
        col("teacherTraining", "Teacher Training", |y| Cell::Amount(y.costs.teacher_training)),
        col("totalCosts", "Total Costs", |y| Cell::Amount(y.costs.total)),
    ]
}

fn private_profitability() -> Vec<Column<YearRecord>> {
    let col = col::<YearRecord>;
    vec![
        col("ebitda", "EBITDA", |y| Cell::Amount(y.ebitda)),
        col("ebitdaMargin", "EBITDA Margin %", |y| Cell::percent(y.ebitda_margin)),
        col("taxes", "Taxes", |y| Cell::Amount(y.taxes)),
        col("netIncome", "Net Income", |y| Cell::Amount(y.net_income)),
        col("capex", "CAPEX", |y| Cell::Amount(y.capex)),
        col("freeCashFlow", "Free Cash Flow", |y| Cell::Amount(y.free_cash_flow)),
    ]
}

fn private_students() -> Vec<Column<YearRecord>> {
    let col = col::<YearRecord>;
    vec![
        col("flagshipStudents", "Flagship Students", |y| Cell::Count(y.students.flagship)),
        col("franchiseStudents", "Franchise Students", |y| Cell::Count(y.students.franchise)),
        col("adoptionStudents", "Adoption Students", |y| Cell::Count(y.students.adoption)),
        col("totalStudents", "Total Students", |y| Cell::Count(y.students.total)),
        col("franchiseCount", "Franchise Count", |y| Cell::Count(y.franchise_count)),
    ]
}

fn private_pricing() -> Vec<Column<YearRecord>> {
    let col = col::<YearRecord>;
    vec![
        col("tuition", "Monthly Tuition", |y| Cell::Amount(y.pricing.tuition)),
        col("adoptionFee", "Adoption Fee", |y| Cell::Amount(y.pricing.adoption_fee)),
        col("kitCost", "Kit Cost", |y| Cell::Amount(y.pricing.kit_cost)),
    ]
}

fn public_metrics() -> Vec<Column<PublicYearRecord>> {
    let col = col::<PublicYearRecord>;
    vec![
        col("students", "Students", |y| Cell::Count(y.students)),
        col("municipalities", "Municipalities", |y| Cell::Count(y.municipalities)),
        col("marketPenetration", "Market Penetration %", |y| Cell::Percent {
            value: y.market_penetration,
            decimals: 2,
        }),
    ]
}

fn public_revenue() -> Vec<Column<PublicYearRecord>> {
    let col = col::<PublicYearRecord>;
    vec![
        col("monthly", "Monthly License Fees", |y| Cell::Amount(y.revenue.monthly)),
        col("setup", "Setup Revenue", |y| Cell::Amount(y.revenue.setup)),
        col("technology", "Technology Revenue", |y| Cell::Amount(y.revenue.technology)),
        col("training", "Training Revenue", |y| Cell::Amount(y.revenue.training)),
        col("totalRevenue", "Total Revenue", |y| Cell::Amount(y.revenue.total)),
    ]
}

fn public_profitability() -> Vec<Column<PublicYearRecord>> {
    let col = col::<PublicYearRecord>;
    vec![
        col("costs", "Operating Costs", |y| Cell::Amount(y.costs)),
        col("ebitda", "EBITDA", |y| Cell::Amount(y.ebitda)),
        col("margin", "EBITDA Margin %", |y| Cell::percent(y.margin)),
    ]
}

fn consolidated_combined() -> Vec<Column<ConsolidatedYear>> {
    let col = col::<ConsolidatedYear>;
    vec![
        col("privateRevenue", "Private Revenue", |y| Cell::Amount(y.private_revenue)),
        col("publicRevenue", "Public Revenue", |y| Cell::Amount(y.public_revenue)),
        col("totalRevenue", "Total Revenue", |y| Cell::Amount(y.total_revenue)),
        col("privateEbitda", "Private EBITDA", |y| Cell::Amount(y.private_ebitda)),
        col("publicEbitda", "Public EBITDA", |y| Cell::Amount(y.public_ebitda)),
        col("totalEbitda", "Total EBITDA", |y| Cell::Amount(y.total_ebitda)),
        col("privateStudents", "Private Students", |y| Cell::Count(y.private_students)),
        col("publicStudents", "Public Students", |y| Cell::Count(y.public_students)),
        col("totalStudents", "Total Students", |y| Cell::Count(y.total_students)),
    ]
}

fn private_cash_flow<'a>() -> Vec<Column<PrivateCashRow<'a>>> {
    let col = col::<PrivateCashRow<'a>>;
    vec![
        col("privateRevenue", "Revenue", |r| {
            Cell::Amount(r.record.map(|y| y.revenue.total).unwrap_or(0.0))
        }),
        col("privateCosts", "Operating Costs", |r| {
            Cell::Amount(r.record.map(|y| y.costs.total).unwrap_or(0.0))
        }),
        col("privateEbitda", "EBITDA", |r| Cell::Amount(r.record.map(|y| y.ebitda).unwrap_or(0.0))),
        col("privateTaxes", "Taxes", |r| Cell::Amount(r.record.map(|y| y.taxes).unwrap_or(0.0))),
        col("privateNetIncome", "Net Income", |r| {
            Cell::Amount(r.record.map(|y| y.net_income).unwrap_or(0.0))
        }),
        col("privateCapex", "CAPEX", |r| Cell::Amount(r.record.map(|y| y.capex).unwrap_or(0.0))),
        col("privateFcf", "Free Cash Flow", |r| {
            Cell::Amount(r.record.map(|y| y.free_cash_flow).unwrap_or(0.0))
        }),
        col("privateCumulativeFcf", "Cumulative FCF", |r| Cell::Amount(r.cumulative)),
    ]
}

fn public_cash_flow<'a>() -> Vec<Column<PublicCashRow<'a>>> {
    let col = col::<PublicCashRow<'a>>;
    vec![
        col("publicRevenue", "Revenue", |r| Cell::Amount(r.record.revenue.total)),
        col("publicCosts", "Operating Costs", |r| Cell::Amount(r.record.costs)),
        col("publicEbitda", "EBITDA", |r| Cell::Amount(r.record.ebitda)),
        col("publicNetIncome", "Net Income", |r| Cell::Amount(r.net_income)),
        col("publicCumulative", "Cumulative", |r| Cell::Amount(r.cumulative)),
    ]
}

fn combined_cash_flow_columns() -> Vec<Column<CombinedRow>> {
    let col = col::<CombinedRow>;
    vec![
        col("combinedCashFlow", "Combined Cash Flow", |r| Cell::Amount(r.combined)),
        col("cumulativeCombined", "Cumulative Combined", |r| Cell::Amount(r.cumulative)),
    ]
}

const KEY_METRICS: [&str; 3] = ["irr", "npv", "paybackPeriod"];

/// Every (category, section, variable ids) the builder understands
fn catalog() -> Vec<(&'static str, &'static str, Vec<&'static str>)> {
    fn ids<T>(columns: Vec<Column<T>>) -> Vec<&'static str> {
        columns.iter().map(|c| c.id).collect()
    }
    vec![
        ("privatePlan", "revenue", ids(private_revenue())),
        ("privatePlan", "costs", ids(private_costs())),
        ("privatePlan", "profitability", ids(private_profitability())),
        ("privatePlan", "students", ids(private_students())),
        ("privatePlan", "pricing", ids(private_pricing())),
        ("publicPartnerships", "metrics", ids(public_metrics())),
        ("publicPartnerships", "revenue", ids(public_revenue())),
        ("publicPartnerships", "profitability", ids(public_profitability())),
        ("consolidated", "combined", ids(consolidated_combined())),
        ("cashFlow", "privateCashFlow", ids(private_cash_flow())),
        ("cashFlow", "publicCashFlow", ids(public_cash_flow())),
        ("cashFlow", "combined", ids(combined_cash_flow_columns())),
        ("cashFlow", "keyMetrics", KEY_METRICS.to_vec()),
    ]
}

/// Emit one titled section with only the selected columns; nothing when
/// no column of the section is selected
fn section<T>(
    sheet: &mut Sheet,
    config: &ReportConfig,
    (category, name): (&str, &str),
    title: &str,
    columns: &[Column<T>],
    rows: &[(u32, T)],
) {
    let selected: Vec<&Column<T>> = columns
        .iter()
        .filter(|c| config.is_selected(category, name, c.id))
        .collect();
    if selected.is_empty() {
        return;
    }

    sheet.title(title);
    let mut header = vec![Cell::text("Year")];
    header.extend(selected.iter().map(|c| Cell::text(c.header)));
    sheet.push(header);

    for (year, item) in rows {
        let mut row = vec![year_label(*year)];
        row.extend(selected.iter().map(|c| (c.value)(item)));
        sheet.push(row);
    }
    sheet.blank();
}

fn sheet_preamble(
    sheet: &mut Sheet,
    title: &str,
    scenario_line: String,
    ctx: &ReportContext<'_>,
    config: &ReportConfig,
) {
    sheet.title(title);
    sheet.title(scenario_line);
    sheet.title(format!(
        "Year Range: Year {} to Year {}",
        config.year_from, config.year_to
    ));
    sheet.title(generated_row(ctx.generated));
    sheet.blank();
}

/// Build the sheets selected in `config`, restricted to its year range.
///
/// Categories with nothing selected produce no sheet.
pub fn custom_report(ctx: &ReportContext<'_>, config: &ReportConfig) -> Result<Workbook> {
    config.validate()?;

    let both_scenarios = format!(
        "Private: {} | Public: {}",
        ctx.private_scenario.to_uppercase(),
        ctx.public_scenario.to_uppercase()
    );
    let mut sheets = Vec::new();

    if config.category_selected("privatePlan") {
        let mut sheet = Sheet::new("Private Plan");
        sheet_preamble(
            &mut sheet,
            "KORA SCHOOL - PRIVATE SECTOR CUSTOM REPORT",
            format!("Scenario: {}", ctx.private_scenario.to_uppercase()),
            ctx,
            config,
        );
        let rows: Vec<(u32, YearRecord)> = ctx
            .financial
            .projection
            .iter()
            .filter(|y| config.contains(y.year))
            .map(|y| (y.year, y.clone()))
            .collect();
        let key = |s| ("privatePlan", s);
        section(&mut sheet, config, key("revenue"), "REVENUE", &private_revenue(), &rows);
        section(&mut sheet, config, key("costs"), "COSTS", &private_costs(), &rows);
        section(&mut sheet, config, key("profitability"), "PROFITABILITY", &private_profitability(), &rows);
        section(&mut sheet, config, key("students"), "STUDENTS", &private_students(), &rows);
        section(&mut sheet, config, key("pricing"), "PRICING", &private_pricing(), &rows);
        sheets.push(sheet);
    }

    if config.category_selected("publicPartnerships") && !ctx.public.is_empty() {
        let mut sheet = Sheet::new("Public Partnerships");
        sheet_preamble(
            &mut sheet,
            "KORA SCHOOL - PUBLIC PARTNERSHIPS CUSTOM REPORT",
            format!("Scenario: {}", ctx.public_scenario.to_uppercase()),
            ctx,
            config,
        );
        let rows: Vec<(u32, PublicYearRecord)> = ctx
            .public
            .iter()
            .filter(|y| config.contains(y.year))
            .map(|y| (y.year, y.clone()))
            .collect();
        let key = |s| ("publicPartnerships", s);
        section(&mut sheet, config, key("metrics"), "KEY METRICS", &public_metrics(), &rows);
        section(&mut sheet, config, key("revenue"), "REVENUE", &public_revenue(), &rows);
        section(&mut sheet, config, key("profitability"), "PROFITABILITY", &public_profitability(), &rows);
        sheets.push(sheet);
    }

    if config.category_selected("consolidated") {
        let mut sheet = Sheet::new("Consolidated");
        sheet_preamble(
            &mut sheet,
            "KORA SCHOOL - CONSOLIDATED CUSTOM REPORT",
            both_scenarios.clone(),
            ctx,
            config,
        );
        let rows: Vec<(u32, ConsolidatedYear)> = consolidate(&ctx.financial.projection, ctx.public)
            .into_iter()
            .filter(|y| config.contains(y.year) && CONSOLIDATED_YEARS.contains(&y.year))
            .map(|y| (y.year, y))
            .collect();
        section(
            &mut sheet,
            config,
            ("consolidated", "combined"),
            "CONSOLIDATED METRICS",
            &consolidated_combined(),
            &rows,
        );
        sheets.push(sheet);
    }

    if config.category_selected("cashFlow") {
        sheets.push(cash_flow_sheet(ctx, config, both_scenarios));
    }

    log::debug!("Custom report with {} sheets", sheets.len());
    Ok(Workbook {
        file_stem: custom_report_file_stem(config.year_from, config.year_to, ctx.generated),
        sheets,
    })
}

fn cash_flow_sheet(ctx: &ReportContext<'_>, config: &ReportConfig, scenarios: String) -> Sheet {
    let projection = &ctx.financial.projection;
    let mut sheet = Sheet::new("Cash Flow");
    sheet_preamble(&mut sheet, "KORA SCHOOL - CASH FLOW CUSTOM REPORT", scenarios, ctx, config);

    // Running totals restart at the start of the range
    let mut cumulative = 0.0;
    let private_rows: Vec<(u32, PrivateCashRow<'_>)> = (config.year_from..=config.year_to)
        .map(|year| {
            let record = projection.year(year);
            cumulative += record.map(|y| y.free_cash_flow).unwrap_or(0.0);
            (year, PrivateCashRow { record, cumulative })
        })
        .collect();

    let mut cumulative = 0.0;
    let public_rows: Vec<(u32, PublicCashRow<'_>)> = ctx
        .public
        .iter()
        .filter(|y| config.contains(y.year))
        .map(|record| {
            let net_income = public_net_income(record);
            cumulative += net_income;
            (record.year, PublicCashRow { record, net_income, cumulative })
        })
        .collect();

    let mut cumulative = 0.0;
    let combined_rows: Vec<(u32, CombinedRow)> = private_rows
        .iter()
        .map(|(year, private)| {
            let public = if *year == 0 {
                0.0
            } else {
                ctx.public
                    .get(*year as usize - 1)
                    .map(public_net_income)
                    .unwrap_or(0.0)
            };
            let combined = private.record.map(|y| y.free_cash_flow).unwrap_or(0.0) + public;
            cumulative += combined;
            (*year, CombinedRow { combined, cumulative })
        })
        .collect();

    section(
        &mut sheet,
        config,
        ("cashFlow", "privateCashFlow"),
        "PRIVATE SECTOR CASH FLOW",
        &private_cash_flow(),
        &private_rows,
    );
    if !ctx.public.is_empty() {
        section(
            &mut sheet,
            config,
            ("cashFlow", "publicCashFlow"),
            "PUBLIC SECTOR CASH FLOW",
            &public_cash_flow(),
            &public_rows,
        );
    }
    section(
        &mut sheet,
        config,
        ("cashFlow", "combined"),
        "COMBINED CASH FLOW",
        &combined_cash_flow_columns(),
        &combined_rows,
    );

    if KEY_METRICS
        .iter()
        .any(|id| config.is_selected("cashFlow", "keyMetrics", id))
    {
        let summary = &ctx.financial.summary;
        let mut metrics = Sheet::new("");
        key_metric_rows(&mut metrics, summary);

        sheet.title("KEY METRICS");
        for (id, row) in KEY_METRICS.iter().zip(metrics.rows) {
            if config.is_selected("cashFlow", "keyMetrics", id) {
                sheet.push(row);
            }
        }
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PlanSession;
    use chrono::NaiveDate;

    fn with_custom<F: FnOnce(Result<Workbook>, &PlanSession)>(config: &ReportConfig, check: F) {
        let session = PlanSession::new().unwrap();
        let public = PlanSession::generate_public_financial_data("realistic").unwrap();
        let ctx = ReportContext {
            financial: session.financial_data(),
            parameters: session.parameters(),
            private_scenario: session.current_scenario(),
            public: &public,
            public_scenario: "realistic",
            generated: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        check(custom_report(&ctx, config), &session);
    }

    fn select(year_from: u32, year_to: u32, picks: &[(&str, &str, &str)]) -> ReportConfig {
        let mut selection = Selection::new();
        for (category, section, id) in picks {
            selection
                .entry(category.to_string())
                .or_default()
                .entry(section.to_string())
                .or_default()
                .insert(id.to_string(), true);
        }
        ReportConfig {
            year_from,
            year_to,
            selection,
        }
    }

    #[test]
    fn test_everything_selected() {
        with_custom(&ReportConfig::all_selected(0, 10), |book, _| {
            let book = book.unwrap();
            let names: Vec<_> = book.sheets.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(
                names,
                vec!["Private Plan", "Public Partnerships", "Consolidated", "Cash Flow"]
            );
            assert_eq!(book.file_stem, "Kora_School_Custom_Report_Y0-Y10_2025-06-01");
        });
    }

    #[test]
    fn test_single_column_in_range() {
        let config = select(2, 4, &[("privatePlan", "revenue", "totalRevenue")]);
        with_custom(&config, |book, session| {
            let book = book.unwrap();
            assert_eq!(book.sheets.len(), 1);
            let sheet = book.sheet("Private Plan").unwrap();
            assert!(sheet.find_row("COSTS").is_none());

            let title = sheet.find_row("REVENUE").unwrap();
            assert_eq!(
                sheet.rows[title + 1],
                vec![Cell::text("Year"), Cell::text("Total Revenue")]
            );
            for (offset, year) in (2..=4).enumerate() {
                let row = &sheet.rows[title + 2 + offset];
                assert_eq!(row[0], Cell::text(format!("Year {}", year)));
                assert_eq!(
                    row[1],
                    Cell::Amount(session.year_data(year).unwrap().revenue.total)
                );
            }
            assert!(sheet.rows[title + 5].is_empty());
        });
    }

    #[test]
    fn test_cash_flow_cumulative_restarts_and_zero_fills() {
        let config = select(
            9,
            12,
            &[
                ("cashFlow", "privateCashFlow", "privateFcf"),
                ("cashFlow", "privateCashFlow", "privateCumulativeFcf"),
            ],
        );
        with_custom(&config, |book, session| {
            let book = book.unwrap();
            let sheet = book.sheet("Cash Flow").unwrap();
            let title = sheet.find_row("PRIVATE SECTOR CASH FLOW").unwrap();
            let fcf9 = session.year_data(9).unwrap().free_cash_flow;
            let fcf10 = session.year_data(10).unwrap().free_cash_flow;

            assert_eq!(sheet.rows[title + 2][2], Cell::Amount(fcf9));
            assert_eq!(sheet.rows[title + 3][2], Cell::Amount(fcf9 + fcf10));

            let year12 = &sheet.rows[title + 5];
            assert_eq!(year12[0], Cell::text("Year 12"));
            assert_eq!(year12[1], Cell::Amount(0.0));
            assert_eq!(year12[2], Cell::Amount(fcf9 + fcf10));

            assert!(sheet.find_row("PUBLIC SECTOR CASH FLOW").is_none());
            assert!(sheet.find_row("KEY METRICS").is_none());
        });
    }

    #[test]
    fn test_key_metrics_subset() {
        let config = select(0, 10, &[("cashFlow", "keyMetrics", "npv")]);
        with_custom(&config, |book, session| {
            let book = book.unwrap();
            let sheet = book.sheet("Cash Flow").unwrap();
            let title = sheet.find_row("KEY METRICS").unwrap();
            assert_eq!(sheet.rows.len(), title + 2);
            assert_eq!(
                sheet.rows[title + 1],
                vec![
                    Cell::text("NPV (10% discount)"),
                    Cell::Amount(session.summary().npv)
                ]
            );
        });
    }

    #[test]
    fn test_unselected_variables_produce_no_sheet() {
        let mut config = select(1, 3, &[("consolidated", "combined", "totalRevenue")]);
        config
            .selection
            .entry("privatePlan".to_string())
            .or_default()
            .entry("revenue".to_string())
            .or_default()
            .insert("flagship".to_string(), false);

        with_custom(&config, |book, _| {
            let book = book.unwrap();
            assert_eq!(book.sheets.len(), 1);
            let sheet = book.sheet("Consolidated").unwrap();
            let title = sheet.find_row("CONSOLIDATED METRICS").unwrap();
            assert_eq!(sheet.rows[title + 2][0], Cell::text("Year 1"));
            assert_eq!(sheet.rows[title + 4][0], Cell::text("Year 3"));
        });

        with_custom(&select(0, 10, &[]), |book, _| {
            assert!(book.unwrap().sheets.is_empty());
        });
    }

    #[test]
    fn test_reversed_range_rejected() {
        with_custom(&ReportConfig::all_selected(7, 3), |book, _| {
            assert!(book.unwrap_err().is_invalid_parameter());
        });
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "yearFrom": 1,
            "yearTo": 5,
            "selection": {"publicPartnerships": {"metrics": {"students": true, "municipalities": false}}}
        }"#;
        let config: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.year_to, 5);
        assert!(config.is_selected("publicPartnerships", "metrics", "students"));
        assert!(!config.is_selected("publicPartnerships", "metrics", "municipalities"));
        assert!(!config.is_selected("privatePlan", "revenue", "flagship"));
    }
}

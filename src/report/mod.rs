//! Flattening of engine outputs into tabular sheets
//!
//! Sheets are plain rows of typed cells. Rendering them (spreadsheet, CSV,
//! terminal) is up to the caller; `Sheet::write_csv` covers the common case.

mod custom;
mod sheets;

pub use custom::{custom_report, ReportConfig, Selection};
pub use sheets::standard_report;

use crate::error::Result;
use crate::public::PublicYearRecord;
use crate::session::FinancialData;
use crate::parameters::ParameterSet;
use chrono::NaiveDate;
use std::fmt;
use std::io::Write;

/// Brand prefix used in sheet titles and file names
pub const REPORT_BRAND: &str = "Kora_School";

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Currency amount, shown rounded to whole units
    Amount(f64),
    Count(u64),
    /// Decimal ratio shown as a percentage
    Percent { value: f64, decimals: usize },
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn percent(value: f64) -> Self {
        Cell::Percent { value, decimals: 1 }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Amount(v) => write!(f, "{}", v.round()),
            Cell::Count(n) => write!(f, "{}", n),
            Cell::Percent { value, decimals } => write!(f, "{:.*}%", *decimals, value * 100.0),
            Cell::Empty => Ok(()),
        }
    }
}

/// A named sheet of rows; rows may differ in length
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Single-cell text row
    pub fn title(&mut self, text: impl Into<String>) {
        self.rows.push(vec![Cell::text(text)]);
    }

    pub fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    /// Header row from static labels
    pub fn header(&mut self, labels: &[&str]) {
        self.rows.push(labels.iter().map(|l| Cell::text(*l)).collect());
    }

    /// Index of the first row whose first cell is the given text
    pub fn find_row(&self, label: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| matches!(row.first(), Some(Cell::Text(t)) if t == label))
    }

    /// Write the sheet as CSV, one record per row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        for row in &self.rows {
            if row.is_empty() {
                csv.write_record([""])?;
            } else {
                csv.write_record(row.iter().map(|c| c.to_string()))?;
            }
        }
        csv.flush()?;
        Ok(())
    }
}

/// Ordered set of sheets produced by one export
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub file_stem: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Read-only inputs of a report
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub financial: &'a FinancialData,
    pub parameters: &'a ParameterSet,
    pub private_scenario: &'a str,
    pub public: &'a [PublicYearRecord],
    pub public_scenario: &'a str,
    /// Date printed in the sheets and file names; never feeds the numbers
    pub generated: NaiveDate,
}

/// `Kora_School_Financial_Plan_{private}_{public}_{date}`
pub fn financial_plan_file_stem(private_scenario: &str, public_scenario: &str, date: NaiveDate) -> String {
    format!(
        "{}_Financial_Plan_{}_{}_{}",
        REPORT_BRAND,
        private_scenario,
        public_scenario,
        date.format("%Y-%m-%d")
    )
}

/// `Kora_School_Custom_Report_Y{from}-Y{to}_{date}`
pub fn custom_report_file_stem(year_from: u32, year_to: u32, date: NaiveDate) -> String {
    format!(
        "{}_Custom_Report_Y{}-Y{}_{}",
        REPORT_BRAND,
        year_from,
        year_to,
        date.format("%Y-%m-%d")
    )
}

fn year_label(year: u32) -> Cell {
    Cell::Text(format!("Year {}", year))
}

fn generated_row(date: NaiveDate) -> String {
    format!("Generated: {}", date.format("%d/%m/%Y"))
}

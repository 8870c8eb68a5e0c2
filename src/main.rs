//! School Plan CLI
//!
//! Command-line interface for running projections, analyses and exports

use anyhow::Context;
use clap::{Parser, Subcommand};
use school_plan::analysis::BreakEvenMonth;
use school_plan::consolidated::{combined_cash_flow, consolidate, totals};
use school_plan::parameters::loader::load_parameters;
use school_plan::report::{custom_report, standard_report, ReportConfig, ReportContext, Workbook};
use school_plan::session::DEFAULT_SCENARIO;
use school_plan::{ParameterName, PlanSession, Summary};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "school_plan", version, about = "School venture financial projections")]
struct Cli {
    /// Private scenario preset to start from
    #[arg(long, short, global = true, default_value = DEFAULT_SCENARIO)]
    scenario: String,

    /// JSON parameter file used instead of the preset values
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headline metrics for the configured horizon
    Summary,
    /// Year-by-year private projection
    Project {
        #[arg(long, default_value_t = 11)]
        years: u32,
    },
    /// Monthly flagship break-even
    Breakeven,
    /// Scale one parameter and compare summaries
    Sensitivity {
        parameter: ParameterName,
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.8, 0.9, 1.1, 1.2])]
        factors: Vec<f64>,
    },
    /// Summaries under every CAPEX scenario
    Capex,
    /// Public-partnership projection
    Public {
        #[arg(default_value = "realistic")]
        preset: String,
    },
    /// Private and public tracks side by side
    Consolidated {
        #[arg(long, default_value = "realistic")]
        public: String,
    },
    /// Write report sheets as CSV files
    Export {
        #[arg(long, default_value = "realistic")]
        public: String,
        /// Output directory
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
        /// JSON custom report configuration; the standard report when absent
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn open_session(cli: &Cli) -> anyhow::Result<PlanSession> {
    let mut session = PlanSession::new()?;
    let explicit = cli
        .params
        .as_deref()
        .map(load_parameters)
        .transpose()
        .context("loading parameter file")?;
    if explicit.is_some() || cli.scenario != DEFAULT_SCENARIO {
        session.switch_scenario(&cli.scenario, explicit)?;
    }
    log::info!("Session on scenario `{}`", session.current_scenario());
    Ok(session)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(summary: &Summary) {
    let irr = summary
        .irr
        .map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "N/A".to_string());
    println!("  CAPEX scenario:     {}", summary.capex_scenario.name);
    println!("  Year 10 revenue:    ${:.0}", summary.year10_revenue);
    println!("  Year 10 EBITDA:     ${:.0}", summary.year10_ebitda);
    println!("  Year 10 students:   {}", summary.year10_students);
    println!("  IRR:                {}", irr);
    println!("  NPV:                ${:.0}", summary.npv);
    println!("  Payback:            {}", summary.payback_period);
    println!("  Cumulative FCF:     ${:.0}", summary.cumulative_fcf);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let session = open_session(&cli)?;

    match &cli.command {
        Command::Summary => {
            if cli.json {
                return print_json(session.summary());
            }
            println!("Scenario: {}", session.current_scenario());
            print_summary(session.summary());
        }

        Command::Project { years } => {
            let projection = session.project(*years)?;
            if cli.json {
                return print_json(&projection);
            }
            println!(
                "{:>4} {:>10} {:>6} {:>16} {:>16} {:>16} {:>16}",
                "Year", "Students", "Units", "Revenue", "Costs", "EBITDA", "FCF"
            );
            println!("{}", "-".repeat(92));
            for y in projection.iter() {
                println!(
                    "{:>4} {:>10} {:>6} {:>16.0} {:>16.0} {:>16.0} {:>16.0}",
                    y.year,
                    y.students.total,
                    y.franchise_count,
                    y.revenue.total,
                    y.costs.total,
                    y.ebitda,
                    y.free_cash_flow
                );
            }
        }

        Command::Breakeven => {
            let breakeven = &session.financial_data().flagship_breakeven;
            if cli.json {
                return print_json(breakeven);
            }
            println!("Flagship break-even: {}", breakeven.break_even_month);
            if let BreakEvenMonth::Month(m) = breakeven.break_even_month {
                let record = &breakeven.monthly_data[m as usize - 1];
                println!("  Students at break-even: {}", record.students);
            }
        }

        Command::Sensitivity { parameter, factors } => {
            let report = session.perform_sensitivity_analysis(*parameter, factors)?;
            if cli.json {
                return print_json(&report);
            }
            println!("Sensitivity of {} (base {})", report.parameter, report.base_value);
            println!("{:>8} {:>14} {:>18} {:>12}", "Factor", "Value", "NPV", "Elasticity");
            for point in &report.points {
                let elasticity = point
                    .npv_elasticity
                    .map(|e| format!("{:.3}", e))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>8.2} {:>14.2} {:>18.0} {:>12}",
                    point.factor, point.parameter_value, point.summary.npv, elasticity
                );
            }
        }

        Command::Capex => {
            let comparisons = session.compare_capex_scenarios()?;
            if cli.json {
                return print_json(&comparisons);
            }
            for c in &comparisons {
                println!("{} (initial ${:.0})", c.scenario.name, c.scenario.initial_capex);
                print_summary(&c.summary);
                println!();
            }
        }

        Command::Public { preset } => {
            let records = PlanSession::generate_public_financial_data(preset)?;
            if cli.json {
                return print_json(&records);
            }
            println!(
                "{:>4} {:>10} {:>6} {:>16} {:>16} {:>8}",
                "Year", "Students", "Munis", "Revenue", "EBITDA", "Margin"
            );
            for r in &records {
                println!(
                    "{:>4} {:>10} {:>6} {:>16.0} {:>16.0} {:>7.1}%",
                    r.year,
                    r.students,
                    r.municipalities,
                    r.revenue.total,
                    r.ebitda,
                    r.margin * 100.0
                );
            }
        }

        Command::Consolidated { public } => {
            let records = PlanSession::generate_public_financial_data(public)?;
            let projection = &session.financial_data().projection;
            let combined = consolidate(projection, &records);
            let flows = combined_cash_flow(projection, &records);
            let sums = totals(projection, &records);
            if cli.json {
                return print_json(&serde_json::json!({
                    "years": combined,
                    "cashFlow": flows,
                    "totals": sums,
                }));
            }
            println!(
                "{:>4} {:>16} {:>16} {:>16} {:>12}",
                "Year", "Private", "Public", "Total", "Students"
            );
            for y in &combined {
                println!(
                    "{:>4} {:>16.0} {:>16.0} {:>16.0} {:>12}",
                    y.year, y.private_revenue, y.public_revenue, y.total_revenue, y.total_students
                );
            }
            println!("Total revenue: ${:.0}", sums.total_revenue);
            println!("Total EBITDA:  ${:.0}", sums.total_ebitda);
        }

        Command::Export { public, out, report } => {
            let records = PlanSession::generate_public_financial_data(public)?;
            let ctx = ReportContext {
                financial: session.financial_data(),
                parameters: session.parameters(),
                private_scenario: session.current_scenario(),
                public: &records,
                public_scenario: public,
                generated: chrono::Local::now().date_naive(),
            };
            let workbook = match report {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("opening report config {}", path.display()))?;
                    let config: ReportConfig = serde_json::from_reader(file)?;
                    custom_report(&ctx, &config)?
                }
                None => standard_report(&ctx),
            };
            write_workbook(&workbook, out)?;
        }
    }

    Ok(())
}

fn write_workbook(workbook: &Workbook, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    for sheet in &workbook.sheets {
        let path = dir.join(format!(
            "{}_{}.csv",
            workbook.file_stem,
            sheet.name.replace(' ', "_")
        ));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        sheet.write_csv(file)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

//! Run every private preset under every CAPEX scenario
//!
//! Writes one summary row per combination for side-by-side comparison

use anyhow::Context;
use rayon::prelude::*;
use school_plan::{CapexCatalog, ProjectionEngine, ScenarioPresets, Summary};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Serialize)]
struct MatrixRow {
    scenario: String,
    capex: String,
    initial_capex: f64,
    total_capex: f64,
    year10_revenue: f64,
    year10_ebitda: f64,
    year10_students: u64,
    irr_pct: Option<f64>,
    npv: f64,
    payback: String,
    cumulative_fcf: f64,
}

impl MatrixRow {
    fn new(scenario: &str, summary: Summary) -> Self {
        Self {
            scenario: scenario.to_string(),
            capex: summary.capex_scenario.key.clone(),
            initial_capex: summary.capex_scenario.initial_capex,
            total_capex: summary.capex_scenario.total_capex,
            year10_revenue: summary.year10_revenue,
            year10_ebitda: summary.year10_ebitda,
            year10_students: summary.year10_students,
            irr_pct: summary.irr.map(|r| r * 100.0),
            npv: summary.npv,
            payback: summary.payback_period.to_string(),
            cumulative_fcf: summary.cumulative_fcf,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    let engine = ProjectionEngine::default();
    let presets = ScenarioPresets::builtin();
    let capex_keys: Vec<String> = CapexCatalog::default().keys().map(str::to_string).collect();

    let combinations: Vec<_> = presets
        .iter()
        .flat_map(|preset| capex_keys.iter().map(move |capex| (preset, capex)))
        .collect();
    println!("Running {} scenario combinations...", combinations.len());

    let rows: Vec<MatrixRow> = combinations
        .par_iter()
        .map(|(preset, capex)| -> anyhow::Result<MatrixRow> {
            let mut params = preset.parameters.clone();
            params.capex_scenario = capex.to_string();
            let (_, summary) = engine
                .run(&params)
                .with_context(|| format!("projecting {} / {}", preset.key, capex))?;
            Ok(MatrixRow::new(preset.key, summary))
        })
        .collect::<anyhow::Result<_>>()?;

    let output_path = "scenario_matrix_output.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", output_path);

    println!("\n{:<12} {:<10} {:>18} {:>10} {:>16}", "Scenario", "CAPEX", "NPV", "IRR", "Payback");
    for row in &rows {
        let irr = row
            .irr_pct
            .map(|r| format!("{:.2}%", r))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<12} {:<10} {:>18.0} {:>10} {:>16}",
            row.scenario, row.capex, row.npv, irr, row.payback
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

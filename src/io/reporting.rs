// src/io/reporting.rs

use crate::io::DataError;
use crate::simulation::{Comparison, StrategyResult};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Flat CSV row: one strategy of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub scenario: String,
    pub order_quantity_kg: f64,
    pub strategy: String,
    pub feasible: bool,
    pub total_cost: f64,
    pub weighted_delivery_weeks: f64,
    pub objective_value: Option<f64>,
    pub makespan_weeks: u32,
    pub allocated_kg: f64,
    pub shortfall_kg: f64,
    pub suppliers_used: String,
    pub allocation: String,
}

impl ResultRow {
    pub fn new(comparison: &Comparison, result: &StrategyResult) -> Self {
        Self {
            scenario: comparison.label.clone(),
            order_quantity_kg: comparison.scenario.order_quantity_kg,
            strategy: result.strategy.to_string(),
            feasible: result.feasible,
            total_cost: result.total_cost,
            weighted_delivery_weeks: result.weighted_delivery_weeks,
            objective_value: result.objective_value,
            makespan_weeks: result.makespan_weeks,
            allocated_kg: result.allocated_kg,
            shortfall_kg: result.shortfall_kg,
            suppliers_used: result.suppliers_used.join(";"),
            allocation: result
                .allocation
                .iter()
                .map(|(name, kg)| format!("{name}={kg:.1}"))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct TimelineRow<'a> {
    scenario: &'a str,
    strategy: &'a str,
    week: u32,
    delivered_kg: f64,
    cumulative_kg: f64,
    fill_rate: f64,
}

/// Writes every strategy of every comparison to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/comparison.csv").
/// * `comparisons` - Output of one or more comparator runs.
pub fn write_comparison_csv(
    file_path: impl AsRef<Path>,
    comparisons: &[Comparison],
) -> Result<usize, DataError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    let mut rows = 0;
    for comparison in comparisons {
        for result in &comparison.results {
            wtr.serialize(ResultRow::new(comparison, result))?;
            rows += 1;
        }
    }
    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    info!(rows, path = %path.display(), "exported comparison rows");
    Ok(rows)
}

/// Writes the week-by-week delivery curve of every strategy.
pub fn write_timeline_csv(
    file_path: impl AsRef<Path>,
    comparisons: &[Comparison],
) -> Result<usize, DataError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    let mut rows = 0;
    for comparison in comparisons {
        for result in &comparison.results {
            for record in &result.timeline {
                wtr.serialize(TimelineRow {
                    scenario: &comparison.label,
                    strategy: result.strategy.as_str(),
                    week: record.week,
                    delivered_kg: record.delivered_kg,
                    cumulative_kg: record.cumulative_kg,
                    fill_rate: record.fill_rate,
                })?;
                rows += 1;
            }
        }
    }
    wtr.flush()?;

    info!(rows, path = %path.display(), "exported timeline rows");
    Ok(rows)
}

/// Human-readable summary of one result, used as context for narrative reports.
pub fn format_result_summary(comparison: &Comparison, result: &StrategyResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario: {} [{}]", comparison.label, result.strategy);
    let _ = writeln!(out, "Order: {:.0} kg", comparison.scenario.order_quantity_kg);
    let _ = writeln!(out, "Feasible: {}", if result.feasible { "Yes" } else { "NO" });
    let _ = writeln!(out, "Weighted Delivery Time: {:.1} weeks", result.weighted_delivery_weeks);
    let _ = writeln!(out, "Last Shipment Lands: week {}", result.makespan_weeks);
    let _ = writeln!(out, "Total Cost: ${:.2}", result.total_cost);
    if let Some(value) = result.objective_value {
        let _ = writeln!(out, "Objective Value: {value:.4}");
    }
    let _ = writeln!(out, "Suppliers Used: {}", result.suppliers_used.join(", "));
    let _ = writeln!(out, "Allocation:");
    for (name, kg) in result.allocation.iter() {
        let _ = writeln!(out, "  - {name}: {kg:.0} kg");
    }
    if !result.feasible {
        let _ = writeln!(
            out,
            "WARNING: Shortfall of {:.0} kg. Available capacity cannot fully cover the order.",
            result.shortfall_kg
        );
    }
    if !comparison.exclusions.is_empty() {
        let _ = writeln!(out, "Excluded:");
        for exclusion in &comparison.exclusions {
            let _ = writeln!(out, "  - {} ({:?})", exclusion.supplier, exclusion.reason);
        }
    }
    out
}

/// Side-by-side table of all strategies in a comparison.
pub fn format_comparison_table(comparison: &Comparison) -> String {
    let best = comparison.best_feasible().map(|r| r.strategy);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {:.0} kg | solver: {}",
        comparison.label, comparison.scenario.order_quantity_kg, comparison.solver_backend
    );
    let _ = writeln!(
        out,
        "  {:<18} {:>14} {:>10} {:>9} {:>9}",
        "Strategy", "Cost", "Lead (wk)", "Makespan", "Feasible"
    );
    let _ = writeln!(out, "  {}", "-".repeat(64));
    for r in &comparison.results {
        let marker = if Some(r.strategy) == best { " *" } else { "" };
        let _ = writeln!(
            out,
            "  {:<18} {:>14} {:>10.2} {:>9} {:>9}{}",
            r.strategy.as_str(),
            format!("${:.2}", r.total_cost),
            r.weighted_delivery_weeks,
            r.makespan_weeks,
            r.feasible,
            marker
        );
    }
    out
}

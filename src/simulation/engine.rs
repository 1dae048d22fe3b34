// src/simulation/engine.rs

use crate::error::EngineError;
use crate::model::queues::ShipmentPipeline;
use crate::model::{Allocation, Scenario, Supplier, SupplierRegistry};
use crate::simulation::config::EngineConfig;
use serde::Serialize;
use tracing::debug;

/// One supplier's part of an allocation, as it moves through simulated time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub supplier: String,
    pub quantity_kg: f64,
    pub cost: f64,
    /// Lead time, pushed back to the end of a disruption for the disrupted supplier.
    pub delivery_week: u32,
    /// Week the last kg lands: never before the supplier could have produced it.
    pub landing_week: u32,
}

// We make this Serialize so it can be written to CSV later
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub week: u32,
    pub delivered_kg: f64,
    pub cumulative_kg: f64,
    pub fill_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FulfillmentReport {
    pub shipments: Vec<Shipment>,
    pub timeline: Vec<DeliveryRecord>,
    pub allocated_kg: f64,
    pub shortfall_kg: f64,
    pub total_cost: f64,
    pub weighted_delivery_weeks: f64,
    pub makespan_weeks: u32,
    pub feasible: bool,
}

/// Lead time after applying the scenario's disruption: the disrupted
/// supplier cannot ship before its capacity returns.
pub fn effective_lead_time(supplier: &Supplier, scenario: &Scenario) -> u32 {
    match scenario.active_disruption() {
        Some(d) if d.supplier == supplier.name => supplier.lead_time_weeks.max(d.duration_weeks),
        _ => supplier.lead_time_weeks,
    }
}

/// Whole weeks needed to produce `quantity_kg` at the supplier's weekly rate.
fn production_weeks(supplier: &Supplier, quantity_kg: f64) -> u32 {
    if supplier.capacity_kg_per_week <= 0.0 {
        return 0;
    }
    // Shave round-off so 800.0000000001 kg at 800 kg/wk is still one week
    let weeks = (quantity_kg / supplier.capacity_kg_per_week - 1e-9).ceil();
    weeks.max(0.0) as u32
}

/// Deterministic single-pass fulfillment of an allocation.
pub struct FulfillmentSimulator<'a> {
    registry: &'a SupplierRegistry,
    config: &'a EngineConfig,
}

impl<'a> FulfillmentSimulator<'a> {
    pub fn new(registry: &'a SupplierRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn simulate(
        &self,
        allocation: &Allocation,
        scenario: &Scenario,
    ) -> Result<FulfillmentReport, EngineError> {
        let order = scenario.order_quantity_kg;
        let tolerance = self.config.quantity_tolerance(order);

        let mut shipments = Vec::with_capacity(allocation.len());
        for (name, qty) in allocation.iter() {
            let supplier = self
                .registry
                .get(name)
                .ok_or_else(|| EngineError::UnknownSupplier(name.to_string()))?;
            self.check_quantity(supplier, qty, scenario, tolerance)?;

            let delivery_week = effective_lead_time(supplier, scenario);
            shipments.push(Shipment {
                supplier: supplier.name.clone(),
                quantity_kg: qty,
                cost: qty * supplier.cost_per_kg,
                delivery_week,
                landing_week: delivery_week.max(production_weeks(supplier, qty)),
            });
        }

        let allocated_kg: f64 = shipments.iter().map(|s| s.quantity_kg).sum();
        let total_cost: f64 = shipments.iter().map(|s| s.cost).sum();
        let weighted_delivery_weeks = if allocated_kg > 0.0 {
            shipments
                .iter()
                .map(|s| s.quantity_kg * f64::from(s.delivery_week))
                .sum::<f64>()
                / allocated_kg
        } else {
            0.0
        };

        let timeline = run_timeline(&shipments, order);
        let makespan_weeks = shipments.iter().map(|s| s.landing_week).max().unwrap_or(0);
        let feasible = (allocated_kg - order).abs() <= tolerance;

        debug!(
            scenario = %scenario.label(),
            allocated_kg,
            total_cost,
            weighted_delivery_weeks,
            makespan_weeks,
            feasible,
            "fulfillment simulated"
        );

        Ok(FulfillmentReport {
            shipments,
            timeline,
            allocated_kg,
            shortfall_kg: (order - allocated_kg).max(0.0),
            total_cost,
            weighted_delivery_weeks,
            makespan_weeks,
            feasible,
        })
    }

    fn check_quantity(
        &self,
        supplier: &Supplier,
        qty: f64,
        scenario: &Scenario,
        tolerance: f64,
    ) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidAllocation {
            supplier: supplier.name.clone(),
            reason,
        };
        if !qty.is_finite() || qty < 0.0 {
            return Err(invalid(format!("quantity {qty} is not a non-negative number")));
        }
        let cap = supplier.usable_capacity(scenario.planning_horizon_weeks);
        if qty > cap + tolerance {
            return Err(invalid(format!(
                "{qty:.1} kg exceeds usable capacity of {cap:.1} kg"
            )));
        }
        Ok(())
    }
}

/// Walks the arrival weeks in order and records one entry per week with a delivery.
fn run_timeline(shipments: &[Shipment], order_quantity_kg: f64) -> Vec<DeliveryRecord> {
    let mut pipeline = ShipmentPipeline::new();
    for s in shipments {
        pipeline.schedule(s.landing_week, s.quantity_kg);
    }

    let mut history = Vec::with_capacity(pipeline.len());
    let mut cumulative_kg = 0.0;
    while let Some((week, delivered_kg)) = pipeline.pop_arrival() {
        cumulative_kg += delivered_kg;
        history.push(DeliveryRecord {
            week,
            delivered_kg,
            cumulative_kg,
            fill_rate: cumulative_kg / order_quantity_kg,
        });
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_suppliers;

    fn registry() -> SupplierRegistry {
        SupplierRegistry::new(default_suppliers()).unwrap()
    }

    fn single(name: &str, qty: f64) -> Allocation {
        vec![(name.to_string(), qty)].into_iter().collect()
    }

    #[test]
    fn single_supplier_metrics() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let report = sim.simulate(&single("Titan-RU", 5000.0), &Scenario::new(5000.0)).unwrap();
        assert_eq!(report.total_cost, 110_000.0);
        assert_eq!(report.weighted_delivery_weeks, 8.0);
        assert_eq!(report.makespan_weeks, 8);
        assert!(report.feasible);
        assert_eq!(report.shortfall_kg, 0.0);
    }

    #[test]
    fn weighted_time_is_quantity_weighted() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let allocation: Allocation = vec![
            ("Titan-US".to_string(), 1000.0),
            ("Titan-RU".to_string(), 3000.0),
        ]
        .into_iter()
        .collect();
        let report = sim.simulate(&allocation, &Scenario::new(4000.0)).unwrap();
        assert!((report.weighted_delivery_weeks - 7.0).abs() < 1e-12);
        assert_eq!(report.total_cost, 32_000.0 + 66_000.0);
    }

    #[test]
    fn production_rate_can_delay_landing() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        // 5000 kg at 800 kg/wk takes 7 weeks, longer than the 4 week lead time
        let report = sim.simulate(&single("Titan-US", 5000.0), &Scenario::new(5000.0)).unwrap();
        assert_eq!(report.weighted_delivery_weeks, 4.0);
        assert_eq!(report.makespan_weeks, 7);
        assert_eq!(report.timeline.len(), 1);
        let last = report.timeline.last().unwrap();
        assert_eq!(last.week, 7);
        assert_eq!(last.delivered_kg, 5000.0);
        assert_eq!(last.cumulative_kg, 5000.0);
        assert_eq!(last.fill_rate, 1.0);
    }

    #[test]
    fn disrupted_supplier_ships_after_recovery() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let scenario = Scenario::new(1000.0).with_disruption("Titan-JP", 10);
        let report = sim.simulate(&single("Titan-JP", 1000.0), &scenario).unwrap();
        assert_eq!(report.shipments[0].delivery_week, 10);
        assert_eq!(report.weighted_delivery_weeks, 10.0);

        let short = Scenario::new(1000.0).with_disruption("Titan-JP", 2);
        let report = sim.simulate(&single("Titan-JP", 1000.0), &short).unwrap();
        assert_eq!(report.shipments[0].delivery_week, 6);
    }

    #[test]
    fn timeline_skips_weeks_without_arrivals() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let allocation: Allocation = vec![
            ("Titan-US".to_string(), 800.0),
            ("Titan-RU".to_string(), 2000.0),
        ]
        .into_iter()
        .collect();
        let report = sim.simulate(&allocation, &Scenario::new(2800.0)).unwrap();
        let weeks: Vec<u32> = report.timeline.iter().map(|r| r.week).collect();
        assert_eq!(weeks, vec![4, 8]);
        assert_eq!(report.timeline[1].cumulative_kg, 2800.0);
    }

    #[test]
    fn very_long_lead_time_keeps_timeline_small() {
        let reg = SupplierRegistry::new(vec![Supplier::new(
            "Slow",
            "Far away",
            2_000_000,
            50.0,
            10.0,
        )])
        .unwrap();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let report = sim.simulate(&single("Slow", 100.0), &Scenario::new(100.0)).unwrap();
        assert_eq!(report.makespan_weeks, 2_000_000);
        assert_eq!(report.timeline.len(), 1);
        assert_eq!(report.timeline[0].week, 2_000_000);
    }

    #[test]
    fn partial_allocation_reports_shortfall() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let report = sim.simulate(&single("Titan-AU", 7200.0), &Scenario::new(10_000.0)).unwrap();
        assert!(!report.feasible);
        assert_eq!(report.shortfall_kg, 2800.0);
    }

    #[test]
    fn empty_allocation_has_zero_metrics() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        let report = sim.simulate(&Allocation::new(), &Scenario::new(10.0)).unwrap();
        assert_eq!(report.weighted_delivery_weeks, 0.0);
        assert_eq!(report.makespan_weeks, 0);
        assert!(report.timeline.is_empty());
        assert!(!report.feasible);
    }

    #[test]
    fn rejects_unknown_and_over_capacity_entries() {
        let reg = registry();
        let config = EngineConfig::default();
        let sim = FulfillmentSimulator::new(&reg, &config);

        assert_eq!(
            sim.simulate(&single("Titan-XX", 1.0), &Scenario::new(1.0)).unwrap_err(),
            EngineError::UnknownSupplier("Titan-XX".to_string())
        );
        assert!(matches!(
            sim.simulate(&single("Titan-AU", 9000.0), &Scenario::new(9000.0)),
            Err(EngineError::InvalidAllocation { .. })
        ));
    }
}

// src/io/scenarios.rs

use crate::io::DataError;
use crate::model::{Scenario, SupplierRegistry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Baseline plus one scenario per registered supplier taken offline.
pub fn disruption_sweep(
    registry: &SupplierRegistry,
    base: &Scenario,
    duration_weeks: u32,
) -> Vec<Scenario> {
    let mut scenarios = Vec::with_capacity(registry.len() + 1);
    let mut baseline = base.clone();
    baseline.disruption = None;
    scenarios.push(baseline);

    for supplier in registry.suppliers() {
        scenarios.push(base.clone().with_disruption(supplier.name.clone(), duration_weeks));
    }
    scenarios
}

/// Copies of `base` with order quantities drawn from a Normal distribution.
///
/// Seeded so that a sweep can be reproduced exactly.
///
/// # Arguments
/// * `samples` - Number of scenarios to generate.
/// * `mean` - The average order size in kg (e.g., 5000.0).
/// * `std_dev` - The standard deviation (volatility) (e.g., 1000.0).
/// * `seed` - RNG seed.
pub fn normal_demand_sweep(
    base: &Scenario,
    samples: usize,
    mean: f64,
    std_dev: f64,
    seed: u64,
) -> Result<Vec<Scenario>, DataError> {
    // Normal::new only rejects a non-finite std dev
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(DataError::Distribution(format!(
            "standard deviation must be finite and non-negative, got {std_dev}"
        )));
    }
    let normal =
        Normal::new(mean, std_dev).map_err(|e| DataError::Distribution(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut scenarios = Vec::with_capacity(samples);
    for _ in 0..samples {
        let val: f64 = normal.sample(&mut rng);

        // Whole kilograms, and an order always asks for something
        let quantity = val.round().max(1.0);

        let mut scenario = base.clone();
        scenario.order_quantity_kg = quantity;
        scenarios.push(scenario);
    }
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_suppliers;

    #[test]
    fn sweep_covers_every_supplier_once() {
        let registry = SupplierRegistry::new(default_suppliers()).unwrap();
        let scenarios = disruption_sweep(&registry, &Scenario::new(5000.0), 8);

        assert_eq!(scenarios.len(), 6);
        assert!(scenarios[0].disruption.is_none());
        let disrupted: Vec<&str> = scenarios[1..]
            .iter()
            .map(|s| s.disruption.as_ref().unwrap().supplier.as_str())
            .collect();
        assert_eq!(disrupted, vec!["Titan-US", "Titan-JP", "Titan-RU", "Titan-CN", "Titan-AU"]);
    }

    #[test]
    fn demand_sweep_is_reproducible_and_positive() {
        let base = Scenario::new(1.0);
        let a = normal_demand_sweep(&base, 50, 100.0, 80.0, 42).unwrap();
        let b = normal_demand_sweep(&base, 50, 100.0, 80.0, 42).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|s| s.order_quantity_kg >= 1.0));
        assert!(a.iter().all(|s| s.order_quantity_kg.fract() == 0.0));
    }

    #[test]
    fn negative_std_dev_is_rejected() {
        let result = normal_demand_sweep(&Scenario::new(1.0), 3, 10.0, -1.0, 0);
        assert!(matches!(result, Err(DataError::Distribution(_))));

        let result = normal_demand_sweep(&Scenario::new(1.0), 3, 10.0, f64::NAN, 0);
        assert!(matches!(result, Err(DataError::Distribution(_))));
    }

    #[test]
    fn zero_std_dev_repeats_the_mean() {
        let scenarios = normal_demand_sweep(&Scenario::new(1.0), 4, 2500.0, 0.0, 7).unwrap();
        assert!(scenarios.iter().all(|s| s.order_quantity_kg == 2500.0));
    }
}

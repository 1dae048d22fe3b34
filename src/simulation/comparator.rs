// src/simulation/comparator.rs

use crate::error::EngineError;
use crate::model::{Allocation, Exclusion, Scenario, SupplierRegistry};
use crate::simulation::config::EngineConfig;
use crate::simulation::engine::{DeliveryRecord, FulfillmentReport, FulfillmentSimulator};
use crate::solver::LpBackend;
use crate::strategy::{
    AllocationContext, AllocationPolicy, BalanceWeights, CheapestFirstPolicy, FastestFirstPolicy,
    Objective, OptimalPolicy, ProportionalPolicy, StrategyId,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one strategy against one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    pub strategy: StrategyId,
    pub allocation: Allocation,
    pub total_cost: f64,
    pub weighted_delivery_weeks: f64,
    pub feasible: bool,
    /// Minimized objective of the LP strategies; `None` for heuristics.
    pub objective_value: Option<f64>,
    pub suppliers_used: Vec<String>,
    pub allocated_kg: f64,
    pub shortfall_kg: f64,
    pub makespan_weeks: u32,
    pub timeline: Vec<DeliveryRecord>,
}

impl StrategyResult {
    fn from_report(
        strategy: StrategyId,
        allocation: Allocation,
        objective_value: Option<f64>,
        report: FulfillmentReport,
    ) -> Self {
        Self {
            strategy,
            objective_value,
            suppliers_used: allocation.supplier_names(),
            allocation,
            total_cost: report.total_cost,
            weighted_delivery_weeks: report.weighted_delivery_weeks,
            feasible: report.feasible,
            allocated_kg: report.allocated_kg,
            shortfall_kg: report.shortfall_kg,
            makespan_weeks: report.makespan_weeks,
            timeline: report.timeline,
        }
    }
}

/// All six strategies evaluated against one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub scenario: Scenario,
    pub label: String,
    pub solver_backend: String,
    pub exclusions: Vec<Exclusion>,
    pub results: Vec<StrategyResult>,
}

impl Comparison {
    pub fn result(&self, strategy: StrategyId) -> Option<&StrategyResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }

    /// Lowest-cost feasible result; the earlier strategy wins a tie.
    pub fn best_feasible(&self) -> Option<&StrategyResult> {
        self.results
            .iter()
            .filter(|r| r.feasible)
            .fold(None, |best: Option<&StrategyResult>, r| match best {
                Some(b) if b.total_cost <= r.total_cost => Some(b),
                _ => Some(r),
            })
    }

    pub fn all_feasible(&self) -> bool {
        self.results.iter().all(|r| r.feasible)
    }
}

/// Runs the fixed strategy line-up against scenarios drawn on one registry.
///
/// Holds only immutable state, so one comparator can serve many threads.
#[derive(Debug)]
pub struct StrategyComparator {
    registry: SupplierRegistry,
    config: EngineConfig,
    backend: Arc<dyn LpBackend>,
    policies: Vec<Box<dyn AllocationPolicy>>,
}

impl StrategyComparator {
    pub fn new(
        registry: SupplierRegistry,
        config: EngineConfig,
        backend: Arc<dyn LpBackend>,
    ) -> Self {
        let weights = BalanceWeights {
            cost: config.cost_weight,
            time: config.time_weight,
        };

        // Order here is the reporting order
        let policies: Vec<Box<dyn AllocationPolicy>> = vec![
            Box::new(ProportionalPolicy::new()),
            Box::new(CheapestFirstPolicy::new()),
            Box::new(FastestFirstPolicy::new()),
            Box::new(OptimalPolicy::new(Objective::MinCost, Arc::clone(&backend))),
            Box::new(OptimalPolicy::new(Objective::MinTime, Arc::clone(&backend))),
            Box::new(
                OptimalPolicy::new(Objective::Balanced, Arc::clone(&backend)).with_weights(weights),
            ),
        ];

        Self {
            registry,
            config,
            backend,
            policies,
        }
    }

    pub fn registry(&self) -> &SupplierRegistry {
        &self.registry
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Evaluates all six strategies, in order, against `scenario`.
    pub fn compare(&self, scenario: &Scenario) -> Result<Comparison, EngineError> {
        let available = self.registry.available_suppliers(scenario)?;
        let context = AllocationContext {
            order_quantity_kg: scenario.order_quantity_kg,
            horizon_weeks: scenario.planning_horizon_weeks,
            quantity_tolerance: self.config.quantity_tolerance(scenario.order_quantity_kg),
        };
        let simulator = FulfillmentSimulator::new(&self.registry, &self.config);

        let mut results = Vec::with_capacity(self.policies.len());
        for policy in &self.policies {
            let allocation = policy.allocate(&available, &context)?;
            let report = simulator.simulate(&allocation, scenario)?;
            debug!(
                strategy = %policy.id(),
                cost = report.total_cost,
                weeks = report.weighted_delivery_weeks,
                feasible = report.feasible,
                "strategy evaluated"
            );
            if !report.feasible {
                warn!(
                    strategy = %policy.id(),
                    shortfall_kg = report.shortfall_kg,
                    "available capacity cannot fully cover the order"
                );
            }
            let objective_value = policy.objective_value(&available, &allocation);
            results.push(StrategyResult::from_report(
                policy.id(),
                allocation,
                objective_value,
                report,
            ));
        }

        let comparison = Comparison {
            scenario: scenario.clone(),
            label: scenario.label(),
            solver_backend: self.backend.name().to_string(),
            exclusions: self.registry.exclusions(scenario),
            results,
        };
        let best = comparison
            .best_feasible()
            .map(|r| r.strategy.as_str())
            .unwrap_or("none");
        info!(
            scenario = %comparison.label,
            suppliers = available.len(),
            best,
            "comparison complete"
        );
        Ok(comparison)
    }

    /// Evaluates scenarios independently; a failing scenario does not stop the rest.
    pub fn compare_batch(&self, scenarios: &[Scenario]) -> Vec<Result<Comparison, EngineError>> {
        scenarios
            .iter()
            .map(|scenario| {
                let outcome = self.compare(scenario);
                if let Err(e) = &outcome {
                    warn!(scenario = %scenario.label(), error = %e, "scenario skipped");
                }
                outcome
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_suppliers;
    use crate::solver::DenseSimplex;

    fn comparator() -> StrategyComparator {
        StrategyComparator::new(
            SupplierRegistry::new(default_suppliers()).unwrap(),
            EngineConfig::default(),
            Arc::new(DenseSimplex::default()),
        )
    }

    #[test]
    fn results_follow_fixed_order() {
        let comparator = comparator();
        assert_eq!(comparator.backend_name(), "simplex");
        let comparison = comparator.compare(&Scenario::new(5000.0)).unwrap();
        let order: Vec<StrategyId> = comparison.results.iter().map(|r| r.strategy).collect();
        assert_eq!(order, StrategyId::ALL.to_vec());
        assert_eq!(comparison.solver_backend, "simplex");
        assert!(comparison.results[..3].iter().all(|r| r.objective_value.is_none()));
        let cost = comparison.result(StrategyId::OptimalCost).unwrap();
        assert_eq!(cost.objective_value, Some(cost.total_cost));
    }

    #[test]
    fn best_feasible_prefers_lowest_cost() {
        let comparison = comparator().compare(&Scenario::new(5000.0)).unwrap();
        // cheapest_first and optimal_cost tie; the heuristic comes first
        let best = comparison.best_feasible().unwrap();
        assert_eq!(best.strategy, StrategyId::CheapestFirst);
    }

    #[test]
    fn batch_keeps_going_after_a_bad_scenario() {
        let scenarios = vec![
            Scenario::new(5000.0).with_disruption("Nobody", 3),
            Scenario::new(5000.0),
        ];
        let outcomes = comparator().compare_batch(&scenarios);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].as_ref().unwrap_err(),
            &EngineError::UnknownSupplier("Nobody".to_string())
        );
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn comparator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StrategyComparator>();
    }
}

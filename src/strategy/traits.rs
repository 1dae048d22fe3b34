// src/strategy/traits.rs

use crate::error::EngineError;
use crate::model::{Allocation, Supplier};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// The six strategies the comparator runs, in their reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    Proportional,
    CheapestFirst,
    FastestFirst,
    OptimalCost,
    OptimalTime,
    OptimalBalanced,
}

impl StrategyId {
    pub const ALL: [StrategyId; 6] = [
        StrategyId::Proportional,
        StrategyId::CheapestFirst,
        StrategyId::FastestFirst,
        StrategyId::OptimalCost,
        StrategyId::OptimalTime,
        StrategyId::OptimalBalanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::Proportional => "proportional",
            StrategyId::CheapestFirst => "cheapest_first",
            StrategyId::FastestFirst => "fastest_first",
            StrategyId::OptimalCost => "optimal_cost",
            StrategyId::OptimalTime => "optimal_time",
            StrategyId::OptimalBalanced => "optimal_balanced",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-scenario inputs every policy needs besides the supplier list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationContext {
    pub order_quantity_kg: f64,
    pub horizon_weeks: u32,
    /// Absolute kg slack below which a quantity counts as zero or as "at the cap".
    pub quantity_tolerance: f64,
}

impl AllocationContext {
    pub fn usable_capacity(&self, supplier: &Supplier) -> f64 {
        supplier.usable_capacity(self.horizon_weeks)
    }
}

/// Decides how an order is split across the available suppliers.
///
/// We require `Send` + `Sync` so callers can evaluate strategies in parallel.
/// Implementations must be deterministic and must never allocate above a
/// supplier's usable capacity.
pub trait AllocationPolicy: Debug + Send + Sync {
    fn id(&self) -> StrategyId;

    /// # Arguments
    /// * `suppliers` - The filtered, non-disrupted candidates, in registry order.
    /// * `context` - Order quantity, horizon and tolerance for this scenario.
    fn allocate(
        &self,
        suppliers: &[&Supplier],
        context: &AllocationContext,
    ) -> Result<Allocation, EngineError>;

    /// What the policy minimizes, evaluated at `allocation`. Heuristics have none.
    fn objective_value(&self, _suppliers: &[&Supplier], _allocation: &Allocation) -> Option<f64> {
        None
    }
}

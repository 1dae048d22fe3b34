// src/strategy/implementations.rs

use crate::error::EngineError;
use crate::model::{Allocation, Supplier};
use crate::strategy::traits::{AllocationContext, AllocationPolicy, StrategyId};
use std::cmp::Ordering;

// =========================================================================
// 1. Proportional Policy
// =========================================================================

/// Splits the order by each supplier's share of total weekly capacity.
///
/// When the panel cannot cover the order within the horizon the shares are
/// scaled down, which leaves every supplier at its full usable capacity.
#[derive(Debug, Clone, Default)]
pub struct ProportionalPolicy;

impl ProportionalPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationPolicy for ProportionalPolicy {
    fn id(&self) -> StrategyId {
        StrategyId::Proportional
    }

    fn allocate(
        &self,
        suppliers: &[&Supplier],
        context: &AllocationContext,
    ) -> Result<Allocation, EngineError> {
        let total_capacity: f64 = suppliers.iter().map(|s| context.usable_capacity(s)).sum();
        let mut allocation = Allocation::new();
        if total_capacity <= 0.0 {
            return Ok(allocation);
        }

        // Cannot place more than the panel can make
        let placed = context.order_quantity_kg.min(total_capacity);

        for s in suppliers {
            let cap = context.usable_capacity(s);
            let share = cap / total_capacity;
            allocation.add(&s.name, (placed * share).min(cap));
        }
        Ok(allocation)
    }
}

// =========================================================================
// 2. Cheapest-First Policy
// =========================================================================

/// Fills from the lowest unit cost upward, each supplier up to its cap.
#[derive(Debug, Clone, Default)]
pub struct CheapestFirstPolicy;

impl CheapestFirstPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationPolicy for CheapestFirstPolicy {
    fn id(&self) -> StrategyId {
        StrategyId::CheapestFirst
    }

    fn allocate(
        &self,
        suppliers: &[&Supplier],
        context: &AllocationContext,
    ) -> Result<Allocation, EngineError> {
        Ok(greedy_fill(suppliers, context, |a, b| {
            a.cost_per_kg.total_cmp(&b.cost_per_kg)
        }))
    }
}

// =========================================================================
// 3. Fastest-First Policy
// =========================================================================

/// Fills from the shortest lead time upward, each supplier up to its cap.
#[derive(Debug, Clone, Default)]
pub struct FastestFirstPolicy;

impl FastestFirstPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationPolicy for FastestFirstPolicy {
    fn id(&self) -> StrategyId {
        StrategyId::FastestFirst
    }

    fn allocate(
        &self,
        suppliers: &[&Supplier],
        context: &AllocationContext,
    ) -> Result<Allocation, EngineError> {
        Ok(greedy_fill(suppliers, context, |a, b| {
            a.lead_time_weeks.cmp(&b.lead_time_weeks)
        }))
    }
}

/// Shared greedy: sort by `key` (ties by name), then take as much as each
/// supplier can make until the order is covered or the list runs out.
fn greedy_fill<F>(suppliers: &[&Supplier], context: &AllocationContext, key: F) -> Allocation
where
    F: Fn(&Supplier, &Supplier) -> Ordering,
{
    let mut sorted: Vec<&Supplier> = suppliers.to_vec();
    sorted.sort_by(|a, b| key(a, b).then_with(|| a.name.cmp(&b.name)));

    let mut allocation = Allocation::new();
    let mut remaining = context.order_quantity_kg;
    for s in sorted {
        if remaining <= 0.0 {
            break;
        }
        let take = remaining.min(context.usable_capacity(s));
        allocation.add(&s.name, take);
        remaining -= take;
    }
    allocation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(order: f64) -> AllocationContext {
        AllocationContext {
            order_quantity_kg: order,
            horizon_weeks: 12,
            quantity_tolerance: 1e-6 * order,
        }
    }

    fn panel() -> Vec<Supplier> {
        vec![
            Supplier::new("US", "United States", 4, 800.0, 32.0),
            Supplier::new("JP", "Japan", 6, 1200.0, 28.0),
            Supplier::new("RU", "Russia", 8, 2000.0, 22.0),
            Supplier::new("AU", "Australia", 5, 600.0, 35.0),
        ]
    }

    #[test]
    fn proportional_follows_capacity_share() {
        let owned = panel();
        let suppliers: Vec<&Supplier> = owned.iter().collect();
        let policy = ProportionalPolicy::new();
        let a = policy.allocate(&suppliers, &context(4600.0)).unwrap();

        assert!((a.get("US") - 800.0).abs() < 1e-9);
        assert!((a.get("JP") - 1200.0).abs() < 1e-9);
        assert!((a.get("RU") - 2000.0).abs() < 1e-9);
        assert!((a.get("AU") - 600.0).abs() < 1e-9);
        assert!((a.get("JP") / a.get("US") - 1.5).abs() < 1e-12);
    }

    #[test]
    fn proportional_scales_down_to_full_capacity() {
        let owned = panel();
        let suppliers: Vec<&Supplier> = owned.iter().collect();
        let policy = ProportionalPolicy::new();
        let a = policy.allocate(&suppliers, &context(100_000.0)).unwrap();

        for s in &owned {
            assert!((a.get(&s.name) - s.usable_capacity(12)).abs() < 1e-9);
        }
        assert!((a.total() - 55_200.0).abs() < 1e-6);
    }

    #[test]
    fn proportional_with_no_capacity_is_empty() {
        let owned = vec![Supplier::new("Idle", "X", 1, 0.0, 1.0)];
        let suppliers: Vec<&Supplier> = owned.iter().collect();
        let policy = ProportionalPolicy::new();
        let a = policy.allocate(&suppliers, &context(10.0)).unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn cheapest_first_spills_over_to_next_supplier() {
        let owned = panel();
        let suppliers: Vec<&Supplier> = owned.iter().collect();
        let policy = CheapestFirstPolicy::new();
        let a = policy.allocate(&suppliers, &context(30_000.0)).unwrap();

        assert_eq!(a.get("RU"), 24_000.0);
        assert_eq!(a.get("JP"), 6_000.0);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn fastest_first_breaks_ties_by_name() {
        let owned = vec![
            Supplier::new("Beta", "X", 3, 10.0, 5.0),
            Supplier::new("Alpha", "Y", 3, 10.0, 9.0),
        ];
        let suppliers: Vec<&Supplier> = owned.iter().collect();
        let policy = FastestFirstPolicy::new();
        let a = policy.allocate(&suppliers, &context(50.0)).unwrap();

        assert_eq!(a.get("Alpha"), 50.0);
        assert!(!a.contains("Beta"));
    }

    #[test]
    fn greedy_stops_when_suppliers_run_out() {
        let owned = panel();
        let suppliers: Vec<&Supplier> = owned.iter().collect();
        let policy = FastestFirstPolicy::new();
        let a = policy.allocate(&suppliers, &context(60_000.0)).unwrap();

        assert_eq!(a.total(), 55_200.0);
        for s in &owned {
            assert_eq!(a.get(&s.name), s.usable_capacity(12));
        }
    }
}

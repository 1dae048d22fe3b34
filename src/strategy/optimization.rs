// src/strategy/optimization.rs

//! LP-optimal allocation.
//!
//! ```text
//! minimize    sum( coeff[i] * x[i] )
//! subject to  sum( x[i] ) = order_quantity
//!             0 <= x[i] <= capacity_per_week[i] * horizon_weeks
//! ```
//!
//! When the panel cannot cover the order the equality is infeasible. The
//! allocator then fills as much as possible (`sum(x) <= order`, maximizing
//! `sum(x)`) and, at that filled quantity, still minimizes the objective.
//!
//! Suppliers that tie on the objective are filled by the other attribute
//! (cost for time, lead time for cost), then by name, whatever the backend.

use crate::error::EngineError;
use crate::model::{Allocation, Supplier};
use crate::solver::{Constraint, LinearProgram, LpBackend, LpError};
use crate::strategy::traits::{AllocationContext, AllocationPolicy, StrategyId};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    MinCost,
    MinTime,
    Balanced,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::MinCost => "min_cost",
            Objective::MinTime => "min_time",
            Objective::Balanced => "balanced",
        }
    }
}

/// Weights of the balanced objective; the defaults are 0.6 cost / 0.4 time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceWeights {
    pub cost: f64,
    pub time: f64,
}

impl Default for BalanceWeights {
    fn default() -> Self {
        Self {
            cost: 0.6,
            time: 0.4,
        }
    }
}

/// Min-max normalization onto [0, 1]; a constant attribute maps to all zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Per-kg objective coefficient of each supplier, in input order.
pub fn objective_coefficients(
    objective: Objective,
    suppliers: &[&Supplier],
    weights: BalanceWeights,
) -> Vec<f64> {
    let costs: Vec<f64> = suppliers.iter().map(|s| s.cost_per_kg).collect();
    let times: Vec<f64> = suppliers
        .iter()
        .map(|s| f64::from(s.lead_time_weeks))
        .collect();

    match objective {
        Objective::MinCost => costs,
        Objective::MinTime => times,
        Objective::Balanced => normalize(&costs)
            .into_iter()
            .zip(normalize(&times))
            .map(|(c, t)| weights.cost * c + weights.time * t)
            .collect(),
    }
}

/// Snaps backend output onto its bounds.
///
/// Values within `tolerance` of zero or of their cap are set exactly to it,
/// and a single remaining fractional value absorbs the residual so the total
/// hits `target` exactly. Two backends that land on the same vertex thus
/// return bit-identical allocations.
pub fn polish(values: &[f64], caps: &[f64], target: f64, tolerance: f64) -> Vec<f64> {
    let mut out: Vec<f64> = values
        .iter()
        .zip(caps)
        .map(|(&v, &cap)| {
            if v <= tolerance {
                0.0
            } else if cap - v <= tolerance {
                cap
            } else {
                v
            }
        })
        .collect();

    let fractional: Vec<usize> = (0..out.len())
        .filter(|&i| out[i] != 0.0 && out[i] != caps[i])
        .collect();
    if let [i] = fractional[..] {
        let rest: f64 = out
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, v)| v)
            .sum();
        out[i] = (target - rest).clamp(0.0, caps[i]);
    }
    out
}

/// Relative gap under which two objective coefficients count as a tie.
const COEFF_TIE_TOLERANCE: f64 = 1e-9;

/// Supplier indices in the order ties are broken for `objective`: the
/// attribute the objective does not (or only partly) look at, then name.
pub fn tie_break_order(objective: Objective, suppliers: &[&Supplier]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..suppliers.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (suppliers[a], suppliers[b]);
        let lead = sa.lead_time_weeks.cmp(&sb.lead_time_weeks);
        let cost = sa.cost_per_kg.total_cmp(&sb.cost_per_kg);
        match objective {
            Objective::MinCost => lead.then(cost),
            Objective::MinTime | Objective::Balanced => cost.then(lead),
        }
        .then_with(|| sa.name.cmp(&sb.name))
    });
    order
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GroupFill {
    Empty,
    Full,
    Partial(f64),
}

/// Maps an optimal point onto the single canonical optimum.
///
/// Suppliers whose coefficients tie are interchangeable, so only each tie
/// group's total is taken from the backend. Totals within `tolerance` of
/// empty or full snap to it; at most one group sits in between and it gets
/// what the others leave of `target`. Each group is then refilled in `rank`
/// order. Backends that agree on the optimum thus agree on every bit.
pub fn canonicalize(
    values: &[f64],
    caps: &[f64],
    coeffs: &[f64],
    rank: &[usize],
    target: f64,
    tolerance: f64,
) -> Vec<f64> {
    let ties = |a: f64, b: f64| {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= COEFF_TIE_TOLERANCE * scale
    };

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &i in rank {
        match groups.iter().position(|g| ties(coeffs[g[0]], coeffs[i])) {
            Some(g) => groups[g].push(i),
            None => groups.push(vec![i]),
        }
    }

    let mut fills: Vec<GroupFill> = groups
        .iter()
        .map(|group| {
            let capacity: f64 = group.iter().map(|&i| caps[i]).sum();
            let total: f64 = group.iter().map(|&i| values[i]).sum();
            if total <= tolerance {
                GroupFill::Empty
            } else if capacity - total <= tolerance {
                GroupFill::Full
            } else {
                GroupFill::Partial(total)
            }
        })
        .collect();

    let partial: Vec<usize> = (0..fills.len())
        .filter(|&g| matches!(fills[g], GroupFill::Partial(_)))
        .collect();
    if let [g] = partial[..] {
        let full: f64 = groups
            .iter()
            .zip(&fills)
            .filter(|(_, fill)| **fill == GroupFill::Full)
            .flat_map(|(group, _)| group.iter().map(|&i| caps[i]))
            .sum();
        let capacity: f64 = groups[g].iter().map(|&i| caps[i]).sum();
        fills[g] = GroupFill::Partial((target - full).clamp(0.0, capacity));
    }

    let mut out = vec![0.0; values.len()];
    for (group, fill) in groups.iter().zip(fills) {
        match fill {
            GroupFill::Empty => {}
            GroupFill::Full => {
                for &i in group {
                    out[i] = caps[i];
                }
            }
            GroupFill::Partial(total) => {
                let mut remaining = total;
                for &i in group {
                    if remaining <= tolerance {
                        break;
                    }
                    let take = remaining.min(caps[i]);
                    out[i] = take;
                    remaining -= take;
                }
            }
        }
    }
    out
}

/// LP-backed policy for one of the three objectives.
#[derive(Debug, Clone)]
pub struct OptimalPolicy {
    objective: Objective,
    weights: BalanceWeights,
    backend: Arc<dyn LpBackend>,
}

impl OptimalPolicy {
    pub fn new(objective: Objective, backend: Arc<dyn LpBackend>) -> Self {
        Self {
            objective,
            weights: BalanceWeights::default(),
            backend,
        }
    }

    pub fn with_weights(mut self, weights: BalanceWeights) -> Self {
        self.weights = weights;
        self
    }

    fn solver_failure(&self, error: &LpError) -> EngineError {
        EngineError::SolverFailure {
            backend: self.backend.name().to_string(),
            reason: error.to_string(),
        }
    }

    /// Solves `min coeffs.x` with `sum(x) = quantity`, returning the canonical optimum.
    fn solve_exact(
        &self,
        coeffs: &[f64],
        caps: &[f64],
        rank: &[usize],
        quantity: f64,
        tolerance: f64,
    ) -> Result<Vec<f64>, LpError> {
        let n = caps.len();
        let program = LinearProgram::new(coeffs.to_vec(), caps.to_vec())
            .with_constraint(Constraint::equal(vec![1.0; n], quantity));
        let solution = self.backend.solve(&program)?;
        debug!(
            objective = self.objective.as_str(),
            backend = self.backend.name(),
            iterations = solution.iterations,
            value = solution.objective_value,
            "lp solved"
        );
        let values = polish(&solution.values, caps, quantity, tolerance);
        Ok(canonicalize(&values, caps, coeffs, rank, quantity, tolerance))
    }

    /// Relaxed two-stage solve used when the order exceeds total capacity.
    fn solve_relaxed(
        &self,
        coeffs: &[f64],
        caps: &[f64],
        rank: &[usize],
        order: f64,
        tolerance: f64,
    ) -> Result<Vec<f64>, LpError> {
        let n = caps.len();

        // Stage 1: fill as much as the panel allows
        let fill = LinearProgram::new(vec![-1.0; n], caps.to_vec())
            .with_constraint(Constraint::at_most(vec![1.0; n], order));
        let filled: f64 = self.backend.solve(&fill)?.values.iter().sum();
        let capacity: f64 = caps.iter().sum();
        let filled = if capacity - filled <= tolerance {
            capacity.min(order)
        } else {
            filled.min(order)
        };

        // Stage 2: cheapest (or fastest) way to reach that filled quantity
        self.solve_exact(coeffs, caps, rank, filled, tolerance)
    }
}

impl AllocationPolicy for OptimalPolicy {
    fn id(&self) -> StrategyId {
        match self.objective {
            Objective::MinCost => StrategyId::OptimalCost,
            Objective::MinTime => StrategyId::OptimalTime,
            Objective::Balanced => StrategyId::OptimalBalanced,
        }
    }

    fn allocate(
        &self,
        suppliers: &[&Supplier],
        context: &AllocationContext,
    ) -> Result<Allocation, EngineError> {
        let caps: Vec<f64> = suppliers
            .iter()
            .map(|s| context.usable_capacity(s))
            .collect();
        let coeffs = objective_coefficients(self.objective, suppliers, self.weights);
        let rank = tie_break_order(self.objective, suppliers);
        let order = context.order_quantity_kg;
        let tolerance = context.quantity_tolerance;

        let values = match self.solve_exact(&coeffs, &caps, &rank, order, tolerance) {
            Ok(values) => values,
            Err(LpError::Infeasible) => {
                warn!(
                    objective = self.objective.as_str(),
                    order_kg = order,
                    capacity_kg = caps.iter().sum::<f64>(),
                    "order exceeds usable capacity, maximizing fulfillment"
                );
                self.solve_relaxed(&coeffs, &caps, &rank, order, tolerance)
                    .map_err(|e| self.solver_failure(&e))?
            }
            Err(e) => return Err(self.solver_failure(&e)),
        };

        Ok(suppliers
            .iter()
            .zip(values)
            .map(|(s, qty)| (s.name.clone(), qty))
            .collect())
    }

    fn objective_value(&self, suppliers: &[&Supplier], allocation: &Allocation) -> Option<f64> {
        let coeffs = objective_coefficients(self.objective, suppliers, self.weights);
        Some(
            suppliers
                .iter()
                .zip(coeffs)
                .map(|(s, c)| c * allocation.get(&s.name))
                .sum(),
        )
    }
}

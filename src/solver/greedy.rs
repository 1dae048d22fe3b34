// src/solver/greedy.rs

use crate::solver::{LinearProgram, LpBackend, LpError, LpSolution, Relation};

/// Exact solver for programs with a single all-ones budget row.
///
/// With one row `sum(x) (=, <=, >=) b` and box bounds the problem is a
/// continuous knapsack: filling variables in ascending objective order
/// (ties by index) reaches an optimal vertex. Anything else is rejected
/// with [`LpError::Unsupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedGreedy;

const TOLERANCE: f64 = 1e-9;

impl LpBackend for BoundedGreedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, LpError> {
        program.validate()?;
        let [row] = program.constraints.as_slice() else {
            return Err(LpError::Unsupported(format!(
                "expected exactly one constraint, got {}",
                program.constraints.len()
            )));
        };
        if !row.is_budget_row() {
            return Err(LpError::Unsupported(
                "constraint coefficients must all be 1".to_string(),
            ));
        }
        if row.rhs < 0.0 {
            // sum(x) >= 0 always holds, anything tighter is impossible
            return match row.relation {
                Relation::GreaterOrEqual => solve_unconstrained(program),
                _ => Err(LpError::Infeasible),
            };
        }

        let c = &program.objective;
        let u = &program.upper_bounds;
        let mut order: Vec<usize> = (0..c.len()).collect();
        order.sort_by(|&a, &b| c[a].total_cmp(&c[b]).then(a.cmp(&b)));

        let n = c.len();
        let mut values = vec![0.0; n];
        let mut filled = 0.0;
        let mut touched = 0;
        let target = row.rhs;
        let slack = TOLERANCE * (1.0 + target);

        let mut take = |i: usize, limit: f64, values: &mut Vec<f64>, filled: &mut f64| {
            let amount = (limit - *filled).min(u[i]).max(0.0);
            if amount > 0.0 {
                values[i] = amount;
                *filled += amount;
                touched += 1;
            }
        };

        match row.relation {
            Relation::Equal => {
                for &i in &order {
                    if filled >= target {
                        break;
                    }
                    take(i, target, &mut values, &mut filled);
                }
                if filled < target - slack {
                    return Err(LpError::Infeasible);
                }
            }
            Relation::LessOrEqual => {
                // Only variables that lower the objective are worth the budget
                for &i in order.iter().filter(|&&i| c[i] < 0.0) {
                    if filled >= target {
                        break;
                    }
                    take(i, target, &mut values, &mut filled);
                }
            }
            Relation::GreaterOrEqual => {
                for &i in order.iter().filter(|&&i| c[i] < 0.0) {
                    if u[i].is_infinite() {
                        return Err(LpError::Unbounded);
                    }
                    take(i, f64::INFINITY, &mut values, &mut filled);
                }
                for &i in order.iter().filter(|&&i| c[i] >= 0.0) {
                    if filled >= target {
                        break;
                    }
                    take(i, target, &mut values, &mut filled);
                }
                if filled < target - slack {
                    return Err(LpError::Infeasible);
                }
            }
        }

        Ok(LpSolution {
            objective_value: program.evaluate(&values),
            values,
            iterations: touched,
        })
    }
}

/// Box-bounded minimization with no binding row: negative costs go to their bound.
fn solve_unconstrained(program: &LinearProgram) -> Result<LpSolution, LpError> {
    let mut values = vec![0.0; program.num_variables()];
    let bounds = program.objective.iter().zip(&program.upper_bounds);
    for (i, (&c, &u)) in bounds.enumerate() {
        if c < 0.0 {
            if u.is_infinite() {
                return Err(LpError::Unbounded);
            }
            values[i] = u;
        }
    }
    Ok(LpSolution {
        objective_value: program.evaluate(&values),
        values,
        iterations: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Constraint, DenseSimplex};

    #[test]
    fn equality_fills_in_cost_order() {
        let lp = LinearProgram::new(
            vec![32.0, 28.0, 22.0, 35.0],
            vec![9600.0, 14400.0, 24000.0, 7200.0],
        )
        .with_constraint(Constraint::equal(vec![1.0; 4], 30000.0));
        let sol = BoundedGreedy.solve(&lp).unwrap();
        assert_eq!(sol.values, vec![0.0, 6000.0, 24000.0, 0.0]);
        assert_eq!(sol.iterations, 2);
    }

    #[test]
    fn equality_beyond_capacity_is_infeasible() {
        let lp = LinearProgram::new(vec![1.0, 2.0], vec![5.0, 5.0])
            .with_constraint(Constraint::equal(vec![1.0, 1.0], 11.0));
        assert_eq!(BoundedGreedy.solve(&lp), Err(LpError::Infeasible));
    }

    #[test]
    fn inequality_ignores_costly_variables() {
        let lp = LinearProgram::new(vec![-1.0, 3.0, -2.0], vec![4.0, 4.0, 4.0])
            .with_constraint(Constraint::at_most(vec![1.0; 3], 6.0));
        let sol = BoundedGreedy.solve(&lp).unwrap();
        assert_eq!(sol.values, vec![2.0, 0.0, 4.0]);
    }

    #[test]
    fn rejects_general_rows() {
        let lp = LinearProgram::new(vec![1.0, 1.0], vec![1.0, 1.0])
            .with_constraint(Constraint::equal(vec![2.0, 1.0], 1.0));
        assert!(matches!(BoundedGreedy.solve(&lp), Err(LpError::Unsupported(_))));
    }

    #[test]
    fn agrees_with_simplex_on_objective() {
        let lp = LinearProgram::new(vec![4.0, 6.0, 8.0, 5.0], vec![800.0, 1200.0, 2000.0, 600.0])
            .with_constraint(Constraint::equal(vec![1.0; 4], 3000.0));
        let greedy = BoundedGreedy.solve(&lp).unwrap();
        let simplex = DenseSimplex::default().solve(&lp).unwrap();
        assert!((greedy.objective_value - simplex.objective_value).abs() < 1e-6);
    }
}

// src/solver/simplex.rs

use crate::solver::{LinearProgram, LpBackend, LpError, LpSolution, Relation};

/// Dense two-phase tableau simplex.
///
/// Variable upper bounds become explicit `x_i + s_i = u_i` rows, so this is
/// only meant for the handful of variables a supplier panel produces.
/// Bland's rule picks both the entering and the leaving column, which keeps
/// degenerate programs (many suppliers at equal cost) from cycling.
#[derive(Debug, Clone)]
pub struct DenseSimplex {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for DenseSimplex {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-9,
        }
    }
}

struct Tableau {
    // m rows x (cols + 1); the last entry of each row is the right-hand side
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    cols: usize,
}

impl Tableau {
    fn rhs(&self, r: usize) -> f64 {
        self.rows[r][self.cols]
    }

    fn pivot(&mut self, r: usize, c: usize, tolerance: f64) {
        let p = self.rows[r][c];
        for v in self.rows[r].iter_mut() {
            *v /= p;
        }
        let pivot_row = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let factor = row[c];
            if factor != 0.0 {
                for (v, pv) in row.iter_mut().zip(&pivot_row) {
                    *v -= factor * pv;
                }
            }
            // Round-off can push a zero right-hand side slightly negative
            let last = row.len() - 1;
            if row[last] < 0.0 && row[last] > -tolerance {
                row[last] = 0.0;
            }
        }
        self.basis[r] = c;
    }

    fn reduced_cost(&self, cost: &[f64], c: usize) -> f64 {
        let priced: f64 = self
            .rows
            .iter()
            .zip(&self.basis)
            .map(|(row, &b)| cost[b] * row[c])
            .sum();
        cost[c] - priced
    }

    fn objective(&self, cost: &[f64]) -> f64 {
        (0..self.rows.len())
            .map(|r| cost[self.basis[r]] * self.rhs(r))
            .sum()
    }
}

impl DenseSimplex {
    /// Runs primal simplex until no column below `column_limit` improves `cost`.
    fn optimize(
        &self,
        tab: &mut Tableau,
        cost: &[f64],
        column_limit: usize,
        iterations: &mut usize,
    ) -> Result<(), LpError> {
        loop {
            if *iterations >= self.max_iterations {
                return Err(LpError::IterationLimit(*iterations));
            }

            let entering = (0..column_limit).find(|&c| {
                !tab.basis.contains(&c) && tab.reduced_cost(cost, c) < -self.tolerance
            });
            let Some(c) = entering else {
                return Ok(());
            };

            let mut leaving: Option<(usize, f64)> = None;
            for r in 0..tab.rows.len() {
                let a = tab.rows[r][c];
                if a <= self.tolerance {
                    continue;
                }
                let ratio = tab.rhs(r) / a;
                leaving = match leaving {
                    None => Some((r, ratio)),
                    Some((best_r, best)) => {
                        let strictly_better = ratio < best - self.tolerance;
                        let tie_wins = ratio <= best + self.tolerance
                            && tab.basis[r] < tab.basis[best_r];
                        if strictly_better || tie_wins {
                            Some((r, ratio))
                        } else {
                            Some((best_r, best))
                        }
                    }
                };
            }

            let (r, _) = leaving.ok_or(LpError::Unbounded)?;
            tab.pivot(r, c, self.tolerance);
            *iterations += 1;
        }
    }
}

impl LpBackend for DenseSimplex {
    fn name(&self) -> &'static str {
        "simplex"
    }

    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, LpError> {
        program.validate()?;
        let n = program.num_variables();

        // Collect every row as (coefficients, relation, rhs), bounds first
        let mut specs: Vec<(Vec<f64>, Relation, f64)> = Vec::new();
        for (i, &u) in program.upper_bounds.iter().enumerate() {
            if u.is_finite() {
                let mut a = vec![0.0; n];
                a[i] = 1.0;
                specs.push((a, Relation::LessOrEqual, u));
            }
        }
        for row in &program.constraints {
            specs.push((row.coefficients.clone(), row.relation, row.rhs));
        }

        // Phase I needs a non-negative right-hand side everywhere
        for (a, relation, b) in specs.iter_mut() {
            if *b < 0.0 {
                a.iter_mut().for_each(|v| *v = -*v);
                *b = -*b;
                *relation = match *relation {
                    Relation::LessOrEqual => Relation::GreaterOrEqual,
                    Relation::GreaterOrEqual => Relation::LessOrEqual,
                    Relation::Equal => Relation::Equal,
                };
            }
        }

        let n_slack = specs
            .iter()
            .filter(|(_, rel, _)| *rel != Relation::Equal)
            .count();
        let n_art = specs
            .iter()
            .filter(|(_, rel, _)| *rel != Relation::LessOrEqual)
            .count();
        let art_start = n + n_slack;
        let cols = art_start + n_art;

        let mut tab = Tableau {
            rows: Vec::with_capacity(specs.len()),
            basis: Vec::with_capacity(specs.len()),
            cols,
        };
        let (mut next_slack, mut next_art) = (n, art_start);
        for (a, relation, b) in specs {
            let mut row = vec![0.0; cols + 1];
            row[..n].copy_from_slice(&a);
            row[cols] = b;
            let basic = match relation {
                Relation::LessOrEqual => {
                    row[next_slack] = 1.0;
                    next_slack += 1;
                    next_slack - 1
                }
                Relation::GreaterOrEqual => {
                    row[next_slack] = -1.0;
                    row[next_art] = 1.0;
                    next_slack += 1;
                    next_art += 1;
                    next_art - 1
                }
                Relation::Equal => {
                    row[next_art] = 1.0;
                    next_art += 1;
                    next_art - 1
                }
            };
            tab.rows.push(row);
            tab.basis.push(basic);
        }

        let mut iterations = 0;

        // Phase I: drive the artificials to zero
        if n_art > 0 {
            let mut phase_one = vec![0.0; cols];
            phase_one[art_start..].iter_mut().for_each(|c| *c = 1.0);
            self.optimize(&mut tab, &phase_one, cols, &mut iterations)?;

            let scale = 1.0
                + tab
                    .rows
                    .iter()
                    .map(|row| row[cols].abs())
                    .fold(0.0, f64::max);
            if tab.objective(&phase_one) > self.tolerance * scale {
                return Err(LpError::Infeasible);
            }

            // Swap zero-valued artificials out of the basis where a real column allows it
            for r in 0..tab.rows.len() {
                if tab.basis[r] < art_start {
                    continue;
                }
                if let Some(c) = (0..art_start).find(|&c| tab.rows[r][c].abs() > self.tolerance) {
                    tab.pivot(r, c, self.tolerance);
                    iterations += 1;
                }
            }
        }

        // Phase II: the real objective, artificials barred from re-entering
        let mut phase_two = vec![0.0; cols];
        phase_two[..n].copy_from_slice(&program.objective);
        self.optimize(&mut tab, &phase_two, art_start, &mut iterations)?;

        let mut values = vec![0.0; n];
        for (r, &b) in tab.basis.iter().enumerate() {
            if b < n {
                values[b] = tab.rhs(r).clamp(0.0, program.upper_bounds[b]);
            }
        }

        Ok(LpSolution {
            objective_value: program.evaluate(&values),
            values,
            iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Constraint;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * (1.0 + b.abs())
    }

    #[test]
    fn fills_cheapest_variables_first() {
        // caps 9600, 14400, 24000, 7200; costs 32, 28, 22, 35
        let lp = LinearProgram::new(
            vec![32.0, 28.0, 22.0, 35.0],
            vec![9600.0, 14400.0, 24000.0, 7200.0],
        )
        .with_constraint(Constraint::equal(vec![1.0; 4], 30000.0));

        let sol = DenseSimplex::default().solve(&lp).unwrap();
        assert!(close(sol.values[2], 24000.0));
        assert!(close(sol.values[1], 6000.0));
        assert!(close(sol.values[0], 0.0));
        assert!(close(sol.values[3], 0.0));
        assert!(close(sol.objective_value, 24000.0 * 22.0 + 6000.0 * 28.0));
    }

    #[test]
    fn reports_infeasible_equality() {
        let lp = LinearProgram::new(vec![1.0, 1.0], vec![10.0, 10.0])
            .with_constraint(Constraint::equal(vec![1.0, 1.0], 25.0));
        assert_eq!(DenseSimplex::default().solve(&lp), Err(LpError::Infeasible));
    }

    #[test]
    fn maximizes_under_inequality() {
        let lp = LinearProgram::new(vec![-1.0, -1.0, -1.0], vec![10.0, 20.0, 5.0])
            .with_constraint(Constraint::at_most(vec![1.0; 3], 100.0));
        let sol = DenseSimplex::default().solve(&lp).unwrap();
        assert!(close(sol.values.iter().sum::<f64>(), 35.0));
        assert!(close(sol.objective_value, -35.0));
    }

    #[test]
    fn handles_greater_or_equal_rows() {
        // min x0 + 2 x1, x0 + x1 >= 4, x0 <= 3
        let lp = LinearProgram::new(vec![1.0, 2.0], vec![3.0, f64::INFINITY])
            .with_constraint(Constraint::at_least(vec![1.0, 1.0], 4.0));
        let sol = DenseSimplex::default().solve(&lp).unwrap();
        assert!(close(sol.values[0], 3.0));
        assert!(close(sol.values[1], 1.0));
    }

    #[test]
    fn detects_unbounded_objective() {
        let lp = LinearProgram::new(vec![-1.0], vec![f64::INFINITY])
            .with_constraint(Constraint::at_least(vec![1.0], 1.0));
        assert_eq!(DenseSimplex::default().solve(&lp), Err(LpError::Unbounded));
    }

    #[test]
    fn degenerate_ties_terminate() {
        let lp = LinearProgram::new(vec![5.0; 6], vec![10.0; 6])
            .with_constraint(Constraint::equal(vec![1.0; 6], 30.0));
        let sol = DenseSimplex::default().solve(&lp).unwrap();
        assert!(close(sol.values.iter().sum::<f64>(), 30.0));
        assert!(close(sol.objective_value, 150.0));
    }
}

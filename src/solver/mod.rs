// src/solver/mod.rs

//! Linear-programming backends.
//!
//! Programs are always of the form
//!
//! ```text
//! minimize    c . x
//! subject to  a_k . x (=, <=, >=) b_k   for every constraint k
//!             0 <= x_i <= u_i
//! ```
//!
//! The allocator never picks a backend itself; one is injected when the
//! comparator is built so tests can pin it.

pub mod greedy;
pub mod simplex;

pub use greedy::BoundedGreedy;
pub use simplex::DenseSimplex;

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn equal(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            relation: Relation::Equal,
            rhs,
        }
    }

    pub fn at_most(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            relation: Relation::LessOrEqual,
            rhs,
        }
    }

    pub fn at_least(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            relation: Relation::GreaterOrEqual,
            rhs,
        }
    }

    /// True for a row whose coefficients are all exactly one.
    pub fn is_budget_row(&self) -> bool {
        self.coefficients.iter().all(|&a| a == 1.0)
    }
}

/// A bounded-variable minimization problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    pub objective: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    pub constraints: Vec<Constraint>,
}

impl LinearProgram {
    pub fn new(objective: Vec<f64>, upper_bounds: Vec<f64>) -> Self {
        Self {
            objective,
            upper_bounds,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Rejects programs no backend can make sense of.
    pub fn validate(&self) -> Result<(), LpError> {
        let n = self.objective.len();
        if n == 0 {
            return Err(LpError::Malformed("program has no variables".to_string()));
        }
        if self.upper_bounds.len() != n {
            return Err(LpError::Malformed(format!(
                "{} upper bounds for {} variables",
                self.upper_bounds.len(),
                n
            )));
        }
        if let Some(i) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(LpError::Malformed(format!("objective coefficient {i} is not finite")));
        }
        if let Some(i) = self
            .upper_bounds
            .iter()
            .position(|u| u.is_nan() || *u < 0.0)
        {
            return Err(LpError::Malformed(format!(
                "upper bound {i} must be non-negative"
            )));
        }
        for (k, row) in self.constraints.iter().enumerate() {
            if row.coefficients.len() != n {
                return Err(LpError::Malformed(format!(
                    "constraint {k} has {} coefficients for {n} variables",
                    row.coefficients.len()
                )));
            }
            if !row.rhs.is_finite() || row.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(LpError::Malformed(format!("constraint {k} is not finite")));
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective_value: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LpError {
    #[error("no point satisfies the constraints")]
    Infeasible,

    #[error("objective is unbounded below")]
    Unbounded,

    #[error("malformed program: {0}")]
    Malformed(String),

    #[error("program shape not supported by this backend: {0}")]
    Unsupported(String),

    #[error("gave up after {0} pivots")]
    IterationLimit(usize),
}

/// Anything that can solve a [`LinearProgram`].
///
/// Backends are stateless and shared between threads.
pub trait LpBackend: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, LpError>;
}

/// Names accepted by [`backend_by_name`].
pub const BACKEND_NAMES: [&str; 2] = ["simplex", "greedy"];

pub fn backend_by_name(name: &str) -> Option<Arc<dyn LpBackend>> {
    match name {
        "simplex" => Some(Arc::new(DenseSimplex::default())),
        "greedy" => Some(Arc::new(BoundedGreedy)),
        _ => None,
    }
}

//! Supplier order allocation under disruption.
//!
//! A fixed order is split across a supplier panel by three heuristics
//! (proportional, cheapest-first, fastest-first) and by a linear program
//! under three objectives (cost, lead time, balanced). Every allocation is
//! run through a week-by-week fulfillment simulation and the six outcomes
//! are returned side by side.
//!
//! ```no_run
//! use std::sync::Arc;
//! use supply_allocation::model::{default_suppliers, Scenario, SupplierRegistry};
//! use supply_allocation::simulation::{EngineConfig, StrategyComparator};
//! use supply_allocation::solver::DenseSimplex;
//!
//! let registry = SupplierRegistry::new(default_suppliers()).unwrap();
//! let backend = Arc::new(DenseSimplex::default());
//! let comparator = StrategyComparator::new(registry, EngineConfig::default(), backend);
//! let comparison = comparator
//!     .compare(&Scenario::new(5000.0).with_disruption("Titan-RU", 12))
//!     .unwrap();
//! for result in &comparison.results {
//!     println!("{}: ${:.2}", result.strategy, result.total_cost);
//! }
//! ```

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod solver;
pub mod strategy;

pub use error::EngineError;

pub mod implementations;
pub mod optimization;
pub mod traits;

pub use implementations::{CheapestFirstPolicy, FastestFirstPolicy, ProportionalPolicy};
pub use optimization::{BalanceWeights, Objective, OptimalPolicy};
pub use traits::{AllocationContext, AllocationPolicy, StrategyId};

pub mod allocation;
pub mod queues;
pub mod registry;
pub mod scenario;
pub mod supplier;

pub use allocation::Allocation;
pub use registry::{Exclusion, ExclusionReason, SupplierRegistry};
pub use scenario::{DisruptionOverlay, Scenario, DEFAULT_PLANNING_HORIZON_WEEKS};
pub use supplier::{default_suppliers, Supplier};

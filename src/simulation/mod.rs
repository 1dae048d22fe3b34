pub mod comparator;
pub mod config;
pub mod engine;

pub use comparator::{Comparison, StrategyComparator, StrategyResult};
pub use config::EngineConfig;
pub use engine::{DeliveryRecord, FulfillmentReport, FulfillmentSimulator, Shipment};

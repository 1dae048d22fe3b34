// src/simulation/config.rs

use crate::io::DataError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine-wide knobs that are not part of a single scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Relative tolerance for "the order was fully met".
    pub feasibility_tolerance: f64,
    /// Weight of normalized unit cost in the balanced objective.
    pub cost_weight: f64,
    /// Weight of normalized lead time in the balanced objective.
    pub time_weight: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feasibility_tolerance: 1e-6,
            cost_weight: 0.6,
            time_weight: 0.4,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Absolute slack for an order of `order_quantity_kg`.
    pub fn quantity_tolerance(&self, order_quantity_kg: f64) -> f64 {
        self.feasibility_tolerance * order_quantity_kg.abs().max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cost_weight": 0.8, "time_weight": 0.2}}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.cost_weight, 0.8);
        assert_eq!(config.time_weight, 0.2);
        assert_eq!(config.feasibility_tolerance, 1e-6);
    }

    #[test]
    fn tolerance_scales_with_order() {
        let config = EngineConfig::default();
        assert!((config.quantity_tolerance(5000.0) - 5e-3).abs() < 1e-12);
        assert_eq!(config.quantity_tolerance(0.5), 1e-6);
    }
}

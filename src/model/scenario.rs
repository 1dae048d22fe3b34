// src/model/scenario.rs

use serde::{Deserialize, Serialize};

/// Capacity-window length used when a scenario does not say otherwise.
pub const DEFAULT_PLANNING_HORIZON_WEEKS: u32 = 12;

/// Takes one supplier offline for a number of weeks.
///
/// The supplier is unusable for the whole scenario while the overlay is
/// active; a zero duration leaves it available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionOverlay {
    pub supplier: String,
    pub duration_weeks: u32,
}

impl DisruptionOverlay {
    pub fn new(supplier: impl Into<String>, duration_weeks: u32) -> Self {
        Self {
            supplier: supplier.into(),
            duration_weeks,
        }
    }

    pub fn is_active(&self) -> bool {
        self.duration_weeks > 0
    }
}

/// One order to be placed against the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub order_quantity_kg: f64,
    pub qualified_only: bool,
    pub planning_horizon_weeks: u32,
    pub disruption: Option<DisruptionOverlay>,
}

impl Scenario {
    /// Qualified-only sourcing, default horizon, no disruption.
    pub fn new(order_quantity_kg: f64) -> Self {
        Self {
            order_quantity_kg,
            qualified_only: true,
            planning_horizon_weeks: DEFAULT_PLANNING_HORIZON_WEEKS,
            disruption: None,
        }
    }

    pub fn with_disruption(mut self, supplier: impl Into<String>, duration_weeks: u32) -> Self {
        self.disruption = Some(DisruptionOverlay::new(supplier, duration_weeks));
        self
    }

    pub fn allow_unqualified(mut self) -> Self {
        self.qualified_only = false;
        self
    }

    pub fn with_horizon(mut self, weeks: u32) -> Self {
        self.planning_horizon_weeks = weeks;
        self
    }

    /// The overlay, if it currently takes a supplier offline.
    pub fn active_disruption(&self) -> Option<&DisruptionOverlay> {
        self.disruption.as_ref().filter(|d| d.is_active())
    }

    pub fn label(&self) -> String {
        match self.active_disruption() {
            Some(d) => format!("Disruption: {} ({}wk)", d.supplier, d.duration_weeks),
            None => "Baseline (no disruption)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_overlay_is_inactive() {
        let scenario = Scenario::new(5000.0).with_disruption("Titan-RU", 0);
        assert!(scenario.disruption.is_some());
        assert!(scenario.active_disruption().is_none());
        assert_eq!(scenario.label(), "Baseline (no disruption)");
    }

    #[test]
    fn label_names_disrupted_supplier() {
        let scenario = Scenario::new(5000.0).with_disruption("Titan-JP", 7);
        assert_eq!(scenario.label(), "Disruption: Titan-JP (7wk)");
        assert_eq!(scenario.planning_horizon_weeks, DEFAULT_PLANNING_HORIZON_WEEKS);
    }
}

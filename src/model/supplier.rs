// src/model/supplier.rs

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// A single material supplier. Immutable once loaded for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    // Identity
    pub name: String,
    pub region: String,

    // Terms
    pub lead_time_weeks: u32,
    pub capacity_kg_per_week: f64,
    pub cost_per_kg: f64,

    // Qualification
    pub quality_rating: f64, // 0.0 - 1.0
    pub qualified: bool,
}

impl Supplier {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        lead_time_weeks: u32,
        capacity_kg_per_week: f64,
        cost_per_kg: f64,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            lead_time_weeks,
            capacity_kg_per_week,
            cost_per_kg,
            quality_rating: 1.0,
            qualified: true,
        }
    }

    pub fn with_quality(mut self, rating: f64) -> Self {
        self.quality_rating = rating;
        self
    }

    pub fn unqualified(mut self) -> Self {
        self.qualified = false;
        self
    }

    /// Ceiling on what this supplier can ship within the planning horizon.
    pub fn usable_capacity(&self, horizon_weeks: u32) -> f64 {
        self.capacity_kg_per_week * f64::from(horizon_weeks)
    }

    /// Checks the numeric attributes are usable by the allocators.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: &str| EngineError::InvalidSupplier {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !self.capacity_kg_per_week.is_finite() || self.capacity_kg_per_week < 0.0 {
            return Err(invalid("capacity_kg_per_week must be a non-negative number"));
        }
        if !self.cost_per_kg.is_finite() || self.cost_per_kg < 0.0 {
            return Err(invalid("cost_per_kg must be a non-negative number"));
        }
        if !(0.0..=1.0).contains(&self.quality_rating) {
            return Err(invalid("quality_rating must be within [0, 1]"));
        }
        Ok(())
    }
}

/// The built-in titanium supplier set used when no dataset is supplied.
pub fn default_suppliers() -> Vec<Supplier> {
    vec![
        Supplier::new("Titan-US", "United States", 4, 800.0, 32.0).with_quality(0.95),
        Supplier::new("Titan-JP", "Japan", 6, 1200.0, 28.0).with_quality(0.92),
        Supplier::new("Titan-RU", "Russia", 8, 2000.0, 22.0).with_quality(0.88),
        // Not yet aerospace-qualified
        Supplier::new("Titan-CN", "China", 7, 1500.0, 24.0)
            .with_quality(0.85)
            .unqualified(),
        Supplier::new("Titan-AU", "Australia", 5, 600.0, 35.0).with_quality(0.90),
    ]
}

// src/model/queues.rs

use std::collections::BTreeMap;

/// Week-indexed pipeline of in-transit kilograms.
///
/// Only weeks with an arrival are stored, so a shipment landing in week
/// 2,000,000 costs one entry, not two million empty slots.
#[derive(Debug, Clone, Default)]
pub struct ShipmentPipeline {
    arrivals: BTreeMap<u32, f64>,
}

impl ShipmentPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `quantity` on the road, landing in `week`.
    pub fn schedule(&mut self, week: u32, quantity: f64) {
        *self.arrivals.entry(week).or_insert(0.0) += quantity;
    }

    /// Takes the earliest pending arrival as `(week, kg)`.
    pub fn pop_arrival(&mut self) -> Option<(u32, f64)> {
        self.arrivals.pop_first()
    }

    /// Distinct arrival weeks still pending.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}

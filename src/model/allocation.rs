// src/model/allocation.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supplier name -> allocated kg.
///
/// Backed by a `BTreeMap` so iteration and serialization order never
/// depend on insertion order. Zero quantities are not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    quantities: BTreeMap<String, f64>,
}

impl Allocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity_kg` to the supplier's share. Non-positive amounts are ignored.
    pub fn add(&mut self, supplier: &str, quantity_kg: f64) {
        if quantity_kg > 0.0 {
            *self.quantities.entry(supplier.to_string()).or_insert(0.0) += quantity_kg;
        }
    }

    pub fn get(&self, supplier: &str) -> f64 {
        self.quantities.get(supplier).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, supplier: &str) -> bool {
        self.quantities.contains_key(supplier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.quantities.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    pub fn total(&self) -> f64 {
        self.quantities.values().sum()
    }

    pub fn supplier_names(&self) -> Vec<String> {
        self.quantities.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl FromIterator<(String, f64)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut allocation = Self::new();
        for (name, qty) in iter {
            allocation.add(&name, qty);
        }
        allocation
    }
}

// src/model/registry.rs

use crate::error::EngineError;
use crate::model::scenario::Scenario;
use crate::model::supplier::Supplier;
use serde::Serialize;
use std::collections::HashMap;

/// Why a registered supplier was left out of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    Disrupted { duration_weeks: u32 },
    Unqualified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub supplier: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Read-only snapshot of the supplier dataset for one comparison run.
#[derive(Debug, Clone)]
pub struct SupplierRegistry {
    suppliers: Vec<Supplier>,
    index: HashMap<String, usize>,
}

impl SupplierRegistry {
    /// Validates every record and rejects duplicate names.
    pub fn new(suppliers: Vec<Supplier>) -> Result<Self, EngineError> {
        let mut index = HashMap::with_capacity(suppliers.len());
        for (i, supplier) in suppliers.iter().enumerate() {
            supplier.validate()?;
            if index.insert(supplier.name.clone(), i).is_some() {
                return Err(EngineError::InvalidSupplier {
                    name: supplier.name.clone(),
                    reason: "duplicate supplier name".to_string(),
                });
            }
        }
        Ok(Self { suppliers, index })
    }

    pub fn get(&self, name: &str) -> Option<&Supplier> {
        self.index.get(name).map(|&i| &self.suppliers[i])
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    /// Checks the scenario's own parameters and that its overlay names a known supplier.
    pub fn validate(&self, scenario: &Scenario) -> Result<(), EngineError> {
        let qty = scenario.order_quantity_kg;
        if !qty.is_finite() || qty <= 0.0 {
            return Err(EngineError::InvalidScenario(format!(
                "order quantity must be a positive number, got {qty}"
            )));
        }
        if scenario.planning_horizon_weeks == 0 {
            return Err(EngineError::InvalidScenario(
                "planning horizon must be at least one week".to_string(),
            ));
        }
        if let Some(overlay) = &scenario.disruption {
            if self.get(&overlay.supplier).is_none() {
                return Err(EngineError::UnknownSupplier(overlay.supplier.clone()));
            }
        }
        Ok(())
    }

    /// Suppliers usable for the scenario, in registry order.
    ///
    /// Fails with `InvalidScenario` when the qualification filter and the
    /// disruption overlay together leave nobody to order from.
    pub fn available_suppliers(&self, scenario: &Scenario) -> Result<Vec<&Supplier>, EngineError> {
        self.validate(scenario)?;

        let available: Vec<&Supplier> = self
            .suppliers
            .iter()
            .filter(|s| exclusion_reason(s, scenario).is_none())
            .collect();

        if available.is_empty() {
            return Err(EngineError::InvalidScenario(format!(
                "no suppliers available for '{}' ({} registered, all excluded)",
                scenario.label(),
                self.suppliers.len()
            )));
        }
        Ok(available)
    }

    /// Every registered supplier the scenario leaves out, with the reason.
    pub fn exclusions(&self, scenario: &Scenario) -> Vec<Exclusion> {
        self.suppliers
            .iter()
            .filter_map(|s| {
                exclusion_reason(s, scenario).map(|reason| Exclusion {
                    supplier: s.name.clone(),
                    reason,
                })
            })
            .collect()
    }
}

fn exclusion_reason(supplier: &Supplier, scenario: &Scenario) -> Option<ExclusionReason> {
    if let Some(overlay) = scenario.active_disruption() {
        if overlay.supplier == supplier.name {
            return Some(ExclusionReason::Disrupted {
                duration_weeks: overlay.duration_weeks,
            });
        }
    }
    if scenario.qualified_only && !supplier.qualified {
        return Some(ExclusionReason::Unqualified);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::supplier::default_suppliers;

    fn registry() -> SupplierRegistry {
        SupplierRegistry::new(default_suppliers()).unwrap()
    }

    fn names(suppliers: &[&Supplier]) -> Vec<String> {
        suppliers.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn qualification_filter_drops_unqualified() {
        let reg = registry();
        let available = reg.available_suppliers(&Scenario::new(5000.0)).unwrap();
        assert_eq!(names(&available), vec!["Titan-US", "Titan-JP", "Titan-RU", "Titan-AU"]);

        let open = reg
            .available_suppliers(&Scenario::new(5000.0).allow_unqualified())
            .unwrap();
        assert_eq!(open.len(), 5);
    }

    #[test]
    fn disrupted_supplier_is_excluded_while_active() {
        let reg = registry();
        let scenario = Scenario::new(5000.0).with_disruption("Titan-RU", 12);
        let available = reg.available_suppliers(&scenario).unwrap();
        assert!(!names(&available).contains(&"Titan-RU".to_string()));

        let exclusions = reg.exclusions(&scenario);
        assert_eq!(
            exclusions[0],
            Exclusion {
                supplier: "Titan-RU".to_string(),
                reason: ExclusionReason::Disrupted { duration_weeks: 12 },
            }
        );
        assert_eq!(exclusions[1].reason, ExclusionReason::Unqualified);

        let zero = Scenario::new(5000.0).with_disruption("Titan-RU", 0);
        assert_eq!(reg.available_suppliers(&zero).unwrap().len(), 4);
    }

    #[test]
    fn unknown_disrupted_supplier_is_an_error() {
        let reg = registry();
        let scenario = Scenario::new(5000.0).with_disruption("Titan-XX", 0);
        assert_eq!(
            reg.available_suppliers(&scenario).unwrap_err(),
            EngineError::UnknownSupplier("Titan-XX".to_string())
        );
    }

    #[test]
    fn empty_candidate_list_is_invalid_scenario() {
        let reg = SupplierRegistry::new(vec![Supplier::new("Solo", "X", 3, 100.0, 10.0)]).unwrap();
        let scenario = Scenario::new(100.0).with_disruption("Solo", 4);
        assert!(matches!(
            reg.available_suppliers(&scenario),
            Err(EngineError::InvalidScenario(_))
        ));
    }

    #[test]
    fn rejects_bad_scenario_parameters() {
        let reg = registry();
        assert!(reg.validate(&Scenario::new(0.0)).is_err());
        assert!(reg.validate(&Scenario::new(f64::NAN)).is_err());
        assert!(reg.validate(&Scenario::new(10.0).with_horizon(0)).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = SupplierRegistry::new(vec![
            Supplier::new("A", "X", 1, 1.0, 1.0),
            Supplier::new("A", "Y", 2, 2.0, 2.0),
        ]);
        assert!(matches!(result, Err(EngineError::InvalidSupplier { .. })));
    }
}

// src/io/suppliers.rs

use crate::io::DataError;
use crate::model::Supplier;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// One CSV row as written by hand or exported from a spreadsheet.
#[derive(Debug, Deserialize)]
struct SupplierRecord {
    name: String,
    region: String,
    lead_time_weeks: f64,
    capacity_kg_per_week: f64,
    cost_per_kg: f64,
    quality_rating: f64,
    #[serde(alias = "is_qualified")]
    qualified: String,
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" | "" => Some(false),
        _ => None,
    }
}

impl SupplierRecord {
    fn into_supplier(self, row: usize) -> Result<Supplier, DataError> {
        let invalid = |message: String| DataError::InvalidRecord { row, message };

        let lead = self.lead_time_weeks;
        if !lead.is_finite() || lead < 0.0 || lead.fract() != 0.0 || lead > f64::from(u32::MAX) {
            return Err(invalid(format!(
                "lead_time_weeks must be a whole number of weeks, got {lead}"
            )));
        }
        let qualified = parse_flag(&self.qualified)
            .ok_or_else(|| invalid(format!("unrecognized qualified flag '{}'", self.qualified)))?;

        let supplier = Supplier {
            name: self.name.trim().to_string(),
            region: self.region.trim().to_string(),
            lead_time_weeks: lead as u32,
            capacity_kg_per_week: self.capacity_kg_per_week,
            cost_per_kg: self.cost_per_kg,
            quality_rating: self.quality_rating,
            qualified,
        };
        supplier.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(supplier)
    }
}

/// Parses supplier rows from any reader (header row required).
pub fn read_suppliers<R: Read>(reader: R) -> Result<Vec<Supplier>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut suppliers = Vec::new();
    for (i, record) in rdr.deserialize::<SupplierRecord>().enumerate() {
        // Line 1 is the header
        let row = i + 2;
        let record = record?;
        suppliers.push(record.into_supplier(row)?);
    }
    Ok(suppliers)
}

/// Loads supplier data from a CSV file.
///
/// Expected columns: `name, region, lead_time_weeks, capacity_kg_per_week,
/// cost_per_kg, quality_rating, qualified` (`is_qualified` is accepted too).
pub fn load_suppliers(file_path: impl AsRef<Path>) -> Result<Vec<Supplier>, DataError> {
    let path = file_path.as_ref();
    let file = std::fs::File::open(path)?;
    let suppliers = read_suppliers(file)?;
    info!(path = %path.display(), count = suppliers.len(), "loaded suppliers");
    Ok(suppliers)
}

use serde::Serialize;

use super::record::{keys, CatalogRecord};

const PLACEHOLDER: &str = "-";

/// Column lists used when a table of units is printed; narrower than the
/// on-screen table.
mod export_keys {
    pub const UNIT_NO: &[&str] = &["Unit No", "Unit No.", "Unit"];
    pub const SIZE: &[&str] = &["Size", "Area"];
    pub const POSSESSION: &[&str] = &["Possession"];
    pub const PAYMENT: &[&str] = &["Payment"];
}

/// One inventory row as the unit table shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryUnit {
    pub unit_no: String,
    pub size: String,
    pub unit_type: String,
    pub possession: String,
    pub payment: String,
    pub costing_plan: String,
}

impl InventoryUnit {
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            unit_no: record.get_or(keys::UNIT_NO, PLACEHOLDER),
            size: record.get_or(keys::SIZE, PLACEHOLDER),
            unit_type: record.get_or(keys::UNIT_TYPE, PLACEHOLDER),
            possession: record.get_or(keys::POSSESSION, PLACEHOLDER),
            payment: record.get_or(keys::PAYMENT, PLACEHOLDER),
            costing_plan: record.get(keys::COSTING_PLAN),
        }
    }
}

/// Cells for one row of the printed inventory table.
pub fn export_row(record: &CatalogRecord) -> Vec<String> {
    [
        export_keys::UNIT_NO,
        export_keys::SIZE,
        keys::UNIT_TYPE,
        export_keys::POSSESSION,
        export_keys::PAYMENT,
    ]
    .iter()
    .map(|candidates| record.get_or(candidates, PLACEHOLDER))
    .collect()
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Rows that are available and belong to `project`, or to any project when
/// none is selected.
pub fn available_units(records: &[CatalogRecord], project: Option<&str>) -> Vec<CatalogRecord> {
    let wanted = project
        .map(normalize_key)
        .filter(|project| !project.is_empty());

    records
        .iter()
        .filter(|record| {
            let same_project = wanted
                .as_ref()
                .map_or(true, |wanted| {
                    normalize_key(&record.get(keys::PROJECT_NAME)) == *wanted
                });
            same_project && record.get(keys::STATUS).to_lowercase() == "available"
        })
        .cloned()
        .collect()
}

/// Rows with any value containing `query`, ignoring case. A blank query keeps
/// every row.
pub fn search_units<'a>(rows: &'a [CatalogRecord], query: &str) -> Vec<&'a CatalogRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|row| {
            row.values()
                .any(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

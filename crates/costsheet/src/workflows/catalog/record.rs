use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One spreadsheet row from the catalog. Column names vary between rows and
/// sheets, so fields are only ever read through [`CatalogRecord::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CatalogRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl CatalogRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        }
    }

    /// First candidate whose value is present and not blank, else `""`.
    ///
    /// Absent keys, nulls, and whitespace-only text all count as missing.
    pub fn get(&self, candidates: &[&str]) -> String {
        candidates
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .filter_map(|value| value.as_deref())
            .find(|value| !value.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Like [`get`](Self::get) but substitutes `fallback` for a missing value.
    pub fn get_or(&self, candidates: &[&str], fallback: &str) -> String {
        let value = self.get(candidates);
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().filter_map(|value| value.as_deref())
    }
}

impl<'de> Deserialize<'de> for CatalogRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let fields = raw
            .into_iter()
            .map(|(key, value)| (key, stringify(value)))
            .collect();
        Ok(Self { fields })
    }
}

fn stringify(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

/// Reads a spreadsheet CSV export; the header row names the fields.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let fields = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.trim().to_string(), Some(value.to_string())))
            .collect();
        records.push(CatalogRecord { fields });
    }

    Ok(records)
}

/// Candidate column names seen across the catalog sheets.
pub mod keys {
    pub const PROJECT_NAME: &[&str] = &["Project Name", "Project", "ProjectName"];
    pub const UNIT_NO: &[&str] = &["Unit No", "Unit No.", "Unit", "Unit Number", "UnitNo"];
    pub const SIZE: &[&str] = &["Size", "Area", "Carpet", "Super Area"];
    pub const UNIT_TYPE: &[&str] = &["Type", "Typology"];
    pub const POSSESSION: &[&str] = &["Possession", "Possession Date"];
    pub const PAYMENT: &[&str] = &["Payment", "Payment Plan", "Plan"];
    pub const COSTING_PLAN: &[&str] = &["CostingPlan", "Costing Plan", "Costing"];
    pub const PRICE_RATE: &[&str] = &["Price", "Base Rate", "Rate", "Price Rate"];
    pub const PLC_RATE: &[&str] = &["PLC", "PLC Rate"];
    pub const STATUS: &[&str] = &["Status", "Availability"];
    pub const LOCATION: &[&str] = &["Location", "City"];
    pub const CLASS: &[&str] = &["Class", "Category"];
    pub const COVER_IMAGE: &[&str] = &["Image 1 URL", "Image URL"];
    pub const BROCHURE: &[&str] = &["Brouchre URL"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn whitespace_only_values_count_as_absent() {
        let record = CatalogRecord::from_pairs([("A", " ")]);
        assert_eq!(record.get(&["A", "B"]), "");
    }

    #[test]
    fn first_non_empty_candidate_wins() {
        let record = CatalogRecord::from_pairs([("A", ""), ("B", "x")]);
        assert_eq!(record.get(&["A", "B"]), "x");
        assert_eq!(record.get(&["B", "A"]), "x");
        assert_eq!(record.get(&[]), "");
        assert_eq!(record.get_or(&["C"], "-"), "-");
    }

    #[test]
    fn json_rows_are_read_defensively() {
        let records: Vec<CatalogRecord> = serde_json::from_str(
            r#"[{"Unit No": 101, "Size": null, "Area": "150", "Corner": true}]"#,
        )
        .expect("rows decode");
        let record = &records[0];
        assert_eq!(record.get(keys::UNIT_NO), "101");
        assert_eq!(record.get(keys::SIZE), "150");
        assert_eq!(record.get(&["Corner"]), "true");
    }

    #[test]
    fn csv_export_uses_header_row_as_keys() {
        let csv = "Project Name, Unit No,Status\nTerra,T-1,Available\nTerra,T-2\n";
        let records = records_from_csv(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(keys::UNIT_NO), "T-1");
        assert_eq!(records[1].get(keys::STATUS), "");
    }
}

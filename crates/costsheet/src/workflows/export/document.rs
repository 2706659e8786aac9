use serde::Serialize;

use crate::workflows::catalog::{export_row, CatalogRecord};
use crate::workflows::costing::CostSheetView;

const MAX_STEM_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    CostSheet,
    Inventory,
}

impl DocumentKind {
    pub const fn busy_message(self) -> &'static str {
        match self {
            Self::CostSheet => "Preparing Cost Sheet...",
            Self::Inventory => "Preparing PDF...",
        }
    }
}

/// A titled stack of tables, independent of any output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabularDocument {
    pub kind: DocumentKind,
    pub title: String,
    pub file_name: String,
    pub tables: Vec<Table>,
    pub footer: Option<FooterLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<const N: usize>(headers: [&str; N], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows,
        }
    }
}

/// Bold label/value line printed under the last table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLine {
    pub label: String,
    pub value: String,
}

/// Replaces each run of characters outside `[A-Za-z0-9_-]` with `_` and keeps
/// at most 80 characters.
pub fn sanitize_file_stem(raw: &str) -> String {
    let mut stem = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            stem.push(ch);
            in_run = false;
        } else if !in_run {
            stem.push('_');
            in_run = true;
        }
    }
    stem.chars().take(MAX_STEM_CHARS).collect()
}

pub fn cost_sheet_file_name(project_name: &str, unit_no: &str) -> String {
    let unit = sanitize_file_stem(unit_no);
    let unit = if unit.is_empty() { "unit".to_string() } else { unit };
    format!("{}_Costing_{}.pdf", sanitize_file_stem(project_name), unit)
}

pub fn inventory_file_name(project_name: &str) -> String {
    format!("{}_Inventory.pdf", sanitize_file_stem(project_name))
}

/// Unit summary, price breakdown, and payment plan, footed by the schedule
/// total.
pub fn cost_sheet_document(view: &CostSheetView) -> TabularDocument {
    let summary = Table::new(
        ["Unit No", "Size", "Type"],
        vec![vec![
            view.unit.unit_no.clone(),
            view.unit.size.clone(),
            view.unit.unit_type.clone(),
        ]],
    );

    let breakdown_rows = view
        .rates
        .iter()
        .chain(view.breakdown.iter())
        .chain(std::iter::once(&view.grand_total))
        .map(|row| vec![row.label.clone(), row.display.clone()])
        .collect();

    let schedule_rows = view
        .schedule
        .iter()
        .map(|row| vec![row.label.clone(), row.display.clone()])
        .collect();

    TabularDocument {
        kind: DocumentKind::CostSheet,
        title: view.project_name.clone(),
        file_name: cost_sheet_file_name(&view.project_name, &view.unit.unit_no),
        tables: vec![
            summary,
            Table::new(["Particulars", "Amount"], breakdown_rows),
            Table::new(["Milestone", "Amount"], schedule_rows),
        ],
        footer: Some(FooterLine {
            label: view.schedule_total.label.clone(),
            value: view.schedule_total.display.clone(),
        }),
    }
}

pub fn inventory_document(project_name: &str, rows: &[CatalogRecord]) -> TabularDocument {
    let label = if project_name.trim().is_empty() {
        "Inventory"
    } else {
        project_name
    };

    TabularDocument {
        kind: DocumentKind::Inventory,
        title: format!("{label} - Inventory"),
        file_name: inventory_file_name(label),
        tables: vec![Table::new(
            ["Unit No", "Size", "Type", "Possession", "Payment"],
            rows.iter().map(export_row).collect(),
        )],
        footer: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::costing::{CostSheet, PlanId, UnitAttributes};

    #[test]
    fn file_stems_collapse_disallowed_runs() {
        assert_eq!(sanitize_file_stem("Terra @ 37D, Gurugram"), "Terra_37D_Gurugram");
        assert_eq!(sanitize_file_stem("a-b_c"), "a-b_c");
        assert_eq!(sanitize_file_stem(&"x".repeat(120)).len(), 80);
    }

    #[test]
    fn cost_sheet_file_name_defaults_the_unit() {
        assert_eq!(
            cost_sheet_file_name("Amara Plots", "P/17"),
            "Amara_Plots_Costing_P_17.pdf"
        );
        assert_eq!(cost_sheet_file_name("Amara", ""), "Amara_Costing_unit.pdf");
    }

    #[test]
    fn cost_sheet_document_has_three_tables_and_cross_check_footer() {
        let mut attributes = UnitAttributes::new(150.0, 5000.0, 200.0);
        attributes.project_name = "Amara Plots".to_string();
        attributes.unit_no = "P-17".to_string();
        let sheet = CostSheet::compute(PlanId::PlotsNew102, attributes);
        let view = CostSheetView::from_sheet(&sheet);

        let document = cost_sheet_document(&view);
        assert_eq!(document.title, "Amara Plots");
        assert_eq!(document.file_name, "Amara_Plots_Costing_P-17.pdf");

        let headers: Vec<Vec<String>> = document
            .tables
            .iter()
            .map(|table| table.headers.clone())
            .collect();
        assert_eq!(
            headers,
            vec![
                vec!["Unit No", "Size", "Type"],
                vec!["Particulars", "Amount"],
                vec!["Milestone", "Amount"],
            ]
        );

        let breakdown = &document.tables[1].rows;
        assert_eq!(
            breakdown.last().expect("total row"),
            &vec!["Total (Indicative)".to_string(), "10,52,200".to_string()]
        );
        assert_eq!(document.tables[2].rows.len(), 8);

        let footer = document.footer.expect("footer");
        assert_eq!(footer.label, "Total (Payment Plan)");
        assert_eq!(footer.value, "10,52,200");
    }

    #[test]
    fn inventory_document_titles_by_project() {
        let rows = vec![CatalogRecord::from_pairs([
            ("Unit No", "T-1"),
            ("Size", "200"),
            ("Possession", "2027"),
        ])];
        let document = inventory_document("37D Terra", &rows);
        assert_eq!(document.title, "37D Terra - Inventory");
        assert_eq!(document.file_name, "37D_Terra_Inventory.pdf");
        assert_eq!(document.tables[0].rows[0], vec!["T-1", "200", "-", "2027", "-"]);

        assert_eq!(inventory_document("", &[]).file_name, "Inventory_Inventory.pdf");
    }
}

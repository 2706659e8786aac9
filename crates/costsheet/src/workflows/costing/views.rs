use serde::Serialize;

use super::amount::format_amount;
use super::engine::CostSheet;
use super::plans::PlanId;

/// One labelled amount with its display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountRow {
    pub label: String,
    pub amount: f64,
    pub display: String,
}

impl AmountRow {
    fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
            display: format_amount(amount),
        }
    }

    fn rate(label: impl Into<String>, rate: f64) -> Self {
        let display = if rate == 0.0 {
            "-".to_string()
        } else {
            format_amount(rate)
        };
        Self {
            label: label.into(),
            amount: rate,
            display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummaryView {
    pub unit_no: String,
    pub size: String,
    pub unit_type: String,
}

/// Everything a cost-sheet page shows, with amounts already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSheetView {
    pub plan: PlanId,
    pub plan_label: &'static str,
    pub page: &'static str,
    pub project_name: String,
    pub unit: UnitSummaryView,
    pub rates: Vec<AmountRow>,
    pub breakdown: Vec<AmountRow>,
    pub grand_total: AmountRow,
    pub base_for_payment_split: f64,
    pub schedule: Vec<AmountRow>,
    /// Sum of the milestone amounts, rounded once like every other figure.
    pub schedule_total: AmountRow,
}

impl CostSheetView {
    pub fn from_sheet(sheet: &CostSheet) -> Self {
        let attributes = &sheet.attributes;
        let breakdown = &sheet.breakdown;

        let schedule: Vec<AmountRow> = sheet
            .schedule
            .milestones
            .iter()
            .map(|milestone| AmountRow::new(milestone.label.clone(), milestone.amount))
            .collect();

        Self {
            plan: sheet.plan,
            plan_label: sheet.plan.label(),
            page: sheet.plan.page(),
            project_name: attributes.project_name.clone(),
            unit: UnitSummaryView {
                unit_no: attributes.unit_no.clone(),
                size: attributes.area_display.clone(),
                unit_type: attributes.unit_type.clone(),
            },
            rates: breakdown
                .rates
                .iter()
                .map(|row| AmountRow::rate(row.label.clone(), row.rate))
                .collect(),
            breakdown: breakdown
                .items
                .iter()
                .map(|item| AmountRow::new(item.label.clone(), item.amount))
                .collect(),
            grand_total: AmountRow::new("Total (Indicative)", breakdown.grand_total),
            base_for_payment_split: breakdown.base_for_payment_split,
            schedule_total: AmountRow::new("Total (Payment Plan)", sheet.schedule.total()),
            schedule,
        }
    }
}

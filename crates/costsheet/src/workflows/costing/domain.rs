use serde::{Deserialize, Serialize};

use super::amount::parse_amount;

/// Named charges a breakdown can carry. Milestones refer to these when they
/// pull a fixed charge into their amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    Price,
    LocationCharge,
    Surcharge,
    AdminFee,
    MaintenanceCharge,
    ContingencyDeposit,
}

impl ChargeKind {
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::LocationCharge => "PLC",
            Self::Surcharge => "GST",
            Self::AdminFee => "PRFC",
            Self::MaintenanceCharge => "IFMS",
            Self::ContingencyDeposit => "IFRCD",
        }
    }

    /// Whether the charge counts toward the base that milestone percentages
    /// are applied to. Fixed charges are paid with specific milestones instead.
    pub const fn in_payment_base(self) -> bool {
        matches!(self, Self::Price | Self::LocationCharge | Self::Surcharge)
    }
}

/// Unit fields exactly as handed over from the inventory page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUnitAttributes {
    pub project_name: String,
    pub unit_no: String,
    pub unit_size: String,
    pub unit_type: String,
    pub price_rate: String,
    pub plc_rate: String,
    pub costing_plan: String,
}

impl RawUnitAttributes {
    pub fn coerce(&self) -> UnitAttributes {
        let area_display = or_default(&self.unit_size, "0");
        UnitAttributes {
            project_name: or_default(&self.project_name, "Project"),
            unit_no: or_default(&self.unit_no, "-"),
            area_size: parse_amount(&area_display),
            area_display,
            unit_type: or_default(&self.unit_type, "-"),
            base_rate: parse_amount(&self.price_rate),
            secondary_rate: parse_amount(&self.plc_rate),
            plan_key: self.costing_plan.clone(),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Typed unit input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitAttributes {
    pub project_name: String,
    pub unit_no: String,
    pub area_size: f64,
    /// Size text as listed, shown in the unit summary instead of the parsed value.
    pub area_display: String,
    pub unit_type: String,
    pub base_rate: f64,
    pub secondary_rate: f64,
    pub plan_key: String,
}

impl UnitAttributes {
    pub fn new(area_size: f64, base_rate: f64, secondary_rate: f64) -> Self {
        Self {
            project_name: "Project".to_string(),
            unit_no: "-".to_string(),
            area_size,
            area_display: area_size.to_string(),
            unit_type: "-".to_string(),
            base_rate,
            secondary_rate,
            plan_key: String::new(),
        }
    }
}

/// A per-area rate as quoted, before multiplying by the unit size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    pub label: String,
    pub rate: f64,
}

impl RateRow {
    /// Missing rates show as a dash rather than `0`.
    pub fn is_placeholder(&self) -> bool {
        self.rate == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub kind: ChargeKind,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub rates: Vec<RateRow>,
    pub items: Vec<LineItem>,
    pub grand_total: f64,
    pub base_for_payment_split: f64,
}

impl CostBreakdown {
    pub fn amount_of(&self, kind: ChargeKind) -> Option<f64> {
        self.items
            .iter()
            .find(|item| item.kind == kind)
            .map(|item| item.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneAmount {
    pub label: String,
    pub percent: u8,
    pub add_ons: Vec<ChargeKind>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSchedule {
    pub milestones: Vec<MilestoneAmount>,
}

impl PaymentSchedule {
    pub fn total(&self) -> f64 {
        self.milestones.iter().map(|milestone| milestone.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_applies_page_defaults() {
        let attributes = RawUnitAttributes::default().coerce();
        assert_eq!(attributes.project_name, "Project");
        assert_eq!(attributes.unit_no, "-");
        assert_eq!(attributes.unit_type, "-");
        assert_eq!(attributes.area_display, "0");
        assert_eq!(attributes.area_size, 0.0);
        assert_eq!(attributes.base_rate, 0.0);
    }

    #[test]
    fn coerce_parses_spreadsheet_numbers() {
        let raw = RawUnitAttributes {
            project_name: "Terra".to_string(),
            unit_no: "T-1204".to_string(),
            unit_size: "150 SqYd".to_string(),
            unit_type: "Plot".to_string(),
            price_rate: "₹5,000".to_string(),
            plc_rate: " 200 ".to_string(),
            costing_plan: "Costing Terra".to_string(),
        };
        let attributes = raw.coerce();
        assert_eq!(attributes.area_size, 150.0);
        assert_eq!(attributes.area_display, "150 SqYd");
        assert_eq!(attributes.base_rate, 5000.0);
        assert_eq!(attributes.secondary_rate, 200.0);
        assert_eq!(attributes.plan_key, "Costing Terra");
    }

    #[test]
    fn only_area_scaled_charges_enter_the_payment_base() {
        assert!(ChargeKind::Price.in_payment_base());
        assert!(ChargeKind::Surcharge.in_payment_base());
        assert!(!ChargeKind::AdminFee.in_payment_base());
        assert!(!ChargeKind::ContingencyDeposit.in_payment_base());
    }
}

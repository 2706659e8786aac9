use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::record::{keys, CatalogRecord};
use crate::workflows::costing::{
    select_plan, NotConfiguredNotice, PlanId, PlanSelection, RawUnitAttributes, UnitAttributes,
};

pub const SELECTED_PROJECT_NAME: &str = "selectedProjectName";
pub const SELECTED_UNIT_NO: &str = "selectedUnitNo";
pub const SELECTED_UNIT_SIZE: &str = "selectedUnitSize";
pub const SELECTED_UNIT_TYPE: &str = "selectedUnitType";
pub const SELECTED_PRICE_RATE: &str = "selectedPriceRate";
pub const SELECTED_PLC_RATE: &str = "selectedPLCRate";
pub const SELECTED_COSTING_PLAN: &str = "selectedCostingPlan";

/// Where selecting a unit leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum UnitRoute {
    CostSheet { plan: PlanId, page: &'static str },
    NotConfigured(NotConfiguredNotice),
}

/// Key/value store carrying a selected unit from the inventory to a cost
/// sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandoffStore {
    entries: BTreeMap<String, String>,
}

impl HandoffStore {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Records the unit's fields under the handoff keys. A row without a
    /// project name takes `fallback_project`.
    pub fn select_unit(&mut self, record: &CatalogRecord, fallback_project: &str) {
        self.set(
            SELECTED_PROJECT_NAME,
            record.get_or(keys::PROJECT_NAME, fallback_project),
        );
        self.set(SELECTED_UNIT_NO, record.get(keys::UNIT_NO));
        self.set(SELECTED_UNIT_SIZE, record.get(keys::SIZE));
        self.set(SELECTED_UNIT_TYPE, record.get(keys::UNIT_TYPE));
        self.set(SELECTED_PRICE_RATE, record.get(keys::PRICE_RATE));
        self.set(SELECTED_PLC_RATE, record.get(keys::PLC_RATE));
        self.set(SELECTED_COSTING_PLAN, record.get(keys::COSTING_PLAN));
        debug!(
            unit = self.get(SELECTED_UNIT_NO).unwrap_or_default(),
            "unit selected for costing"
        );
    }

    pub fn raw_attributes(&self) -> RawUnitAttributes {
        let read = |key| self.get(key).unwrap_or_default().to_string();
        RawUnitAttributes {
            project_name: read(SELECTED_PROJECT_NAME),
            unit_no: read(SELECTED_UNIT_NO),
            unit_size: read(SELECTED_UNIT_SIZE),
            unit_type: read(SELECTED_UNIT_TYPE),
            price_rate: read(SELECTED_PRICE_RATE),
            plc_rate: read(SELECTED_PLC_RATE),
            costing_plan: read(SELECTED_COSTING_PLAN),
        }
    }

    pub fn unit_attributes(&self) -> UnitAttributes {
        self.raw_attributes().coerce()
    }

    /// Resolves the stored plan label to its cost-sheet page.
    pub fn route(&self, contact: &str) -> UnitRoute {
        let label = self.get(SELECTED_COSTING_PLAN).unwrap_or_default();
        match select_plan(label) {
            PlanSelection::Configured { plan } => UnitRoute::CostSheet {
                plan,
                page: plan.page(),
            },
            PlanSelection::NotConfigured { label, .. } => {
                UnitRoute::NotConfigured(NotConfiguredNotice {
                    plan_label: label,
                    contact: contact.to_string(),
                })
            }
        }
    }
}

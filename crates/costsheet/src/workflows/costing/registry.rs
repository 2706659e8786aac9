use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::plans::PlanId;

static PLAN_KEY_MAP: OnceLock<HashMap<String, PlanId>> = OnceLock::new();

/// Outcome of resolving a unit's costing-plan label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanSelection {
    Configured { plan: PlanId },
    NotConfigured { label: String, normalized: String },
}

impl PlanSelection {
    pub fn plan(&self) -> Option<PlanId> {
        match self {
            Self::Configured { plan } => Some(*plan),
            Self::NotConfigured { .. } => None,
        }
    }
}

/// Lower-cases and keeps only `[a-z0-9]`.
pub fn normalize_plan_label(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

pub fn select_plan(raw_label: &str) -> PlanSelection {
    let normalized = normalize_plan_label(raw_label);
    match plan_key_map().get(&normalized) {
        Some(plan) => PlanSelection::Configured { plan: *plan },
        None => PlanSelection::NotConfigured {
            label: raw_label.to_string(),
            normalized,
        },
    }
}

/// Normalized keys accepted by the selector, for diagnostics and listings.
pub fn registered_keys() -> Vec<(String, PlanId)> {
    let mut keys: Vec<(String, PlanId)> = plan_key_map()
        .iter()
        .map(|(key, plan)| (key.clone(), *plan))
        .collect();
    keys.sort();
    keys
}

fn plan_key_map() -> &'static HashMap<String, PlanId> {
    PLAN_KEY_MAP.get_or_init(|| {
        // "Costing 102 Plots Old" and "Costing 60 Days Fortuna" route to a page
        // whose rules were never published; they stay unconfigured here.
        const LABEL_TO_PLAN: &[(&str, PlanId)] = &[
            ("Costing 102 High Rise", PlanId::HighRise102),
            ("Costing 102 Plots New", PlanId::PlotsNew102),
            ("Costing Terra", PlanId::Terra37D),
        ];

        let mut map = HashMap::with_capacity(LABEL_TO_PLAN.len());
        for (label, plan) in LABEL_TO_PLAN {
            map.insert(normalize_plan_label(label), *plan);
        }
        map
    })
}

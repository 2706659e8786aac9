//! Cost-sheet engine: plan selection, price breakdown, and payment schedule.
//!
//! Plans are data ([`PlanDefinition`]); one engine computes every plan.

pub mod amount;
pub mod domain;
mod engine;
mod plans;
mod registry;
pub mod views;

pub use amount::{format_amount, format_amount_text, parse_amount, round_amount};
pub use domain::{
    ChargeKind, CostBreakdown, LineItem, MilestoneAmount, PaymentSchedule, RateRow,
    RawUnitAttributes, UnitAttributes,
};
pub use engine::{
    compute_breakdown, compute_schedule, prepare_cost_sheet, CostSheet, CostingOutcome,
    NotConfiguredNotice,
};
pub use plans::{ChargeRules, MilestoneRule, PlanDefinition, PlanId, TaxedFee};
pub use registry::{normalize_plan_label, registered_keys, select_plan, PlanSelection};
pub use views::{AmountRow, CostSheetView, UnitSummaryView};

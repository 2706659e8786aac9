use serde::Serialize;
use tracing::debug;

use super::domain::{
    ChargeKind, CostBreakdown, LineItem, MilestoneAmount, PaymentSchedule, RateRow,
    UnitAttributes,
};
use super::plans::{PlanDefinition, PlanId};
use super::registry::{select_plan, PlanSelection};
use crate::progress::{ProgressGuard, ProgressReporter};

pub fn compute_breakdown(plan: &PlanDefinition, attrs: &UnitAttributes) -> CostBreakdown {
    let rules = &plan.charges;
    let area = attrs.area_size;
    let unit = plan.area_unit;

    let mut rates = vec![RateRow {
        label: format!("Base Rate (per {unit})"),
        rate: attrs.base_rate,
    }];
    let mut items = vec![LineItem {
        kind: ChargeKind::Price,
        label: "Price (Rate x Size)".to_string(),
        amount: attrs.base_rate * area,
    }];

    if rules.location_charge {
        rates.push(RateRow {
            label: format!("PLC Rate (per {unit})"),
            rate: attrs.secondary_rate,
        });
        items.push(LineItem {
            kind: ChargeKind::LocationCharge,
            label: "PLC (Rate x Size)".to_string(),
            amount: attrs.secondary_rate * area,
        });
    }

    if let Some(percent) = rules.surcharge_percent {
        let scaled: f64 = items.iter().map(|item| item.amount).sum();
        let basis = if rules.location_charge {
            "Price + PLC"
        } else {
            "Price"
        };
        items.push(LineItem {
            kind: ChargeKind::Surcharge,
            label: format!("GST @{percent}% on ({basis})"),
            amount: scaled * percent / 100.0,
        });
    }

    let base_for_payment_split: f64 = items.iter().map(|item| item.amount).sum();

    if let Some(fee) = rules.admin_fee {
        items.push(LineItem {
            kind: ChargeKind::AdminFee,
            label: format!("PRFC + {}% GST ({})", fee.tax_percent, fee.base),
            amount: fee.amount(),
        });
    }

    if let Some(rate) = rules.maintenance_rate {
        items.push(LineItem {
            kind: ChargeKind::MaintenanceCharge,
            label: format!("IFMS ({rate} x Size)"),
            amount: rate * area,
        });
    }

    if let Some(deposit) = rules.contingency_deposit {
        items.push(LineItem {
            kind: ChargeKind::ContingencyDeposit,
            label: "Interest Free Refundable Contingency Deposit (IFRCD)".to_string(),
            amount: deposit,
        });
    }

    let grand_total = items.iter().map(|item| item.amount).sum();

    CostBreakdown {
        rates,
        items,
        grand_total,
        base_for_payment_split,
    }
}

pub fn compute_schedule(plan: &PlanDefinition, breakdown: &CostBreakdown) -> PaymentSchedule {
    let base = breakdown.base_for_payment_split;
    let milestones = plan
        .milestones
        .iter()
        .map(|rule| {
            let fixed: f64 = rule
                .add_ons
                .iter()
                .filter_map(|charge| breakdown.amount_of(*charge))
                .sum();
            MilestoneAmount {
                label: rule.label(),
                percent: rule.percent,
                add_ons: rule.add_ons.to_vec(),
                amount: base * f64::from(rule.percent) / 100.0 + fixed,
            }
        })
        .collect();

    PaymentSchedule { milestones }
}

/// Breakdown and schedule for one unit under one plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSheet {
    pub plan: PlanId,
    pub attributes: UnitAttributes,
    pub breakdown: CostBreakdown,
    pub schedule: PaymentSchedule,
}

impl CostSheet {
    pub fn compute(plan: PlanId, attributes: UnitAttributes) -> Self {
        let definition = plan.definition();
        let breakdown = compute_breakdown(definition, &attributes);
        let schedule = compute_schedule(definition, &breakdown);
        debug!(
            plan = plan.label(),
            unit = %attributes.unit_no,
            grand_total = breakdown.grand_total,
            "cost sheet computed"
        );
        Self {
            plan,
            attributes,
            breakdown,
            schedule,
        }
    }
}

/// Shown instead of a cost sheet when a unit's plan has no rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotConfiguredNotice {
    pub plan_label: String,
    pub contact: String,
}

impl NotConfiguredNotice {
    pub fn message(&self) -> String {
        format!(
            "No cost sheet configured for this unit.\nConnect to {}",
            self.contact
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CostingOutcome {
    Ready(CostSheet),
    NotConfigured(NotConfiguredNotice),
}

/// Selects the plan from the unit's own label and computes its cost sheet.
///
/// Unknown labels produce a notice naming `contact`; nothing is computed for
/// them.
pub fn prepare_cost_sheet(
    attributes: UnitAttributes,
    contact: &str,
    progress: &dyn ProgressReporter,
) -> CostingOutcome {
    let _busy = ProgressGuard::show(progress, "Preparing Costing...");
    match select_plan(&attributes.plan_key) {
        PlanSelection::Configured { plan } => {
            CostingOutcome::Ready(CostSheet::compute(plan, attributes))
        }
        PlanSelection::NotConfigured { label, normalized } => {
            debug!(%label, %normalized, "no cost sheet registered for plan label");
            CostingOutcome::NotConfigured(NotConfiguredNotice {
                plan_label: label,
                contact: contact.to_string(),
            })
        }
    }
}

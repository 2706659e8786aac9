use serde::{Deserialize, Serialize};

use super::domain::ChargeKind;
use ChargeKind::{AdminFee, ContingencyDeposit, MaintenanceCharge};

/// Rule sets with a published cost sheet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    HighRise102,
    PlotsNew102,
    Terra37D,
}

impl PlanId {
    pub const fn ordered() -> [Self; 3] {
        [Self::HighRise102, Self::PlotsNew102, Self::Terra37D]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighRise102 => "102 High Rise",
            Self::PlotsNew102 => "102 Plots (New)",
            Self::Terra37D => "37D Terra",
        }
    }

    /// Static page that renders this plan's cost sheet.
    pub const fn page(self) -> &'static str {
        match self {
            Self::HighRise102 => "costing-102-highrise.html",
            Self::PlotsNew102 => "costing-102-plotsnew.html",
            Self::Terra37D => "costing-37d-terra.html",
        }
    }

    pub fn definition(self) -> &'static PlanDefinition {
        match self {
            Self::HighRise102 => &HIGH_RISE_102,
            Self::PlotsNew102 => &PLOTS_NEW_102,
            Self::Terra37D => &TERRA_37D,
        }
    }
}

/// Fixed fee quoted before tax, e.g. PRFC 25000 + 18% GST.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxedFee {
    pub base: f64,
    pub tax_percent: f64,
}

impl TaxedFee {
    pub fn amount(&self) -> f64 {
        self.base * (100.0 + self.tax_percent) / 100.0
    }
}

/// Which charges a plan levies and at what rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargeRules {
    /// Whether the secondary rate is billed as a PLC line.
    pub location_charge: bool,
    /// Percentage levied on the area-scaled charges.
    pub surcharge_percent: Option<f64>,
    pub admin_fee: Option<TaxedFee>,
    /// IFMS rate per area unit.
    pub maintenance_rate: Option<f64>,
    pub contingency_deposit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MilestoneRule {
    pub stage: &'static str,
    pub percent: u8,
    pub add_ons: &'static [ChargeKind],
}

impl MilestoneRule {
    pub fn label(&self) -> String {
        let mut label = format!("{} @{}%", self.stage, self.percent);
        for charge in self.add_ons {
            label.push_str(" + ");
            label.push_str(charge.short_label());
        }
        label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanDefinition {
    pub id: PlanId,
    pub area_unit: &'static str,
    pub charges: ChargeRules,
    pub milestones: &'static [MilestoneRule],
}

impl PlanDefinition {
    pub fn percent_total(&self) -> u32 {
        self.milestones
            .iter()
            .map(|milestone| u32::from(milestone.percent))
            .sum()
    }
}

// IFMS is 50/area on High Rise and Terra but 500/area on Plots (New). The
// rates are kept as published until the plan owners confirm one of them.
static HIGH_RISE_102: PlanDefinition = PlanDefinition {
    id: PlanId::HighRise102,
    area_unit: "SqYD",
    charges: ChargeRules {
        location_charge: true,
        surcharge_percent: Some(5.0),
        admin_fee: Some(TaxedFee {
            base: 25_000.0,
            tax_percent: 18.0,
        }),
        maintenance_rate: Some(50.0),
        contingency_deposit: Some(150_000.0),
    },
    milestones: &[
        MilestoneRule {
            stage: "Booking Amount",
            percent: 9,
            add_ons: &[AdminFee],
        },
        MilestoneRule {
            stage: "Within 60 days",
            percent: 11,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 120 days",
            percent: 10,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "On Top Residential Floor",
            percent: 30,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "On Application of OC",
            percent: 25,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "On Receiving of OC",
            percent: 10,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "On Offer of Possession",
            percent: 5,
            add_ons: &[MaintenanceCharge, ContingencyDeposit],
        },
    ],
};

// No GST line on this plan, unlike its siblings.
static PLOTS_NEW_102: PlanDefinition = PlanDefinition {
    id: PlanId::PlotsNew102,
    area_unit: "SqYD",
    charges: ChargeRules {
        location_charge: true,
        surcharge_percent: None,
        admin_fee: Some(TaxedFee {
            base: 40_000.0,
            tax_percent: 18.0,
        }),
        maintenance_rate: Some(500.0),
        contingency_deposit: Some(150_000.0),
    },
    milestones: &[
        MilestoneRule {
            stage: "Booking Amount",
            percent: 10,
            add_ons: &[AdminFee],
        },
        MilestoneRule {
            stage: "Within 30 days",
            percent: 15,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 60 days",
            percent: 15,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 90 days",
            percent: 15,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 120 days",
            percent: 15,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 150 days",
            percent: 15,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 180 days",
            percent: 10,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "On Offer of Possession",
            percent: 5,
            add_ons: &[MaintenanceCharge, ContingencyDeposit],
        },
    ],
};

static TERRA_37D: PlanDefinition = PlanDefinition {
    id: PlanId::Terra37D,
    area_unit: "SqYD",
    charges: ChargeRules {
        location_charge: false,
        surcharge_percent: Some(5.0),
        admin_fee: Some(TaxedFee {
            base: 20_000.0,
            tax_percent: 18.0,
        }),
        maintenance_rate: Some(50.0),
        contingency_deposit: None,
    },
    milestones: &[
        MilestoneRule {
            stage: "Booking Amount",
            percent: 10,
            add_ons: &[AdminFee],
        },
        MilestoneRule {
            stage: "Within 30 days",
            percent: 10,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "Within 90 days",
            percent: 75,
            add_ons: &[],
        },
        MilestoneRule {
            stage: "On Offer of Possession",
            percent: 5,
            add_ons: &[MaintenanceCharge],
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn levied_fixed_charges(rules: &ChargeRules) -> Vec<ChargeKind> {
        let mut charges = Vec::new();
        if rules.admin_fee.is_some() {
            charges.push(AdminFee);
        }
        if rules.maintenance_rate.is_some() {
            charges.push(MaintenanceCharge);
        }
        if rules.contingency_deposit.is_some() {
            charges.push(ContingencyDeposit);
        }
        charges
    }

    #[test]
    fn every_plan_splits_exactly_one_hundred_percent() {
        for plan in PlanId::ordered() {
            assert_eq!(
                plan.definition().percent_total(),
                100,
                "{} milestones must sum to 100%",
                plan.label()
            );
        }
    }

    #[test]
    fn every_fixed_charge_is_collected_by_exactly_one_milestone() {
        for plan in PlanId::ordered() {
            let definition = plan.definition();
            for charge in levied_fixed_charges(&definition.charges) {
                let collectors = definition
                    .milestones
                    .iter()
                    .filter(|milestone| milestone.add_ons.contains(&charge))
                    .count();
                assert_eq!(
                    collectors,
                    1,
                    "{} must collect {:?} once",
                    plan.label(),
                    charge
                );
            }
        }
    }

    #[test]
    fn milestones_never_add_percentage_based_charges() {
        for plan in PlanId::ordered() {
            for milestone in plan.definition().milestones {
                assert!(milestone
                    .add_ons
                    .iter()
                    .all(|charge| !charge.in_payment_base()));
            }
        }
    }

    #[test]
    fn definitions_are_keyed_by_their_own_id() {
        for plan in PlanId::ordered() {
            assert_eq!(plan.definition().id, plan);
        }
    }

    #[test]
    fn observed_percentage_splits_are_preserved() {
        let percents = |plan: PlanId| {
            plan.definition()
                .milestones
                .iter()
                .map(|milestone| milestone.percent)
                .collect::<Vec<_>>()
        };
        assert_eq!(percents(PlanId::HighRise102), vec![9, 11, 10, 30, 25, 10, 5]);
        assert_eq!(
            percents(PlanId::PlotsNew102),
            vec![10, 15, 15, 15, 15, 15, 10, 5]
        );
        assert_eq!(percents(PlanId::Terra37D), vec![10, 10, 75, 5]);
    }

    #[test]
    fn milestone_labels_name_their_add_ons() {
        let possession = PlanId::HighRise102
            .definition()
            .milestones
            .last()
            .expect("possession milestone");
        assert_eq!(
            possession.label(),
            "On Offer of Possession @5% + IFMS + IFRCD"
        );
        assert_eq!(
            PlanId::Terra37D.definition().milestones[0].label(),
            "Booking Amount @10% + PRFC"
        );
    }

    #[test]
    fn taxed_fee_embeds_the_tax() {
        let fee = TaxedFee {
            base: 40_000.0,
            tax_percent: 18.0,
        };
        assert_eq!(fee.amount(), 47_200.0);
    }
}

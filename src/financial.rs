//! Costs, savings and long-term projections of an installed system.

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Assumptions;
use crate::equipment::{BatterySpec, FinancingKind};
use crate::types::non_negative;

/// Peak and off-peak retail prices in $/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOfUseRates {
    pub peak_rate: f64,
    pub off_peak_rate: f64,
    /// Share of production during peak hours; the assumptions decide when absent.
    #[serde(default)]
    pub peak_production_fraction: Option<f64>,
}

#[derive(Debug, Clone, Builder)]
pub struct CostInputs {
    /// Installed $/W.
    pub cost_per_watt: f64,
    /// Flat retail $/kWh.
    pub electricity_rate: f64,
    pub battery: Option<BatterySpec>,
    /// Yearly production loss as a fraction.
    #[builder(default = 0.005)]
    pub degradation_rate: f64,
    /// Needed to value exports at the net-metering rate.
    pub annual_usage_kwh: Option<f64>,
    pub net_metering_rate: Option<f64>,
    pub time_of_use: Option<TimeOfUseRates>,
    pub monthly_demand_charge: Option<f64>,
    #[builder(default)]
    pub assumptions: Assumptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SavingsBreakdown {
    pub energy: f64,
    /// Positive when production is worth more under the time-of-use tariff than the flat rate.
    pub time_of_use_adjustment: f64,
    pub battery_arbitrage: f64,
    pub demand_charge: f64,
}

impl SavingsBreakdown {
    pub fn total(&self) -> f64 {
        self.energy + self.time_of_use_adjustment + self.battery_arbitrage + self.demand_charge
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearProjection {
    pub year: u32,
    pub production_kwh: f64,
    pub electricity_rate: f64,
    pub savings: f64,
    pub discounted_savings: f64,
    pub cumulative_savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    pub co2_offset_tonnes_per_year: f64,
    pub lifetime_co2_offset_tonnes: f64,
    pub trees_equivalent: f64,
    pub car_miles_avoided: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialResult {
    pub system_cost: f64,
    pub cost_per_watt: f64,
    pub battery_cost: f64,
    pub federal_tax_credit: f64,
    pub net_cost: f64,
    pub savings: SavingsBreakdown,
    pub annual_savings: f64,
    pub monthly_savings: f64,
    /// Years until savings cover the net cost; `None` when they never do.
    pub payback_period: Option<f64>,
    /// First projected year with non-negative cumulative savings.
    pub break_even_year: Option<u32>,
    /// Return over the horizon in percent; `None` for a zero net cost.
    pub roi: Option<f64>,
    pub npv: f64,
    pub lifetime_savings: f64,
    pub net_lifetime_savings: f64,
    pub lifetime_production_kwh: f64,
    pub degradation_rate: f64,
    pub projections: Vec<YearProjection>,
    pub environmental: EnvironmentalImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancingOption {
    pub kind: FinancingKind,
    pub label: String,
    pub upfront_cost: f64,
    pub monthly_payment: f64,
    pub total_cost: f64,
    /// Annual rate as a fraction, zero unless borrowing.
    pub interest_rate: f64,
    pub term_years: u32,
    /// Contract price of a power purchase agreement.
    pub price_per_kwh: Option<f64>,
    pub first_year_net_savings: f64,
}

/// Monthly annuity payment.
pub fn loan_payment(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let principal = non_negative(principal);
    let n_payments = f64::from(years) * 12.0;
    if n_payments == 0.0 {
        return principal;
    }
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate <= 0.0 {
        return principal / n_payments;
    }
    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-n_payments))
}

pub fn environmental_impact(
    annual_production_kwh: f64,
    lifetime_production_kwh: f64,
    assumptions: &Assumptions,
) -> EnvironmentalImpact {
    let co2_per_year = non_negative(annual_production_kwh) * assumptions.grid_emission_factor;
    let co2_kg_per_year = co2_per_year * 1_000.0;
    EnvironmentalImpact {
        co2_offset_tonnes_per_year: co2_per_year,
        lifetime_co2_offset_tonnes: non_negative(lifetime_production_kwh)
            * assumptions.grid_emission_factor,
        trees_equivalent: co2_kg_per_year / assumptions.tree_absorption_kg,
        car_miles_avoided: co2_kg_per_year / assumptions.car_emission_kg_per_mile,
    }
}

fn savings_breakdown(annual_production: f64, inputs: &CostInputs) -> SavingsBreakdown {
    let rate = non_negative(inputs.electricity_rate);
    let energy = match (inputs.annual_usage_kwh, inputs.net_metering_rate) {
        (Some(usage), Some(export_rate)) => {
            let usage = non_negative(usage);
            let exported = (annual_production - usage).max(0.0);
            (annual_production - exported) * rate + exported * non_negative(export_rate)
        }
        _ => annual_production * rate,
    };

    let mut savings = SavingsBreakdown {
        energy,
        ..SavingsBreakdown::default()
    };
    if let Some(tou) = inputs.time_of_use {
        let peak_fraction = tou
            .peak_production_fraction
            .unwrap_or(inputs.assumptions.peak_production_fraction)
            .clamp(0.0, 1.0);
        let peak_rate = non_negative(tou.peak_rate);
        let off_peak_rate = non_negative(tou.off_peak_rate);
        let tou_value = annual_production
            * (peak_fraction * peak_rate + (1.0 - peak_fraction) * off_peak_rate);
        savings.time_of_use_adjustment = tou_value - annual_production * rate;

        if let Some(battery) = inputs.battery {
            savings.battery_arbitrage = non_negative(battery.capacity_kwh)
                * (peak_rate - off_peak_rate).max(0.0)
                * inputs.assumptions.battery_usable_days;
        }
    }
    if let (Some(_), Some(demand_charge)) = (inputs.battery, inputs.monthly_demand_charge) {
        savings.demand_charge =
            inputs.assumptions.demand_charge_reduction * non_negative(demand_charge) * 12.0;
    }
    savings
}

/// Year-by-year production and savings with compounding degradation and rate escalation.
///
/// Row 0 holds the purchase: no production, cumulative savings of `-net_cost`.
pub fn project_savings(
    annual_production_kwh: f64,
    annual_savings: f64,
    net_cost: f64,
    electricity_rate: f64,
    degradation_rate: f64,
    assumptions: &Assumptions,
) -> Vec<YearProjection> {
    let mut projections = Vec::with_capacity(assumptions.horizon_years as usize + 1);
    projections.push(YearProjection {
        year: 0,
        production_kwh: 0.0,
        electricity_rate,
        savings: 0.0,
        discounted_savings: 0.0,
        cumulative_savings: -net_cost,
    });

    let mut degradation = 1.0;
    let mut escalation = 1.0;
    let mut discount = 1.0;
    let mut cumulative = -net_cost;
    for year in 1..=assumptions.horizon_years {
        discount *= 1.0 + assumptions.discount_rate;
        let savings = annual_savings * degradation * escalation;
        cumulative += savings;
        projections.push(YearProjection {
            year,
            production_kwh: annual_production_kwh * degradation,
            electricity_rate: electricity_rate * escalation,
            savings,
            discounted_savings: savings / discount,
            cumulative_savings: cumulative,
        });
        degradation *= 1.0 - degradation_rate;
        escalation *= 1.0 + assumptions.rate_escalation;
    }
    projections
}

/// Costs, incentives, savings and multi-year returns of a system.
pub fn calculate_financials(
    system_size_kw: f64,
    annual_production_kwh: f64,
    inputs: &CostInputs,
) -> FinancialResult {
    let assumptions = &inputs.assumptions;
    let system_size = non_negative(system_size_kw);
    let production = non_negative(annual_production_kwh);
    let cost_per_watt = non_negative(inputs.cost_per_watt);
    let degradation_rate = non_negative(inputs.degradation_rate).min(1.0);

    let battery_cost = inputs.battery.map_or(0.0, |battery| non_negative(battery.installed_cost));
    let system_cost = system_size * 1_000.0 * cost_per_watt + battery_cost;
    let federal_tax_credit = system_cost * assumptions.federal_tax_credit_rate;
    let net_cost = system_cost - federal_tax_credit;

    let savings = savings_breakdown(production, inputs);
    let annual_savings = savings.total();
    let payback_period = (annual_savings > 0.0).then(|| net_cost / annual_savings);

    let electricity_rate = non_negative(inputs.electricity_rate);
    let projections = project_savings(
        production,
        annual_savings,
        net_cost,
        electricity_rate,
        degradation_rate,
        assumptions,
    );
    let lifetime_savings: f64 = projections.iter().map(|row| row.savings).sum();
    let lifetime_production: f64 = projections.iter().map(|row| row.production_kwh).sum();
    let npv = projections.iter().map(|row| row.discounted_savings).sum::<f64>() - net_cost;
    let roi = (net_cost > 0.0).then(|| (lifetime_savings - net_cost) / net_cost * 100.0);
    let break_even_year =
        projections.iter().find(|row| row.cumulative_savings >= 0.0).map(|row| row.year);

    debug!(system_cost, net_cost, annual_savings, ?payback_period, npv, "projected financials");

    FinancialResult {
        system_cost,
        cost_per_watt,
        battery_cost,
        federal_tax_credit,
        net_cost,
        savings,
        annual_savings,
        monthly_savings: annual_savings / 12.0,
        payback_period,
        break_even_year,
        roi,
        npv,
        lifetime_savings,
        net_lifetime_savings: lifetime_savings - net_cost,
        lifetime_production_kwh: lifetime_production,
        degradation_rate,
        projections,
        environmental: environmental_impact(production, lifetime_production, assumptions),
    }
}

/// Cash first, then every configured loan, a lease and a power purchase agreement.
///
/// Loan offers without a term are skipped.
pub fn financing_options(
    financials: &FinancialResult,
    annual_production_kwh: f64,
    electricity_rate: f64,
    assumptions: &Assumptions,
) -> Vec<FinancingOption> {
    let annual_savings = financials.annual_savings;
    let mut options = Vec::with_capacity(assumptions.loan_offers.len() + 3);

    options.push(FinancingOption {
        kind: FinancingKind::Cash,
        label: String::from("Cash Purchase"),
        upfront_cost: financials.net_cost,
        monthly_payment: 0.0,
        total_cost: financials.net_cost,
        interest_rate: 0.0,
        term_years: 0,
        price_per_kwh: None,
        first_year_net_savings: annual_savings,
    });

    for offer in &assumptions.loan_offers {
        if offer.term_years == 0 {
            warn!(annual_rate = offer.annual_rate, "skipping loan offer with no term");
            continue;
        }
        let monthly_payment =
            loan_payment(financials.net_cost, offer.annual_rate, offer.term_years);
        options.push(FinancingOption {
            kind: FinancingKind::Loan,
            label: format!(
                "Solar Loan ({} yr @ {:.2}%)",
                offer.term_years,
                offer.annual_rate * 100.0
            ),
            upfront_cost: 0.0,
            monthly_payment,
            total_cost: monthly_payment * 12.0 * f64::from(offer.term_years),
            interest_rate: offer.annual_rate,
            term_years: offer.term_years,
            price_per_kwh: None,
            first_year_net_savings: annual_savings - monthly_payment * 12.0,
        });
    }

    let lease_payment = annual_savings.max(0.0) * assumptions.lease_savings_share / 12.0;
    options.push(FinancingOption {
        kind: FinancingKind::Lease,
        label: String::from("Solar Lease"),
        upfront_cost: 0.0,
        monthly_payment: lease_payment,
        total_cost: lease_payment * 12.0 * f64::from(assumptions.lease_term_years),
        interest_rate: 0.0,
        term_years: assumptions.lease_term_years,
        price_per_kwh: None,
        first_year_net_savings: annual_savings - lease_payment * 12.0,
    });

    let production = non_negative(annual_production_kwh);
    let ppa_price = non_negative(electricity_rate) * assumptions.ppa_rate_discount;
    let mut ppa_total = 0.0;
    let mut yearly_production = production;
    let mut yearly_price = ppa_price;
    for _ in 0..assumptions.ppa_term_years {
        ppa_total += yearly_production * yearly_price;
        yearly_production *= 1.0 - financials.degradation_rate;
        yearly_price *= 1.0 + assumptions.ppa_escalation;
    }
    let ppa_first_year = production * ppa_price;
    options.push(FinancingOption {
        kind: FinancingKind::Ppa,
        label: String::from("Power Purchase Agreement"),
        upfront_cost: 0.0,
        monthly_payment: ppa_first_year / 12.0,
        total_cost: ppa_total,
        interest_rate: 0.0,
        term_years: assumptions.ppa_term_years,
        price_per_kwh: Some(ppa_price),
        first_year_net_savings: annual_savings - ppa_first_year,
    });

    options
}

//! Rule-based advisory notes for the board report.
//!
//! Each portfolio has a fixed decision tree over a handful of metric
//! thresholds. Rules are evaluated in order and may each append one note;
//! the order of the returned list is part of the contract.

use crate::types::{MetricsSnapshot, Portfolio, TenantRow};
use crate::util::parse_metric_number;

pub const REVENUE_AT_RISK: &str = "Revenue at Risk";
pub const HIGH_RISK_TENANTS: &str = "High Risk Tenants";
pub const COMMITTED_OCCUPANCY: &str = "Committed Occupancy";
pub const SIMULATION_ACTIVE: &str = "Simulation Active";

pub const CRITICAL_REVENUE: &str = "CRITICAL: Revenue exposure exceeds $150k. Immediate legal demand letters recommended for top 5 debtors.";
pub const MODERATE_REVENUE: &str = "Moderate Revenue Risk. Initiate payment plan negotiations with 'Late Pay' tenants.";
pub const HEALTH_ALERT: &str = "Portfolio Health Alert: High volume of at-risk tenants. Review property management collection procedures.";
pub const CASH_FLOW_ISSUE: &str = "Dominant Issue: Cash Flow. Tenants are struggling to pay. Review rental levels vs. market turnover.";
pub const FOOTFALL_ISSUE: &str = "Dominant Issue: Footfall. Tenants are suffering from low traffic. Marketing activations required.";
pub const EARLY_STAGE: &str = "Early Stage Risk: Occupancy below 30%. Prioritize Anchor Tenant incentives to unlock line shop interest.";
pub const GROWTH_PHASE: &str = "Growth Phase: accelerate broker incentives to cross the 60% threshold for bank funding.";
pub const STABILIZATION: &str = "Stabilization: Strong pre-let status. Focus on 'Tenant Mix' curation and premium rental rates.";
pub const SCENARIO_CONFIRMED: &str = "SCENARIO: This simulation confirms project viability. Use this report for Bank Funding applications.";
pub const PIPELINE_OPPORTUNITY: &str = "Pipeline Opportunity: Significant GLA in 'Negotiating' phase. Launch closing campaign to convert pipeline.";
pub const STABLE_OPERATIONS: &str = "Operations appear stable based on current filters. Continue routine monitoring.";

const CRITICAL_REVENUE_THRESHOLD: f64 = 150_000.0;
const MODERATE_REVENUE_THRESHOLD: f64 = 50_000.0;
const HIGH_RISK_COUNT_THRESHOLD: f64 = 25.0;
const LATE_PAYER_SHARE_THRESHOLD: f64 = 0.6;
const EARLY_STAGE_OCCUPANCY: f64 = 30.0;
const GROWTH_OCCUPANCY: f64 = 60.0;

fn metric_number(metrics: &MetricsSnapshot, label: &str) -> f64 {
    metrics.get(label).map(parse_metric_number).unwrap_or(0.0)
}

/// Advisory notes for a filtered portfolio. Never empty.
pub fn recommend(portfolio: &Portfolio<'_>, metrics: &MetricsSnapshot) -> Vec<String> {
    let mut recs: Vec<&'static str> = match portfolio {
        Portfolio::Operational(rows) => operational_rules(rows, metrics),
        Portfolio::Development(_) => development_rules(metrics),
    };
    if recs.is_empty() {
        recs.push(STABLE_OPERATIONS);
    }
    recs.into_iter().map(str::to_string).collect()
}

fn operational_rules(rows: &[TenantRow], metrics: &MetricsSnapshot) -> Vec<&'static str> {
    let mut recs = Vec::new();

    let revenue_at_risk = metric_number(metrics, REVENUE_AT_RISK);
    if revenue_at_risk > CRITICAL_REVENUE_THRESHOLD {
        recs.push(CRITICAL_REVENUE);
    } else if revenue_at_risk > MODERATE_REVENUE_THRESHOLD {
        recs.push(MODERATE_REVENUE);
    }

    if metric_number(metrics, HIGH_RISK_TENANTS) > HIGH_RISK_COUNT_THRESHOLD {
        recs.push(HEALTH_ALERT);
    }

    if let Some(share) = late_payer_share(rows) {
        if share > LATE_PAYER_SHARE_THRESHOLD {
            recs.push(CASH_FLOW_ISSUE);
        } else {
            recs.push(FOOTFALL_ISSUE);
        }
    }

    recs
}

/// Share of tenants with at least one late payment, or `None` when there
/// is nothing to attribute (no rows, or no late-payment data at all).
fn late_payer_share(rows: &[TenantRow]) -> Option<f64> {
    if rows.is_empty() || rows.iter().all(|r| r.late_payments_last_12m.is_none()) {
        return None;
    }
    let late = rows
        .iter()
        .filter(|r| r.late_payments_last_12m.unwrap_or(0) > 0)
        .count();
    Some(late as f64 / rows.len() as f64)
}

fn development_rules(metrics: &MetricsSnapshot) -> Vec<&'static str> {
    let mut recs = Vec::new();

    let committed = metric_number(metrics, COMMITTED_OCCUPANCY);
    if committed < EARLY_STAGE_OCCUPANCY {
        recs.push(EARLY_STAGE);
    } else if committed < GROWTH_OCCUPANCY {
        recs.push(GROWTH_PHASE);
    } else {
        recs.push(STABILIZATION);
    }

    if metrics.get(SIMULATION_ACTIVE) == Some("Yes") {
        recs.push(SCENARIO_CONFIRMED);
    } else {
        recs.push(PIPELINE_OPPORTUNITY);
    }

    recs
}

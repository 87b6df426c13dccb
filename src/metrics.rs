//! Aggregate figures shown on the dashboards and in the board report.

use std::collections::{BTreeMap, HashMap};

use crate::filters::{PipelineFilter, TenantFilter};
use crate::recommend::{COMMITTED_OCCUPANCY, HIGH_RISK_TENANTS, REVENUE_AT_RISK, SIMULATION_ACTIVE};
use crate::types::{
    AnchorTenantRow, MetricsSnapshot, PipelineRow, SectorExposureRow, StatusGlaRow, TenantRow,
};
use crate::util::{format_area, format_currency, format_int, format_number};

/// Pipeline deals above this size are treated as anchors.
pub const ANCHOR_MIN_AREA: f64 = 2000.0;

/// Metrics for the operational dashboard.
///
/// `all_rows` is the unfiltered roster (used to count assets when the
/// filter selects all of them); `visible` is the filtered view.
pub fn operational_metrics(
    filter: &TenantFilter,
    all_rows: &[TenantRow],
    visible: &[TenantRow],
) -> MetricsSnapshot {
    let total_gla: f64 = visible.iter().map(|r| r.occupied_area).sum();
    let monthly_revenue: f64 = visible.iter().map(TenantRow::monthly_rent).sum();
    let at_risk: Vec<&TenantRow> = visible.iter().filter(|r| r.risk_flag).collect();
    let revenue_at_risk: f64 = at_risk.iter().map(|r| r.monthly_rent()).sum();
    let high_risk = if filter.risk_only {
        visible.len()
    } else {
        at_risk.len()
    };

    MetricsSnapshot::new()
        .with("Assets in View", format_int(filter.asset_count(all_rows)))
        .with("Total GLA Visible", format_area(total_gla))
        .with("Monthly Revenue", format_currency(monthly_revenue, 2))
        .with(REVENUE_AT_RISK, format_currency(revenue_at_risk, 2))
        .with(HIGH_RISK_TENANTS, high_risk.to_string())
}

/// Metrics for the development dashboard against a fixed master plan.
pub fn development_metrics(
    filter: &PipelineFilter,
    visible: &[PipelineRow],
    master_plan_gla: f64,
) -> MetricsSnapshot {
    let committed = committed_gla(visible);
    let occupied: f64 = visible.iter().map(|r| r.occupied_area).sum();
    let occupancy = if master_plan_gla > 0.0 {
        committed / master_plan_gla * 100.0
    } else {
        0.0
    };

    MetricsSnapshot::new()
        .with(SIMULATION_ACTIVE, if filter.simulate { "Yes" } else { "No" })
        .with("Master Plan GLA", format_area(master_plan_gla))
        .with(COMMITTED_OCCUPANCY, format!("{:.1}%", occupancy))
        .with("Pipeline/Negotiating", format_area(occupied - committed))
}

/// Closing row of the leasing velocity table.
pub const VACANT_SPACE: &str = "Vacant Space";

fn committed_gla(rows: &[PipelineRow]) -> f64 {
    rows.iter()
        .filter(|r| r.pre_let_status.contains("Committed"))
        .map(|r| r.occupied_area)
        .sum()
}

/// Master plan GLA not yet taken by any deal in view. Goes negative when
/// the pipeline oversubscribes the plan.
pub fn remaining_vacancy(rows: &[PipelineRow], master_plan_gla: f64) -> f64 {
    master_plan_gla - rows.iter().map(|r| r.occupied_area).sum::<f64>()
}

/// Headline tiles of the operational dashboard (whole dollars, unlike the
/// report metrics).
pub fn operational_headline(visible: &[TenantRow]) -> MetricsSnapshot {
    let total_gla: f64 = visible.iter().map(|r| r.occupied_area).sum();
    let monthly_revenue: f64 = visible.iter().map(TenantRow::monthly_rent).sum();
    let revenue_at_risk: f64 = visible
        .iter()
        .filter(|r| r.risk_flag)
        .map(TenantRow::monthly_rent)
        .sum();

    MetricsSnapshot::new()
        .with("Visible GLA", format_area(total_gla))
        .with("Monthly Revenue", format_currency(monthly_revenue, 0))
        .with(REVENUE_AT_RISK, format_currency(revenue_at_risk, 0))
        .with("Tenants in View", format_int(visible.len()))
}

/// Headline tiles of the development dashboard.
pub fn development_headline(visible: &[PipelineRow], master_plan_gla: f64) -> MetricsSnapshot {
    let committed = committed_gla(visible);
    let share = if master_plan_gla > 0.0 {
        committed / master_plan_gla * 100.0
    } else {
        0.0
    };

    MetricsSnapshot::new()
        .with("Master Plan GLA", format_area(master_plan_gla))
        .with(
            COMMITTED_OCCUPANCY,
            format!("{} ({:.1}%)", format_area(committed), share),
        )
        .with("Remaining Vacancy", format_area(remaining_vacancy(visible, master_plan_gla)))
}

/// Leasing velocity: GLA per pre-let status in name order, closed by the
/// space still vacant against the master plan.
pub fn leasing_velocity(rows: &[PipelineRow], master_plan_gla: f64) -> Vec<StatusGlaRow> {
    let mut by_status: BTreeMap<&str, f64> = BTreeMap::new();
    for r in rows {
        *by_status.entry(r.pre_let_status.as_str()).or_default() += r.occupied_area;
    }
    by_status
        .into_iter()
        .map(|(status, gla)| (status.to_string(), gla))
        .chain(std::iter::once((
            VACANT_SPACE.to_string(),
            remaining_vacancy(rows, master_plan_gla),
        )))
        .map(|(status, gla)| StatusGlaRow { status, gla: format_number(gla, 0) })
        .collect()
}

/// Coarse retail category from the tenant's trading name.
pub fn tenant_category(name: &str) -> &'static str {
    const FOOD: &[&str] = &[
        "pizza", "chicken", "creamy", "nush", "smokehouse", "spur", "rocomamas", "ocean", "mugg",
        "kfc",
    ];
    const GROCERY: &[&str] = &["pick n pay", "spar", "woolworths", "checkers"];
    const SERVICES: &[&str] = &["pharmacy", "clicks", "sorbet", "bank", "solution"];

    let name = name.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| name.contains(w));
    if has_any(FOOD) {
        "Food & Beverage"
    } else if has_any(GROCERY) {
        "Grocery / Anchor"
    } else if has_any(SERVICES) {
        "Services / Health"
    } else if name.contains("line shop") {
        "Specialty Retail"
    } else {
        "Other Retail"
    }
}

/// Tenant count and GLA per category, largest count first.
pub fn sector_exposure(rows: &[TenantRow]) -> Vec<SectorExposureRow> {
    let mut map: HashMap<&'static str, (usize, f64)> = HashMap::new();
    for r in rows {
        let e = map.entry(tenant_category(&r.tenant_name)).or_default();
        e.0 += 1;
        e.1 += r.occupied_area;
    }
    let mut tmp: Vec<(&'static str, usize, f64)> =
        map.into_iter().map(|(k, (n, gla))| (k, n, gla)).collect();
    tmp.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    tmp.into_iter()
        .map(|(category, tenants, gla)| SectorExposureRow {
            category: category.to_string(),
            tenants,
            gla: format_number(gla, 0),
        })
        .collect()
}

/// Pipeline deals large enough to anchor the scheme, biggest first.
pub fn anchor_tenants(rows: &[PipelineRow]) -> Vec<AnchorTenantRow> {
    let mut anchors: Vec<&PipelineRow> =
        rows.iter().filter(|r| r.occupied_area > ANCHOR_MIN_AREA).collect();
    anchors.sort_by(|a, b| b.occupied_area.total_cmp(&a.occupied_area));
    anchors
        .into_iter()
        .map(|r| AnchorTenantRow {
            tenant_name: r.tenant_name.clone(),
            gla: format_number(r.occupied_area, 0),
            pre_let_status: r.pre_let_status.clone(),
            fit_out_budget: format_currency(r.fit_out_budget, 0),
            deposit_paid: if r.deposit_paid.is_paid() { "Yes" } else { "No" }.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DepositPaid;

    fn tenant(name: &str, area: f64, rent: f64, risk: bool) -> TenantRow {
        TenantRow {
            tenant_name: name.to_string(),
            asset_name: "Village Walk".to_string(),
            occupied_area: area,
            lease_expiry_months: 10,
            rent_per_area: rent,
            late_payments_last_12m: Some(0),
            risk_flag: risk,
        }
    }

    fn deal(name: &str, status: &str, area: f64) -> PipelineRow {
        PipelineRow {
            tenant_name: name.to_string(),
            pre_let_status: status.to_string(),
            occupied_area: area,
            fit_out_budget: 250_000.0,
            deposit_paid: DepositPaid::Amount(1000.0),
        }
    }

    #[test]
    fn operational_metrics_are_formatted_in_order() {
        let rows = vec![
            tenant("Spar", 1000.0, 12.5, false),
            tenant("Line Shop 4", 200.0, 30.0, true),
        ];
        let m = operational_metrics(&TenantFilter::default(), &rows, &rows);
        let labels: Vec<&str> = m.iter().map(|(l, _)| l).collect();
        assert_eq!(
            labels,
            vec![
                "Assets in View",
                "Total GLA Visible",
                "Monthly Revenue",
                REVENUE_AT_RISK,
                HIGH_RISK_TENANTS
            ]
        );
        assert_eq!(m.get("Assets in View"), Some("1"));
        assert_eq!(m.get("Total GLA Visible"), Some("1,200 m2"));
        assert_eq!(m.get("Monthly Revenue"), Some("$18,500.00"));
        assert_eq!(m.get(REVENUE_AT_RISK), Some("$6,000.00"));
        assert_eq!(m.get(HIGH_RISK_TENANTS), Some("1"));
    }

    #[test]
    fn development_metrics_measure_against_master_plan() {
        let rows = vec![
            deal("Anchor", "Committed", 27_000.0),
            deal("Cinema", "Committed (Simulated)", 9_000.0),
            deal("Gym", "Negotiating", 1_500.0),
        ];
        let filter = PipelineFilter { min_budget: 0.0, simulate: true };
        let m = development_metrics(&filter, &rows, 90_000.0);
        assert_eq!(m.get(SIMULATION_ACTIVE), Some("Yes"));
        assert_eq!(m.get("Master Plan GLA"), Some("90,000 m2"));
        assert_eq!(m.get(COMMITTED_OCCUPANCY), Some("40.0%"));
        assert_eq!(m.get("Pipeline/Negotiating"), Some("1,500 m2"));
    }

    #[test]
    fn operational_headline_counts_tenants_in_view() {
        let rows = vec![
            tenant("Spar", 1000.0, 12.5, false),
            tenant("Line Shop 4", 200.0, 30.0, true),
            tenant("KFC", 150.0, 40.0, true),
        ];
        let m = operational_headline(&rows);
        assert_eq!(m.get("Visible GLA"), Some("1,350 m2"));
        assert_eq!(m.get("Monthly Revenue"), Some("$24,500"));
        assert_eq!(m.get(REVENUE_AT_RISK), Some("$12,000"));
        assert_eq!(m.get("Tenants in View"), Some("3"));
        assert_eq!(operational_headline(&[]).get("Tenants in View"), Some("0"));
    }

    #[test]
    fn development_headline_reports_remaining_vacancy() {
        let rows = vec![
            deal("Anchor", "Committed", 27_000.0),
            deal("Gym", "Negotiating", 1_500.0),
        ];
        assert_eq!(remaining_vacancy(&rows, 90_000.0), 61_500.0);
        let m = development_headline(&rows, 90_000.0);
        assert_eq!(m.get(COMMITTED_OCCUPANCY), Some("27,000 m2 (30.0%)"));
        assert_eq!(m.get("Remaining Vacancy"), Some("61,500 m2"));
        assert_eq!(remaining_vacancy(&[deal("Huge", "Committed", 95_000.0)], 90_000.0), -5_000.0);
    }

    #[test]
    fn leasing_velocity_sums_gla_per_status_then_vacancy() {
        let rows = vec![
            deal("Gym", "Negotiating", 1_500.0),
            deal("Anchor", "Committed", 27_000.0),
            deal("Cinema", "Committed (Simulated)", 9_000.0),
            deal("Kiosk", "Negotiating", 500.0),
        ];
        let velocity = leasing_velocity(&rows, 90_000.0);
        let flat: Vec<(&str, &str)> = velocity
            .iter()
            .map(|r| (r.status.as_str(), r.gla.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("Committed", "27,000"),
                ("Committed (Simulated)", "9,000"),
                ("Negotiating", "2,000"),
                (VACANT_SPACE, "52,000"),
            ]
        );

        let empty = leasing_velocity(&[], 90_000.0);
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].gla, "90,000");
    }

    #[test]
    fn categorises_tenants_by_keyword() {
        assert_eq!(tenant_category("Chicken Inn"), "Food & Beverage");
        assert_eq!(tenant_category("Pick n Pay"), "Grocery / Anchor");
        assert_eq!(tenant_category("Clicks Pharmacy"), "Services / Health");
        assert_eq!(tenant_category("Line Shop 7"), "Specialty Retail");
        assert_eq!(tenant_category("Edgars"), "Other Retail");
    }

    #[test]
    fn sector_exposure_sorted_by_count() {
        let rows = vec![
            tenant("Line Shop 1", 50.0, 10.0, false),
            tenant("Line Shop 2", 60.0, 10.0, false),
            tenant("KFC", 300.0, 10.0, false),
        ];
        let exposure = sector_exposure(&rows);
        assert_eq!(exposure[0].category, "Specialty Retail");
        assert_eq!(exposure[0].tenants, 2);
        assert_eq!(exposure[0].gla, "110");
        assert_eq!(exposure[1].category, "Food & Beverage");
    }

    #[test]
    fn anchors_are_large_deals_only() {
        let rows = vec![
            deal("Gym", "Negotiating", 2000.0),
            deal("Grocer", "Committed", 4500.0),
            deal("Cinema", "Negotiating", 3200.0),
        ];
        let anchors = anchor_tenants(&rows);
        let names: Vec<&str> = anchors.iter().map(|a| a.tenant_name.as_str()).collect();
        assert_eq!(names, vec!["Grocer", "Cinema"]);
        assert_eq!(anchors[0].deposit_paid, "Yes");
    }
}

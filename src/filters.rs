//! Explicit filter settings for both dashboards.
//!
//! Filters are plain values handed to the engine by the caller; resetting
//! the dashboard means building a fresh default filter.

use std::collections::BTreeSet;
use tracing::debug;

use crate::types::{PipelineRow, TenantRow};

pub const DEFAULT_EXPIRY_RANGE: (u32, u32) = (0, 60);
pub const NEGOTIATING: &str = "Negotiating";
pub const COMMITTED_SIMULATED: &str = "Committed (Simulated)";

#[derive(Debug, Clone, PartialEq)]
pub struct TenantFilter {
    /// `None` selects every asset.
    pub assets: Option<Vec<String>>,
    /// Inclusive lease-expiry window in months.
    pub expiry: (u32, u32),
    pub risk_only: bool,
}

impl Default for TenantFilter {
    fn default() -> Self {
        Self {
            assets: None,
            expiry: DEFAULT_EXPIRY_RANGE,
            risk_only: false,
        }
    }
}

impl TenantFilter {
    /// Defaults with every asset of `rows` explicitly selected.
    pub fn reset(rows: &[TenantRow]) -> Self {
        Self {
            assets: Some(available_assets(rows)),
            ..Self::default()
        }
    }

    pub fn selects_asset(&self, asset: &str) -> bool {
        match &self.assets {
            Some(assets) => assets.iter().any(|a| a == asset),
            None => true,
        }
    }

    /// Number of assets in view for the metrics block.
    pub fn asset_count(&self, rows: &[TenantRow]) -> usize {
        match &self.assets {
            Some(assets) => assets.len(),
            None => available_assets(rows).len(),
        }
    }

    pub fn apply(&self, rows: &[TenantRow]) -> Vec<TenantRow> {
        let (lo, hi) = self.expiry;
        let out: Vec<TenantRow> = rows
            .iter()
            .filter(|r| self.selects_asset(&r.asset_name))
            .filter(|r| (lo..=hi).contains(&r.lease_expiry_months))
            .filter(|r| !self.risk_only || r.risk_flag)
            .cloned()
            .collect();
        debug!(input = rows.len(), kept = out.len(), "tenant filter applied");
        out
    }
}

/// Distinct asset names in first-seen order.
pub fn available_assets(rows: &[TenantRow]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    rows.iter()
        .filter(|r| seen.insert(r.asset_name.as_str()))
        .map(|r| r.asset_name.clone())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineFilter {
    pub min_budget: f64,
    /// Project every deal still in negotiation as signed.
    pub simulate: bool,
}

impl PipelineFilter {
    pub fn apply(&self, rows: &[PipelineRow]) -> Vec<PipelineRow> {
        let out: Vec<PipelineRow> = rows
            .iter()
            .filter(|r| r.fit_out_budget >= self.min_budget)
            .cloned()
            .map(|mut r| {
                if self.simulate && r.pre_let_status == NEGOTIATING {
                    r.pre_let_status = COMMITTED_SIMULATED.to_string();
                }
                r
            })
            .collect();
        debug!(
            input = rows.len(),
            kept = out.len(),
            simulate = self.simulate,
            "pipeline filter applied"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DepositPaid;

    fn tenant(asset: &str, expiry: u32, risk: bool) -> TenantRow {
        TenantRow {
            tenant_name: format!("{asset} tenant"),
            asset_name: asset.to_string(),
            occupied_area: 100.0,
            lease_expiry_months: expiry,
            rent_per_area: 10.0,
            late_payments_last_12m: Some(0),
            risk_flag: risk,
        }
    }

    fn deal(status: &str, budget: f64) -> PipelineRow {
        PipelineRow {
            tenant_name: "Deal".to_string(),
            pre_let_status: status.to_string(),
            occupied_area: 500.0,
            fit_out_budget: budget,
            deposit_paid: DepositPaid::Flag(false),
        }
    }

    #[test]
    fn tenant_filter_combines_all_criteria() {
        let rows = vec![
            tenant("Village Walk", 12, true),
            tenant("Village Walk", 61, true),
            tenant("Avondale", 0, true),
            tenant("Avondale", 60, false),
            tenant("Borrowdale", 5, true),
        ];
        let filter = TenantFilter {
            assets: Some(vec!["Village Walk".to_string(), "Avondale".to_string()]),
            expiry: (0, 60),
            risk_only: true,
        };
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.risk_flag && r.asset_name != "Borrowdale"));
    }

    #[test]
    fn reset_selects_every_asset_once() {
        let rows = vec![
            tenant("Village Walk", 12, true),
            tenant("Avondale", 3, false),
            tenant("Village Walk", 40, false),
        ];
        let filter = TenantFilter::reset(&rows);
        assert_eq!(
            filter.assets,
            Some(vec!["Village Walk".to_string(), "Avondale".to_string()])
        );
        assert_eq!(filter.expiry, DEFAULT_EXPIRY_RANGE);
        assert!(!filter.risk_only);
        assert_eq!(filter.asset_count(&rows), 2);
    }

    #[test]
    fn empty_asset_selection_keeps_nothing() {
        let rows = vec![tenant("Village Walk", 12, true)];
        let filter = TenantFilter { assets: Some(Vec::new()), ..TenantFilter::default() };
        assert!(filter.apply(&rows).is_empty());
        assert_eq!(filter.asset_count(&rows), 0);
    }

    #[test]
    fn simulation_converts_negotiating_deals_only() {
        let rows = vec![
            deal("Negotiating", 100_000.0),
            deal("Committed", 200_000.0),
            deal("Negotiating", 10_000.0),
        ];
        let filter = PipelineFilter { min_budget: 50_000.0, simulate: true };
        let kept = filter.apply(&rows);
        let statuses: Vec<&str> = kept.iter().map(|r| r.pre_let_status.as_str()).collect();
        assert_eq!(statuses, vec![COMMITTED_SIMULATED, "Committed"]);
    }
}

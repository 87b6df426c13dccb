use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Raw row of the operational tenant roster (`terrace_africa_v2.csv`).
///
/// Every field is kept as an optional string so a single bad cell does not
/// abort the whole file; `loader` does the typed conversion.
#[derive(Debug, Deserialize)]
pub struct RawTenantRow {
    #[serde(rename = "Asset_Name")]
    pub asset_name: Option<String>,
    #[serde(rename = "Tenant_Name")]
    pub tenant_name: Option<String>,
    #[serde(rename = "GLA_Occupied")]
    pub gla_occupied: Option<String>,
    #[serde(rename = "Lease_Expiry_Months")]
    pub lease_expiry_months: Option<String>,
    #[serde(rename = "Rent_per_Sqm")]
    pub rent_per_sqm: Option<String>,
    #[serde(rename = "Late_Payments_Last_12M", default)]
    pub late_payments_last_12m: Option<String>,
    #[serde(rename = "Risk_Flag")]
    pub risk_flag: Option<String>,
}

/// Raw row of the development leasing pipeline (`westprop_v2.csv`).
#[derive(Debug, Deserialize)]
pub struct RawPipelineRow {
    #[serde(rename = "Tenant_Name")]
    pub tenant_name: Option<String>,
    #[serde(rename = "GLA_Occupied")]
    pub gla_occupied: Option<String>,
    #[serde(rename = "Pre_Let_Status")]
    pub pre_let_status: Option<String>,
    #[serde(rename = "Fit_Out_Budget_USD")]
    pub fit_out_budget_usd: Option<String>,
    #[serde(rename = "Deposit_Paid", default)]
    pub deposit_paid: Option<String>,
}

/// Operational tenant record after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantRow {
    #[serde(rename = "Tenant_Name")]
    pub tenant_name: String,
    #[serde(rename = "Asset_Name")]
    pub asset_name: String,
    #[serde(rename = "GLA_Occupied")]
    pub occupied_area: f64,
    #[serde(rename = "Lease_Expiry_Months")]
    pub lease_expiry_months: u32,
    #[serde(rename = "Rent_per_Sqm")]
    pub rent_per_area: f64,
    /// `None` when the dataset has no late-payment column.
    #[serde(rename = "Late_Payments_Last_12M")]
    pub late_payments_last_12m: Option<u32>,
    #[serde(rename = "Risk_Flag")]
    pub risk_flag: bool,
}

impl TenantRow {
    pub fn monthly_rent(&self) -> f64 {
        self.occupied_area * self.rent_per_area
    }

    /// Table status label: distressed tenants are split by whether the
    /// distress shows up as arrears or as weak trading.
    pub fn status_label(&self) -> &'static str {
        if self.risk_flag {
            if self.late_payments_last_12m.unwrap_or(0) > 0 {
                "LATE PAY"
            } else {
                "LOW FOOTFALL"
            }
        } else {
            "Active / Good"
        }
    }
}

/// Whether a pipeline deal has put money down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DepositPaid {
    Flag(bool),
    Amount(f64),
}

impl DepositPaid {
    pub fn is_paid(&self) -> bool {
        match self {
            DepositPaid::Flag(paid) => *paid,
            DepositPaid::Amount(amount) => *amount > 0.0,
        }
    }
}

/// Development pipeline record after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRow {
    #[serde(rename = "Tenant_Name")]
    pub tenant_name: String,
    #[serde(rename = "Pre_Let_Status")]
    pub pre_let_status: String,
    #[serde(rename = "GLA_Occupied")]
    pub occupied_area: f64,
    #[serde(rename = "Fit_Out_Budget_USD")]
    pub fit_out_budget: f64,
    #[serde(rename = "Deposit_Paid")]
    pub deposit_paid: DepositPaid,
}

/// Which portfolio a report is about, together with its (already filtered)
/// rows. The variant decides both the rule set and the table schema.
#[derive(Debug, Clone, Copy)]
pub enum Portfolio<'a> {
    Operational(&'a [TenantRow]),
    Development(&'a [PipelineRow]),
}

impl<'a> Portfolio<'a> {
    pub fn mode_name(&self) -> &'static str {
        match self {
            Portfolio::Operational(_) => "Terrace Africa",
            Portfolio::Development(_) => "WestProp Holdings",
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Portfolio::Operational(rows) => rows.len(),
            Portfolio::Development(rows) => rows.len(),
        }
    }

    /// True for an operational portfolio whose every row carries the risk
    /// flag. An empty roster counts as all-flagged.
    pub fn is_risk_only(&self) -> bool {
        match self {
            Portfolio::Operational(rows) => rows.iter().all(|r| r.risk_flag),
            Portfolio::Development(_) => false,
        }
    }
}

/// Ordered `label -> pre-formatted value` pairs shown in the report.
///
/// A plain vector keeps insertion order, which is also the render order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    entries: Vec<(String, String)>,
}

impl MetricsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, or replaces the value in place if the label exists.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(label, value);
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for MetricsSnapshot {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut snapshot = MetricsSnapshot::new();
        for (label, value) in iter {
            snapshot.insert(label, value);
        }
        snapshot
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricLine {
    #[tabled(rename = "Metric")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SectorExposureRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Tenants")]
    #[tabled(rename = "Tenants")]
    pub tenants: usize,
    #[serde(rename = "GLA")]
    #[tabled(rename = "GLA (m2)")]
    pub gla: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AnchorTenantRow {
    #[serde(rename = "Tenant_Name")]
    #[tabled(rename = "Tenant")]
    pub tenant_name: String,
    #[serde(rename = "GLA_Occupied")]
    #[tabled(rename = "GLA (m2)")]
    pub gla: String,
    #[serde(rename = "Pre_Let_Status")]
    #[tabled(rename = "Status")]
    pub pre_let_status: String,
    #[serde(rename = "Fit_Out_Budget_USD")]
    #[tabled(rename = "Fit-Out Budget")]
    pub fit_out_budget: String,
    #[serde(rename = "Deposit_Paid")]
    #[tabled(rename = "Deposit")]
    pub deposit_paid: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatusGlaRow {
    #[serde(rename = "Pre_Let_Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "GLA_Occupied")]
    #[tabled(rename = "GLA (m2)")]
    pub gla: String,
}

/// Machine-readable companion to the PDF.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub mode: String,
    pub title: String,
    pub generated_at: String,
    pub rows_in_view: usize,
    pub metrics: Vec<MetricLine>,
    pub recommendations: Vec<String>,
}

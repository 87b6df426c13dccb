use crate::error::LoadError;
use crate::types::{DepositPaid, PipelineRow, RawPipelineRow, RawTenantRow, TenantRow};
use crate::util::{parse_bool_safe, parse_f64_safe, parse_u32_safe};
use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

/// Read every record of a CSV file through `clean`, counting rejects.
fn load_with<R, T>(
    path: &Path,
    clean: impl Fn(&StringRecord, R) -> Option<T>,
) -> Result<(Vec<T>, LoadReport), LoadError>
where
    R: DeserializeOwned,
{
    let open_err = |source| LoadError::Open { path: path.to_path_buf(), source };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(open_err)?;
    let headers = rdr.headers().map_err(open_err)?.clone();

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<R>() {
        total_rows += 1;
        match result.ok().and_then(|raw| clean(&headers, raw)) {
            Some(row) => rows.push(row),
            None => parse_errors += 1,
        }
    }

    if rows.is_empty() && total_rows > 0 {
        return Err(LoadError::Empty { path: path.to_path_buf(), parse_errors });
    }
    if parse_errors > 0 {
        warn!(path = %path.display(), parse_errors, "skipped unparseable rows");
    }
    let report = LoadReport { total_rows, loaded_rows: rows.len(), parse_errors };
    info!(path = %path.display(), total_rows, loaded_rows = report.loaded_rows, "dataset loaded");
    Ok((rows, report))
}

const LATE_PAYMENTS_COLUMN: &str = "Late_Payments_Last_12M";

fn clean_tenant(row: RawTenantRow, has_late_payments: bool) -> Option<TenantRow> {
    let tenant_name = row.tenant_name.filter(|s| !s.is_empty())?;
    let asset_name = row.asset_name.unwrap_or_else(|| "Unknown Asset".to_string());
    let occupied_area = parse_f64_safe(row.gla_occupied.as_deref()).filter(|v| *v >= 0.0)?;
    let lease_expiry_months = parse_u32_safe(row.lease_expiry_months.as_deref())?;
    let rent_per_area = parse_f64_safe(row.rent_per_sqm.as_deref()).filter(|v| *v >= 0.0)?;
    // With the column present, a blank cell means "none recorded".
    let late_payments_last_12m = match row.late_payments_last_12m.as_deref() {
        Some(raw) => Some(parse_u32_safe(Some(raw))?),
        None if has_late_payments => Some(0),
        None => None,
    };
    let risk_flag = parse_bool_safe(row.risk_flag.as_deref()).unwrap_or(false);

    Some(TenantRow {
        tenant_name,
        asset_name,
        occupied_area,
        lease_expiry_months,
        rent_per_area,
        late_payments_last_12m,
        risk_flag,
    })
}

fn parse_deposit(raw: Option<&str>) -> DepositPaid {
    if let Some(flag) = parse_bool_safe(raw) {
        return DepositPaid::Flag(flag);
    }
    match parse_f64_safe(raw.map(|s| s.trim_start_matches('$'))) {
        Some(amount) => DepositPaid::Amount(amount),
        None => DepositPaid::Flag(false),
    }
}

fn clean_pipeline(row: RawPipelineRow) -> Option<PipelineRow> {
    let tenant_name = row.tenant_name.filter(|s| !s.is_empty())?;
    let pre_let_status = row.pre_let_status.unwrap_or_else(|| "Unknown".to_string());
    let occupied_area = parse_f64_safe(row.gla_occupied.as_deref()).filter(|v| *v >= 0.0)?;
    let fit_out_budget =
        parse_f64_safe(row.fit_out_budget_usd.as_deref()).filter(|v| *v >= 0.0)?;

    Some(PipelineRow {
        tenant_name,
        pre_let_status,
        occupied_area,
        fit_out_budget,
        deposit_paid: parse_deposit(row.deposit_paid.as_deref()),
    })
}

/// Load the operational tenant roster.
pub fn load_tenants(path: &Path) -> Result<(Vec<TenantRow>, LoadReport), LoadError> {
    load_with(path, |headers, raw| {
        let has_late_payments = headers.iter().any(|h| h == LATE_PAYMENTS_COLUMN);
        clean_tenant(raw, has_late_payments)
    })
}

/// Load the development leasing pipeline.
pub fn load_pipeline(path: &Path) -> Result<(Vec<PipelineRow>, LoadReport), LoadError> {
    load_with(path, |_, raw| clean_pipeline(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_tenant_roster_and_counts_rejects() {
        let file = csv_file(
            "Asset_Name,Tenant_Name,GLA_Occupied,Lease_Expiry_Months,Rent_per_Sqm,Late_Payments_Last_12M,Risk_Flag\n\
             Sam Levy's Village,Pick n Pay,\"3,200\",48,14.5,0,False\n\
             Sam Levy's Village,Line Shop 12,85,6,22,3,True\n\
             Village Walk,Broken Row,not-a-number,6,22,3,True\n",
        );
        let (rows, report) = load_tenants(file.path()).expect("loads");
        assert_eq!(report, LoadReport { total_rows: 3, loaded_rows: 2, parse_errors: 1 });
        assert_eq!(rows[0].occupied_area, 3200.0);
        assert_eq!(rows[1].late_payments_last_12m, Some(3));
        assert!(rows[1].risk_flag);
    }

    #[test]
    fn tenant_roster_without_late_payment_column() {
        let file = csv_file(
            "Asset_Name,Tenant_Name,GLA_Occupied,Lease_Expiry_Months,Rent_per_Sqm,Risk_Flag\n\
             Village Walk,Mugg & Bean,240,18,25,True\n",
        );
        let (rows, _) = load_tenants(file.path()).expect("loads");
        assert_eq!(rows[0].late_payments_last_12m, None);
    }

    #[test]
    fn loads_pipeline_with_mixed_deposits() {
        let file = csv_file(
            "Tenant_Name,GLA_Occupied,Pre_Let_Status,Fit_Out_Budget_USD,Deposit_Paid\n\
             Anchor Grocer,5000,Committed,1500000,Yes\n\
             Cinema,2500,Negotiating,800000,25000\n\
             Boutique,120,Negotiating,40000,\n",
        );
        let (rows, report) = load_pipeline(file.path()).expect("loads");
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(rows[0].deposit_paid, DepositPaid::Flag(true));
        assert_eq!(rows[1].deposit_paid, DepositPaid::Amount(25000.0));
        assert!(!rows[2].deposit_paid.is_paid());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_pipeline(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn all_rows_rejected_is_an_error() {
        let file = csv_file("Tenant_Name,GLA_Occupied,Pre_Let_Status,Fit_Out_Budget_USD\nX,abc,Committed,10\n");
        let err = load_pipeline(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { parse_errors: 1, .. }));
    }
}

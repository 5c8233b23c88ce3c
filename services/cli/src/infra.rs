use chrono::NaiveDate;
use credit_desk::error::AppError;
use credit_desk::lending::{InMemoryLendingRepository, LedgerSnapshot};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn read_snapshot(path: &Path) -> Result<LedgerSnapshot, AppError> {
    let raw = fs::read_to_string(path)?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&raw)?;
    debug!(
        path = %path.display(),
        customers = snapshot.customers.len(),
        loans = snapshot.loans.len(),
        "loaded ledger snapshot"
    );
    Ok(snapshot)
}

pub(crate) fn load_repository(path: &Path) -> Result<InMemoryLendingRepository, AppError> {
    let snapshot = read_snapshot(path)?;
    Ok(InMemoryLendingRepository::from_snapshot(snapshot)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_with_whitespace() {
        assert_eq!(
            parse_date(" 2025-03-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"))
        );
    }

    #[test]
    fn parse_date_explains_failures() {
        let err = parse_date("01/03/2025").expect_err("wrong format");
        assert!(err.contains("YYYY-MM-DD"));
    }

    #[test]
    fn load_repository_rejects_orphaned_loans() {
        let path = std::env::temp_dir().join(format!(
            "credit-desk-cli-{}-orphan.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{ "loans": [{
                "loan_id": 1, "customer_id": 9, "loan_amount": 1000.0, "tenure": 6,
                "interest_rate": 10.0, "monthly_payment": 171.56, "emis_paid_on_time": 2,
                "start_date": "2024-01-01", "end_date": "2024-07-01"
            }] }"#,
        )
        .expect("write snapshot");

        let result = load_repository(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Lending(_))));
    }
}

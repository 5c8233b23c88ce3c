use std::sync::Arc;

use chrono::NaiveDate;

use crate::lending::domain::{
    Customer, CustomerId, CustomerProfile, CustomerRegistration, LoanId, LoanRecord, LoanRequest,
};
use crate::lending::engine::{CreditPolicy, EligibilityEngine};
use crate::lending::memory::{InMemoryLendingRepository, LedgerSnapshot};
use crate::lending::repository::{LendingRepository, NewLoan, RepositoryError};
use crate::lending::service::{LendingService, LoanApplication};

pub(super) fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid date")
}

pub(super) fn profile(monthly_income: f64) -> CustomerProfile {
    CustomerProfile {
        customer_id: CustomerId(1),
        monthly_income,
        approved_limit: crate::lending::approved_limit_for(monthly_income),
        current_debt: 0.0,
    }
}

pub(super) fn customer(id: u64, monthly_income: f64) -> Customer {
    Customer {
        customer_id: CustomerId(id),
        first_name: "Meera".to_string(),
        last_name: "Iyer".to_string(),
        age: 29,
        phone_number: "9988776655".to_string(),
        monthly_income,
        approved_limit: crate::lending::approved_limit_for(monthly_income),
        current_debt: 0.0,
    }
}

pub(super) fn loan(
    loan_id: u64,
    customer_id: u64,
    loan_amount: f64,
    tenure: u32,
    emis_paid_on_time: u32,
    monthly_payment: f64,
) -> LoanRecord {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1).expect("valid date");
    LoanRecord {
        loan_id: LoanId(loan_id),
        customer_id: CustomerId(customer_id),
        loan_amount,
        tenure,
        interest_rate: 11.5,
        monthly_payment,
        emis_paid_on_time,
        start_date: start,
        end_date: start,
    }
}

/// Scores 45 against a 50,000 income: 25 of 80 installments on time (15.625 points), four
/// loans (20) and 1,200,000 borrowed against a 1,800,000 limit (10).
pub(super) fn mid_tier_history(customer_id: u64) -> Vec<LoanRecord> {
    vec![
        loan(1, customer_id, 300_000.0, 20, 7, 1_000.0),
        loan(2, customer_id, 300_000.0, 20, 6, 1_000.0),
        loan(3, customer_id, 300_000.0, 20, 6, 1_000.0),
        loan(4, customer_id, 300_000.0, 20, 6, 1_000.0),
    ]
}

pub(super) fn request(principal: f64, annual_rate: f64, tenure_months: u32) -> LoanRequest {
    LoanRequest {
        principal,
        annual_rate,
        tenure_months,
    }
}

pub(super) fn application(
    customer_id: u64,
    loan_amount: f64,
    interest_rate: f64,
    tenure: u32,
) -> LoanApplication {
    LoanApplication {
        customer_id: CustomerId(customer_id),
        loan_amount,
        interest_rate,
        tenure,
    }
}

pub(super) fn registration(monthly_income: f64) -> CustomerRegistration {
    CustomerRegistration {
        first_name: "Kabir".to_string(),
        last_name: "Shah".to_string(),
        age: 38,
        phone_number: "9000012345".to_string(),
        monthly_income,
    }
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(CreditPolicy::default())
}

pub(super) fn build_service(
    snapshot: LedgerSnapshot,
) -> (
    LendingService<InMemoryLendingRepository>,
    Arc<InMemoryLendingRepository>,
) {
    let repository =
        Arc::new(InMemoryLendingRepository::from_snapshot(snapshot).expect("snapshot loads"));
    let service = LendingService::new(repository.clone(), CreditPolicy::default());
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl LendingRepository for UnavailableRepository {
    fn insert_customer(
        &self,
        _registration: CustomerRegistration,
        _approved_limit: f64,
    ) -> Result<Customer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_customer(&self, _id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn loans_for(&self, _id: CustomerId) -> Result<Vec<LoanRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_loan(&self, _loan: NewLoan) -> Result<LoanRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_loan(&self, _id: LoanId) -> Result<Option<LoanRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Customer, CustomerId, CustomerRegistration, LoanId, LoanRecord};

/// Loan terms to persist once a decision is approved; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_payment: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Storage abstraction so the service can be exercised without a database.
///
/// `loans_for` must return a complete snapshot of the customer's history; the engine never
/// reads from the repository while a decision is in flight.
pub trait LendingRepository: Send + Sync {
    fn insert_customer(
        &self,
        registration: CustomerRegistration,
        approved_limit: f64,
    ) -> Result<Customer, RepositoryError>;
    fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
    fn loans_for(&self, id: CustomerId) -> Result<Vec<LoanRecord>, RepositoryError>;
    fn insert_loan(&self, loan: NewLoan) -> Result<LoanRecord, RepositoryError>;
    fn fetch_loan(&self, id: LoanId) -> Result<Option<LoanRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Customer as returned from registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerView {
    pub customer_id: CustomerId,
    pub name: String,
    pub age: u8,
    pub monthly_income: f64,
    pub approved_limit: f64,
    pub phone_number: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            name: customer.full_name(),
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number.clone(),
        }
    }
}

/// Contact details embedded in a single-loan view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: u8,
}

/// Single loan with its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub customer: CustomerSummary,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub tenure: u32,
}

impl LoanDetailView {
    pub fn new(loan: &LoanRecord, customer: &Customer) -> Self {
        Self {
            loan_id: loan.loan_id,
            customer: CustomerSummary {
                id: customer.customer_id,
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                phone_number: customer.phone_number.clone(),
                age: customer.age,
            },
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_payment,
            tenure: loan.tenure,
        }
    }
}

/// Row in a customer's loan listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSummaryView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub repayments_left: u32,
}

impl From<&LoanRecord> for LoanSummaryView {
    fn from(loan: &LoanRecord) -> Self {
        Self {
            loan_id: loan.loan_id,
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_payment,
            repayments_left: loan.repayments_left(),
        }
    }
}

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Approved limit granted per unit of monthly income.
pub const APPROVED_LIMIT_INCOME_MULTIPLIER: f64 = 36.0;
/// Approved limits are expressed in whole multiples of this amount.
pub const APPROVED_LIMIT_ROUNDING_UNIT: f64 = 100_000.0;

/// Identifier wrapper for registered customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

/// Identifier wrapper for persisted loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Income-derived credit ceiling: 36 months of income, rounded to the nearest 100,000.
///
/// Exact halves round away from zero: a raw 450,000 becomes 500,000.
pub fn approved_limit_for(monthly_income: f64) -> f64 {
    let raw = monthly_income * APPROVED_LIMIT_INCOME_MULTIPLIER;
    (raw / APPROVED_LIMIT_ROUNDING_UNIT).round() * APPROVED_LIMIT_ROUNDING_UNIT
}

/// Details captured when a customer registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub phone_number: String,
    pub monthly_income: f64,
}

/// Stored customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub phone_number: String,
    pub monthly_income: f64,
    pub approved_limit: f64,
    #[serde(default)]
    pub current_debt: f64,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Financial snapshot consumed by the decision engine.
    pub fn profile(&self) -> CustomerProfile {
        CustomerProfile {
            customer_id: self.customer_id,
            monthly_income: self.monthly_income,
            approved_limit: self.approved_limit,
            current_debt: self.current_debt,
        }
    }
}

/// Read-only financial view of a customer used for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    pub monthly_income: f64,
    pub approved_limit: f64,
    /// Informational; scoring does not read it.
    pub current_debt: f64,
}

/// Historical loan owned by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_payment: f64,
    pub emis_paid_on_time: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl LoanRecord {
    pub fn repayments_left(&self) -> u32 {
        self.tenure.saturating_sub(self.emis_paid_on_time)
    }
}

/// Terms a customer asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,
    pub annual_rate: f64,
    pub tenure_months: u32,
}

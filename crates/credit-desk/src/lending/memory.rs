use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::domain::{Customer, CustomerId, CustomerRegistration, LoanId, LoanRecord};
use super::repository::{LendingRepository, NewLoan, RepositoryError};

/// Serialized ledger used to seed an in-memory repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub loans: Vec<LoanRecord>,
}

#[derive(Debug, Default)]
struct Ledger {
    customers: BTreeMap<CustomerId, Customer>,
    loans: BTreeMap<LoanId, LoanRecord>,
}

impl Ledger {
    fn next_customer_id(&self) -> CustomerId {
        CustomerId(self.customers.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn next_loan_id(&self) -> LoanId {
        LoanId(self.loans.keys().next_back().map_or(1, |id| id.0 + 1))
    }
}

/// Process-local repository backed by ordered maps.
#[derive(Debug, Default)]
pub struct InMemoryLendingRepository {
    ledger: Mutex<Ledger>,
}

impl InMemoryLendingRepository {
    /// Build a repository from a snapshot, rejecting duplicate ids and orphaned loans.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, RepositoryError> {
        let mut ledger = Ledger::default();
        for customer in snapshot.customers {
            if ledger.customers.contains_key(&customer.customer_id) {
                return Err(RepositoryError::Conflict);
            }
            ledger.customers.insert(customer.customer_id, customer);
        }
        for loan in snapshot.loans {
            if !ledger.customers.contains_key(&loan.customer_id) {
                return Err(RepositoryError::NotFound);
            }
            if ledger.loans.contains_key(&loan.loan_id) {
                return Err(RepositoryError::Conflict);
            }
            ledger.loans.insert(loan.loan_id, loan);
        }

        Ok(Self {
            ledger: Mutex::new(ledger),
        })
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot, RepositoryError> {
        let ledger = self.lock()?;
        Ok(LedgerSnapshot {
            customers: ledger.customers.values().cloned().collect(),
            loans: ledger.loans.values().cloned().collect(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, RepositoryError> {
        self.ledger
            .lock()
            .map_err(|_| RepositoryError::Unavailable("ledger mutex poisoned".to_string()))
    }
}

impl LendingRepository for InMemoryLendingRepository {
    fn insert_customer(
        &self,
        registration: CustomerRegistration,
        approved_limit: f64,
    ) -> Result<Customer, RepositoryError> {
        let mut ledger = self.lock()?;
        let customer = Customer {
            customer_id: ledger.next_customer_id(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            age: registration.age,
            phone_number: registration.phone_number,
            monthly_income: registration.monthly_income,
            approved_limit,
            current_debt: 0.0,
        };
        ledger.customers.insert(customer.customer_id, customer.clone());
        Ok(customer)
    }

    fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.lock()?.customers.get(&id).cloned())
    }

    fn loans_for(&self, id: CustomerId) -> Result<Vec<LoanRecord>, RepositoryError> {
        Ok(self
            .lock()?
            .loans
            .values()
            .filter(|loan| loan.customer_id == id)
            .cloned()
            .collect())
    }

    fn insert_loan(&self, loan: NewLoan) -> Result<LoanRecord, RepositoryError> {
        let mut ledger = self.lock()?;
        if !ledger.customers.contains_key(&loan.customer_id) {
            return Err(RepositoryError::NotFound);
        }
        let record = LoanRecord {
            loan_id: ledger.next_loan_id(),
            customer_id: loan.customer_id,
            loan_amount: loan.loan_amount,
            tenure: loan.tenure,
            interest_rate: loan.interest_rate,
            monthly_payment: loan.monthly_payment,
            emis_paid_on_time: 0,
            start_date: loan.start_date,
            end_date: loan.end_date,
        };
        ledger.loans.insert(record.loan_id, record.clone());
        Ok(record)
    }

    fn fetch_loan(&self, id: LoanId) -> Result<Option<LoanRecord>, RepositoryError> {
        Ok(self.lock()?.loans.get(&id).cloned())
    }
}

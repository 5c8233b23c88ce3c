use std::sync::Arc;

use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    approved_limit_for, Customer, CustomerId, CustomerRegistration, LoanId, LoanRecord,
    LoanRequest,
};
use super::engine::{
    round_currency, CreditPolicy, CreditScore, Decision, EligibilityEngine, EngineError,
    RejectionReason,
};
use super::repository::{
    CustomerView, LendingRepository, LoanDetailView, LoanSummaryView, NewLoan, RepositoryError,
};

/// Loan terms requested on behalf of a registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
}

impl LoanApplication {
    pub fn request(&self) -> LoanRequest {
        LoanRequest {
            principal: self.loan_amount,
            annual_rate: self.interest_rate,
            tenure_months: self.tenure,
        }
    }
}

/// Outcome of an eligibility check; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityResponse {
    pub customer_id: CustomerId,
    pub approval: bool,
    pub interest_rate: f64,
    pub corrected_interest_rate: f64,
    pub tenure: u32,
    pub monthly_installment: f64,
}

/// Outcome of a loan creation attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanCreationResponse {
    pub loan_id: Option<LoanId>,
    pub customer_id: CustomerId,
    pub loan_approved: bool,
    pub message: String,
    pub monthly_installment: f64,
}

/// Service composing the decision engine with the persistence collaborator.
pub struct LendingService<R> {
    repository: Arc<R>,
    engine: Arc<EligibilityEngine>,
}

impl<R> LendingService<R>
where
    R: LendingRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: CreditPolicy) -> Self {
        Self {
            repository,
            engine: Arc::new(EligibilityEngine::new(policy)),
        }
    }

    /// Register a customer, deriving the approved limit from income.
    pub fn register_customer(
        &self,
        registration: CustomerRegistration,
    ) -> Result<CustomerView, LendingServiceError> {
        if !registration.monthly_income.is_finite() || registration.monthly_income <= 0.0 {
            return Err(LendingServiceError::InvalidRegistration {
                field: "monthly_income",
                reason: "must be a positive amount",
            });
        }
        let approved_limit = approved_limit_for(registration.monthly_income);
        let customer = self
            .repository
            .insert_customer(registration, approved_limit)?;
        info!(
            customer_id = customer.customer_id.0,
            approved_limit, "registered customer"
        );
        Ok(CustomerView::from(&customer))
    }

    /// Decide on an application without persisting anything.
    pub fn check_eligibility(
        &self,
        application: &LoanApplication,
    ) -> Result<EligibilityResponse, LendingServiceError> {
        let decision = self.decide(application)?;

        Ok(EligibilityResponse {
            customer_id: application.customer_id,
            approval: decision.is_approved(),
            interest_rate: application.interest_rate,
            corrected_interest_rate: decision
                .corrected_rate()
                .unwrap_or(application.interest_rate),
            tenure: application.tenure,
            monthly_installment: decision.reported_installment(),
        })
    }

    /// Decide on an application and persist the loan when approved, starting today.
    pub fn create_loan(
        &self,
        application: &LoanApplication,
    ) -> Result<LoanCreationResponse, LendingServiceError> {
        self.create_loan_on(application, Local::now().date_naive())
    }

    /// Same as [`Self::create_loan`] with an explicit start date.
    pub fn create_loan_on(
        &self,
        application: &LoanApplication,
        start_date: NaiveDate,
    ) -> Result<LoanCreationResponse, LendingServiceError> {
        let decision = self.decide(application)?;

        let (corrected_rate, installment) = match &decision {
            Decision::Approved {
                corrected_rate,
                installment,
                ..
            } => (*corrected_rate, *installment),
            Decision::Rejected { reason, .. } => {
                return Ok(LoanCreationResponse {
                    loan_id: None,
                    customer_id: application.customer_id,
                    loan_approved: false,
                    message: rejection_message(reason),
                    monthly_installment: 0.0,
                });
            }
        };

        let end_date = start_date
            .checked_add_months(Months::new(application.tenure))
            .ok_or(EngineError::InvalidInput {
                field: "tenure",
                reason: "ends beyond the supported calendar",
            })?;

        let stored = self.repository.insert_loan(NewLoan {
            customer_id: application.customer_id,
            loan_amount: application.loan_amount,
            tenure: application.tenure,
            interest_rate: corrected_rate,
            monthly_payment: installment,
            start_date,
            end_date,
        })?;
        info!(
            loan_id = stored.loan_id.0,
            customer_id = stored.customer_id.0,
            %start_date,
            %end_date,
            "persisted approved loan"
        );

        Ok(LoanCreationResponse {
            loan_id: Some(stored.loan_id),
            customer_id: application.customer_id,
            loan_approved: true,
            message: "Loan approved".to_string(),
            monthly_installment: round_currency(installment),
        })
    }

    pub fn view_loan(&self, loan_id: LoanId) -> Result<LoanDetailView, LendingServiceError> {
        let loan = self
            .repository
            .fetch_loan(loan_id)?
            .ok_or(LendingServiceError::LoanNotFound(loan_id))?;
        let customer = self
            .repository
            .fetch_customer(loan.customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(loan.customer_id))?;
        Ok(LoanDetailView::new(&loan, &customer))
    }

    pub fn view_loans(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<LoanSummaryView>, LendingServiceError> {
        self.repository
            .fetch_customer(customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(customer_id))?;
        let loans = self.repository.loans_for(customer_id)?;
        Ok(loans.iter().map(LoanSummaryView::from).collect())
    }

    /// Score a customer's current history without deciding on a request.
    pub fn score_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<CreditScore, LendingServiceError> {
        let (customer, history) = self.history_snapshot(customer_id)?;
        Ok(self.engine.score(&customer.profile(), &history))
    }

    fn decide(&self, application: &LoanApplication) -> Result<Decision, LendingServiceError> {
        let (customer, history) = self.history_snapshot(application.customer_id)?;

        let decision = self
            .engine
            .decide(&customer.profile(), &history, &application.request())?;
        Ok(decision)
    }

    fn history_snapshot(
        &self,
        customer_id: CustomerId,
    ) -> Result<(Customer, Vec<LoanRecord>), LendingServiceError> {
        let customer = self
            .repository
            .fetch_customer(customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(customer_id))?;
        let history = self.repository.loans_for(customer_id)?;
        Ok((customer, history))
    }
}

fn rejection_message(reason: &RejectionReason) -> String {
    match reason {
        RejectionReason::LowCreditScore => "Loan rejected due to low credit score".to_string(),
        RejectionReason::AffordabilityCeilingExceeded { .. } => {
            format!("Loan rejected: {}", reason.summary())
        }
    }
}

/// Error raised by the lending service.
#[derive(Debug, thiserror::Error)]
pub enum LendingServiceError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("loan {0} not found")]
    LoanNotFound(LoanId),
    #[error("invalid registration: {field} {reason}")]
    InvalidRegistration {
        field: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

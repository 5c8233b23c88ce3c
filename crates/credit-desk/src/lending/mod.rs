//! Credit decisions for loan requests: scoring, rate tiering, installment math and the
//! affordability gate, plus the service that wires them to a persistence collaborator.

pub mod domain;
pub mod engine;
pub mod memory;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    approved_limit_for, Customer, CustomerId, CustomerProfile, CustomerRegistration, LoanId,
    LoanRecord, LoanRequest,
};
pub use engine::{
    CreditPolicy, CreditScore, Decision, EligibilityEngine, EngineError, PolicyError,
    RejectionReason,
};
pub use memory::{InMemoryLendingRepository, LedgerSnapshot};
pub use repository::{
    CustomerView, LendingRepository, LoanDetailView, LoanSummaryView, NewLoan, RepositoryError,
};
pub use service::{
    EligibilityResponse, LendingService, LendingServiceError, LoanApplication,
    LoanCreationResponse,
};

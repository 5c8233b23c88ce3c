mod emi;
mod policy;
mod rates;
mod scoring;

pub use emi::{compute_installment, round_currency};
pub use policy::*;
pub use rates::{correct_rate, RateCorrection};
pub use scoring::{current_emi_burden, CreditScore, ScoreComponent, ScoreFactor};

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{CustomerProfile, LoanRecord, LoanRequest};

/// Stateless evaluator applying a [`CreditPolicy`] to a customer's loan history.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    policy: CreditPolicy,
}

impl EligibilityEngine {
    pub fn new(policy: CreditPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CreditPolicy {
        &self.policy
    }

    /// Score a customer's history without making a decision.
    pub fn score(&self, profile: &CustomerProfile, history: &[LoanRecord]) -> CreditScore {
        scoring::score_history(profile, history, &self.policy)
    }

    /// Run the full decision flow for a single request.
    ///
    /// Rejections are ordinary [`Decision`] values; only malformed inputs produce an error.
    pub fn decide(
        &self,
        profile: &CustomerProfile,
        history: &[LoanRecord],
        request: &LoanRequest,
    ) -> Result<Decision, EngineError> {
        validate(profile, request)?;

        let credit_score = self.score(profile, history).value;

        let corrected_rate = match correct_rate(credit_score, request.annual_rate, &self.policy)
        {
            RateCorrection::Approvable { corrected_rate, .. } => corrected_rate,
            RateCorrection::NotApprovable => {
                info!(
                    customer_id = profile.customer_id.0,
                    credit_score, "rejected for low credit score"
                );
                return Ok(Decision::Rejected {
                    credit_score,
                    corrected_rate: None,
                    reason: RejectionReason::LowCreditScore,
                });
            }
        };

        let installment =
            compute_installment(request.principal, corrected_rate, request.tenure_months)?;

        let projected_burden = current_emi_burden(history) + installment;
        let ceiling = self.policy.affordability_ceiling(profile.monthly_income);
        debug!(projected_burden, ceiling, "affordability check");
        if projected_burden > ceiling {
            info!(
                customer_id = profile.customer_id.0,
                credit_score, projected_burden, ceiling, "rejected for affordability"
            );
            return Ok(Decision::Rejected {
                credit_score,
                corrected_rate: Some(corrected_rate),
                reason: RejectionReason::AffordabilityCeilingExceeded {
                    projected_burden,
                    ceiling,
                },
            });
        }

        info!(
            customer_id = profile.customer_id.0,
            credit_score, corrected_rate, installment, "approved"
        );
        Ok(Decision::Approved {
            credit_score,
            corrected_rate,
            installment,
        })
    }
}

fn validate(profile: &CustomerProfile, request: &LoanRequest) -> Result<(), EngineError> {
    if !profile.monthly_income.is_finite() || profile.monthly_income <= 0.0 {
        return Err(EngineError::invalid("monthly_income", "must be a positive amount"));
    }
    if !profile.approved_limit.is_finite() || profile.approved_limit < 0.0 {
        return Err(EngineError::invalid("approved_limit", "must be a non-negative amount"));
    }
    if request.tenure_months == 0 {
        return Err(EngineError::invalid("tenure_months", "must be at least one month"));
    }
    if !request.principal.is_finite() || request.principal <= 0.0 {
        return Err(EngineError::invalid("principal", "must be a positive amount"));
    }
    if !request.annual_rate.is_finite() || request.annual_rate < 0.0 {
        return Err(EngineError::invalid(
            "annual_rate",
            "must be a non-negative percentage",
        ));
    }
    Ok(())
}

/// Terminal state of a credit decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    Approved {
        credit_score: u8,
        corrected_rate: f64,
        /// Unrounded; use [`Decision::reported_installment`] for presentation.
        installment: f64,
    },
    Rejected {
        credit_score: u8,
        /// `None` when the score never reached a rate tier.
        corrected_rate: Option<f64>,
        reason: RejectionReason,
    },
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved { .. })
    }

    pub fn credit_score(&self) -> u8 {
        match self {
            Decision::Approved { credit_score, .. } | Decision::Rejected { credit_score, .. } => {
                *credit_score
            }
        }
    }

    pub fn corrected_rate(&self) -> Option<f64> {
        match self {
            Decision::Approved { corrected_rate, .. } => Some(*corrected_rate),
            Decision::Rejected { corrected_rate, .. } => *corrected_rate,
        }
    }

    /// Installment rounded to currency precision; zero for rejections.
    pub fn reported_installment(&self) -> f64 {
        match self {
            Decision::Approved { installment, .. } => round_currency(*installment),
            Decision::Rejected { .. } => 0.0,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Decision::Approved { .. } => "loan approved".to_string(),
            Decision::Rejected { reason, .. } => format!("loan rejected: {}", reason.summary()),
        }
    }
}

/// Business rule that ended a decision in rejection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    LowCreditScore,
    AffordabilityCeilingExceeded { projected_burden: f64, ceiling: f64 },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::LowCreditScore => "low credit score".to_string(),
            RejectionReason::AffordabilityCeilingExceeded { .. } => {
                "installment burden exceeds affordability ceiling".to_string()
            }
        }
    }
}

/// Malformed numeric input rejected before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidInput { field, reason }
    }
}

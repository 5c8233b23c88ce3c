use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::domain::{CustomerProfile, LoanRecord};
use super::policy::{CreditPolicy, DISQUALIFIED_SCORE, MAX_CREDIT_SCORE, NEW_CUSTOMER_SCORE};

/// Rule that contributed to a credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    NoHistory,
    ExistingBurden,
    NoScheduledInstallments,
    PaymentHistory,
    LoanCount,
    LoanVolume,
}

/// Discrete contribution to a score, kept so decisions can be audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Integer credit score in `0..=100` with the trail of rules that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScore {
    pub value: u8,
    pub components: Vec<ScoreComponent>,
}

impl CreditScore {
    fn short_circuit(value: u8, factor: ScoreFactor, notes: String) -> Self {
        Self {
            value,
            components: vec![ScoreComponent {
                factor,
                points: f64::from(value),
                notes,
            }],
        }
    }
}

/// Sum of monthly payments across the customer's existing loans.
pub fn current_emi_burden(history: &[LoanRecord]) -> f64 {
    history.iter().map(|loan| loan.monthly_payment).sum()
}

pub(crate) fn score_history(
    profile: &CustomerProfile,
    history: &[LoanRecord],
    policy: &CreditPolicy,
) -> CreditScore {
    if history.is_empty() {
        return CreditScore::short_circuit(
            NEW_CUSTOMER_SCORE,
            ScoreFactor::NoHistory,
            "no prior loans".to_string(),
        );
    }

    let burden = current_emi_burden(history);
    let ceiling = policy.affordability_ceiling(profile.monthly_income);
    if burden > ceiling {
        debug!(burden, ceiling, "existing installments exceed affordability ceiling");
        return CreditScore::short_circuit(
            DISQUALIFIED_SCORE,
            ScoreFactor::ExistingBurden,
            format!("existing installments {burden:.2} exceed ceiling {ceiling:.2}"),
        );
    }

    let scheduled: u64 = history.iter().map(|loan| u64::from(loan.tenure)).sum();
    let on_time: u64 = history
        .iter()
        .map(|loan| u64::from(loan.emis_paid_on_time))
        .sum();
    if scheduled == 0 {
        return CreditScore::short_circuit(
            NEW_CUSTOMER_SCORE,
            ScoreFactor::NoScheduledInstallments,
            "history carries no scheduled installments".to_string(),
        );
    }

    let mut components = Vec::with_capacity(3);

    let payment_points = on_time as f64 / scheduled as f64 * policy.payment_history_weight;
    components.push(ScoreComponent {
        factor: ScoreFactor::PaymentHistory,
        points: payment_points,
        notes: format!("{on_time} of {scheduled} installments paid on time"),
    });

    let count_points = policy.loan_count_points(history.len());
    components.push(ScoreComponent {
        factor: ScoreFactor::LoanCount,
        points: f64::from(count_points),
        notes: format!("{} loan(s) on record", history.len()),
    });

    let total_amount: f64 = history.iter().map(|loan| loan.loan_amount).sum();
    let volume_points = policy.volume_points(total_amount, profile.approved_limit);
    components.push(ScoreComponent {
        factor: ScoreFactor::LoanVolume,
        points: f64::from(volume_points),
        notes: format!(
            "total borrowed {total_amount:.2} against limit {:.2}",
            profile.approved_limit
        ),
    });

    let raw: f64 = components.iter().map(|component| component.points).sum();
    // Fractions are dropped rather than rounded.
    let value = raw.floor().clamp(0.0, f64::from(MAX_CREDIT_SCORE)) as u8;
    debug!(raw, value, "scored loan history");

    CreditScore { value, components }
}

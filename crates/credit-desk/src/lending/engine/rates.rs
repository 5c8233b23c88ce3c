use serde::Serialize;

use super::policy::CreditPolicy;

/// Result of mapping a credit score onto the policy's rate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RateCorrection {
    Approvable {
        corrected_rate: f64,
        floor_rate: Option<f64>,
    },
    NotApprovable,
}

impl RateCorrection {
    pub fn corrected_rate(&self) -> Option<f64> {
        match self {
            RateCorrection::Approvable { corrected_rate, .. } => Some(*corrected_rate),
            RateCorrection::NotApprovable => None,
        }
    }

    pub fn is_approvable(&self) -> bool {
        matches!(self, RateCorrection::Approvable { .. })
    }
}

/// Raise `requested_rate` to the floor of the tier that `score` falls in.
pub fn correct_rate(score: u8, requested_rate: f64, policy: &CreditPolicy) -> RateCorrection {
    if score > policy.prime_score_threshold {
        return RateCorrection::Approvable {
            corrected_rate: requested_rate,
            floor_rate: None,
        };
    }

    policy
        .rate_floors
        .iter()
        .find(|floor| score >= floor.min_score)
        .map(|floor| RateCorrection::Approvable {
            corrected_rate: requested_rate.max(floor.floor_rate),
            floor_rate: Some(floor.floor_rate),
        })
        .unwrap_or(RateCorrection::NotApprovable)
}

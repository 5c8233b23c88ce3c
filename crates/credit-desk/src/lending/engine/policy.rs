use serde::{Deserialize, Serialize};

/// Score granted to customers without any loan history.
pub const NEW_CUSTOMER_SCORE: u8 = 100;
/// Upper bound of the credit score scale.
pub const MAX_CREDIT_SCORE: u8 = 100;
/// Score assigned when existing installments already breach the affordability ceiling.
pub const DISQUALIFIED_SCORE: u8 = 0;

/// Share of monthly income that total installments may consume.
pub const AFFORDABILITY_RATIO: f64 = 0.5;
/// Points awarded for a perfect on-time payment record.
pub const PAYMENT_HISTORY_WEIGHT: f64 = 50.0;

pub const FEW_LOANS_MAX: usize = 3;
pub const FEW_LOANS_POINTS: u8 = 30;
pub const MODERATE_LOANS_MAX: usize = 5;
pub const MODERATE_LOANS_POINTS: u8 = 20;
pub const MANY_LOANS_POINTS: u8 = 10;

pub const LOW_VOLUME_LIMIT_FRACTION: f64 = 0.5;
pub const LOW_VOLUME_POINTS: u8 = 20;
pub const WITHIN_LIMIT_FRACTION: f64 = 1.0;
pub const WITHIN_LIMIT_POINTS: u8 = 10;
pub const OVER_LIMIT_POINTS: u8 = 5;

/// Scores strictly above this keep the requested rate.
pub const PRIME_SCORE_THRESHOLD: u8 = 50;
pub const STANDARD_TIER_MIN_SCORE: u8 = 30;
pub const STANDARD_TIER_FLOOR_RATE: f64 = 12.0;
pub const SUBPRIME_TIER_MIN_SCORE: u8 = 10;
pub const SUBPRIME_TIER_FLOOR_RATE: f64 = 16.0;

/// Loan-count bracket: histories with at most `max_loans` loans earn `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCountTier {
    pub max_loans: usize,
    pub points: u8,
}

/// Loan-volume bracket expressed as a fraction of the customer's approved limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeTier {
    pub max_limit_fraction: f64,
    pub points: u8,
}

/// Minimum interest rate applied to scores at or above `min_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFloor {
    pub min_score: u8,
    pub floor_rate: f64,
}

/// Rule table driving scoring, rate correction and the affordability gate.
///
/// Tier lists are ordered from the most favourable bracket to the least favourable one;
/// the first matching entry wins. Fields omitted from a serialized policy fall back to the
/// defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreditPolicy {
    pub affordability_ratio: f64,
    pub payment_history_weight: f64,
    pub loan_count_tiers: Vec<LoanCountTier>,
    pub excess_loan_count_points: u8,
    pub volume_tiers: Vec<VolumeTier>,
    pub excess_volume_points: u8,
    pub prime_score_threshold: u8,
    pub rate_floors: Vec<RateFloor>,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            affordability_ratio: AFFORDABILITY_RATIO,
            payment_history_weight: PAYMENT_HISTORY_WEIGHT,
            loan_count_tiers: vec![
                LoanCountTier {
                    max_loans: FEW_LOANS_MAX,
                    points: FEW_LOANS_POINTS,
                },
                LoanCountTier {
                    max_loans: MODERATE_LOANS_MAX,
                    points: MODERATE_LOANS_POINTS,
                },
            ],
            excess_loan_count_points: MANY_LOANS_POINTS,
            volume_tiers: vec![
                VolumeTier {
                    max_limit_fraction: LOW_VOLUME_LIMIT_FRACTION,
                    points: LOW_VOLUME_POINTS,
                },
                VolumeTier {
                    max_limit_fraction: WITHIN_LIMIT_FRACTION,
                    points: WITHIN_LIMIT_POINTS,
                },
            ],
            excess_volume_points: OVER_LIMIT_POINTS,
            prime_score_threshold: PRIME_SCORE_THRESHOLD,
            rate_floors: vec![
                RateFloor {
                    min_score: STANDARD_TIER_MIN_SCORE,
                    floor_rate: STANDARD_TIER_FLOOR_RATE,
                },
                RateFloor {
                    min_score: SUBPRIME_TIER_MIN_SCORE,
                    floor_rate: SUBPRIME_TIER_FLOOR_RATE,
                },
            ],
        }
    }
}

impl CreditPolicy {
    /// Ceiling on total monthly installments for the given income.
    pub fn affordability_ceiling(&self, monthly_income: f64) -> f64 {
        monthly_income * self.affordability_ratio
    }

    pub fn loan_count_points(&self, loan_count: usize) -> u8 {
        self.loan_count_tiers
            .iter()
            .find(|tier| loan_count <= tier.max_loans)
            .map(|tier| tier.points)
            .unwrap_or(self.excess_loan_count_points)
    }

    pub fn volume_points(&self, total_amount: f64, approved_limit: f64) -> u8 {
        self.volume_tiers
            .iter()
            .find(|tier| total_amount <= approved_limit * tier.max_limit_fraction)
            .map(|tier| tier.points)
            .unwrap_or(self.excess_volume_points)
    }

    /// Check the policy for inconsistencies, reporting every problem at once.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let mut problems = Vec::new();

        if !(self.affordability_ratio.is_finite()
            && self.affordability_ratio > 0.0
            && self.affordability_ratio <= 1.0)
        {
            problems.push(format!(
                "affordability_ratio: must be within (0, 1], found {}",
                self.affordability_ratio
            ));
        }

        if !(self.payment_history_weight.is_finite() && self.payment_history_weight >= 0.0) {
            problems.push(format!(
                "payment_history_weight: must be non-negative, found {}",
                self.payment_history_weight
            ));
        }

        for (i, pair) in self.loan_count_tiers.windows(2).enumerate() {
            if pair[1].max_loans <= pair[0].max_loans {
                problems.push(format!(
                    "loan_count_tiers[{}].max_loans: must exceed the previous tier ({} <= {})",
                    i + 1,
                    pair[1].max_loans,
                    pair[0].max_loans
                ));
            }
        }

        for (i, tier) in self.volume_tiers.iter().enumerate() {
            if !(tier.max_limit_fraction.is_finite() && tier.max_limit_fraction > 0.0) {
                problems.push(format!(
                    "volume_tiers[{i}].max_limit_fraction: must be positive, found {}",
                    tier.max_limit_fraction
                ));
            }
        }
        for (i, pair) in self.volume_tiers.windows(2).enumerate() {
            if pair[1].max_limit_fraction <= pair[0].max_limit_fraction {
                problems.push(format!(
                    "volume_tiers[{}].max_limit_fraction: must exceed the previous tier",
                    i + 1
                ));
            }
        }

        for (i, floor) in self.rate_floors.iter().enumerate() {
            if floor.min_score > self.prime_score_threshold {
                problems.push(format!(
                    "rate_floors[{i}].min_score: {} overlaps the prime band above {}",
                    floor.min_score, self.prime_score_threshold
                ));
            }
            if !(floor.floor_rate.is_finite() && floor.floor_rate >= 0.0) {
                problems.push(format!(
                    "rate_floors[{i}].floor_rate: must be a non-negative percentage, found {}",
                    floor.floor_rate
                ));
            }
        }
        for (i, pair) in self.rate_floors.windows(2).enumerate() {
            if pair[1].min_score >= pair[0].min_score {
                problems.push(format!(
                    "rate_floors[{}].min_score: tiers must be listed from highest to lowest score",
                    i + 1
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PolicyError { problems })
        }
    }
}

/// Collected validation failures for a [`CreditPolicy`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid credit policy: {}", problems.join("; "))]
pub struct PolicyError {
    pub problems: Vec<String>,
}

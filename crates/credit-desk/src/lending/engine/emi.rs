//! Equated monthly installment math.

use super::EngineError;

/// Monthly installment amortizing `principal` over `tenure_months` at `annual_rate_percent`.
///
/// Evaluates `P·r / (1 − (1+r)^−n)` with `r` the monthly rate through `ln_1p`/`exp_m1`, so
/// near-zero rates tend to `P/n` and very long tenures tend to `P·r` instead of collapsing
/// to `0/0` or `inf/inf`. A zero rate divides evenly. The result is not rounded; see
/// [`round_currency`].
pub fn compute_installment(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<f64, EngineError> {
    if tenure_months == 0 {
        return Err(EngineError::invalid("tenure_months", "must be at least one month"));
    }
    if !principal.is_finite() || principal <= 0.0 {
        return Err(EngineError::invalid("principal", "must be a positive amount"));
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            "must be a non-negative percentage",
        ));
    }

    if annual_rate_percent == 0.0 {
        return Ok(principal / f64::from(tenure_months));
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let discounted = -(-f64::from(tenure_months) * monthly_rate.ln_1p()).exp_m1();
    let installment = principal * monthly_rate / discounted;

    if installment.is_finite() {
        Ok(installment)
    } else {
        Err(EngineError::invalid(
            "annual_rate_percent",
            "produces an unrepresentable installment",
        ))
    }
}

/// Round to two decimal places, halves away from zero.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

//! Cost accounting for completed attempts

/// Decimal places kept when rounding a computed cost
pub const COST_DECIMAL_PLACES: i32 = 6;

/// Cost of a completed attempt: `tokens_used * cost_per_token`
///
/// Rounded half away from zero to [`COST_DECIMAL_PLACES`] decimal places.
/// Costs are non-negative, so this behaves as round-half-up.
pub fn attempt_cost(tokens_used: u64, cost_per_token: f64) -> f64 {
    let scale = 10f64.powi(COST_DECIMAL_PLACES);
    (tokens_used as f64 * cost_per_token * scale).round() / scale
}

//! Numeric helpers shared by the engine and the analysis layers

/// Largest line item for which the statement identities are guaranteed exact
///
/// Line items are whole units held in `f64`, so sums of them are exact up to
/// 2^53. The limit leaves headroom for the longest sum (the cash residual).
pub const MAX_EXACT_CURRENCY: f64 = 140_737_488_355_328.0; // 2^47

/// Divide, returning 0.0 when the denominator is zero
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Round to the nearest whole currency unit
pub fn round_currency(value: f64) -> f64 {
    value.round()
}

/// Relative move of `value` away from `base`: (value - base) / base
///
/// A zero base yields 0.0 rather than an infinite deviation.
pub fn fractional_deviation(value: f64, base: f64) -> f64 {
    safe_div(value - base, base)
}

/// Move of a percent-denominated parameter, as a fraction (3.0 -> 4.5 is 0.015)
pub fn point_deviation(value: f64, base: f64) -> f64 {
    (value - base) / 100.0
}

/// Percentage change from `base` to `value`, measured against |base|
pub fn percent_change(value: f64, base: f64) -> f64 {
    safe_div(value - base, base.abs()) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_deviations() {
        assert!((fractional_deviation(120.0, 100.0) - 0.2).abs() < 1e-12);
        assert_eq!(fractional_deviation(5.0, 0.0), 0.0);
        assert!((point_deviation(4.5, 3.0) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_percent_change_negative_base() {
        // A loss shrinking from -100 to -50 is an improvement
        assert!((percent_change(-50.0, -100.0) - 50.0).abs() < 1e-12);
    }
}

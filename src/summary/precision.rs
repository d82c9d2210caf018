//! Display rounding

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Two-decimal display precision used by every outward-facing average
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round a value to a number of decimal digits for display.
///
/// Results of comparisons (compliance verdicts) must always be taken from the unrounded
/// value; this is only for reported figures.
pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Whether two values differ by more than an absolute tolerance.
pub(crate) fn differs_by_more_than(first: f64, second: f64, tolerance: f64) -> bool {
    !is_close!(first, second, rel_tol = 0., abs_tol = tolerance)
}

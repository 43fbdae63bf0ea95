//! Monetary arithmetic helpers
//!
//! Prices travel as `f64` because the host page's data layer stores plain
//! JavaScript numbers. Every sum is rounded to cents so repeated additions do
//! not drift (`499.90 * 2 + 150.00 * 3 + 350.00` must be `1799.80`).

/// Default tolerance used when comparing computed totals
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Round a monetary amount to 2 decimal places
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Line total for a single item, rounded to cents
pub fn line_total(price: f64, quantity: u32) -> f64 {
    round2(price * f64::from(quantity))
}

/// Sum `price * quantity` over `(price, quantity)` pairs, rounded to cents
pub fn sum_lines<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    round2(lines.into_iter().map(|(price, qty)| price * qty).sum())
}

/// Compare two amounts within `tolerance`
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

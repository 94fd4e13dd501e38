//! Comparison metrics.

/// Mean of `|a[i] - b[i]|`. Missing entries on the shorter side count as 0.
#[must_use]
pub fn mean_absolute_difference(a: &[u32], b: &[u32]) -> f64 {
    let n = a.len().max(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .map(|i| {
            let x = f64::from(a.get(i).copied().unwrap_or(0));
            let y = f64::from(b.get(i).copied().unwrap_or(0));
            (x - y).abs()
        })
        .sum();
    sum / n as f64
}

/// How much context changed the user's mind. 0 means identical allocations.
#[must_use]
pub fn awareness(blind: &[u32], adjusted: &[u32]) -> f64 {
    mean_absolute_difference(blind, adjusted)
}

/// How close the adjusted allocation is to the city's, clamped at 0.
#[must_use]
pub fn alignment(adjusted: &[u32], reference: &[u32]) -> f64 {
    (100.0 - mean_absolute_difference(adjusted, reference)).max(0.0)
}

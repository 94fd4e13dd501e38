//! Normalization engine.
//!
//! Two residual policies, one per operation type:
//! - full-vector normalization ([`normalize`], [`settle_on_first`]) puts the
//!   rounding residual on index 0;
//! - pairwise transfer ([`transfer`]) puts clamp drift on the current maximum
//!   (lowest index on ties).
//!
//! Every function here returns a vector that sums to the expected total.

use thiserror::Error;

use crate::allocation::{Allocation, TOTAL_PERCENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("cannot normalize an empty vector")]
    Empty,
    /// Nothing to scale; the caller keeps its previous values.
    #[error("cannot normalize a vector that sums to zero")]
    ZeroSum,
}

/// Scale `values` so they sum to exactly 100.
///
/// Negative and non-finite inputs count as zero. Each scaled entry is rounded
/// half-up on its own, then the residual `100 - sum(rounded)` lands on index 0
/// (spilling onto the largest entries if index 0 cannot absorb a deficit).
pub fn normalize(values: &[f64]) -> Result<Allocation, NormalizeError> {
    if values.is_empty() {
        return Err(NormalizeError::Empty);
    }
    let cleaned: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .collect();
    let sum: f64 = cleaned.iter().sum();
    if sum <= 0.0 {
        return Err(NormalizeError::ZeroSum);
    }

    let scale = f64::from(TOTAL_PERCENT) / sum;
    let mut rounded: Vec<u32> = cleaned
        .iter()
        .map(|v| ((v * scale).round() as u32).min(TOTAL_PERCENT))
        .collect();
    let residual = i64::from(TOTAL_PERCENT) - total(&rounded);
    apply_residual(&mut rounded, 0, residual);

    Ok(complete(rounded))
}

/// Fix drift on index 0 without rescaling.
///
/// Presets use this: `[16; 6]` settles to `[20, 16, 16, 16, 16, 16]`, where
/// [`normalize`] would rescale it to `[15, 17, 17, 17, 17, 17]`.
pub fn settle_on_first(values: &[u32]) -> Result<Allocation, NormalizeError> {
    if values.is_empty() {
        return Err(NormalizeError::Empty);
    }
    let mut settled: Vec<u32> = values.iter().map(|v| (*v).min(TOTAL_PERCENT)).collect();
    let residual = i64::from(TOTAL_PERCENT) - total(&settled);
    apply_residual(&mut settled, 0, residual);
    Ok(complete(settled))
}

/// Move `delta` points from `lose` to `gain`, starting from `base`.
///
/// Both endpoints are clamped to `0..=100`. When clamping changes the realized
/// total, the difference is applied to whichever sector holds the maximum value
/// after the move (lowest index on ties), so the total of `base` is preserved.
/// Out-of-range or identical indices leave `base` unchanged.
#[must_use]
pub fn transfer(base: &[u32], gain: usize, lose: usize, delta: i32) -> Vec<u32> {
    let mut next = base.to_vec();
    if gain == lose || gain >= base.len() || lose >= base.len() {
        return next;
    }

    let ceiling = i64::from(TOTAL_PERCENT);
    let delta = i64::from(delta);
    next[gain] = (i64::from(base[gain]) + delta).clamp(0, ceiling) as u32;
    next[lose] = (i64::from(base[lose]) - delta).clamp(0, ceiling) as u32;

    let residual = total(base) - total(&next);
    if residual != 0 {
        let target = index_of_max(&next);
        apply_residual(&mut next, target, residual);
    }
    next
}

fn total(values: &[u32]) -> i64 {
    values.iter().map(|v| i64::from(*v)).sum()
}

/// Index of the largest entry, lowest index on ties.
fn index_of_max(values: &[u32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn apply_residual(values: &mut [u32], target: usize, residual: i64) {
    if residual >= 0 {
        let add = u32::try_from(residual).unwrap_or(u32::MAX);
        values[target] = values[target].saturating_add(add);
        return;
    }

    let mut deficit = residual.unsigned_abs();
    let take = deficit.min(u64::from(values[target]));
    values[target] -= take as u32;
    deficit -= take;

    while deficit > 0 {
        let largest = index_of_max(values);
        if values[largest] == 0 {
            break;
        }
        values[largest] -= 1;
        deficit -= 1;
    }
}

fn complete(values: Vec<u32>) -> Allocation {
    // The residual step above restores the total; a failure here is a bug.
    Allocation::new(values).expect("residual correction restores the total")
}

//! Allocation invariant types.
//!
//! `Allocation` guarantees a complete split (sums to exactly 100) by construction.
//! `Draft` is the live, possibly incomplete vector behind the editing controls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The budget every complete allocation distributes, in percent.
pub const TOTAL_PERCENT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("allocation must cover at least one sector")]
    Empty,
    #[error("allocation totals {total}, expected {TOTAL_PERCENT}")]
    Incomplete { total: u32 },
    #[error("allocation has {actual} entries, registry has {expected} sectors")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A complete allocation: one non-negative integer per sector, summing to 100.
///
/// Only complete allocations can be submitted or persisted, so the store never
/// holds a vector that violates the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Allocation(Vec<u32>);

impl Allocation {
    pub fn new(values: Vec<u32>) -> Result<Self, AllocationError> {
        if values.is_empty() {
            return Err(AllocationError::Empty);
        }
        let total = values.iter().fold(0u32, |acc, v| acc.saturating_add(*v));
        if total != TOTAL_PERCENT {
            return Err(AllocationError::Incomplete { total });
        }
        Ok(Self(values))
    }

    /// Validate against the expected sector count.
    pub fn with_len(values: Vec<u32>, expected: usize) -> Result<Self, AllocationError> {
        if values.len() != expected {
            return Err(AllocationError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        Self::new(values)
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl TryFrom<Vec<u32>> for Allocation {
    type Error = AllocationError;

    fn try_from(values: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Allocation> for Vec<u32> {
    fn from(value: Allocation) -> Self {
        value.0
    }
}

impl std::ops::Deref for Allocation {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Live editing state for one phase.
///
/// Entries are clamped to `0..=100`; the total may be anything until the
/// draft is promoted with [`Draft::to_allocation`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft(Vec<u32>);

impl Draft {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    #[must_use]
    pub fn from_values(values: Vec<u32>) -> Self {
        Self(values.into_iter().map(|v| v.min(TOTAL_PERCENT)).collect())
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Whether the draft could be submitted as-is.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.0.is_empty() && self.total() == TOTAL_PERCENT
    }

    /// Percent still unassigned (zero once complete or over budget).
    #[must_use]
    pub fn remaining(&self) -> u32 {
        TOTAL_PERCENT.saturating_sub(self.total())
    }

    pub fn to_allocation(&self) -> Result<Allocation, AllocationError> {
        Allocation::new(self.0.clone())
    }

    /// Replace every entry, clamping to the valid range.
    pub fn replace(&mut self, values: &[u32]) {
        self.0.clear();
        self.0.extend(values.iter().map(|v| (*v).min(TOTAL_PERCENT)));
    }
}

impl From<&Allocation> for Draft {
    fn from(value: &Allocation) -> Self {
        Self(value.values().to_vec())
    }
}

impl PartialEq<Allocation> for Draft {
    fn eq(&self, other: &Allocation) -> bool {
        self.0.as_slice() == other.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_requires_exact_total() {
        assert!(Allocation::new(vec![34, 12, 29, 10, 12, 3]).is_ok());
        assert_eq!(
            Allocation::new(vec![50, 49]),
            Err(AllocationError::Incomplete { total: 99 })
        );
        assert_eq!(Allocation::new(vec![]), Err(AllocationError::Empty));
    }

    #[test]
    fn allocation_with_len_rejects_wrong_shape() {
        let err = Allocation::with_len(vec![100], 6).unwrap_err();
        assert_eq!(
            err,
            AllocationError::LengthMismatch {
                expected: 6,
                actual: 1
            }
        );
    }

    #[test]
    fn allocation_deserialize_validates() {
        let ok: Allocation = serde_json::from_str("[60,40]").unwrap();
        assert_eq!(ok.values(), &[60, 40]);
        assert!(serde_json::from_str::<Allocation>("[60,41]").is_err());
        assert!(serde_json::from_str::<Allocation>("[-1,101]").is_err());
    }

    #[test]
    fn draft_clamps_entries() {
        let draft = Draft::from_values(vec![150, 3]);
        assert_eq!(draft.values(), &[100, 3]);
        assert!(!draft.is_complete());
    }

    #[test]
    fn draft_remaining_saturates() {
        let mut draft = Draft::zeros(3);
        assert_eq!(draft.remaining(), 100);
        draft.replace(&[90, 20, 0]);
        assert_eq!(draft.remaining(), 0);
        assert_eq!(draft.total(), 110);
    }

    #[test]
    fn draft_compares_with_allocation() {
        let allocation = Allocation::new(vec![70, 30]).unwrap();
        let draft = Draft::from(&allocation);
        assert_eq!(draft, allocation);
        assert!(draft.to_allocation().is_ok());
    }
}

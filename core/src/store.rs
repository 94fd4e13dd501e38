//! Player state: the authoritative Phase × Layer grid of submitted allocations.

use civic_types::{Allocation, AllocationError, Layer, LayerMap, Phase, PhaseMap, equal_split};

/// Submitted allocations for one session.
///
/// Every slot is either empty or a complete [`Allocation`] of the registry's
/// length; [`PlayerState::store`] and [`PlayerState::merge`] enforce the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    sectors: usize,
    slots: PhaseMap<LayerMap<Option<Allocation>>>,
}

impl PlayerState {
    #[must_use]
    pub fn new(sectors: usize) -> Self {
        Self {
            sectors,
            slots: PhaseMap::default(),
        }
    }

    #[must_use]
    pub const fn sectors(&self) -> usize {
        self.sectors
    }

    #[must_use]
    pub fn submission(&self, phase: Phase, layer: Layer) -> Option<&Allocation> {
        self.slots.get(phase).get(layer).as_ref()
    }

    #[must_use]
    pub fn has_submission(&self, phase: Phase, layer: Layer) -> bool {
        self.submission(phase, layer).is_some()
    }

    /// Submitted values, or zeros when the slot is empty.
    #[must_use]
    pub fn values_or_zero(&self, phase: Phase, layer: Layer) -> Vec<u32> {
        self.submission(phase, layer)
            .map_or_else(|| vec![0; self.sectors], |a| a.values().to_vec())
    }

    /// Both layers of `phase`, as persisted.
    #[must_use]
    pub fn phase(&self, phase: Phase) -> &LayerMap<Option<Allocation>> {
        self.slots.get(phase)
    }

    pub fn store(
        &mut self,
        phase: Phase,
        layer: Layer,
        allocation: Allocation,
    ) -> Result<(), AllocationError> {
        if allocation.len() != self.sectors {
            return Err(AllocationError::LengthMismatch {
                expected: self.sectors,
                actual: allocation.len(),
            });
        }
        *self.slots.get_mut(phase).get_mut(layer) = Some(allocation);
        Ok(())
    }

    /// Overlay restored slots onto the current ones.
    ///
    /// Restored values win where present; empty restored slots keep whatever
    /// is already held. Returns how many slots were taken.
    pub fn merge(&mut self, phase: Phase, restored: LayerMap<Option<Allocation>>) -> usize {
        let mut taken = 0;
        for layer in Layer::ALL {
            let Some(allocation) = restored.get(layer).clone() else {
                continue;
            };
            match self.store(phase, layer, allocation) {
                Ok(()) => taken += 1,
                Err(e) => {
                    tracing::warn!(%phase, %layer, "Ignoring restored allocation: {e}");
                }
            }
        }
        taken
    }

    pub fn clear(&mut self) {
        self.slots = PhaseMap::default();
    }
}

/// Starting values for the controls of `phase`: the equal split for the blind
/// round, all zeros for the adjusted round.
#[must_use]
pub fn phase_default(phase: Phase, sectors: usize) -> Vec<u32> {
    match phase {
        Phase::Blind => equal_split(sectors)
            .map(Allocation::into_inner)
            .unwrap_or_else(|_| vec![0; sectors]),
        Phase::Adjusted => vec![0; sectors],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(values: &[u32]) -> Allocation {
        Allocation::new(values.to_vec()).unwrap()
    }

    #[test]
    fn store_rejects_wrong_length() {
        let mut state = PlayerState::new(3);
        let err = state
            .store(Phase::Blind, Layer::Operating, allocation(&[50, 50]))
            .unwrap_err();
        assert_eq!(
            err,
            AllocationError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert!(!state.has_submission(Phase::Blind, Layer::Operating));
    }

    #[test]
    fn slots_are_independent() {
        let mut state = PlayerState::new(2);
        state
            .store(Phase::Blind, Layer::Capital, allocation(&[70, 30]))
            .unwrap();
        assert!(state.has_submission(Phase::Blind, Layer::Capital));
        assert!(!state.has_submission(Phase::Blind, Layer::Operating));
        assert!(!state.has_submission(Phase::Adjusted, Layer::Capital));
        assert_eq!(state.values_or_zero(Phase::Adjusted, Layer::Capital), vec![0, 0]);
    }

    #[test]
    fn merge_overrides_present_and_keeps_absent() {
        let mut state = PlayerState::new(2);
        state
            .store(Phase::Blind, Layer::Operating, allocation(&[10, 90]))
            .unwrap();
        state
            .store(Phase::Blind, Layer::Capital, allocation(&[20, 80]))
            .unwrap();

        let restored = LayerMap::new(Some(allocation(&[60, 40])), None);
        assert_eq!(state.merge(Phase::Blind, restored), 1);

        assert_eq!(
            state.submission(Phase::Blind, Layer::Operating).unwrap().values(),
            &[60, 40]
        );
        assert_eq!(
            state.submission(Phase::Blind, Layer::Capital).unwrap().values(),
            &[20, 80]
        );
    }

    #[test]
    fn merge_skips_wrong_shape() {
        let mut state = PlayerState::new(2);
        let restored = LayerMap::new(Some(allocation(&[100])), None);
        assert_eq!(state.merge(Phase::Adjusted, restored), 0);
        assert!(!state.has_submission(Phase::Adjusted, Layer::Operating));
    }

    #[test]
    fn phase_defaults() {
        assert_eq!(phase_default(Phase::Blind, 6), vec![20, 16, 16, 16, 16, 16]);
        assert_eq!(phase_default(Phase::Adjusted, 3), vec![0, 0, 0]);
    }
}

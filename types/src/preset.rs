//! Allocation presets.
//!
//! Presets fix rounding drift on index 0 without rescaling, so the equal split
//! for six sectors is `[20, 16, 16, 16, 16, 16]`.

use thiserror::Error;

use crate::allocation::{Allocation, TOTAL_PERCENT};
use crate::normalize::{NormalizeError, settle_on_first};
use crate::sector::{SectorId, SectorRegistry};
use crate::Layer;

/// Share given to the favoured sector by a priority preset.
const PRIORITY_SHARE: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("no sector with id {0}")]
    UnknownSector(SectorId),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preset {
    Equal,
    /// 40% to one sector, the rest split evenly.
    Priority(SectorId),
    /// The city's own split for the active layer.
    CityMix,
    Random,
}

impl Preset {
    /// Presets offered for `registry`, in menu order.
    ///
    /// Priority presets only appear for sectors the registry actually has.
    #[must_use]
    pub fn menu(registry: &SectorRegistry) -> Vec<Preset> {
        let mut presets = vec![Preset::Equal];
        for id in ["transit", "housing"] {
            if let Some(sector) = registry.index_of(id).and_then(|i| registry.get(i)) {
                presets.push(Preset::Priority(sector.id().clone()));
            }
        }
        presets.push(Preset::CityMix);
        presets.push(Preset::Random);
        presets
    }

    #[must_use]
    pub fn label(&self, registry: &SectorRegistry) -> String {
        match self {
            Preset::Equal => "Equal".to_string(),
            Preset::Priority(id) => {
                let name = registry
                    .index_of(id.as_str())
                    .and_then(|i| registry.get(i))
                    .map_or_else(|| id.to_string(), |s| s.name().to_string());
                format!("{name} Priority")
            }
            Preset::CityMix => "City Mix".to_string(),
            Preset::Random => "Random".to_string(),
        }
    }

    /// Resolve to a complete allocation.
    ///
    /// `random` draws a fresh allocation for `Preset::Random`; it is not called
    /// for the other variants.
    pub fn resolve(
        &self,
        registry: &SectorRegistry,
        layer: Layer,
        random: impl FnOnce(usize) -> Result<Allocation, NormalizeError>,
    ) -> Result<Allocation, PresetError> {
        let n = registry.len();
        let values = match self {
            Preset::Equal => return Ok(equal_split(n)?),
            Preset::Priority(id) => {
                let favoured = registry
                    .index_of(id.as_str())
                    .ok_or_else(|| PresetError::UnknownSector(id.clone()))?;
                let others = u32::try_from(n.saturating_sub(1).max(1)).unwrap_or(u32::MAX);
                let rest = (TOTAL_PERCENT - PRIORITY_SHARE) / others;
                (0..n)
                    .map(|i| if i == favoured { PRIORITY_SHARE } else { rest })
                    .collect()
            }
            Preset::CityMix => registry.reference_vector(layer),
            Preset::Random => return Ok(random(n)?),
        };
        Ok(settle_on_first(&values)?)
    }
}

/// `floor(100 / n)` each, drift on index 0.
pub fn equal_split(n: usize) -> Result<Allocation, NormalizeError> {
    let share = TOTAL_PERCENT / u32::try_from(n.max(1)).unwrap_or(u32::MAX);
    settle_on_first(&vec![share; n])
}

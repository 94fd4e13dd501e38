//! Sector registry.
//!
//! The registry is static configuration: built once at load (reference shares
//! normalized per layer) and immutable afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::{NormalizeError, normalize};
use crate::{Layer, LayerMap};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("sector registry must contain at least one sector")]
    Empty,
    #[error("sector id must not be empty")]
    EmptyId,
    #[error("duplicate sector id: {0}")]
    DuplicateId(String),
    #[error("sector {id} has an invalid {layer} share: {value}")]
    InvalidShare { id: String, layer: Layer, value: f64 },
    #[error("{layer} total must be a finite, non-negative amount (got {value})")]
    InvalidTotal { layer: Layer, value: f64 },
}

/// Stable identifier for a sector (lowercase, trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectorId(String);

impl SectorId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RegistryError> {
        let id = raw.as_ref().trim().to_ascii_lowercase();
        if id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectorId {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectorId> for String {
    fn from(value: SectorId) -> Self {
        value.0
    }
}

impl std::fmt::Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unvalidated sector definition as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub operating: f64,
    #[serde(default)]
    pub capital: f64,
}

impl RawSector {
    fn share(&self, layer: Layer) -> f64 {
        match layer {
            Layer::Operating => self.operating,
            Layer::Capital => self.capital,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    id: SectorId,
    name: String,
    icon: String,
    reference: LayerMap<u32>,
}

impl Sector {
    #[must_use]
    pub fn id(&self) -> &SectorId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// The city's percentage for this sector in `layer`.
    #[must_use]
    pub fn reference_share(&self, layer: Layer) -> u32 {
        *self.reference.get(layer)
    }
}

/// Ordered sector list plus the per-layer budget totals (millions).
///
/// Invariant: for each layer, reference shares sum to 100 (unless every raw
/// share for that layer was zero, in which case they are all zero).
#[derive(Debug, Clone, PartialEq)]
pub struct SectorRegistry {
    sectors: Vec<Sector>,
    totals: LayerMap<f64>,
}

impl SectorRegistry {
    /// Operating total, in millions.
    pub const DEFAULT_OPERATING_TOTAL: f64 = 5050.0;
    /// Capital total from the 2025 capital budget, in millions.
    pub const DEFAULT_CAPITAL_TOTAL: f64 = 1471.282;

    pub fn from_raw(raw: &[RawSector], totals: LayerMap<f64>) -> Result<Self, RegistryError> {
        if raw.is_empty() {
            return Err(RegistryError::Empty);
        }
        for layer in Layer::ALL {
            let value = *totals.get(layer);
            if !value.is_finite() || value < 0.0 {
                return Err(RegistryError::InvalidTotal { layer, value });
            }
        }

        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(raw.len());
        for sector in raw {
            let id = SectorId::new(&sector.id)?;
            if !seen.insert(id.clone()) {
                return Err(RegistryError::DuplicateId(id.into()));
            }
            for layer in Layer::ALL {
                let value = sector.share(layer);
                if !value.is_finite() || value < 0.0 {
                    return Err(RegistryError::InvalidShare {
                        id: id.to_string(),
                        layer,
                        value,
                    });
                }
            }
            ids.push(id);
        }

        let operating = normalized_shares(raw, Layer::Operating);
        let capital = normalized_shares(raw, Layer::Capital);

        let sectors = raw
            .iter()
            .zip(ids)
            .enumerate()
            .map(|(i, (sector, id))| Sector {
                name: if sector.name.trim().is_empty() {
                    id.to_string()
                } else {
                    sector.name.trim().to_string()
                },
                icon: sector.icon.trim().to_string(),
                id,
                reference: LayerMap::new(operating[i], capital[i]),
            })
            .collect();

        Ok(Self { sectors, totals })
    }

    /// Built-in 2025 Ottawa dataset.
    #[must_use]
    pub fn ottawa_2025() -> Self {
        let raw = default_raw_sectors();
        Self::from_raw(
            &raw,
            LayerMap::new(Self::DEFAULT_OPERATING_TOTAL, Self::DEFAULT_CAPITAL_TOTAL),
        )
        .expect("built-in sector dataset is valid")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.iter()
    }

    #[must_use]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sector> {
        self.sectors.get(index)
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        let id = id.trim().to_ascii_lowercase();
        self.sectors.iter().position(|s| s.id.as_str() == id)
    }

    #[must_use]
    pub fn reference_share(&self, id: &str, layer: Layer) -> Option<u32> {
        self.index_of(id)
            .map(|i| self.sectors[i].reference_share(layer))
    }

    /// Reference shares for `layer`, in registry order.
    #[must_use]
    pub fn reference_vector(&self, layer: Layer) -> Vec<u32> {
        self.sectors
            .iter()
            .map(|s| s.reference_share(layer))
            .collect()
    }

    /// Budget total for `layer`, in millions.
    #[must_use]
    pub fn total_budget(&self, layer: Layer) -> f64 {
        *self.totals.get(layer)
    }

    /// Convert a percentage of `layer`'s total into whole millions.
    #[must_use]
    pub fn amount_for(&self, percent: u32, layer: Layer) -> f64 {
        (f64::from(percent) / 100.0 * self.total_budget(layer)).round()
    }
}

impl Default for SectorRegistry {
    fn default() -> Self {
        Self::ottawa_2025()
    }
}

fn normalized_shares(raw: &[RawSector], layer: Layer) -> Vec<u32> {
    let values: Vec<f64> = raw.iter().map(|s| s.share(layer)).collect();
    match normalize(&values) {
        Ok(allocation) => allocation.into_inner(),
        // All zero: nothing to redistribute.
        Err(NormalizeError::ZeroSum | NormalizeError::Empty) => vec![0; values.len()],
    }
}

/// 2025 shares derived from the city's operating and capital budgets.
#[must_use]
pub fn default_raw_sectors() -> Vec<RawSector> {
    [
        ("transit", "Transit", "🚌", 34.0, 68.0),
        ("housing", "Housing", "🏠", 12.0, 4.0),
        ("policing", "Policing", "👮", 29.0, 3.0),
        ("health", "Health & Social", "❤️", 10.0, 1.0),
        ("parks", "Parks & Culture", "🌳", 12.0, 22.0),
        ("environment", "Environment", "🌎", 3.0, 2.0),
    ]
    .into_iter()
    .map(|(id, name, icon, operating, capital)| RawSector {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        operating,
        capital,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, operating: f64, capital: f64) -> RawSector {
        RawSector {
            id: id.to_string(),
            name: id.to_string(),
            icon: String::new(),
            operating,
            capital,
        }
    }

    #[test]
    fn default_registry_matches_dataset() {
        let registry = SectorRegistry::ottawa_2025();
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.reference_vector(Layer::Operating),
            vec![34, 12, 29, 10, 12, 3]
        );
        assert_eq!(
            registry.reference_vector(Layer::Capital),
            vec![68, 4, 3, 1, 22, 2]
        );
        assert_eq!(registry.reference_share("Transit", Layer::Capital), Some(68));
        assert_eq!(registry.reference_share("unknown", Layer::Capital), None);
    }

    #[test]
    fn shares_are_normalized_per_layer() {
        let registry = SectorRegistry::from_raw(
            &[raw("a", 1.0, 0.0), raw("b", 1.0, 0.0), raw("c", 1.0, 5.0)],
            LayerMap::new(10.0, 20.0),
        )
        .unwrap();
        assert_eq!(registry.reference_vector(Layer::Operating), vec![34, 33, 33]);
        assert_eq!(registry.reference_vector(Layer::Capital), vec![0, 0, 100]);
    }

    #[test]
    fn all_zero_layer_is_left_alone() {
        let registry =
            SectorRegistry::from_raw(&[raw("a", 0.0, 1.0)], LayerMap::new(1.0, 1.0)).unwrap();
        assert_eq!(registry.reference_vector(Layer::Operating), vec![0]);
    }

    #[test]
    fn rejects_duplicates_and_bad_values() {
        let totals = LayerMap::new(1.0, 1.0);
        assert_eq!(
            SectorRegistry::from_raw(&[raw("a", 1.0, 1.0), raw("A ", 1.0, 1.0)], totals),
            Err(RegistryError::DuplicateId("a".to_string()))
        );
        assert_eq!(SectorRegistry::from_raw(&[], totals), Err(RegistryError::Empty));
        assert!(matches!(
            SectorRegistry::from_raw(&[raw("a", -1.0, 1.0)], totals),
            Err(RegistryError::InvalidShare { .. })
        ));
        assert!(matches!(
            SectorRegistry::from_raw(&[raw(" ", 1.0, 1.0)], totals),
            Err(RegistryError::EmptyId)
        ));
        assert!(matches!(
            SectorRegistry::from_raw(&[raw("a", 1.0, 1.0)], LayerMap::new(f64::NAN, 1.0)),
            Err(RegistryError::InvalidTotal { .. })
        ));
    }

    #[test]
    fn amount_for_rounds_to_millions() {
        let registry = SectorRegistry::ottawa_2025();
        assert!((registry.amount_for(34, Layer::Operating) - 1717.0).abs() < f64::EPSILON);
        assert!((registry.total_budget(Layer::Capital) - 1471.282).abs() < f64::EPSILON);
    }
}

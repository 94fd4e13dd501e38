//! Representation sync.
//!
//! The draft, the slider bank, and the chart surface always show the same
//! numbers. Every edit, whichever control it came from, goes through
//! [`RepresentationSync::apply_edit`], which updates the draft and then pushes
//! the result to the other two.

use thiserror::Error;

use civic_types::{Allocation, Draft, SectorId, TOTAL_PERCENT, transfer};

/// One `(sector, percentage)` pair in chart order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub id: SectorId,
    pub value: u32,
}

/// Adapter for whatever draws the allocation as a chart.
pub trait ChartSurface {
    fn set_data(&mut self, series: &[SeriesPoint]);
}

/// Chart surface that keeps the last series for the renderer to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesBuffer {
    series: Vec<SeriesPoint>,
    updates: u64,
}

impl SeriesBuffer {
    #[must_use]
    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    #[must_use]
    pub fn values(&self) -> Vec<u32> {
        self.series.iter().map(|p| p.value).collect()
    }

    /// Number of `set_data` calls so far.
    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.updates
    }
}

impl ChartSurface for SeriesBuffer {
    fn set_data(&mut self, series: &[SeriesPoint]) {
        self.series.clear();
        self.series.extend_from_slice(series);
        self.updates += 1;
    }
}

/// Which control produced an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSource {
    Slider,
    Pie,
    Preset,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Slider `index` was moved to `value`.
    Slider { index: usize, value: u32 },
    /// `delta` points move from `lose` to `gain`, measured from `base`.
    Pie {
        base: Vec<u32>,
        gain: usize,
        lose: usize,
        delta: i32,
    },
    Preset(Allocation),
    Random(Allocation),
}

impl Edit {
    #[must_use]
    pub const fn source(&self) -> EditSource {
        match self {
            Edit::Slider { .. } => EditSource::Slider,
            Edit::Pie { .. } => EditSource::Pie,
            Edit::Preset(_) => EditSource::Preset,
            Edit::Random(_) => EditSource::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("controls are locked after submission")]
    Locked,
    #[error("sector index {index} is out of range for {len} sectors")]
    OutOfRange { index: usize, len: usize },
    #[error("edit carries {actual} values, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Slider positions plus the enabled flag shared by every control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliderBank {
    values: Vec<u32>,
    locked: bool,
}

impl SliderBank {
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Draft plus the two views of it for one phase.
#[derive(Debug, Clone)]
pub struct RepresentationSync<C: ChartSurface> {
    ids: Vec<SectorId>,
    draft: Draft,
    sliders: SliderBank,
    chart: C,
}

impl<C: ChartSurface> RepresentationSync<C> {
    /// Start with `initial` values (clamped) for sectors `ids`.
    pub fn new(ids: Vec<SectorId>, initial: &[u32], chart: C) -> Self {
        let mut sync = Self {
            draft: Draft::zeros(ids.len()),
            ids,
            sliders: SliderBank::default(),
            chart,
        };
        sync.seed(initial);
        sync
    }

    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    #[must_use]
    pub fn sliders(&self) -> &SliderBank {
        &self.sliders
    }

    #[must_use]
    pub fn chart(&self) -> &C {
        &self.chart
    }

    #[must_use]
    pub fn ids(&self) -> &[SectorId] {
        &self.ids
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.sliders.locked
    }

    pub fn lock(&mut self) {
        self.sliders.locked = true;
    }

    pub fn unlock(&mut self) {
        self.sliders.locked = false;
    }

    /// Replace all values without going through an edit (load, layer switch,
    /// reset). Unlocks the controls.
    pub fn seed(&mut self, values: &[u32]) {
        let mut padded = values.to_vec();
        padded.resize(self.ids.len(), 0);
        self.draft.replace(&padded);
        self.sliders.locked = false;
        self.publish();
    }

    /// Apply `edit` and bring every representation in line with the new draft.
    ///
    /// Applying the same edit twice leaves the draft where the first call put it.
    pub fn apply_edit(&mut self, edit: &Edit) -> Result<&Draft, EditError> {
        if self.sliders.locked {
            return Err(EditError::Locked);
        }
        let len = self.ids.len();
        let next = match edit {
            Edit::Slider { index, value } => {
                self.check_index(*index)?;
                slider_values(self.draft.values(), *index, *value)
            }
            Edit::Pie {
                base,
                gain,
                lose,
                delta,
            } => {
                self.check_index(*gain)?;
                self.check_index(*lose)?;
                if base.len() != len {
                    return Err(EditError::LengthMismatch {
                        expected: len,
                        actual: base.len(),
                    });
                }
                transfer(base, *gain, *lose, *delta)
            }
            Edit::Preset(allocation) | Edit::Random(allocation) => {
                if allocation.len() != len {
                    return Err(EditError::LengthMismatch {
                        expected: len,
                        actual: allocation.len(),
                    });
                }
                allocation.values().to_vec()
            }
        };

        if next.as_slice() != self.draft.values() {
            tracing::debug!(source = ?edit.source(), values = ?next, "Applied edit");
            self.draft.replace(&next);
        }
        self.publish();
        Ok(&self.draft)
    }

    /// Whether the three representations agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool
    where
        C: AsSeries,
    {
        self.sliders.values == self.draft.values() && self.chart.as_values() == self.draft.values()
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.ids.len() {
            Ok(())
        } else {
            Err(EditError::OutOfRange {
                index,
                len: self.ids.len(),
            })
        }
    }

    fn publish(&mut self) {
        self.sliders.values.clear();
        self.sliders.values.extend_from_slice(self.draft.values());
        let series: Vec<SeriesPoint> = self
            .ids
            .iter()
            .zip(self.draft.values())
            .map(|(id, value)| SeriesPoint {
                id: id.clone(),
                value: *value,
            })
            .collect();
        self.chart.set_data(&series);
    }
}

/// Chart surfaces that can report what they currently show.
pub trait AsSeries {
    fn as_values(&self) -> Vec<u32>;
}

impl AsSeries for SeriesBuffer {
    fn as_values(&self) -> Vec<u32> {
        self.values()
    }
}

/// Resulting values when slider `index` is set to `value`.
///
/// While the draft is incomplete the slider fills freely, capped so the total
/// never passes 100. Once complete, the change is a two-way transfer with the
/// next sector (wrapping) that can absorb it.
fn slider_values(current: &[u32], index: usize, value: u32) -> Vec<u32> {
    let value = value.min(TOTAL_PERCENT);
    let total: u32 = current.iter().sum();
    if total != TOTAL_PERCENT {
        let others = total.saturating_sub(current[index]);
        let mut next = current.to_vec();
        next[index] = value.min(TOTAL_PERCENT.saturating_sub(others));
        return next;
    }

    let delta = i64::from(value) - i64::from(current[index]);
    if delta == 0 {
        return current.to_vec();
    }
    match counterpart(current, index, delta) {
        Some(lose) => transfer(current, index, lose, delta as i32),
        None => current.to_vec(),
    }
}

/// Sector that gives up (or takes back) `delta` for `index`.
///
/// Decreases go to the next sector; there is always room because the total is
/// 100. Increases take from the first following sector holding at least
/// `delta`, else from the largest other sector.
fn counterpart(values: &[u32], index: usize, delta: i64) -> Option<usize> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mut following = (1..n).map(|step| (index + step) % n);
    if delta < 0 {
        return following.next();
    }
    let needed = delta.unsigned_abs();
    let mut fallback: Option<usize> = None;
    for j in following {
        if u64::from(values[j]) >= needed {
            return Some(j);
        }
        if values[j] > 0 && fallback.is_none_or(|f| values[j] > values[f]) {
            fallback = Some(j);
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<SectorId> {
        (0..n)
            .map(|i| SectorId::new(format!("s{i}")).unwrap())
            .collect()
    }

    fn sync(values: &[u32]) -> RepresentationSync<SeriesBuffer> {
        RepresentationSync::new(ids(values.len()), values, SeriesBuffer::default())
    }

    #[test]
    fn seed_publishes_to_every_view() {
        let s = sync(&[34, 12, 29, 10, 12, 3]);
        assert!(s.is_consistent());
        assert_eq!(s.chart().series()[0].id.as_str(), "s0");
        assert_eq!(s.chart().updates(), 1);
    }

    #[test]
    fn slider_on_complete_draft_transfers_from_next() {
        let mut s = sync(&[34, 12, 29, 10, 12, 3]);
        s.apply_edit(&Edit::Slider { index: 0, value: 40 }).unwrap();
        assert_eq!(s.draft().values(), &[40, 6, 29, 10, 12, 3]);
        assert!(s.is_consistent());
    }

    #[test]
    fn slider_increase_skips_sectors_that_cannot_pay() {
        let mut s = sync(&[34, 12, 29, 10, 12, 3]);
        s.apply_edit(&Edit::Slider { index: 4, value: 22 }).unwrap();
        // Sector 5 holds 3, so sector 0 (wrapping) pays.
        assert_eq!(s.draft().values(), &[24, 12, 29, 10, 22, 3]);
    }

    #[test]
    fn slider_decrease_gives_to_next() {
        let mut s = sync(&[34, 12, 29, 10, 12, 3]);
        s.apply_edit(&Edit::Slider { index: 5, value: 0 }).unwrap();
        assert_eq!(s.draft().values(), &[37, 12, 29, 10, 12, 0]);
    }

    #[test]
    fn slider_on_incomplete_draft_fills_up_to_remaining() {
        let mut s = sync(&[0, 0, 0]);
        s.apply_edit(&Edit::Slider { index: 0, value: 70 }).unwrap();
        s.apply_edit(&Edit::Slider { index: 1, value: 50 }).unwrap();
        assert_eq!(s.draft().values(), &[70, 30, 0]);
        assert!(s.draft().is_complete());
    }

    #[test]
    fn slider_edit_is_idempotent() {
        let mut s = sync(&[34, 12, 29, 10, 12, 3]);
        let edit = Edit::Slider { index: 2, value: 20 };
        let once = s.apply_edit(&edit).unwrap().clone();
        let twice = s.apply_edit(&edit).unwrap().clone();
        assert_eq!(once, twice);
    }

    #[test]
    fn pie_edit_is_idempotent() {
        let base = vec![34, 12, 29, 10, 12, 3];
        let mut s = sync(&base);
        let edit = Edit::Pie {
            base: base.clone(),
            gain: 0,
            lose: 1,
            delta: 10,
        };
        let once = s.apply_edit(&edit).unwrap().clone();
        let twice = s.apply_edit(&edit).unwrap().clone();
        assert_eq!(once, twice);
        assert_eq!(twice.values(), &[44, 2, 29, 10, 12, 3]);
        assert!(s.is_consistent());
    }

    #[test]
    fn preset_edit_is_idempotent() {
        let mut s = sync(&[34, 12, 29, 10, 12, 3]);
        let edit = Edit::Preset(Allocation::new(vec![20, 16, 16, 16, 16, 16]).unwrap());
        let once = s.apply_edit(&edit).unwrap().clone();
        let twice = s.apply_edit(&edit).unwrap().clone();
        assert_eq!(once, twice);
        assert_eq!(twice.values(), &[20, 16, 16, 16, 16, 16]);
        assert!(s.is_consistent());
    }

    #[test]
    fn pie_edit_is_relative_to_base() {
        let base = vec![34, 12, 29, 10, 12, 3];
        let mut s = sync(&base);
        for delta in [4, 15, 10] {
            s.apply_edit(&Edit::Pie {
                base: base.clone(),
                gain: 0,
                lose: 1,
                delta,
            })
            .unwrap();
        }
        assert_eq!(s.draft().values(), &[44, 2, 29, 10, 12, 3]);
        assert!(s.is_consistent());
    }

    #[test]
    fn preset_replaces_everything() {
        let mut s = sync(&[0, 0]);
        let preset = Allocation::new(vec![25, 75]).unwrap();
        s.apply_edit(&Edit::Preset(preset)).unwrap();
        assert_eq!(s.sliders().values(), &[25, 75]);
    }

    #[test]
    fn locked_controls_reject_edits() {
        let mut s = sync(&[50, 50]);
        s.lock();
        assert_eq!(
            s.apply_edit(&Edit::Slider { index: 0, value: 10 }),
            Err(EditError::Locked)
        );
        s.seed(&[60, 40]);
        assert!(!s.is_locked());
    }

    #[test]
    fn bad_shapes_are_rejected() {
        let mut s = sync(&[50, 50]);
        assert_eq!(
            s.apply_edit(&Edit::Slider { index: 9, value: 10 }),
            Err(EditError::OutOfRange { index: 9, len: 2 })
        );
        let wrong = Allocation::new(vec![100]).unwrap();
        assert_eq!(
            s.apply_edit(&Edit::Random(wrong)),
            Err(EditError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn single_sector_slider_is_pinned() {
        let mut s = sync(&[100]);
        s.apply_edit(&Edit::Slider { index: 0, value: 40 }).unwrap();
        assert_eq!(s.draft().values(), &[100]);
    }
}

//! Rhythm maker: talea, masks, ties and incisions put together.
//!
//! ```
//! use rhythm_makers::{Cursor, Duration, MakerConfig, RhythmMaker, Talea};
//!
//! let maker = RhythmMaker::new(MakerConfig {
//!     talea: Talea::new(vec![1, 1, 1, 1], 4).unwrap(),
//!     ..Default::default()
//! })
//! .unwrap();
//! let targets = vec![Duration::new(3, 4).unwrap(); 2];
//! let (forest, cursor) = maker.generate(&targets, &Cursor::new()).unwrap();
//! assert_eq!(forest.len(), 2);
//! assert!(forest.iter().all(|division| division.container.is_none()));
//! assert_eq!(cursor.offset, 2);
//! assert_eq!(cursor.divisions_consumed, 2);
//! ```

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::{
        ArithmeticError, ConfigurationError, ExhaustedTalea, NotatabilityError, RhythmResult,
    },
    incise::{fit, Incise, InciseBody},
    mask::{MaskAction, MaskSet, PositionIndex},
    planner::{fuse, plan, trivialize},
    primitives::{Division, Duration, Forest, Leaf, LeafKind},
    spelling::Spelling,
    talea::{partition, pull, pull_once, Cursor, PulledCount, Talea},
    tie::{resolve_ties, TiePolicy},
};

/// Everything the maker is built from.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakerConfig {
    pub talea: Talea,
    /// Counts, added to every division (cyclic by division index).
    pub extra_counts: Option<Vec<i64>>,
    /// Talea is not repeated: reading past its end is an error.
    pub read_talea_once_only: bool,
    pub masks: MaskSet,
    pub spelling: Spelling,
    pub ties: TiePolicy,
    pub incise: Option<Incise>,
    /// Write division of rests only as one rest without container.
    pub rewrite_rest_filled: bool,
    /// Write division of one note (maybe continued from the previous
    /// division) as one note without container.
    pub rewrite_sustained: bool,
    /// Drop containers, whose leaves can be written by sounding durations.
    pub trivialize: bool,
}
impl MakerConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.talea.validate()?;
        if let Some(extra) = &self.extra_counts {
            if extra.is_empty() {
                return Err(ConfigurationError::EmptyExtraCounts);
            }
        }
        self.masks.validate()?;
        self.spelling.validate()?;
        match &self.incise {
            None => Ok(()),
            Some(incise) => incise.validate(),
        }
    }
}

/// Makes Forest of divisions from target durations.
///
/// Maker is immutable: all reading state is in `Cursor`, which is given
/// to `generate` and returned back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhythmMaker {
    config: MakerConfig,
}
impl RhythmMaker {
    pub fn new(config: MakerConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }
    pub fn config(&self) -> &MakerConfig {
        &self.config
    }

    /// Extra count of division, wrapped by the division weight in talea
    /// units: `0 <= extra < N` or `-N < extra <= 0`, where
    /// `N = max(1, floor(target * denominator))`.
    pub fn extra_count(&self, division: usize, target: Duration) -> i64 {
        let extra = match &self.config.extra_counts {
            Some(extra) if !extra.is_empty() => extra[division % extra.len()],
            _ => return 0,
        };
        let units = target
            .mul_int(self.config.talea.denominator() as i64)
            .floor()
            .max(1);
        match extra < 0 {
            true => -((-extra) % units),
            false => extra % units,
        }
    }

    /// Make divisions for `targets`, continuing from `cursor`.
    ///
    /// Talea end counts, if given, replace the same weight at the end
    /// of the call.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::NonPositiveTarget` if some target is not
    /// positive, `NotatabilityError` if some count can not be written,
    /// `ExhaustedTalea` if the talea is read once only and has not enough
    /// counts. Partial output is discarded.
    pub fn generate(
        &self,
        targets: &[Duration],
        cursor: &Cursor,
    ) -> RhythmResult<(Forest, Cursor)> {
        if let Some(target) = targets.iter().find(|t| !t.is_positive()) {
            return Err(ArithmeticError::NonPositiveTarget(*target).into());
        }
        log::debug!(
            "generate {:?} from {:?}",
            targets.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            cursor
        );
        let mut after = cursor.clone();
        let mut pulled = Vec::with_capacity(targets.len());
        for (idx, target) in targets.iter().enumerate() {
            let index = cursor.divisions_consumed + idx;
            let first = idx == 0;
            let last = idx + 1 == targets.len();
            pulled.push(self.pull_division(index, first, last, *target, &mut after)?);
        }
        self.apply_end_counts(&mut pulled, &mut after);
        let divisions = targets
            .iter()
            .zip_eq(pulled)
            .enumerate()
            .map(|(idx, (target, counts))| {
                plan(
                    cursor.divisions_consumed + idx,
                    *target,
                    &counts,
                    &self.config.spelling,
                    &self.config.ties,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        after.divisions_consumed += targets.len();

        let mut forest = Forest::new(divisions);
        self.apply_masks(&mut forest, &after)?;
        self.rewrite(&mut forest)?;
        let upcoming = self.upcoming_leaf(&after);
        after.open_tie =
            resolve_ties(&mut forest, &self.config.ties, cursor, upcoming.as_ref());
        after.leaves_produced += forest.leaves().count();
        log::debug!("generated {} leaves, cursor: {:?}", forest.leaves().count(), after);
        Ok((forest, after))
    }

    fn read_talea(
        &self,
        weight: Duration,
        cursor: &mut Cursor,
    ) -> Result<Vec<PulledCount>, ExhaustedTalea> {
        let talea = &self.config.talea;
        let pulled = match self.config.read_talea_once_only {
            true => pull_once(talea, weight, cursor)?,
            false => pull(talea, weight, cursor),
        };
        *cursor = pulled.cursor;
        Ok(pulled.counts)
    }

    /// Counts of one division: incise prefix, talea counts and suffix.
    fn pull_division(
        &self,
        index: usize,
        first: bool,
        last: bool,
        target: Duration,
        cursor: &mut Cursor,
    ) -> Result<Vec<PulledCount>, ExhaustedTalea> {
        let extra = self.extra_count(index, target);
        let weight = target + Duration::from_parts(extra, self.config.talea.denominator());
        let Some(incise) = &self.config.incise else {
            return self.read_talea(weight, cursor);
        };

        let incision = incise.carve(index, first, last, weight, cursor);
        let middle = weight - incision.weight();
        let mut counts: Vec<PulledCount> = incision
            .prefix
            .into_iter()
            .map(|duration| PulledCount::new(duration, cursor.next_position()))
            .collect();
        if middle.is_positive() {
            match incise.body {
                InciseBody::Talea => counts.extend(self.read_talea(middle, cursor)?),
                InciseBody::Note => {
                    counts.push(PulledCount::new(middle, cursor.next_position()))
                }
                InciseBody::Rest => {
                    counts.push(PulledCount::new(-middle, cursor.next_position()))
                }
            }
        }
        counts.extend(
            incision
                .suffix
                .into_iter()
                .map(|duration| PulledCount::new(duration, cursor.next_position())),
        );
        Ok(counts)
    }

    /// Replace the tail of the call by talea end counts.
    ///
    /// Division weights stay the same. End counts, heavier than the
    /// whole call, are cut to it. Carry of the talea is dropped: the
    /// count it continues is interrupted by end counts.
    fn apply_end_counts(&self, divisions: &mut Vec<Vec<PulledCount>>, cursor: &mut Cursor) {
        let ends = self.config.talea.end_durations();
        if ends.is_empty() || divisions.is_empty() {
            return;
        }
        let weights: Vec<Duration> = divisions
            .iter()
            .map(|counts| counts.iter().map(|count| count.weight()).sum())
            .collect();
        let total: Duration = weights.iter().copied().sum();
        let ends = fit(ends, total);
        let end_weight: Duration = ends.iter().map(|end| end.abs()).sum();
        let mut counts: Vec<PulledCount> =
            partition(divisions.drain(..).flatten().collect(), &[total - end_weight])
                .into_iter()
                .flatten()
                .collect();
        counts.extend(
            ends.into_iter()
                .map(|duration| PulledCount::new(duration, cursor.next_position())),
        );
        *divisions = partition(counts, &weights);
        cursor.carry = None;
        log::debug!("end counts replaced the last {} of the call", end_weight);
    }

    fn fuse(&self, division: &mut Division, kind: LeafKind) -> Result<(), NotatabilityError> {
        fuse(division, kind, &self.config.spelling, &self.config.ties)
    }

    /// Division masks first: matched division is fused and is not seen
    /// by leaf masks.
    fn apply_masks(&self, forest: &mut Forest, after: &Cursor) -> Result<(), NotatabilityError> {
        let masks = &self.config.masks;
        if masks.is_empty() {
            return Ok(());
        }
        for division in forest.divisions_mut() {
            let division_index = PositionIndex::division(division.index, after.divisions_consumed);
            match masks.division_action(&division_index) {
                None => (),
                Some(MaskAction::Keep) => continue,
                Some(action) => {
                    self.fuse(division, action.resolve(LeafKind::Note))?;
                    continue;
                }
            }
            let division_total = count_positions(division);
            let mut in_division = 0;
            let mut previous = None;
            for leaf in division.leaves_mut() {
                if previous.map_or(false, |p| p != leaf.position) {
                    in_division += 1;
                }
                previous = Some(leaf.position);
                let index = PositionIndex {
                    global: leaf.position,
                    global_total: after.positions_produced,
                    in_division,
                    division_total,
                    ..division_index
                };
                let kind = masks.apply(&index, leaf.kind);
                leaf.set_kind(kind);
            }
        }
        Ok(())
    }

    /// Rest-filled, sustained and trivial divisions, as configured.
    fn rewrite(&self, forest: &mut Forest) -> Result<(), NotatabilityError> {
        let config = &self.config;
        for division in forest.divisions_mut() {
            if config.rewrite_rest_filled && division.is_rest_filled() {
                self.fuse(division, LeafKind::Rest)?;
            } else if config.rewrite_sustained && division.is_sustained() {
                self.fuse(division, LeafKind::Note)?;
            }
            if config.trivialize {
                trivialize(division, &config.spelling);
            }
        }
        Ok(())
    }

    /// First leaf of the call, that continues from `cursor`.
    ///
    /// Duration of the leaf is not known and is left zero. None if the
    /// kind depends on targets of that call: end counts, incise suffix
    /// without prefix, masks counting from the end.
    fn upcoming_leaf(&self, cursor: &Cursor) -> Option<Leaf> {
        let config = &self.config;
        if !config.talea.end_counts().is_empty() {
            return None;
        }
        let index = cursor.divisions_consumed;
        let (kind, position) = self.upcoming_count(index, cursor)?;
        let division_index = PositionIndex::division(index, 0);
        let kind = match config.masks.division_action_without_totals(&division_index)? {
            Some(action) => action.resolve(kind),
            None => {
                let leaf_index = PositionIndex {
                    global: position,
                    ..division_index
                };
                config.masks.apply_without_totals(&leaf_index, kind)?
            }
        };
        Some(Leaf::new(Duration::zero(), kind, position))
    }

    /// Kind and position of the first count of division `index`.
    fn upcoming_count(&self, index: usize, cursor: &Cursor) -> Option<(LeafKind, usize)> {
        let config = &self.config;
        let position = cursor.positions_produced;
        if let Some(incise) = &config.incise {
            if let Some(prefix) = incise.leading_prefix(index, cursor) {
                return Some((LeafKind::from_count_sign(prefix), position));
            }
            if incise.has_suffix(index) {
                return None;
            }
            match incise.body {
                InciseBody::Talea => (),
                InciseBody::Note => return Some((LeafKind::Note, position)),
                InciseBody::Rest => return Some((LeafKind::Rest, position)),
            }
        }
        if let Some(carry) = cursor.carry {
            return Some((LeafKind::from_count_sign(carry.duration), carry.position));
        }
        if config.read_talea_once_only && cursor.counts_read >= config.talea.once_len() {
            return None;
        }
        let count = config.talea.duration_at(cursor.offset);
        Some((LeafKind::from_count_sign(count), position))
    }
}

/// Number of talea counts (logical ties) in the division.
fn count_positions(division: &Division) -> usize {
    division.leaves().iter().map(|leaf| leaf.position).dedup().count()
}

//! Masks turn generated positions into rests, silences or notes,
//! regardless of talea values.
//!
//! Mask is `Pattern` of indices plus `MaskAction`. `MaskSet` checks
//! masks in declaration order: the first matching mask wins, no match
//! leaves the kind unchanged.
//!
//! ```
//! use rhythm_makers::mask::{Mask, MaskAction, MaskSet, Pattern, PositionIndex};
//! use rhythm_makers::primitives::LeafKind;
//!
//! // every third position, starting from the second, is silent.
//! let masks = MaskSet::new(vec![Mask::new(
//!     Pattern::cyclic(vec![1], 3),
//!     MaskAction::Rest,
//! )]);
//! let kinds: Vec<_> = (0..6)
//!     .map(|idx| masks.apply(&PositionIndex::global(idx, 6), LeafKind::Note))
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         LeafKind::Note, LeafKind::Rest, LeafKind::Note,
//!         LeafKind::Note, LeafKind::Rest, LeafKind::Note,
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::{error::ConfigurationError, primitives::LeafKind};

/// Indices, absolute or cyclic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Pattern {
    /// Negative indices count from the end.
    pub indices: Vec<i64>,
    pub period: Option<usize>,
    /// Subtracted from index before matching.
    pub offset: i64,
    pub inverted: bool,
}
impl Default for Pattern {
    /// Pattern, that matches everything.
    fn default() -> Self {
        Self::all()
    }
}
impl Pattern {
    pub fn indices(indices: impl Into<Vec<i64>>) -> Self {
        Self {
            indices: indices.into(),
            period: None,
            offset: 0,
            inverted: false,
        }
    }
    pub fn cyclic(indices: impl Into<Vec<i64>>, period: usize) -> Self {
        Self {
            period: Some(period),
            ..Self::indices(indices)
        }
    }
    pub fn all() -> Self {
        Self::cyclic(vec![0], 1)
    }
    pub fn first(count: usize) -> Self {
        Self::indices((0..count as i64).collect::<Vec<_>>())
    }
    pub fn last(count: usize) -> Self {
        Self::indices((1..=count as i64).rev().map(|i| -i).collect::<Vec<_>>())
    }
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
    pub fn inverted(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let Some(period) = self.period else {
            return Ok(());
        };
        if period == 0 {
            return Err(ConfigurationError::ZeroPeriod);
        }
        let range = -(period as i64)..period as i64;
        match self.indices.iter().find(|idx| !range.contains(idx)) {
            None => Ok(()),
            Some(index) => Err(ConfigurationError::IndexOutOfRange {
                index: *index,
                period,
            }),
        }
    }

    /// Some index counts from the end, so matching needs the total.
    pub fn counts_from_end(&self) -> bool {
        self.period.is_none() && self.indices.iter().any(|idx| *idx < 0)
    }

    /// True if index matches, `total` is used for negative indices.
    pub fn matches(&self, index: usize, total: usize) -> bool {
        let index = index as i64 - self.offset;
        let found = match self.period {
            Some(0) => false,
            Some(period) => {
                let period = period as i64;
                let index = index.rem_euclid(period);
                self.indices
                    .iter()
                    .any(|idx| idx.rem_euclid(period) == index)
            }
            None => self.indices.iter().any(|idx| match *idx < 0 {
                true => total as i64 + idx == index,
                false => *idx == index,
            }),
        };
        found != self.inverted
    }
}

/// What happens with the matched position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskAction {
    Rest,
    Silence,
    /// Make note, even from the rest.
    Sustain,
    /// Leave as is, and hide position from the following masks.
    Keep,
}
impl MaskAction {
    pub fn resolve(&self, kind: LeafKind) -> LeafKind {
        match self {
            Self::Rest => LeafKind::Rest,
            Self::Silence => LeafKind::Silence,
            Self::Sustain => LeafKind::Note,
            Self::Keep => kind,
        }
    }
}

/// Which index mask looks at.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskScope {
    /// Position across all output (and across calls).
    #[default]
    Global,
    /// Position inside its division.
    Division,
    /// Division index: the whole division is rewritten.
    Divisions,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mask {
    pub pattern: Pattern,
    pub action: MaskAction,
    #[serde(default)]
    pub scope: MaskScope,
}
impl Mask {
    pub fn new(pattern: Pattern, action: MaskAction) -> Self {
        Self {
            pattern,
            action,
            scope: MaskScope::Global,
        }
    }
    pub fn rest(pattern: Pattern) -> Self {
        Self::new(pattern, MaskAction::Rest)
    }
    pub fn silence(pattern: Pattern) -> Self {
        Self::new(pattern, MaskAction::Silence)
    }
    pub fn sustain(pattern: Pattern) -> Self {
        Self::new(pattern, MaskAction::Sustain)
    }
    pub fn in_division(mut self) -> Self {
        self.scope = MaskScope::Division;
        self
    }
    pub fn of_divisions(mut self) -> Self {
        self.scope = MaskScope::Divisions;
        self
    }

    pub fn matches(&self, index: &PositionIndex) -> bool {
        let (idx, total) = match self.scope {
            MaskScope::Global => (index.global, index.global_total),
            MaskScope::Division => (index.in_division, index.division_total),
            MaskScope::Divisions => (index.division, index.divisions_total),
        };
        self.pattern.matches(idx, total)
    }
}

/// Indices of one position for every mask scope.
///
/// Totals are used only by negative pattern indices, and are counted
/// in the current call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PositionIndex {
    pub global: usize,
    pub global_total: usize,
    pub in_division: usize,
    pub division_total: usize,
    pub division: usize,
    pub divisions_total: usize,
}
impl PositionIndex {
    pub fn global(global: usize, global_total: usize) -> Self {
        Self {
            global,
            global_total,
            ..Default::default()
        }
    }
    pub fn division(division: usize, divisions_total: usize) -> Self {
        Self {
            division,
            divisions_total,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaskSet {
    masks: Vec<Mask>,
}
impl MaskSet {
    pub fn new(masks: Vec<Mask>) -> Self {
        Self { masks }
    }
    pub fn push(&mut self, mask: Mask) -> &mut Self {
        self.masks.push(mask);
        self
    }
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.masks.iter().try_for_each(|mask| mask.pattern.validate())
    }

    fn first_match<'a>(
        masks: impl Iterator<Item = &'a Mask>,
        index: &PositionIndex,
    ) -> Option<&'a Mask> {
        masks.into_iter().find(|mask| mask.matches(index))
    }

    /// First match for the index, which totals are not known yet.
    ///
    /// None if the answer depends on totals.
    fn first_match_without_totals<'a>(
        masks: impl Iterator<Item = &'a Mask>,
        index: &PositionIndex,
    ) -> Option<Option<&'a Mask>> {
        for mask in masks {
            if mask.pattern.counts_from_end() {
                return None;
            }
            if mask.matches(index) {
                return Some(Some(mask));
            }
        }
        Some(None)
    }

    fn leaf_masks(&self) -> impl Iterator<Item = &Mask> {
        self.masks
            .iter()
            .filter(|mask| mask.scope != MaskScope::Divisions)
    }
    fn division_masks(&self) -> impl Iterator<Item = &Mask> {
        self.masks
            .iter()
            .filter(|mask| mask.scope == MaskScope::Divisions)
    }

    /// Resolve kind of leaf-level position (Global and Division scopes).
    pub fn apply(&self, index: &PositionIndex, kind: LeafKind) -> LeafKind {
        match Self::first_match(self.leaf_masks(), index) {
            None => kind,
            Some(mask) => mask.action.resolve(kind),
        }
    }

    /// Action of the first division mask, matching division index.
    pub fn division_action(&self, index: &PositionIndex) -> Option<MaskAction> {
        Self::first_match(self.division_masks(), index).map(|mask| mask.action)
    }

    /// `apply` to the position of the call, that is not made yet.
    ///
    /// None if some mask counts from the end of the call.
    pub fn apply_without_totals(&self, index: &PositionIndex, kind: LeafKind) -> Option<LeafKind> {
        let found = Self::first_match_without_totals(self.leaf_masks(), index)?;
        Some(found.map_or(kind, |mask| mask.action.resolve(kind)))
    }

    /// `division_action` for the division of the call, that is not made yet.
    pub fn division_action_without_totals(
        &self,
        index: &PositionIndex,
    ) -> Option<Option<MaskAction>> {
        let found = Self::first_match_without_totals(self.division_masks(), index)?;
        Some(found.map(|mask| mask.action))
    }
}

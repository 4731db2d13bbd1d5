//! Ties between leaves, after masks are applied.
//!
//! Inside a division leaves of one talea count (one position) form a
//! chain. Across division boundary leaves are tied by
//! `CrossDivisionTies`. Forced ties are applied last and override both.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    primitives::{leaf::tie_pair, Forest, Leaf, LeafKind},
    talea::Cursor,
};

/// How leaves are tied across division boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossDivisionTies {
    Forbid,
    /// Tie only pieces of the count, split by the boundary.
    #[default]
    SplitNotes,
    /// Tie every note to the note of the next division.
    All,
}
impl From<bool> for CrossDivisionTies {
    fn from(value: bool) -> Self {
        match value {
            true => Self::All,
            false => Self::Forbid,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TiePolicy {
    pub across_divisions: CrossDivisionTies,
    /// Global leaf indices, tied to the following leaf of the same kind.
    pub force: BTreeSet<usize>,
    /// Tie chains of rests and silences as well.
    pub tie_rests: bool,
}
impl From<CrossDivisionTies> for TiePolicy {
    fn from(across_divisions: CrossDivisionTies) -> Self {
        Self {
            across_divisions,
            ..Default::default()
        }
    }
}
impl TiePolicy {
    pub fn forbid() -> Self {
        Self {
            across_divisions: CrossDivisionTies::Forbid,
            ..Default::default()
        }
    }
    pub fn force(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.force.extend(indices);
        self
    }

    fn chains(&self, kind: LeafKind) -> bool {
        kind.is_sounding() || self.tie_rests
    }

    /// State of the boundary between two leaves.
    pub fn boundary(&self, left: &LeafRef, right: &LeafRef) -> BoundaryState {
        if self.force.contains(&left.index) && left.leaf.kind == right.leaf.kind {
            return BoundaryState::Open;
        }
        let same_count = left.leaf.position == right.leaf.position;
        let open = match left.division == right.division {
            true => {
                same_count && left.leaf.kind == right.leaf.kind && self.chains(left.leaf.kind)
            }
            false => {
                let notes = left.leaf.is_note() && right.leaf.is_note();
                match self.across_divisions {
                    CrossDivisionTies::Forbid => false,
                    CrossDivisionTies::SplitNotes => notes && same_count,
                    CrossDivisionTies::All => notes,
                }
            }
        };
        match open {
            true => BoundaryState::Open,
            false => BoundaryState::Closed,
        }
    }
}

/// Tie state between two adjacent leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryState {
    Open,
    Closed,
}

/// Leaf with its place in the forest.
#[derive(Debug, Clone, Copy)]
pub struct LeafRef<'a> {
    pub leaf: &'a Leaf,
    /// Index of division in the forest.
    pub division: usize,
    /// Global leaf index.
    pub index: usize,
}

/// Re-tie all leaves of the forest.
///
/// `before` is the cursor at the start of the call: it gives global leaf
/// indices and the tie from the previous call. `upcoming` is the first
/// leaf of the next call, if it is known: the last leaf is tied to it by
/// the same rules as any other division boundary.
///
/// # Returns
///
/// true if the last leaf is tied forward to the next call.
pub fn resolve_ties(
    forest: &mut Forest,
    policy: &TiePolicy,
    before: &Cursor,
    upcoming: Option<&Leaf>,
) -> bool {
    let first_index = before.leaves_produced;
    let refs: Vec<LeafRef> = forest
        .iter()
        .enumerate()
        .flat_map(|(division, div)| {
            div.leaves().iter().map(move |leaf| (division, leaf))
        })
        .enumerate()
        .map(|(idx, (division, leaf))| LeafRef {
            leaf,
            division,
            index: first_index + idx,
        })
        .collect();
    let states: Vec<BoundaryState> = refs
        .iter()
        .tuple_windows()
        .map(|(left, right)| policy.boundary(left, right))
        .collect();
    let opens = match (refs.last(), upcoming) {
        (None, _) => before.open_tie,
        (Some(_), None) => false,
        (Some(last), Some(leaf)) => {
            let next = LeafRef {
                leaf,
                division: last.division + 1,
                index: last.index + 1,
            };
            policy.boundary(last, &next) == BoundaryState::Open
        }
    };

    let mut leaves: Vec<&mut Leaf> = forest.leaves_mut().collect();
    leaves.iter_mut().for_each(|leaf| {
        leaf.untie();
    });
    for (idx, state) in states.into_iter().enumerate() {
        if state == BoundaryState::Open {
            let (head, tail) = leaves.split_at_mut(idx + 1);
            tie_pair(&mut *head[idx], &mut *tail[0]);
        }
    }
    if let Some(first) = leaves.first_mut() {
        first.tie.to_previous = before.open_tie;
    }
    if let Some(last) = leaves.last_mut() {
        last.tie.to_next = opens;
    }
    log::debug!("ties resolved, tied to the next call: {}", opens);
    opens
}

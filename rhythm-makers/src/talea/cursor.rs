use serde::{Deserialize, Serialize};

use crate::primitives::Duration;

/// Part of talea count, that did not fit into the previous division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Carry {
    /// Signed: negative is rest.
    pub duration: Duration,
    /// Position of the count, that was split.
    pub position: usize,
}

/// Read state of the maker, held by caller between calls.
///
/// Empty (default) cursor starts from the beginning of talea.
/// The cursor returned by `RhythmMaker::generate` continues exactly
/// where the call stopped, so splitting targets between calls does
/// not change the rhythm.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Cursor {
    /// Index of the next count in `preamble ++ counts`, wrapped by
    /// counts length after the preamble.
    pub offset: usize,
    pub carry: Option<Carry>,
    /// Talea counts read so far, preamble included.
    pub counts_read: usize,
    pub divisions_consumed: usize,
    /// Talea counts (and incise counts) produced so far.
    pub positions_produced: usize,
    pub leaves_produced: usize,
    pub prefix_offset: usize,
    pub suffix_offset: usize,
    /// The last leaf of the previous call is tied forward.
    pub open_tie: bool,
}
impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
    /// Take the next position index.
    pub fn next_position(&mut self) -> usize {
        let position = self.positions_produced;
        self.positions_produced += 1;
        position
    }
}

//! Talea: cyclic pattern of counts, and reading it by weight.
//!
//! Talea is read by `pull`, which takes counts until the requested
//! weight is filled. The count, that does not fit, is split: the head
//! stays in the current division, the rest is kept in `Cursor` as
//! `Carry` and opens the next pull.
//!
//! ```
//! use rhythm_makers::primitives::Duration;
//! use rhythm_makers::talea::{pull, Cursor, Talea};
//!
//! let talea = Talea::new(vec![3, -1], 4).unwrap();
//! let half = Duration::new(1, 2).unwrap();
//! let first = pull(&talea, half, &Cursor::new());
//! assert_eq!(first.signed_durations(), vec![half]);
//! let carry = first.cursor.carry.unwrap();
//! assert_eq!(carry.duration, Duration::new(1, 4).unwrap());
//!
//! let second = pull(&talea, half, &first.cursor);
//! assert_eq!(
//!     second.signed_durations(),
//!     vec![Duration::new(1, 4).unwrap(), Duration::new(-1, 4).unwrap()]
//! );
//! assert!(second.counts[0].continued);
//! assert_eq!(second.cursor.carry, None);
//! ```

pub mod cursor;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigurationError, ExhaustedTalea},
    primitives::{Duration, LeafKind},
};

pub use cursor::{Carry, Cursor};

/// Signed counts over common denominator, read cyclically after the
/// (optional) preamble, which is read only once.
///
/// `end_counts` replace the tail of every call: see
/// `RhythmMaker::generate`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Talea {
    counts: Vec<i64>,
    denominator: u64,
    #[serde(default)]
    preamble: Vec<i64>,
    #[serde(default)]
    end_counts: Vec<i64>,
}
impl Default for Talea {
    fn default() -> Self {
        Self {
            counts: vec![1],
            denominator: 16,
            preamble: Vec::new(),
            end_counts: Vec::new(),
        }
    }
}
impl Talea {
    pub fn new(
        counts: impl Into<Vec<i64>>,
        denominator: u64,
    ) -> Result<Self, ConfigurationError> {
        let talea = Self {
            counts: counts.into(),
            denominator,
            ..Default::default()
        };
        talea.validate()?;
        Ok(talea)
    }
    pub fn with_preamble(
        mut self,
        preamble: impl Into<Vec<i64>>,
    ) -> Result<Self, ConfigurationError> {
        self.preamble = preamble.into();
        self.validate()?;
        Ok(self)
    }
    pub fn with_end_counts(
        mut self,
        end_counts: impl Into<Vec<i64>>,
    ) -> Result<Self, ConfigurationError> {
        self.end_counts = end_counts.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.counts.is_empty() {
            return Err(ConfigurationError::EmptyTalea);
        }
        if self.denominator == 0 {
            return Err(ConfigurationError::ZeroDenominator("talea"));
        }
        check_counts(&self.counts, "talea counts")?;
        check_counts(&self.preamble, "talea preamble")?;
        check_counts(&self.end_counts, "talea end counts")
    }

    pub fn counts(&self) -> &[i64] {
        &self.counts
    }
    pub fn preamble(&self) -> &[i64] {
        &self.preamble
    }
    pub fn end_counts(&self) -> &[i64] {
        &self.end_counts
    }
    /// Signed durations of end counts.
    pub fn end_durations(&self) -> Vec<Duration> {
        self.end_counts
            .iter()
            .map(|count| Duration::from_parts(*count, self.denominator))
            .collect()
    }
    pub fn denominator(&self) -> u64 {
        self.denominator
    }
    pub fn len(&self) -> usize {
        self.counts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
    /// Counts of `preamble ++ counts`, read without repetition.
    pub fn once_len(&self) -> usize {
        self.preamble.len() + self.counts.len()
    }
    /// Weight of one cycle: rests and preamble make no difference.
    pub fn period(&self) -> u64 {
        self.counts.iter().map(|c| c.unsigned_abs()).sum()
    }
    /// Duration of count `1`.
    pub fn unit(&self) -> Duration {
        Duration::from_parts(1, self.denominator)
    }

    /// Count at index of `preamble ++ counts ++ counts ++ ...`.
    pub fn get(&self, offset: usize) -> i64 {
        match offset.checked_sub(self.preamble.len()) {
            None => self.preamble[offset],
            Some(idx) => self.counts[idx % self.counts.len()],
        }
    }
    /// Signed duration at offset.
    pub fn duration_at(&self, offset: usize) -> Duration {
        Duration::from_parts(self.get(offset), self.denominator)
    }
    /// Offset of the next count, wrapped to the counts cycle.
    pub fn advance(&self, offset: usize) -> usize {
        let preamble = self.preamble.len();
        match (offset + 1).checked_sub(preamble) {
            None | Some(0) => offset + 1,
            Some(idx) => preamble + idx % self.counts.len(),
        }
    }
}

pub(crate) fn check_counts(
    counts: &[i64],
    source_name: &'static str,
) -> Result<(), ConfigurationError> {
    match counts.iter().position(|c| *c == 0) {
        None => Ok(()),
        Some(index) => Err(ConfigurationError::ZeroCount { source_name, index }),
    }
}

/// One count (or piece of count), pulled for a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PulledCount {
    /// Signed: negative is rest.
    pub duration: Duration,
    pub position: usize,
    /// Continues count, split by the previous division.
    pub continued: bool,
    /// Rest of count is carried to the next division.
    pub split: bool,
}
impl PulledCount {
    pub fn new(duration: Duration, position: usize) -> Self {
        Self {
            duration,
            position,
            continued: false,
            split: false,
        }
    }
    pub fn kind(&self) -> LeafKind {
        LeafKind::from_count_sign(self.duration)
    }
    pub fn weight(&self) -> Duration {
        self.duration.abs()
    }
}

/// Result of `pull`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaleaPull {
    pub counts: Vec<PulledCount>,
    pub cursor: Cursor,
}
impl TaleaPull {
    pub fn signed_durations(&self) -> Vec<Duration> {
        self.counts.iter().map(|c| c.duration).collect()
    }
    pub fn weight(&self) -> Duration {
        self.counts.iter().map(|c| c.weight()).sum()
    }
}

/// Split signed `count` by weight.
///
/// # Returns
/// (head, tail), where head is not heavier than `weight`, and tail is
/// the signed remainder, if any.
pub(crate) fn cut(count: Duration, weight: Duration) -> (Duration, Option<Duration>) {
    if count.abs() <= weight {
        return (count, None);
    }
    let tail = count.abs() - weight;
    match count.is_negative() {
        true => (-weight, Some(-tail)),
        false => (weight, Some(tail)),
    }
}

/// Read talea from cursor, until `target` weight is filled.
///
/// Never overshoots: the last count is split and its remainder
/// is carried in the returned cursor.
pub fn pull(talea: &Talea, target: Duration, cursor: &Cursor) -> TaleaPull {
    let mut cursor = cursor.clone();
    let mut counts = Vec::new();
    let mut remaining = target;
    if let Some(carry) = cursor.carry.take() {
        if remaining.is_positive() {
            let (head, tail) = cut(carry.duration, remaining);
            remaining -= head.abs();
            counts.push(PulledCount {
                duration: head,
                position: carry.position,
                continued: true,
                split: tail.is_some(),
            });
            cursor.carry = tail.map(|duration| Carry {
                duration,
                position: carry.position,
            });
        } else {
            cursor.carry = Some(carry);
        }
    }
    while remaining.is_positive() {
        let count = talea.duration_at(cursor.offset);
        cursor.offset = talea.advance(cursor.offset);
        cursor.counts_read += 1;
        let position = cursor.next_position();
        let (head, tail) = cut(count, remaining);
        remaining -= head.abs();
        let mut pulled = PulledCount::new(head, position);
        pulled.split = tail.is_some();
        counts.push(pulled);
        cursor.carry = tail.map(|duration| Carry { duration, position });
    }
    log::debug!(
        "pulled {:?} for {}, offset: {}, carry: {:?}",
        counts.iter().map(|c| c.duration.to_string()).collect::<Vec<_>>(),
        target,
        cursor.offset,
        cursor.carry
    );
    TaleaPull { counts, cursor }
}

/// `pull` from the talea, that is not repeated.
///
/// # Errors
///
/// `ExhaustedTalea` if `preamble ++ counts` has not enough weight left.
pub fn pull_once(
    talea: &Talea,
    target: Duration,
    cursor: &Cursor,
) -> Result<TaleaPull, ExhaustedTalea> {
    let pulled = pull(talea, target, cursor);
    match pulled.cursor.counts_read > talea.once_len() {
        true => Err(ExhaustedTalea {
            length: talea.once_len(),
            requested: pulled.cursor.counts_read,
        }),
        false => Ok(pulled),
    }
}

/// Cut counts into groups of the given weights.
///
/// Count, that crosses the group border, is split, and its pieces keep
/// the position. Counts, that do not fit into `weights`, are dropped.
pub(crate) fn partition(counts: Vec<PulledCount>, weights: &[Duration]) -> Vec<Vec<PulledCount>> {
    let mut counts = counts.into_iter();
    let mut pending: Option<PulledCount> = None;
    weights
        .iter()
        .map(|weight| {
            let mut remaining = *weight;
            let mut group = Vec::new();
            while remaining.is_positive() {
                let Some(count) = pending.take().or_else(|| counts.next()) else {
                    break;
                };
                let (head, tail) = cut(count.duration, remaining);
                remaining -= head.abs();
                group.push(PulledCount {
                    duration: head,
                    split: count.split || tail.is_some(),
                    ..count
                });
                pending = tail.map(|duration| PulledCount {
                    duration,
                    continued: true,
                    ..count
                });
            }
            group
        })
        .collect()
}

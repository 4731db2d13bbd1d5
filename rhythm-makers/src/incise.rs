//! Incision: fixed prefix and suffix counts at the edges of divisions.
//!
//! Prefixes and suffixes are read from their own cyclic taleas, and
//! `prefix_counts` (`suffix_counts`) tells how many values the division
//! of the given index takes. The rest of the division is filled by
//! `InciseBody`.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigurationError,
    primitives::Duration,
    talea::{check_counts, Cursor},
};

/// What fills the division between prefix and suffix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InciseBody {
    /// Counts of the maker talea.
    #[default]
    Talea,
    /// One note.
    Note,
    /// One rest.
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Incise {
    /// Signed prefix values, negative are rests.
    pub prefix_talea: Vec<i64>,
    /// Number of prefix values for every division, cyclic.
    pub prefix_counts: Vec<usize>,
    pub suffix_talea: Vec<i64>,
    pub suffix_counts: Vec<usize>,
    #[derivative(Default(value = "16"))]
    pub denominator: u64,
    pub body: InciseBody,
    /// Prefix only the first division of the call, suffix only the last.
    pub outer_divisions_only: bool,
}

/// Signed durations, cut from the edges of one division.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Incision {
    pub prefix: Vec<Duration>,
    pub suffix: Vec<Duration>,
}
impl Incision {
    pub fn weight(&self) -> Duration {
        self.prefix
            .iter()
            .chain(self.suffix.iter())
            .map(|d| d.abs())
            .sum()
    }
}

impl Incise {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.denominator == 0 {
            return Err(ConfigurationError::ZeroDenominator("incise"));
        }
        if self.prefix_talea.is_empty() != self.prefix_counts.is_empty() {
            return Err(ConfigurationError::InciseCounts("prefix"));
        }
        if self.suffix_talea.is_empty() != self.suffix_counts.is_empty() {
            return Err(ConfigurationError::InciseCounts("suffix"));
        }
        check_counts(&self.prefix_talea, "incise prefix")?;
        check_counts(&self.suffix_talea, "incise suffix")
    }

    fn read(
        &self,
        talea: &[i64],
        counts: &[usize],
        division: usize,
        offset: &mut usize,
    ) -> Vec<Duration> {
        if counts.is_empty() || talea.is_empty() {
            return Vec::new();
        }
        let amount = counts[division % counts.len()];
        (0..amount)
            .map(|_| {
                let count = talea[*offset % talea.len()];
                *offset = (*offset + 1) % talea.len();
                Duration::from_parts(count, self.denominator)
            })
            .collect()
    }

    /// Cut prefix and suffix of division with the given weight.
    ///
    /// `first` and `last` tell if division is at the edge of the call.
    /// Offsets of both taleas are advanced in `cursor`.
    pub fn carve(
        &self,
        division: usize,
        first: bool,
        last: bool,
        weight: Duration,
        cursor: &mut Cursor,
    ) -> Incision {
        let mut incision = Incision::default();
        if !self.outer_divisions_only || first {
            let prefix = self.read(
                &self.prefix_talea,
                &self.prefix_counts,
                division,
                &mut cursor.prefix_offset,
            );
            incision.prefix = fit(prefix, weight);
        }
        if !self.outer_divisions_only || last {
            let suffix = self.read(
                &self.suffix_talea,
                &self.suffix_counts,
                division,
                &mut cursor.suffix_offset,
            );
            incision.suffix = fit(suffix, weight - incision.weight());
        }
        incision
    }

    /// First prefix value of division `division`, when it opens a call.
    pub fn leading_prefix(&self, division: usize, cursor: &Cursor) -> Option<Duration> {
        if self.prefix_talea.is_empty() || self.prefix_counts.is_empty() {
            return None;
        }
        match self.prefix_counts[division % self.prefix_counts.len()] {
            0 => None,
            _ => {
                let count = self.prefix_talea[cursor.prefix_offset % self.prefix_talea.len()];
                Some(Duration::from_parts(count, self.denominator))
            }
        }
    }

    /// Division `division` takes suffix values, if it is carved as last.
    pub fn has_suffix(&self, division: usize) -> bool {
        !self.suffix_talea.is_empty()
            && !self.suffix_counts.is_empty()
            && self.suffix_counts[division % self.suffix_counts.len()] > 0
    }
}

/// Take signed values while they fit into `weight`, cutting the last one.
pub(crate) fn fit(values: Vec<Duration>, weight: Duration) -> Vec<Duration> {
    let mut remaining = weight;
    let mut fitted = Vec::with_capacity(values.len());
    for value in values {
        if !remaining.is_positive() {
            break;
        }
        let head = match value.abs() <= remaining {
            true => value,
            false if value.is_negative() => -remaining,
            false => remaining,
        };
        remaining -= head.abs();
        fitted.push(head);
    }
    fitted
}

//! Spelling of durations by written leaves.
//!
//! Any positive duration with a power-of-two denominator (not smaller
//! than the smallest written unit) can be spelled as a chain of tied
//! written values: `5/16` is `1/4 ~ 1/16`, `7/8` is a double dotted half.
//!
//! ```
//! use rhythm_makers::primitives::{Duration, LeafKind};
//! use rhythm_makers::spelling::{decompose, Spelling};
//! use rhythm_makers::tie::TiePolicy;
//!
//! let spelling = Spelling { max_dots: 0, ..Default::default() };
//! let leaves = decompose(
//!     Duration::new(5, 16).unwrap(),
//!     LeafKind::Note,
//!     &spelling,
//!     &TiePolicy::default(),
//!     0,
//! )
//! .unwrap();
//! let durations: Vec<_> = leaves.iter().map(|l| l.duration.to_string()).collect();
//! assert_eq!(durations, vec!["1/4", "1/16"]);
//! assert!(leaves[0].tie.to_next && leaves[1].tie.to_previous);
//! ```

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigurationError, NotatabilityError},
    primitives::{
        fraction_tools::{is_notatable, is_power_of_two, split_written},
        leaf::tie_chain,
        Duration, Leaf, LeafKind, LIMIT_DENOMINATOR,
    },
    tie::TiePolicy,
};

/// Which written values leaves may take.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Spelling {
    #[derivative(Default(value = "2"))]
    pub max_dots: u32,
    /// Denominator of the shortest written value.
    #[derivative(Default(value = "LIMIT_DENOMINATOR"))]
    pub smallest_denominator: u64,
    /// Write the shortest value first.
    pub increase_monotonic: bool,
    /// Notes are written strictly shorter than this.
    pub forbidden_note_duration: Option<Duration>,
    /// Rests are written strictly shorter than this.
    pub forbidden_rest_duration: Option<Duration>,
    /// Containers shrink written values with `Some(true)` (multiplier
    /// below 1) and stretch them with `Some(false)`. The nearest written
    /// values are taken otherwise.
    pub diminution: Option<bool>,
}
impl Spelling {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !is_power_of_two(self.smallest_denominator) {
            return Err(ConfigurationError::SmallestDenominator(
                self.smallest_denominator,
            ));
        }
        let smallest = self.smallest();
        [self.forbidden_note_duration, self.forbidden_rest_duration]
            .into_iter()
            .flatten()
            .find(|forbidden| *forbidden <= smallest)
            .map_or(Ok(()), |forbidden| {
                Err(ConfigurationError::ForbiddenDuration {
                    forbidden,
                    smallest_denominator: self.smallest_denominator,
                })
            })
    }

    /// Shortest written value.
    pub fn smallest(&self) -> Duration {
        Duration::from_parts(1, self.smallest_denominator)
    }

    pub fn forbidden(&self, kind: LeafKind) -> Option<Duration> {
        match kind {
            LeafKind::Note => self.forbidden_note_duration,
            LeafKind::Rest | LeafKind::Silence => self.forbidden_rest_duration,
        }
    }

    /// Duration is one written value of leaf of the `kind`.
    pub fn is_written(&self, duration: Duration, kind: LeafKind) -> bool {
        is_notatable(duration, self.max_dots, self.smallest_denominator)
            && self.forbidden(kind).map_or(true, |forbidden| duration < forbidden)
    }
}

/// Spell `duration` as a chain of leaves of the same position.
///
/// Zero duration gives no leaves. Note chains are tied, rest (and
/// silence) chains only if `ties.tie_rests` is set.
///
/// # Errors
///
/// `NotatabilityError::BelowResolution` if something, shorter than the
/// smallest unit, remains after the greedy split.
pub fn decompose(
    duration: Duration,
    kind: LeafKind,
    spelling: &Spelling,
    ties: &TiePolicy,
    position: usize,
) -> Result<Vec<Leaf>, NotatabilityError> {
    let duration = duration.abs();
    if duration.is_zero() {
        return Ok(Vec::new());
    }
    let (mut written, remainder) = split_written(
        duration,
        spelling.max_dots,
        spelling.smallest_denominator,
        spelling.forbidden(kind),
    );
    if !remainder.is_zero() {
        return Err(match remainder < spelling.smallest() {
            true => NotatabilityError::BelowResolution {
                duration,
                remainder,
                smallest_denominator: spelling.smallest_denominator,
            },
            false => NotatabilityError::NoCandidate {
                duration,
                remainder,
            },
        });
    }
    if spelling.increase_monotonic {
        written.reverse();
    }
    log::trace!(
        "decomposed {} {:?} into {:?}",
        duration,
        kind,
        written.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
    let mut leaves: Vec<Leaf> = written
        .into_iter()
        .map(|written| Leaf::new(written, kind, position))
        .collect();
    if kind.is_sounding() || ties.tie_rests {
        tie_chain(&mut leaves);
    }
    Ok(leaves)
}

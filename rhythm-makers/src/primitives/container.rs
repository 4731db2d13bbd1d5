use serde::{Deserialize, Serialize};

use super::{Duration, Leaf, LeafKind};

/// Tuplet-like container: scales written durations of its leaves.
///
/// # Example
/// ```
/// # use rhythm_makers::primitives::{Container, Duration};
/// let d = |n, d| Duration::new(n, d).unwrap();
/// // three eights in the time of two.
/// let triplet = Container::from_durations(d(1, 4), d(3, 8)).unwrap();
/// assert_eq!(triplet.multiplier(), d(2, 3));
/// assert_eq!(triplet.ratio(), (3, 2));
/// assert_eq!(triplet.sounding(d(1, 8)), d(1, 12));
/// assert_eq!(Container::from_durations(d(1, 4), d(2, 8)), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Container {
    multiplier: Duration,
}
impl Container {
    /// Container, that makes `written` sound as `target`.
    ///
    /// None if no container is needed (or if `written` is empty).
    pub fn from_durations(target: Duration, written: Duration) -> Option<Self> {
        let multiplier = target.checked_div(written).ok()?;
        match multiplier == Duration::from_integer(1) {
            true => None,
            false => Some(Self { multiplier }),
        }
    }
    pub fn multiplier(&self) -> Duration {
        self.multiplier
    }
    /// Tuplet ratio as (written units : sounding units), e.g. 3:2 for
    /// triplets.
    pub fn ratio(&self) -> (u64, u64) {
        let (num, den) = self.multiplier.to_reduced_form();
        (den, num.unsigned_abs())
    }
    /// Ratio, spelled "n in the time of `denominator`" when `denominator`
    /// is a multiple of the reduced one. Otherwise the reduced ratio.
    pub fn ratio_with_denominator(&self, denominator: u64) -> (u64, u64) {
        let (written, sounding) = self.ratio();
        if denominator == 0 || denominator % sounding != 0 {
            return (written, sounding);
        }
        match written.checked_mul(denominator / sounding) {
            Some(scaled) => (scaled, denominator),
            None => (written, sounding),
        }
    }
    pub fn sounding(&self, written: Duration) -> Duration {
        written * self.multiplier
    }
    /// Multiplier is strictly between 1/2 and 2.
    pub fn is_normalized(&self) -> bool {
        self.multiplier > Duration::from_parts(1, 2)
            && self.multiplier < Duration::from_integer(2)
    }
}

/// Leaves, that fill exactly one target duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    /// Global index of division (counts previous calls).
    pub index: usize,
    pub target: Duration,
    pub leaves: Vec<Leaf>,
    pub container: Option<Container>,
}
impl Division {
    pub fn new(
        index: usize,
        target: Duration,
        leaves: Vec<Leaf>,
        container: Option<Container>,
    ) -> Self {
        Self {
            index,
            target,
            leaves,
            container,
        }
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }
    pub fn leaves_mut(&mut self) -> &mut Vec<Leaf> {
        &mut self.leaves
    }
    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Multiplier of container, or 1.
    pub fn multiplier(&self) -> Duration {
        self.container
            .map(|c| c.multiplier())
            .unwrap_or_else(|| Duration::from_integer(1))
    }
    pub fn written_duration(&self) -> Duration {
        self.leaves.iter().map(|leaf| leaf.duration).sum()
    }
    pub fn sounding_duration(&self) -> Duration {
        self.written_duration() * self.multiplier()
    }
    /// Sum of leaves, scaled by container, equals target.
    pub fn is_exact(&self) -> bool {
        self.sounding_duration() == self.target
    }

    /// Container ratio, which sounding part counts target in units of
    /// `1/unit_denominator`, when target is a whole number of them.
    pub fn ratio_in_units(&self, unit_denominator: u64) -> Option<(u64, u64)> {
        let container = self.container?;
        let units = self.target.mul_int(unit_denominator as i64);
        match units.is_integer() {
            true => Some(container.ratio_with_denominator(units.numerator().unsigned_abs())),
            false => Some(container.ratio()),
        }
    }

    /// Every leaf is a rest.
    pub fn is_rest_filled(&self) -> bool {
        !self.leaves.is_empty()
            && self.leaves.iter().all(|leaf| leaf.kind == LeafKind::Rest)
    }
    /// Every leaf is a note of one talea count.
    pub fn is_sustained(&self) -> bool {
        match self.leaves.first() {
            None => false,
            Some(first) => self
                .leaves
                .iter()
                .all(|leaf| leaf.kind == LeafKind::Note && leaf.position == first.position),
        }
    }
    pub fn first_leaf(&self) -> Option<&Leaf> {
        self.leaves.first()
    }
    pub fn last_leaf(&self) -> Option<&Leaf> {
        self.leaves.last()
    }
    pub fn kinds(&self) -> impl Iterator<Item = LeafKind> + '_ {
        self.leaves.iter().map(|leaf| leaf.kind)
    }
}

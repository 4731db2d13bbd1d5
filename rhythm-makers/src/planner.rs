//! Turning pulled counts into a written Division.
//!
//! Counts, which denominators are not powers of two, can not be
//! written directly. They are written by the nearest power-of-two
//! values and are put into a container, which restores the sounding
//! durations: twelfths become eighths under `2/3`. If counts do not sum
//! to the target (extra counts), the container covers the difference.

use crate::{
    error::NotatabilityError,
    primitives::{
        fraction_tools::{is_power_of_two, lcm, power_of_two_floor},
        Container, Division, Duration, LeafKind,
    },
    spelling::{decompose, Spelling},
    talea::PulledCount,
    tie::TiePolicy,
};

/// Written durations of counts, before container normalization.
///
/// # Example
/// ```
/// # use rhythm_makers::primitives::Duration;
/// # use rhythm_makers::planner::written_durations;
/// let d = |n, d| Duration::new(n, d).unwrap();
/// assert_eq!(
///     written_durations(&[d(1, 12), d(1, 6)]),
///     vec![d(1, 8), d(1, 4)]
/// );
/// assert_eq!(written_durations(&[d(3, 16)]), vec![d(3, 16)]);
/// ```
pub fn written_durations(tentative: &[Duration]) -> Vec<Duration> {
    let common = tentative
        .iter()
        .map(|d| d.denominator())
        .fold(1, lcm);
    if is_power_of_two(common) {
        return tentative.to_vec();
    }
    let scale = Duration::from_parts(common as i64, power_of_two_floor(common));
    tentative.iter().map(|d| *d * scale).collect()
}

/// Power of two, that brings `target / (written * factor)` into `(1/2, 2)`.
fn normalizing_factor(target: Duration, written: Duration) -> Duration {
    let mut factor = Duration::from_integer(1);
    if !written.is_positive() {
        return factor;
    }
    let two = Duration::from_integer(2);
    let half = Duration::from_parts(1, 2);
    while target >= (written * factor).mul_int(2) {
        factor = factor * two;
    }
    while target.mul_int(2) <= written * factor {
        factor = factor * half;
    }
    factor
}

/// Normalizing factor, turned to diminution (`Some(true)`) or
/// augmentation (`Some(false)`) when the container is needed.
fn directed_factor(target: Duration, written: Duration, diminution: Option<bool>) -> Duration {
    let factor = normalizing_factor(target, written);
    let written = written * factor;
    match diminution {
        Some(true) if target > written => factor.mul_int(2),
        Some(false) if target < written => factor * Duration::from_parts(1, 2),
        _ => factor,
    }
}

/// Make division of `target` from pulled counts.
///
/// Sounding duration of the result always equals `target`.
///
/// # Errors
///
/// `NotatabilityError` if some written count can not be spelled.
pub fn plan(
    index: usize,
    target: Duration,
    counts: &[PulledCount],
    spelling: &Spelling,
    ties: &TiePolicy,
) -> Result<Division, NotatabilityError> {
    let tentative: Vec<Duration> = counts.iter().map(|c| c.weight()).collect();
    let written = written_durations(&tentative);
    let written_sum: Duration = written.iter().copied().sum();
    let factor = directed_factor(target, written_sum, spelling.diminution);

    let mut leaves = Vec::new();
    for (count, written) in counts.iter().zip(written) {
        leaves.extend(decompose(
            written * factor,
            count.kind(),
            spelling,
            ties,
            count.position,
        )?);
    }
    let container = Container::from_durations(target, written_sum * factor);
    log::debug!(
        "planned division {} of {}: {} leaves, container: {:?}",
        index,
        target,
        leaves.len(),
        container.map(|c| c.ratio())
    );
    Ok(Division::new(index, target, leaves, container))
}

/// Rewrite division as one chain of `kind`, without container.
///
/// Target, that can not be written without container (e.g. `1/3`),
/// keeps the container and is written by the current written duration.
/// Position of the chain is the position of the first leaf.
pub fn fuse(
    division: &mut Division,
    kind: LeafKind,
    spelling: &Spelling,
    ties: &TiePolicy,
) -> Result<(), NotatabilityError> {
    let position = division.first_leaf().map_or(0, |leaf| leaf.position);
    division.leaves = match decompose(division.target, kind, spelling, ties, position) {
        Ok(leaves) => {
            division.container = None;
            leaves
        }
        Err(_) => decompose(
            division.written_duration(),
            kind,
            spelling,
            ties,
            position,
        )?,
    };
    log::debug!("fused division {} into {:?}", division.index, kind);
    Ok(())
}

/// Drop the container, if every leaf can be written by its sounding
/// duration.
///
/// # Returns
///
/// true if the division was rewritten.
pub fn trivialize(division: &mut Division, spelling: &Spelling) -> bool {
    let Some(container) = division.container else {
        return false;
    };
    let trivial = division
        .leaves()
        .iter()
        .all(|leaf| spelling.is_written(container.sounding(leaf.duration), leaf.kind));
    if !trivial {
        return false;
    }
    for leaf in division.leaves_mut() {
        leaf.duration = container.sounding(leaf.duration);
    }
    division.container = None;
    log::debug!("trivialized division {}", division.index);
    true
}

#[cfg(test)]
mod tests {
    use crate::{
        primitives::{Duration, LeafKind},
        spelling::Spelling,
        talea::PulledCount,
        tie::TiePolicy,
    };

    use super::{directed_factor, fuse, normalizing_factor, plan, trivialize};

    fn d(num: i64, den: i64) -> Duration {
        Duration::new(num, den).unwrap()
    }

    fn counts(durations: &[Duration]) -> Vec<PulledCount> {
        durations
            .iter()
            .enumerate()
            .map(|(idx, d)| PulledCount::new(*d, idx))
            .collect()
    }

    #[test]
    fn normalization() {
        assert_eq!(normalizing_factor(d(1, 4), d(1, 4)), d(1, 1));
        assert_eq!(normalizing_factor(d(1, 1), d(1, 8)), d(8, 1));
        assert_eq!(normalizing_factor(d(1, 8), d(5, 4)), d(1, 8));
        assert_eq!(normalizing_factor(d(1, 4), d(1, 2)), d(1, 2));
    }

    #[test]
    fn direction() {
        // 3/8 of 1/4 written: 3/2 by default, 3/4 as diminution.
        assert_eq!(directed_factor(d(3, 8), d(1, 4), None), d(1, 1));
        assert_eq!(directed_factor(d(3, 8), d(1, 4), Some(false)), d(1, 1));
        assert_eq!(directed_factor(d(3, 8), d(1, 4), Some(true)), d(2, 1));
        // 1/4 of 3/8 written: 2/3 by default, 4/3 as augmentation.
        assert_eq!(directed_factor(d(1, 4), d(3, 8), Some(true)), d(1, 1));
        assert_eq!(directed_factor(d(1, 4), d(3, 8), Some(false)), d(1, 2));
        assert_eq!(directed_factor(d(1, 4), d(1, 4), Some(true)), d(1, 1));
    }

    #[test]
    fn diminished() {
        let spelling = Spelling {
            diminution: Some(true),
            ..Default::default()
        };
        let division = plan(
            0,
            d(3, 8),
            &counts(&[d(1, 16); 4]),
            &spelling,
            &TiePolicy::default(),
        )
        .unwrap();
        assert_eq!(division.container.unwrap().ratio(), (4, 3));
        assert!(division.leaves().iter().all(|leaf| leaf.duration == d(1, 8)));
        assert!(division.is_exact());
    }

    #[test]
    fn trivialized() {
        let spelling = Spelling::default();
        let ties = TiePolicy::default();
        let mut division =
            plan(0, d(3, 8), &counts(&[d(1, 16); 4]), &spelling, &ties).unwrap();
        assert_eq!(division.container.unwrap().ratio(), (2, 3));
        assert!(trivialize(&mut division, &spelling));
        assert_eq!(division.container, None);
        assert!(division.leaves().iter().all(|leaf| leaf.duration == d(3, 32)));
        assert!(division.is_exact());

        let mut triplet =
            plan(0, d(1, 4), &counts(&[d(1, 12); 3]), &spelling, &ties).unwrap();
        assert!(!trivialize(&mut triplet, &spelling));
        assert!(triplet.container.is_some());
        let plain = Spelling {
            max_dots: 0,
            ..Default::default()
        };
        let mut division =
            plan(0, d(3, 8), &counts(&[d(1, 16); 4]), &plain, &ties).unwrap();
        assert!(!trivialize(&mut division, &plain));
    }

    #[test]
    fn exact() {
        let division = plan(
            0,
            d(1, 2),
            &counts(&[d(1, 4), d(-1, 8), d(1, 8)]),
            &Spelling::default(),
            &TiePolicy::default(),
        )
        .unwrap();
        assert_eq!(division.container, None);
        assert_eq!(
            division.kinds().collect::<Vec<_>>(),
            vec![LeafKind::Note, LeafKind::Rest, LeafKind::Note]
        );
    }

    #[test]
    fn triplet() {
        let division = plan(
            3,
            d(1, 4),
            &counts(&[d(1, 12), d(1, 12), d(-1, 12)]),
            &Spelling::default(),
            &TiePolicy::default(),
        )
        .unwrap();
        let container = division.container.unwrap();
        assert_eq!(container.ratio(), (3, 2));
        assert!(division.leaves().iter().all(|leaf| leaf.duration == d(1, 8)));
        assert!(division.is_exact());
        assert_eq!(division.index, 3);
    }

    #[test]
    fn extra_counts_make_tuplet() {
        let division = plan(
            0,
            d(3, 8),
            &counts(&[d(1, 16); 7]),
            &Spelling::default(),
            &TiePolicy::default(),
        )
        .unwrap();
        assert_eq!(division.container.unwrap().ratio(), (7, 6));
        assert!(division.is_exact());
    }

    #[test]
    fn tied_inside_tuplet() {
        // 5/12 is written as 5/8: half tied to eighth, under 2/3.
        let division = plan(
            0,
            d(1, 2),
            &counts(&[d(5, 12), d(1, 12)]),
            &Spelling::default(),
            &TiePolicy::default(),
        )
        .unwrap();
        let written: Vec<_> = division.leaves().iter().map(|l| l.duration).collect();
        assert_eq!(written, vec![d(1, 2), d(1, 8), d(1, 8)]);
        assert!(division.leaves()[0].tie.to_next);
        assert!(!division.leaves()[1].tie.to_next);
        assert_eq!(division.container.unwrap().multiplier(), d(2, 3));
    }

    #[test]
    fn fused() {
        let spelling = Spelling::default();
        let ties = TiePolicy::default();
        let mut division = plan(
            0,
            d(1, 4),
            &counts(&[d(1, 12), d(-1, 12), d(1, 12)]),
            &spelling,
            &ties,
        )
        .unwrap();
        fuse(&mut division, LeafKind::Rest, &spelling, &ties).unwrap();
        assert_eq!(division.container, None);
        assert_eq!(division.leaves().len(), 1);
        assert_eq!(division.leaves()[0].duration, d(1, 4));
        assert!(division.is_exact());

        let mut odd = plan(0, d(1, 3), &counts(&[d(1, 3)]), &spelling, &ties).unwrap();
        fuse(&mut odd, LeafKind::Note, &spelling, &ties).unwrap();
        assert!(odd.container.is_some());
        assert!(odd.is_exact());
    }
}

//! Tools for treating fractions as musical lengths.

use super::Duration;

/// Longest undotted value, that can be written: breve.
pub const LONGEST_BASE: i64 = 2;

pub fn is_power_of_two(num: u64) -> bool {
    num != 0 && num & (num - 1) == 0
}

/// Greatest power of two, not exceeding `num`.
///
/// # Example
/// ```
/// # use rhythm_makers::primitives::fraction_tools::power_of_two_floor;
/// assert_eq!(power_of_two_floor(12), 8);
/// assert_eq!(power_of_two_floor(16), 16);
/// assert_eq!(power_of_two_floor(1), 1);
/// ```
pub fn power_of_two_floor(num: u64) -> u64 {
    match num {
        0 => 0,
        n => 1 << (63 - n.leading_zeros()),
    }
}

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn lcm(a: u64, b: u64) -> u64 {
    match (a, b) {
        (0, _) | (_, 0) => 0,
        (a, b) => a / gcd(a, b) * b,
    }
}

/// Dots above this count do not fit into `i64` durations.
pub const MAX_DOTS: u32 = 61;

/// Most dots, that a value can carry without its last dot falling below
/// `1/smallest_denominator`: the breve has `log2(2 * smallest_denominator)`.
///
/// # Example
/// ```
/// # use rhythm_makers::primitives::fraction_tools::dot_limit;
/// assert_eq!(dot_limit(128), 8);
/// assert_eq!(dot_limit(1), 1);
/// assert_eq!(dot_limit(1 << 63), 61);
/// ```
pub fn dot_limit(smallest_denominator: u64) -> u32 {
    (u64::BITS - smallest_denominator.leading_zeros()).min(MAX_DOTS)
}

/// Multiplier, that makes `dots` dots: 1, 3/2, 7/4, 15/8...
///
/// `dots` is clamped to `MAX_DOTS`.
pub fn dot_multiplier(dots: u32) -> Duration {
    let den = 1_i64 << dots.min(MAX_DOTS);
    Duration::from_parts(2 * den - 1, den as u64)
}

/// True if duration is a single written value: power-of-two base
/// (not longer than breve, not shorter than `1/smallest_denominator`)
/// with no more than `max_dots` dots.
///
/// # Example
/// ```
/// # use rhythm_makers::primitives::{Duration, fraction_tools::is_notatable};
/// let d = |n, d| Duration::new(n, d).unwrap();
/// assert!(is_notatable(d(3, 8), 1, 128));
/// assert!(!is_notatable(d(7, 16), 1, 128));
/// assert!(is_notatable(d(7, 16), 2, 128));
/// assert!(!is_notatable(d(5, 8), 3, 128));
/// assert!(!is_notatable(d(1, 12), 3, 128));
/// assert!(!is_notatable(d(1, 256), 0, 128));
/// ```
pub fn is_notatable(
    duration: Duration,
    max_dots: u32,
    smallest_denominator: u64,
) -> bool {
    (0..=max_dots.min(dot_limit(smallest_denominator))).any(|dots| {
        let base = duration
            .checked_div(dot_multiplier(dots))
            .unwrap_or_default();
        is_written_base(base, dots, smallest_denominator)
    })
}

/// Base is a power of two, and all its dots are not shorter than the
/// smallest unit.
fn is_written_base(base: Duration, dots: u32, smallest_denominator: u64) -> bool {
    if !base.is_positive() || base > Duration::from_integer(LONGEST_BASE) {
        return false;
    }
    let (num, den) = base.to_reduced_form();
    if !is_power_of_two(num as u64) || !is_power_of_two(den) {
        return false;
    }
    if dots > dot_limit(smallest_denominator) {
        return false;
    }
    let shortest_dot = base * Duration::from_parts(1, 1 << dots);
    shortest_dot >= Duration::from_parts(1, smallest_denominator)
}

/// All written values, longest first.
pub fn written_values(
    max_dots: u32,
    smallest_denominator: u64,
) -> impl Iterator<Item = Duration> {
    let bases = std::iter::successors(
        Some(Duration::from_integer(LONGEST_BASE)),
        move |base| {
            let next = *base * Duration::from_parts(1, 2);
            (next >= Duration::from_parts(1, smallest_denominator))
                .then_some(next)
        },
    );
    bases.flat_map(move |base| {
        (0..=max_dots.min(dot_limit(smallest_denominator)))
            .rev()
            .filter(move |dots| is_written_base(base, *dots, smallest_denominator))
            .map(move |dots| base * dot_multiplier(dots))
    })
}

/// Largest written value, that is not longer than `duration` and shorter
/// than `forbidden` (if given).
pub fn largest_written_value(
    duration: Duration,
    max_dots: u32,
    smallest_denominator: u64,
    forbidden: Option<Duration>,
) -> Option<Duration> {
    written_values(max_dots, smallest_denominator)
        .filter(|value| *value <= duration)
        .filter(|value| forbidden.map_or(true, |f| *value < f))
        .max()
}

/// Split positive duration by written values, greedily.
///
/// # Returns
///
/// Vector of durations, started with the largest, and the
/// remainder, which could not be written (zero on success).
///
/// # Example
///
/// ```
/// # use rhythm_makers::primitives::{Duration, fraction_tools::split_written};
/// let d = |n, d| Duration::new(n, d).unwrap();
/// assert_eq!(
///     split_written(d(13, 16), 0, 128, None),
///     (vec![d(1, 2), d(1, 4), d(1, 16)], Duration::zero())
/// );
/// assert_eq!(
///     split_written(d(13, 16), 1, 128, None),
///     (vec![d(3, 4), d(1, 16)], Duration::zero())
/// );
/// ```
pub fn split_written(
    duration: Duration,
    max_dots: u32,
    smallest_denominator: u64,
    forbidden: Option<Duration>,
) -> (Vec<Duration>, Duration) {
    let smallest = Duration::from_parts(1, smallest_denominator);
    let mut remainder = duration;
    let mut head = Vec::new();
    while remainder >= smallest {
        match largest_written_value(
            remainder,
            max_dots,
            smallest_denominator,
            forbidden,
        ) {
            None => break,
            Some(value) => {
                head.push(value);
                remainder -= value;
            }
        }
    }
    (head, remainder)
}

#[cfg(test)]
mod tests {
    use crate::primitives::Duration;

    use super::{
        dot_limit, dot_multiplier, is_notatable, largest_written_value, lcm,
        power_of_two_floor, split_written, written_values,
    };

    fn d(num: i64, den: i64) -> Duration {
        Duration::new(num, den).unwrap()
    }

    #[test]
    fn test_power_of_two() {
        assert_eq!(power_of_two_floor(129), 128);
        assert_eq!(power_of_two_floor(3), 2);
        assert_eq!(lcm(12, 8), 24);
        assert_eq!(dot_multiplier(2), d(7, 4));
    }

    #[test]
    fn test_written_values() {
        let values: Vec<_> = written_values(1, 4).collect();
        assert_eq!(
            values,
            vec![d(3, 1), d(2, 1), d(3, 2), d(1, 1), d(3, 4), d(1, 2), d(1, 4)]
        );
    }

    #[test]
    fn test_largest_written_value() {
        assert_eq!(largest_written_value(d(5, 8), 2, 128, None), Some(d(1, 2)));
        assert_eq!(largest_written_value(d(7, 8), 2, 128, None), Some(d(7, 8)));
        assert_eq!(
            largest_written_value(d(7, 8), 2, 128, Some(d(1, 2))),
            Some(d(7, 16))
        );
        assert_eq!(largest_written_value(d(1, 256), 2, 128, None), None);
    }

    #[test]
    fn test_many_dots() {
        assert_eq!(dot_limit(4), 3);
        let values: Vec<_> = written_values(u32::MAX, 4).collect();
        assert_eq!(values, written_values(3, 4).collect::<Vec<_>>());
        assert_eq!(values[0], d(15, 4));
        assert!(is_notatable(d(255, 128), 64, 128));
        assert!(!is_notatable(d(511, 256), 64, 128));
        assert_eq!(
            largest_written_value(d(3, 8), u32::MAX, 128, None),
            Some(d(3, 8))
        );
    }

    #[test]
    fn test_split_written() {
        assert_eq!(
            split_written(d(5, 8), 0, 128, None),
            (vec![d(1, 2), d(1, 8)], Duration::zero())
        );
        let (head, remainder) = split_written(d(1, 3), 2, 128, None);
        assert_eq!(head.iter().copied().sum::<Duration>() + remainder, d(1, 3));
        assert!(remainder.is_positive());
        assert!(remainder < d(1, 128));
    }
}

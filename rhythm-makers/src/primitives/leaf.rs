//! A smallest piece of rhythm, that is held by Division.
use serde::{Deserialize, Serialize};

use super::Duration;

/// What leaf sounds like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafKind {
    Note,
    Rest,
    /// Pitched rest: silent, but keeps the place of a note.
    Silence,
}
impl LeafKind {
    /// Kind of the talea count: negative counts are rests.
    pub fn from_count_sign(count: Duration) -> Self {
        match count.is_negative() {
            true => Self::Rest,
            false => Self::Note,
        }
    }
    pub fn is_sounding(&self) -> bool {
        matches!(self, Self::Note)
    }
}
impl Default for LeafKind {
    fn default() -> Self {
        Self::Note
    }
}

/// Tie flags of a leaf.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tie {
    pub to_previous: bool,
    pub to_next: bool,
}

/// Written leaf.
///
/// `duration` is the written one: inside a container the sounding
/// duration is scaled by the container ratio.
///
/// `position` is the index of the talea count (logical tie) the leaf was
/// made from. It is global for all calls sharing one cursor, and is the
/// index masks look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leaf {
    pub duration: Duration,
    pub kind: LeafKind,
    pub tie: Tie,
    pub position: usize,
}
impl Leaf {
    pub fn new(duration: Duration, kind: LeafKind, position: usize) -> Self {
        Self {
            duration,
            kind,
            tie: Tie::default(),
            position,
        }
    }

    pub fn is_note(&self) -> bool {
        self.kind == LeafKind::Note
    }

    pub fn set_kind(&mut self, kind: LeafKind) -> &mut Self {
        self.kind = kind;
        self
    }
    pub fn untie(&mut self) -> &mut Self {
        self.tie = Tie::default();
        self
    }
}

/// Tie two leaves together.
pub fn tie_pair(left: &mut Leaf, right: &mut Leaf) {
    left.tie.to_next = true;
    right.tie.to_previous = true;
}

/// Tie every adjacent pair of the chain.
pub fn tie_chain(leaves: &mut [Leaf]) {
    let last = leaves.len().saturating_sub(1);
    for (idx, leaf) in leaves.iter_mut().enumerate() {
        leaf.tie.to_previous = idx > 0;
        leaf.tie.to_next = idx < last;
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::Duration;

    use super::{tie_chain, Leaf, LeafKind, Tie};

    #[test]
    fn chain() {
        let eight = Duration::from_parts(1, 8);
        let mut leaves = vec![Leaf::new(eight, LeafKind::Note, 0); 3];
        tie_chain(&mut leaves);
        assert_eq!(
            leaves.iter().map(|l| l.tie).collect::<Vec<_>>(),
            vec![
                Tie {
                    to_previous: false,
                    to_next: true
                },
                Tie {
                    to_previous: true,
                    to_next: true
                },
                Tie {
                    to_previous: true,
                    to_next: false
                },
            ]
        );
        tie_chain(&mut leaves[..1]);
        assert_eq!(leaves[0].tie, Tie::default());
    }

    #[test]
    fn kind_from_sign() {
        assert_eq!(
            LeafKind::from_count_sign(Duration::from_parts(-3, 16)),
            LeafKind::Rest
        );
        assert_eq!(
            LeafKind::from_count_sign(Duration::from_parts(3, 16)),
            LeafKind::Note
        );
    }
}

//! Talea-based rhythm makers.
//!
//! Rhythm is made from a cyclic pattern of signed counts (talea), which
//! is pulled into divisions of the given durations. Every division is
//! written by leaves (notes, rests and silences) and, if needed, is put
//! into a tuplet container, so its sounding duration is exactly the
//! target. Masks, extra counts, incisions and tie policy shape the
//! result.
//!
//! Maker keeps no state: reading position is in `Cursor`, so rhythm can
//! be generated by pieces, and the pieces join as one rhythm.
//!
//! ```
//! use rhythm_makers::{
//!     mask::{Mask, Pattern},
//!     Cursor, Duration, LeafKind, MakerConfig, MaskSet, RhythmMaker, Talea,
//! };
//!
//! let maker = RhythmMaker::new(MakerConfig {
//!     talea: Talea::new(vec![3, -1], 8).unwrap(),
//!     masks: MaskSet::new(vec![Mask::silence(Pattern::cyclic(vec![2], 4))]),
//!     ..Default::default()
//! })
//! .unwrap();
//! let quarter: Duration = "1/4".parse().unwrap();
//! let (forest, cursor) = maker.generate(&[quarter; 4], &Cursor::new()).unwrap();
//! assert_eq!(forest.duration(), Duration::from_integer(1));
//! assert!(forest.iter().all(|division| division.is_exact()));
//! assert!(forest.leaves().any(|leaf| leaf.kind == LeafKind::Silence));
//! assert_eq!(cursor.divisions_consumed, 4);
//! ```

pub mod error;
pub mod incise;
pub mod maker;
pub mod mask;
pub mod planner;
pub mod primitives;
pub mod spelling;
pub mod talea;
pub mod tie;

pub use error::{
    ArithmeticError, ConfigurationError, ExhaustedTalea, NotatabilityError,
    RhythmError, RhythmResult,
};
pub use incise::{Incise, InciseBody};
pub use maker::{MakerConfig, RhythmMaker};
pub use mask::MaskSet;
pub use primitives::{
    Container, Division, Duration, Forest, Leaf, LeafKind, Tie,
};
pub use spelling::Spelling;
pub use talea::{Cursor, Talea};
pub use tie::{CrossDivisionTies, TiePolicy};

use crate::primitives::Duration;

/// Malformed duration arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("Zero denominator in duration: {numerator}/0")]
    ZeroDenominator { numerator: i64 },
    #[error("Can not divide {0} by zero duration")]
    DivisionByZero(Duration),
    #[error("Target duration should be positive, got: {0}")]
    NonPositiveTarget(Duration),
    #[error("Can not parse duration from `{0}`")]
    Parse(String),
}

/// Duration can not be spelled by written leaves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotatabilityError {
    #[error(
        "Remainder {remainder} of {duration} is below \
        the smallest written unit 1/{smallest_denominator}"
    )]
    BelowResolution {
        duration: Duration,
        remainder: Duration,
        smallest_denominator: u64,
    },
    #[error("No written duration fits remainder {remainder} of {duration}")]
    NoCandidate {
        duration: Duration,
        remainder: Duration,
    },
}

/// Maker can not be built from the given settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Talea has no counts")]
    EmptyTalea,
    #[error("Denominator of {0} should be positive")]
    ZeroDenominator(&'static str),
    #[error("Zero count at index {index} of {source_name}")]
    ZeroCount {
        source_name: &'static str,
        index: usize,
    },
    #[error("Pattern period should be positive")]
    ZeroPeriod,
    #[error("Pattern index {index} is out of range for period {period}")]
    IndexOutOfRange { index: i64, period: usize },
    #[error("Extra counts are given, but empty")]
    EmptyExtraCounts,
    #[error("Smallest denominator {0} is not a power of two")]
    SmallestDenominator(u64),
    #[error(
        "Forbidden duration {forbidden} leaves nothing \
        above the smallest unit 1/{smallest_denominator}"
    )]
    ForbiddenDuration {
        forbidden: Duration,
        smallest_denominator: u64,
    },
    #[error("Incise {0} talea and {0} counts should be given together")]
    InciseCounts(&'static str),
}

/// Talea, that is read once only, has no counts left.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Talea of {length} counts is read once only, but {requested} counts are requested")]
pub struct ExhaustedTalea {
    pub length: usize,
    pub requested: usize,
}

/// Anything, that can stop `RhythmMaker::generate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RhythmError {
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
    #[error(transparent)]
    Notatability(#[from] NotatabilityError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Exhausted(#[from] ExhaustedTalea),
}
pub type RhythmResult<T> = Result<T, RhythmError>;

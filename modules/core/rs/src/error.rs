use thiserror::Error;

/// Reasons an input element can't be turned into a half-open interval.
///
/// Fallible constructors return `eyre::Result`, the underlying kind can be recovered with
/// `report.downcast_ref::<IntervalError>()`.
#[derive(Error, Clone, PartialEq, Eq, Hash, Debug)]
pub enum IntervalError {
    #[error("Interval record has {0} field(s), but at least 2 (start, end) are required")]
    MissingFields(usize),

    #[error("Can't interpret interval bound as a coordinate: {0}")]
    NotACoordinate(String),

    #[error("Invalid interval: start ({start}) > end ({end})")]
    Inverted { start: String, end: String },
}

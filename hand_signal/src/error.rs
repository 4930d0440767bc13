//! Error type shared by the signal crates.

/// Errors raised at the detector boundary or while validating config.
///
/// Note that "no hand detected" is deliberately not here: it is a normal
/// sample with `active == false`.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SignalError {
    #[error("expected {expected} landmarks, found {found}")]
    LandmarkCount { expected: usize, found: usize },

    #[error("flat landmark buffer length {0} is not a multiple of 3")]
    FlatLength(usize),

    #[error("invalid config: {0}")]
    Config(String),
}

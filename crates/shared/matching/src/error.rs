use thiserror::Error;

/// Errors raised by the trade reduction passes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    #[error("Reserve prices are undefined; run the static trade reduction or set a fallback first")]
    UndefinedReservePrices,
}

pub type MatchingResult<T> = std::result::Result<T, MatchingError>;

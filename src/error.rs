use thiserror::Error;

use crate::document::DocId;

/// Contract violations caught when an index or configuration is constructed.
///
/// Everything past construction is total: a query that matches nothing is a
/// normal `None`/empty outcome, never an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Documents must be indexed with strictly sequential ids starting at 0.
    #[error("document id collision: got {got}, expected {expected}")]
    DocIdCollision { got: DocId, expected: DocId },

    /// Shingle width must be at least 1.
    #[error("shingle width must be at least 1")]
    InvalidShingleWidth,

    /// The DisMax tie breaker must lie in [0, 1].
    #[error("tie breaker {0} outside [0, 1]")]
    InvalidTieBreaker(f32),
}

pub type Result<T> = std::result::Result<T, Error>;

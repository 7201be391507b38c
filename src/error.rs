use std::result;
use thiserror::Error;

/// Errors reported by tree operations.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The value passed to `remove` is not stored in the tree.
    #[error("value not found in the tree")]
    ValueNotFound,
}

pub type Result<T> = result::Result<T, Error>;

//! Probabilistic linked hierarchy of subsequences.

mod level;
mod map;

pub use self::level::LevelGenerator;
pub use self::map::SkipMap;
pub use self::map::{DEFAULT_CAPACITY, DEFAULT_PROBABILITY};

use std::error;
use std::fmt;
use std::result;

/// Configuration errors reported when constructing a skiplist.
///
/// These are the only errors in the module; once a list exists, all of its
/// operations are total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// The target capacity was zero. The capacity is the expected maximum
    /// number of entries and must be at least one.
    InvalidCapacity(usize),
    /// The promotion probability was outside the open interval (0, 1).
    InvalidProbability(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidCapacity(capacity) => {
                write!(f, "invalid capacity: {}, expected at least 1", capacity)
            }
            Error::InvalidProbability(probability) => write!(
                f,
                "invalid probability: {}, expected a value in (0, 1)",
                probability,
            ),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

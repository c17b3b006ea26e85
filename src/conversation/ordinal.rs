//! Display ordinals: the 1-based positions admins type to pick a submission.
//!
//! Ordinals are only meaningful against the list they were computed from.
//! Callers resolve against a freshly fetched list and act on the returned
//! identifier, never on the number.

use std::num::IntErrorKind;

use thiserror::Error;

use crate::storage::Submission;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrdinalError {
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("{given} is outside 1..{max}")]
    OutOfRange { given: i64, max: usize },
    #[error("no submissions")]
    Empty,
}

/// Parses admin input as an ordinal. Surrounding whitespace is ignored.
///
/// Integers too large for `i64` saturate, so they resolve as out of range
/// instead of being rejected as text.
pub fn parse(input: &str) -> Result<i64, OrdinalError> {
    match input.trim().parse::<i64>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(OrdinalError::NotANumber(input.to_string())),
        },
    }
}

/// Picks the submission at `ordinal` in a most-recent-first list.
pub fn resolve(submissions: &[Submission], ordinal: i64) -> Result<&Submission, OrdinalError> {
    if submissions.is_empty() {
        return Err(OrdinalError::Empty);
    }
    let out_of_range = || OrdinalError::OutOfRange {
        given: ordinal,
        max: submissions.len(),
    };
    let index = usize::try_from(ordinal)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(out_of_range)?;
    submissions.get(index).ok_or_else(out_of_range)
}

/// Ordinal of the `index`-th entry of a page starting at `offset`.
pub fn for_position(offset: usize, index: usize) -> usize {
    offset + index + 1
}

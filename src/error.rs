//! Error types for stat computation.
//!
//! Every failure surfaces at `Stat::build`; once a stat is constructed,
//! all of its accessors are total.

use crate::id::{FormIndex, UnitId};
use thiserror::Error;

/// Errors that can occur while building a stat.
///
/// # Examples
///
/// ```rust
/// use catstat::{FormIndex, StatError, UnitId};
///
/// let err = StatError::MissingData {
///     unit: UnitId::from(26),
///     form: FormIndex::THIRD,
/// };
/// assert_eq!(err.to_string(), "No stat data for unit 26 form 2");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatError {
    /// The requested unit id is unknown, or the unit has no such form.
    ///
    /// The registry is read-only and already validated, so this is a
    /// caller error rather than something to recover from.
    #[error("No stat data for unit {unit} form {form}")]
    MissingData { unit: UnitId, form: FormIndex },

    /// An ability entry carries a code the catalog does not know.
    ///
    /// This indicates a data/version mismatch between the registry and the
    /// engine; unknown abilities are never silently dropped.
    #[error("Unrecognized ability code: {code}")]
    UnrecognizedAbility { code: String },

    /// A construction option is out of range (e.g. level 0).
    ///
    /// Raised before any computation runs.
    #[error("Invalid option: {reason}")]
    InvalidOption { reason: String },
}

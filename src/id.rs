//! Identifier types for units and evolution forms.
//!
//! Both identifiers are small `Copy` newtypes so they can be passed around
//! and embedded in results without allocation.

use serde::{Deserialize, Serialize};

/// Numeric identifier of a unit, as assigned by the game data.
///
/// # Examples
///
/// ```rust
/// use catstat::UnitId;
///
/// let bahamut = UnitId::from(26);
/// assert_eq!(bahamut.value(), 26);
/// assert_eq!(bahamut.to_string(), "26");
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u32);

impl UnitId {
    /// Get the raw numeric value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based index of a unit's evolution form.
///
/// Units ship with up to four forms; abilities and attacks declared on one
/// form never apply to another.
///
/// # Examples
///
/// ```rust
/// use catstat::FormIndex;
///
/// assert_eq!(FormIndex::FIRST.value(), 0);
/// assert_eq!(FormIndex::from(2), FormIndex::THIRD);
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormIndex(u8);

impl FormIndex {
    /// The base form.
    pub const FIRST: FormIndex = FormIndex(0);
    /// The first evolution.
    pub const SECOND: FormIndex = FormIndex(1);
    /// The second ("true form") evolution.
    pub const THIRD: FormIndex = FormIndex(2);
    /// The third ("ultra form") evolution.
    pub const FOURTH: FormIndex = FormIndex(3);

    /// Get the raw zero-based index.
    pub fn value(self) -> u8 {
        self.0
    }

    pub(crate) fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl From<u8> for FormIndex {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for FormIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

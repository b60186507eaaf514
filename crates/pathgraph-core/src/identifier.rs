//! Diagram-level renderable identifiers
//!
//! This module provides the [`RenderableId`] type. Ids are plain integers
//! handed out by a diagram session; any negative value means the renderable
//! has not been assigned an id yet.

use std::fmt;

use serde::Deserialize;

/// Integer identity of a renderable within one open diagram.
///
/// # Examples
///
/// ```
/// use pathgraph_core::identifier::RenderableId;
///
/// let id = RenderableId::new(12);
/// assert!(id.is_assigned());
/// assert!(!RenderableId::UNASSIGNED.is_assigned());
/// assert!(RenderableId::new(13) > id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct RenderableId(i64);

impl RenderableId {
    /// Sentinel for "no id assigned yet".
    pub const UNASSIGNED: RenderableId = RenderableId(-1);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value
    pub fn value(self) -> i64 {
        self.0
    }

    /// Returns true unless the id is negative
    pub fn is_assigned(self) -> bool {
        self.0 >= 0
    }
}

impl Default for RenderableId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl From<i64> for RenderableId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RenderableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

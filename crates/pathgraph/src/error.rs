//! Error types for pathgraph operations.
//!
//! [`SceneError`] covers structural failures inside the scene arena and the
//! graph utilities. [`PathgraphError`] is the crate-boundary error that also
//! wraps I/O, configuration and document failures.

use std::{io, ops::Range};

use thiserror::Error;

use pathgraph_core::kind::{ConnectRole, RenderableKind};

use crate::scene::{PointSlot, RenderableKey, WidgetKey};

/// Failures of scene mutations and graph utilities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("unknown renderable {0}")]
    UnknownRenderable(RenderableKey),

    #[error("unknown widget {0}")]
    UnknownWidget(WidgetKey),

    #[error("{key} is a {kind}, not a node")]
    NotANode {
        key: RenderableKey,
        kind: RenderableKind,
    },

    #[error("{key} is a {kind}, not an edge")]
    NotAnEdge {
        key: RenderableKey,
        kind: RenderableKind,
    },

    #[error("{key} is a {kind}, which cannot be aliased by a shortcut")]
    ShortcutUnsupported {
        key: RenderableKey,
        kind: RenderableKind,
    },

    #[error("{key} is a {found}, expected a {expected}")]
    KindMismatch {
        key: RenderableKey,
        expected: &'static str,
        found: RenderableKind,
    },

    #[error("edge {edge} has no {role} branch {index}")]
    MissingBranch {
        edge: RenderableKey,
        role: ConnectRole,
        index: usize,
    },

    #[error("cannot connect {role} of edge {edge} through an empty branch")]
    EmptyBranch {
        edge: RenderableKey,
        role: ConnectRole,
    },

    #[error("point slot {slot:?} does not resolve on edge {edge}")]
    UnresolvedPoint { edge: RenderableKey, slot: PointSlot },

    #[error("{0} cannot contain itself")]
    SelfContainment(RenderableKey),
}

/// The main error type for pathgraph operations.
#[derive(Debug, Error)]
pub enum PathgraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A diagram document could not be read. `span` points into `src`
    /// when the failure has a location.
    #[error("Document error: {message}")]
    Document {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

impl PathgraphError {
    /// Create a new `Document` error with the associated source text.
    pub fn new_document_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Document {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_messages() {
        let err = SceneError::NotANode {
            key: RenderableKey::new(4),
            kind: RenderableKind::Reaction,
        };
        assert_eq!(err.to_string(), "r#4 is a Reaction, not a node");

        let err = SceneError::KindMismatch {
            key: RenderableKey::new(1),
            expected: "Complex",
            found: RenderableKind::Protein,
        };
        assert_eq!(err.to_string(), "r#1 is a Protein, expected a Complex");
    }

    #[test]
    fn test_scene_error_converts() {
        let err: PathgraphError = SceneError::SelfContainment(RenderableKey::new(0)).into();
        assert!(matches!(err, PathgraphError::Scene(_)));
        assert_eq!(err.to_string(), "Scene error: r#0 cannot contain itself");
    }
}

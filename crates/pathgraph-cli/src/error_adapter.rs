//! Error adapter for converting PathgraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Document errors
//! carry their source text and, when known, the span of the offending value.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use pathgraph::PathgraphError;

/// Adapter that renders a [`PathgraphError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a PathgraphError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            PathgraphError::Document { message, .. } => write!(f, "{message}"),
            err => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PathgraphError::Io(_) => "pathgraph::io",
            PathgraphError::Config(_) => "pathgraph::config",
            PathgraphError::Document { .. } => "pathgraph::document",
            PathgraphError::Scene(_) => "pathgraph::scene",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            PathgraphError::Document { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match &self.0 {
            PathgraphError::Document {
                span: Some(span), ..
            } => {
                let span = SourceSpan::new(span.start.into(), span.len());
                Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
                    Some("here".to_string()),
                    span,
                ))))
            }
            _ => None,
        }
    }
}

//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type returned by the fallible operations of the symbolic engine.
//!
//! There is no source code to point at in a purely symbolic engine, so the "source" of an
//! [`Error`] is the plain-text rendering of the expression that caused it. Reports built from an
//! [`Error`] highlight regions of that rendering.

extern crate self as sym_error;

use ariadne::{Color, Report};
use std::{any::Any, fmt::{Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so callers can inspect the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// The one-line message describing the error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with the rendering of the expression it originated from.
#[derive(Debug)]
pub struct Error {
    /// The plain-text rendering of the offending expression.
    pub source: String,

    /// The regions of [`Error::source`] that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given source, spans and kind.
    pub fn new(source: String, spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { source, spans, kind: Box::new(kind) }
    }

    /// Creates a new error whose single span covers the whole source.
    pub fn spanning(source: impl Into<String>, kind: impl ErrorKind + 'static) -> Self {
        let source = source.into();
        let spans = vec![0..source.len()];
        Self::new(source, spans, kind)
    }

    /// Returns the kind of this error as the concrete type `K`, if it is one.
    pub fn downcast_kind<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the kind of this error is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.downcast_kind::<K>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (in `{}`)", self.kind.message(), self.source)
    }
}

impl std::error::Error for Error {}

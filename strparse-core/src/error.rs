//! Error types.
//!
//! Text-level parsing never fails: malformed input degrades to a partial,
//! well-nested event sequence. The errors here cover the places where the
//! *caller* broke a contract: asking a stream for text it no longer holds,
//! driving a [`JsonBuilder`](crate::json::JsonBuilder) out of order, or
//! feeding a malformed message catalog.

use thiserror::Error;

/// Out-of-range requests against a [`CharStream`](crate::CharStream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The start offset lies before the oldest character still buffered.
    #[error("offset {offset} is before the retained span (starts at {retained})")]
    BeforeRetained { offset: u64, retained: u64 },

    /// The start offset lies after the cursor.
    #[error("offset {offset} is after the cursor at {cursor}")]
    AfterCursor { offset: u64, cursor: u64 },

    /// The end of the requested range is before its start.
    #[error("negative length: range {from}..{to}")]
    NegativeLength { from: u64, to: u64 },
}

/// Structural violations raised by [`JsonBuilder`](crate::json::JsonBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("object property `{0}` can be defined only inside an object")]
    PropertyOutsideObject(String),

    #[error("array values can be added only inside an array")]
    ValueOutsideArray,

    #[error("a property value can be set only inside an open property")]
    ValueOutsideProperty,

    #[error("{0} can be defined only at the root, as a property value or as an array element")]
    MisplacedContainer(&'static str),

    #[error("property `{0}` already has a value")]
    PropertyAlreadySet(String),

    #[error("nothing to close")]
    NothingToClose,

    #[error("the root value is already complete")]
    RootComplete,
}

/// Malformed message catalog sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("line {line}: expected `key = value`, found {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: empty message key")]
    EmptyKey { line: usize },
}

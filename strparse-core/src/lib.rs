//! strparse core
//!
//! Small, lenient, event-based parsers over a backtracking character stream.
//! Parsers never build an AST on their own: they push SAX-style events to a
//! listener, and never fail on malformed text.
//!
//! # Architecture
//!
//! - **stream.rs** - Ring-buffered `CharStream` with scoped `Marker` rewind
//! - **pointer.rs** - Offset/line/column positions
//! - **source.rs** - `CharSource` pull interface and adapters
//! - **scan.rs** - Token scanning primitives (spaces, quoted literals, words)
//! - **json/** - Relaxed JSON parser, canonical serializer, checked builder, tree
//! - **query.rs** - Search-style query expressions (`from=amy (dinner OR movie)`)
//! - **address.rs** - Mail address lists (`Name <email>, ...`)
//! - **delta.rs** - Relative-time wording ("3 hours ago")
//! - **messages.rs** - Localized message templates
//! - **error.rs** - Error types for contract violations
//!
//! # Example
//!
//! ```
//! use strparse_core::json::canonicalize;
//!
//! assert_eq!(canonicalize("junk { name : Amy, tags: [a b] }"), "{name:'Amy',tags:['a','b']}");
//! ```

pub mod address;
pub mod delta;
pub mod error;
pub mod json;
pub mod messages;
pub mod pointer;
pub mod query;
pub mod scan;
pub mod source;
pub mod stream;

pub use error::{BuilderError, CatalogError, StreamError};
pub use pointer::Pointer;
pub use source::{CharSource, IterSource, StrSource};
pub use stream::{CharStream, Marker, StreamOptions};

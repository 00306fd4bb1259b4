//! Backtracking character stream over a growable ring buffer.
//!
//! Characters are pulled lazily from a [`CharSource`], one at a time, and
//! kept in a circular buffer. Without open markers the buffer only needs the
//! character under the cursor (plus one character of look-behind for `\r\n`
//! line accounting), so it stays at its initial capacity. A [`Marker`] pins
//! everything from its start position onwards: while any marker is open,
//! nothing at or after the oldest marker is ever overwritten, and the buffer
//! grows by ×1.5 instead.
//!
//! ```text
//!            oldest marker        cursor          top
//!                 │                 │              │
//!   ... evicted │ │ retained ...... │ ............ │ not yet pulled ...
//! ```
//!
//! Every source character is requested exactly once, however often the
//! parser rewinds over buffered text.

use std::ops::{Deref, DerefMut};

use log::trace;

use crate::error::StreamError;
use crate::pointer::Pointer;
use crate::source::{CharSource, StrSource};

/// Default ring buffer capacity in characters.
pub const DEFAULT_CAPACITY: usize = 16;

/// Stream configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct StreamOptions {
    /// Initial ring buffer capacity (at least 2).
    pub initial_capacity: usize,
}

impl StreamOptions {
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT_CAPACITY }
    }
}

/// A lazily filled, backtrack-capable character stream.
#[derive(Debug)]
pub struct CharStream<S> {
    source: S,
    /// Circular storage; slot of offset `o` is `o % buf.len()`.
    buf: Vec<char>,
    /// Offset of the next character to pull from the source.
    top: u64,
    cursor: Pointer,
    /// Set once the source returned `None`; equals `top` from then on.
    end: Option<u64>,
    /// Number of open markers.
    marks: usize,
    /// Start offset of the oldest open marker. Meaningless when `marks == 0`.
    first_mark: u64,
    reads: u64,
}

impl<'a> CharStream<StrSource<'a>> {
    /// Stream over a borrowed string.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(StrSource::new(text))
    }
}

impl<S: CharSource> CharStream<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, StreamOptions::default())
    }

    pub fn with_options(source: S, options: StreamOptions) -> Self {
        Self {
            source,
            buf: vec!['\0'; options.initial_capacity.max(2)],
            top: 0,
            cursor: Pointer::START,
            end: None,
            marks: 0,
            first_mark: 0,
            reads: 0,
        }
    }

    /// The character under the cursor, or `None` once terminated.
    ///
    /// Pulls from the source the first time a position is visited; never
    /// moves the cursor.
    #[inline]
    pub fn peek(&mut self) -> Option<char> {
        self.fill();
        if self.at_end() {
            None
        } else {
            Some(self.buf[self.slot(self.cursor.offset)])
        }
    }

    /// Move the cursor one character forward.
    ///
    /// Returns `false` once the cursor has landed on the end of input;
    /// further calls are no-ops.
    pub fn advance(&mut self) -> bool {
        if self.is_terminated() {
            return false;
        }
        let offset = self.cursor.offset;
        let ch = self.buf[self.slot(offset)];
        let prev = (offset > 0).then(|| self.buf[self.slot(offset - 1)]);
        self.cursor = self.cursor.step(ch, prev);
        self.fill();
        !self.at_end()
    }

    /// True once the cursor sits on the end of input.
    #[inline]
    pub fn is_terminated(&mut self) -> bool {
        self.fill();
        self.at_end()
    }

    /// Open a backtrack point at the cursor.
    ///
    /// The returned guard dereferences to the stream, so parsing continues
    /// through it. Closing it with [`Marker::rewind`] (or dropping it) moves
    /// the cursor back to where the marker was opened; [`Marker::commit`]
    /// keeps the current position.
    pub fn mark(&mut self) -> Marker<'_, S> {
        if self.marks == 0 {
            self.first_mark = self.cursor.offset;
        }
        self.marks += 1;
        trace!("mark #{} opened at {}", self.marks, self.cursor);
        Marker { start: self.cursor, stream: self, closed: false }
    }

    /// Consume the stream and hand back its source.
    pub fn into_source(self) -> S {
        self.source
    }

    fn fill(&mut self) {
        if self.end.is_none() && self.cursor.offset >= self.top {
            self.pull();
        }
    }

    fn pull(&mut self) {
        match self.source.next_char() {
            Some(ch) => {
                self.reserve();
                let slot = self.slot(self.top);
                self.buf[slot] = ch;
                self.top += 1;
                self.reads += 1;
            }
            None => {
                trace!("source exhausted after {} characters", self.top);
                self.end = Some(self.top);
            }
        }
    }

    /// Make room for writing offset `top` without clobbering retained text.
    fn reserve(&mut self) {
        let keep = self.retained_start().saturating_sub(1);
        let needed = (self.top - keep + 1) as usize;
        if needed <= self.buf.len() {
            return;
        }
        let capacity = (self.buf.len() * 3 / 2).max(needed);
        let mut buf = vec!['\0'; capacity];
        for offset in keep..self.top {
            buf[(offset % capacity as u64) as usize] = self.buf[self.slot(offset)];
        }
        trace!("buffer grown {} -> {} (retaining {}..{})", self.buf.len(), capacity, keep, self.top);
        self.buf = buf;
    }
}

impl<S> CharStream<S> {
    /// The cursor position.
    #[inline]
    pub fn pointer(&self) -> Pointer {
        self.cursor
    }

    /// Number of characters pulled from the source so far.
    pub fn source_reads(&self) -> u64 {
        self.reads
    }

    /// Current ring buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of markers currently open.
    pub fn open_markers(&self) -> usize {
        self.marks
    }

    /// Text of `len` characters starting at `from`, clipped at the cursor.
    ///
    /// `from` must lie within the retained span: at or after the oldest
    /// open marker (or the cursor, when no marker is open) and not after
    /// the cursor.
    pub fn substring(&self, from: Pointer, len: usize) -> Result<String, StreamError> {
        let retained = self.retained_start();
        if from.offset < retained {
            return Err(StreamError::BeforeRetained { offset: from.offset, retained });
        }
        if from.offset > self.cursor.offset {
            return Err(StreamError::AfterCursor { offset: from.offset, cursor: self.cursor.offset });
        }
        let end = from.offset + (len as u64).min(self.cursor.offset - from.offset);
        Ok(self.copy_range(from.offset, end))
    }

    /// Text between two pointers; see [`substring`](Self::substring).
    pub fn slice(&self, from: Pointer, to: Pointer) -> Result<String, StreamError> {
        if to.offset < from.offset {
            return Err(StreamError::NegativeLength { from: from.offset, to: to.offset });
        }
        self.substring(from, (to.offset - from.offset) as usize)
    }

    #[inline]
    fn slot(&self, offset: u64) -> usize {
        (offset % self.buf.len() as u64) as usize
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.end == Some(self.cursor.offset)
    }

    fn retained_start(&self) -> u64 {
        if self.marks > 0 {
            self.first_mark.min(self.cursor.offset)
        } else {
            self.cursor.offset
        }
    }

    fn copy_range(&self, from: u64, to: u64) -> String {
        (from..to).map(|offset| self.buf[self.slot(offset)]).collect()
    }

    fn release(&mut self, rewind_to: Option<Pointer>) {
        if let Some(pointer) = rewind_to {
            self.cursor = pointer;
        }
        self.marks = self.marks.saturating_sub(1);
    }
}

/// Scoped backtrack point returned by [`CharStream::mark`].
///
/// Markers nest strictly: the guard holds the stream's only mutable borrow,
/// so an inner marker has to be closed before the outer one can be used
/// again. Dropping an undecided marker rewinds.
#[derive(Debug)]
pub struct Marker<'s, S> {
    stream: &'s mut CharStream<S>,
    start: Pointer,
    closed: bool,
}

impl<S> Marker<'_, S> {
    /// Where the marker was opened.
    pub fn start(&self) -> Pointer {
        self.start
    }

    /// Text from the marker to the cursor.
    pub fn text(&self) -> String {
        self.stream.copy_range(self.start.offset, self.stream.cursor.offset)
    }

    /// Number of characters consumed since the marker was opened.
    pub fn consumed(&self) -> u64 {
        self.stream.cursor.distance_from(self.start)
    }

    /// Keep the current position.
    pub fn commit(mut self) {
        self.close(false);
    }

    /// Move the cursor back to the marker.
    pub fn rewind(mut self) {
        self.close(true);
    }

    fn close(&mut self, rewind: bool) {
        if self.closed {
            return;
        }
        self.closed = true;
        trace!(
            "mark at {} closed ({}) with cursor at {}",
            self.start,
            if rewind { "rewind" } else { "commit" },
            self.stream.cursor
        );
        self.stream.release(rewind.then_some(self.start));
    }
}

impl<S> Drop for Marker<'_, S> {
    fn drop(&mut self) {
        self.close(true);
    }
}

impl<S> Deref for Marker<'_, S> {
    type Target = CharStream<S>;

    fn deref(&self) -> &Self::Target {
        &*self.stream
    }
}

impl<S> DerefMut for Marker<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.stream
    }
}

//! Search-style query expressions.
//!
//! ```text
//! query := term*
//! term  := '(' query ')'
//!        | token ('=' ( '(' query ')' | token ))?
//! ```
//!
//! Tokens are quoted literals or bare words running up to whitespace, a
//! parenthesis or the delimiter; the escape character makes the next
//! character part of a bare word. Parsing never fails: an unmatched `)` at
//! the top level is skipped and unmatched `(` close at the end of input.
//! A group nested deeper than [`QueryOptions::max_depth`] ends the parse;
//! the groups already open are closed.
//!
//! ```
//! use strparse_core::query::QueryTrace;
//!
//! assert_eq!(QueryTrace::render("from=amy (dinner OR movie)"), "[{from=amy}[{dinner}{OR}{movie}]]");
//! ```

use log::debug;

use crate::scan::{self, ESCAPE};
use crate::source::{CharSource, StrSource};
use crate::stream::CharStream;

/// Receiver of query events. Every method defaults to a no-op.
pub trait QueryListener {
    /// Start of the whole query or of an anonymous `( … )` group.
    fn begin_query(&mut self) {}
    fn end_query(&mut self) {}
    /// Start of a `prefix=( … )` group.
    fn begin_token(&mut self, _prefix: &str) {}
    fn end_token(&mut self, _prefix: &str) {}
    /// A bare token (`prefix` is `None`) or a `prefix=value` pair.
    fn on_token(&mut self, _prefix: Option<&str>, _value: Option<&str>) {}
}

impl<L: QueryListener + ?Sized> QueryListener for &mut L {
    fn begin_query(&mut self) {
        (**self).begin_query()
    }
    fn end_query(&mut self) {
        (**self).end_query()
    }
    fn begin_token(&mut self, prefix: &str) {
        (**self).begin_token(prefix)
    }
    fn end_token(&mut self, prefix: &str) {
        (**self).end_token(prefix)
    }
    fn on_token(&mut self, prefix: Option<&str>, value: Option<&str>) {
        (**self).on_token(prefix, value)
    }
}

/// Query syntax configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct QueryOptions {
    /// Separates a prefix from its value.
    pub delimiter: char,
    pub escape: char,
    /// Deepest group nesting accepted.
    pub max_depth: usize,
}

impl QueryOptions {
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { delimiter: '=', escape: ESCAPE, max_depth: 256 }
    }
}

/// Recursive-descent query parser over a [`CharStream`].
pub struct QueryParser<'s, S> {
    stream: &'s mut CharStream<S>,
    options: QueryOptions,
    halted: bool,
}

impl<'s, S: CharSource> QueryParser<'s, S> {
    pub fn new(stream: &'s mut CharStream<S>) -> Self {
        Self::with_options(stream, QueryOptions::default())
    }

    pub fn with_options(stream: &'s mut CharStream<S>, options: QueryOptions) -> Self {
        Self { stream, options, halted: false }
    }

    /// Parse the rest of the stream, wrapping each top-level run of terms in
    /// a query. A top-level `)` is skipped rather than ending the run, so in
    /// practice there is exactly one, even for empty input.
    pub fn parse<L: QueryListener>(mut self, listener: &mut L) {
        loop {
            listener.begin_query();
            self.terms(listener, 0);
            listener.end_query();
            if self.halted || self.stream.is_terminated() {
                break;
            }
        }
    }

    fn terms<L: QueryListener>(&mut self, listener: &mut L, depth: usize) {
        while !self.halted {
            scan::skip_spaces(self.stream);
            match self.stream.peek() {
                None => {
                    if depth > 0 {
                        debug!("{depth} unclosed group(s) at end of query");
                    }
                    return;
                }
                Some('(') => {
                    if !self.descend(depth) {
                        return;
                    }
                    listener.begin_query();
                    self.terms(listener, depth + 1);
                    listener.end_query();
                }
                Some(')') => {
                    self.stream.advance();
                    if depth > 0 {
                        return;
                    }
                    debug!("skipping unmatched ')' at {}", self.stream.pointer());
                }
                Some(_) => self.term(listener, depth),
            }
        }
    }

    fn term<L: QueryListener>(&mut self, listener: &mut L, depth: usize) {
        let (token, quoted) = self.token();
        if !self.delimiter() {
            if quoted || !token.is_empty() {
                listener.on_token(None, Some(&token));
            }
            return;
        }
        scan::skip_spaces(self.stream);
        if self.stream.peek() == Some('(') {
            if !self.descend(depth) {
                return;
            }
            listener.begin_token(&token);
            self.terms(listener, depth + 1);
            listener.end_token(&token);
        } else {
            let (value, _) = self.token();
            listener.on_token(Some(&token), Some(&value));
        }
    }

    /// Consume the `(` of a new group unless that would nest deeper than
    /// allowed, in which case parsing halts.
    fn descend(&mut self, depth: usize) -> bool {
        if depth >= self.options.max_depth {
            debug!("groups nested deeper than {} at {}, stopping", self.options.max_depth, self.stream.pointer());
            self.halted = true;
            return false;
        }
        self.stream.advance();
        true
    }

    /// Consume the delimiter if it follows, possibly after whitespace.
    fn delimiter(&mut self) -> bool {
        let delimiter = self.options.delimiter;
        let mut marker = self.stream.mark();
        scan::skip_spaces(&mut marker);
        if marker.peek() == Some(delimiter) {
            marker.advance();
            marker.commit();
            true
        } else {
            marker.rewind();
            false
        }
    }

    /// Read one token. The flag tells whether it was quoted.
    fn token(&mut self) -> (String, bool) {
        let QueryOptions { delimiter, escape, .. } = self.options;
        match scan::read_quoted(self.stream, escape) {
            Some(text) => (text, true),
            None => {
                let word = scan::read_word(self.stream, escape, |ch| ch == '(' || ch == ')' || ch == delimiter);
                (word, false)
            }
        }
    }
}

/// Parse `input` with the default options.
pub fn parse_str<L: QueryListener>(input: &str, listener: &mut L) {
    let mut stream = CharStream::new(StrSource::new(input));
    QueryParser::new(&mut stream).parse(listener);
}

/// An owned event, as captured by [`QueryRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    BeginQuery,
    EndQuery,
    BeginToken(String),
    EndToken(String),
    Token(Option<String>, Option<String>),
}

impl QueryEvent {
    pub fn emit<L: QueryListener + ?Sized>(&self, listener: &mut L) {
        match self {
            Self::BeginQuery => listener.begin_query(),
            Self::EndQuery => listener.end_query(),
            Self::BeginToken(prefix) => listener.begin_token(prefix),
            Self::EndToken(prefix) => listener.end_token(prefix),
            Self::Token(prefix, value) => listener.on_token(prefix.as_deref(), value.as_deref()),
        }
    }
}

/// Listener collecting every event it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRecorder {
    pub events: Vec<QueryEvent>,
}

impl QueryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_events(self) -> Vec<QueryEvent> {
        self.events
    }
}

impl QueryListener for QueryRecorder {
    fn begin_query(&mut self) {
        self.events.push(QueryEvent::BeginQuery);
    }
    fn end_query(&mut self) {
        self.events.push(QueryEvent::EndQuery);
    }
    fn begin_token(&mut self, prefix: &str) {
        self.events.push(QueryEvent::BeginToken(prefix.to_string()));
    }
    fn end_token(&mut self, prefix: &str) {
        self.events.push(QueryEvent::EndToken(prefix.to_string()));
    }
    fn on_token(&mut self, prefix: Option<&str>, value: Option<&str>) {
        self.events.push(QueryEvent::Token(prefix.map(str::to_string), value.map(str::to_string)));
    }
}

/// Compact trace of query events.
///
/// `[`/`]` bracket queries and anonymous groups, `{p=[` … `]}` bracket
/// prefixed groups, and tokens print as `{p=v}` or `{v}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTrace {
    out: String,
}

impl QueryTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace of `input` parsed with the default options.
    pub fn render(input: &str) -> String {
        let mut trace = Self::new();
        parse_str(input, &mut trace);
        trace.out
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl QueryListener for QueryTrace {
    fn begin_query(&mut self) {
        self.out.push('[');
    }
    fn end_query(&mut self) {
        self.out.push(']');
    }
    fn begin_token(&mut self, prefix: &str) {
        self.out.push('{');
        self.out.push_str(prefix);
        self.out.push_str("=[");
    }
    fn end_token(&mut self, _prefix: &str) {
        self.out.push_str("]}");
    }
    fn on_token(&mut self, prefix: Option<&str>, value: Option<&str>) {
        self.out.push('{');
        if let Some(prefix) = prefix {
            self.out.push_str(prefix);
            self.out.push('=');
        }
        self.out.push_str(value.unwrap_or_default());
        self.out.push('}');
    }
}

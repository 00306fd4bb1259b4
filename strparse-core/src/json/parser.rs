//! Recursive-descent parser for the relaxed JSON grammar.
//!
//! The parser never fails. Leading garbage is skipped, a property without a
//! `:` gets a null value, and input that ends mid-structure still closes
//! every level that was opened, so listeners always see a well-nested
//! sequence. Nesting deeper than [`JsonOptions::max_depth`] is treated the
//! same way: the container that would go too deep becomes a null value and
//! parsing stops there.

use log::debug;

use super::JsonListener;
use crate::scan::{self, EscapeSet, ESCAPE};
use crate::source::{CharSource, StrSource};
use crate::stream::CharStream;

/// Default limit on nested objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct JsonOptions {
    /// Deepest container nesting accepted, the root object included.
    pub max_depth: usize,
}

impl JsonOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// Parse the first object found in `input`.
///
/// ```
/// use strparse_core::json::{parse_str, EventRecorder, JsonEvent};
///
/// let mut events = EventRecorder::new();
/// parse_str("noise {}", &mut events);
/// assert_eq!(events.events, vec![JsonEvent::BeginObject, JsonEvent::EndObject]);
/// ```
pub fn parse_str<L: JsonListener>(input: &str, listener: &mut L) {
    // Everything before the first `{` is garbage; skip it without going
    // through the stream.
    let start = memchr::memchr(b'{', input.as_bytes()).unwrap_or(input.len());
    let mut stream = CharStream::new(StrSource::new(&input[start..]));
    JsonParser::new(&mut stream).parse(listener);
}

/// Relaxed JSON parser over a [`CharStream`].
pub struct JsonParser<'s, S> {
    stream: &'s mut CharStream<S>,
    options: JsonOptions,
    /// Open objects and arrays.
    depth: usize,
    /// Set once the depth limit was hit; every open level then closes.
    halted: bool,
}

impl<'s, S: CharSource> JsonParser<'s, S> {
    pub fn new(stream: &'s mut CharStream<S>) -> Self {
        Self::with_options(stream, JsonOptions::default())
    }

    pub fn with_options(stream: &'s mut CharStream<S>, options: JsonOptions) -> Self {
        Self { stream, options, depth: 0, halted: false }
    }

    /// Skip to the first `{` and parse one object from there.
    pub fn parse<L: JsonListener>(mut self, listener: &mut L) {
        let skipped = scan::skip_while(self.stream, |ch| ch != '{');
        if skipped {
            debug!("skipped leading garbage up to {}", self.stream.pointer());
        }
        if !self.object(listener) {
            debug!("no object found");
        }
    }

    fn object<L: JsonListener>(&mut self, listener: &mut L) -> bool {
        scan::skip_spaces(self.stream);
        if self.stream.peek() != Some('{') {
            return false;
        }
        self.stream.advance();
        self.depth += 1;
        listener.begin_object();
        while !self.halted {
            scan::skip_spaces(self.stream);
            match self.stream.peek() {
                None => {
                    debug!("input ends inside an object");
                    break;
                }
                Some('}') => {
                    self.stream.advance();
                    break;
                }
                Some(_) => {}
            }
            // Only an unquoted name can be missing; `''` is a real name.
            let name = match scan::read_quoted_with(self.stream, ESCAPE, EscapeSet::Json) {
                Some(name) => name,
                None => {
                    let word = self.bareword();
                    if word.is_empty() {
                        debug!("no property name at {}, closing object", self.stream.pointer());
                        break;
                    }
                    word
                }
            };
            listener.begin_property(&name);
            if self.colon() {
                self.value(listener);
            } else {
                listener.on_value(None);
            }
            listener.end_property(&name);
            scan::skip_spaces(self.stream);
            if self.stream.peek() == Some(',') {
                self.stream.advance();
            }
        }
        self.depth -= 1;
        listener.end_object();
        true
    }

    /// Consume a `:` after optional whitespace. Leaves the whitespace in
    /// place when no `:` follows.
    fn colon(&mut self) -> bool {
        let mut marker = self.stream.mark();
        scan::skip_spaces(&mut marker);
        if marker.peek() == Some(':') {
            marker.advance();
            marker.commit();
            true
        } else {
            marker.rewind();
            false
        }
    }

    fn array<L: JsonListener>(&mut self, listener: &mut L) {
        self.stream.advance();
        self.depth += 1;
        listener.begin_array();
        while !self.halted {
            scan::skip_spaces(self.stream);
            match self.stream.peek() {
                None => {
                    debug!("input ends inside an array");
                    break;
                }
                Some(']') => {
                    self.stream.advance();
                    break;
                }
                // A stray `}` belongs to an enclosing object.
                Some('}') => break,
                Some(':' | ',') => {
                    self.stream.advance();
                    continue;
                }
                Some(_) => {}
            }
            listener.begin_element();
            self.value(listener);
            listener.end_element();
            scan::skip_spaces(self.stream);
            if self.stream.peek() == Some(',') {
                self.stream.advance();
            }
        }
        self.depth -= 1;
        listener.end_array();
    }

    /// Emit exactly one value: an object, an array or a scalar.
    fn value<L: JsonListener>(&mut self, listener: &mut L) {
        scan::skip_spaces(self.stream);
        match self.stream.peek() {
            Some('{' | '[') if self.depth >= self.options.max_depth => {
                debug!("nesting deeper than {} at {}, stopping", self.options.max_depth, self.stream.pointer());
                self.halted = true;
                listener.on_value(None);
            }
            Some('{') => {
                self.object(listener);
            }
            Some('[') => self.array(listener),
            Some(ch) if scan::is_quote(ch) => {
                let text = scan::read_quoted_with(self.stream, ESCAPE, EscapeSet::Json).unwrap_or_default();
                listener.on_value(Some(&text));
            }
            _ => {
                let word = self.bareword();
                if word.is_empty() || word == "null" {
                    listener.on_value(None);
                } else {
                    listener.on_value(Some(&word));
                }
            }
        }
    }

    fn bareword(&mut self) -> String {
        scan::read_run(self.stream, |ch| scan::is_space(ch) || scan::is_structural(ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{EventRecorder, JsonEvent};
    use pretty_assertions::assert_eq;

    fn events(input: &str) -> Vec<JsonEvent> {
        let mut recorder = EventRecorder::new();
        parse_str(input, &mut recorder);
        recorder.into_events()
    }

    fn prop(name: &str, value: Option<&str>) -> Vec<JsonEvent> {
        vec![
            JsonEvent::BeginProperty(name.to_string()),
            JsonEvent::Value(value.map(str::to_string)),
            JsonEvent::EndProperty(name.to_string()),
        ]
    }

    fn object(props: Vec<Vec<JsonEvent>>) -> Vec<JsonEvent> {
        let mut events = vec![JsonEvent::BeginObject];
        events.extend(props.into_iter().flatten());
        events.push(JsonEvent::EndObject);
        events
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(events("{}"), object(vec![]));
        assert_eq!(events("  {    }    "), object(vec![]));
    }

    #[test]
    fn test_no_object() {
        assert_eq!(events(""), vec![]);
        assert_eq!(events("just text"), vec![]);
    }

    #[test]
    fn test_missing_value_is_null() {
        assert_eq!(events("{ x : }"), object(vec![prop("x", None)]));
        assert_eq!(events("{ x }"), object(vec![prop("x", None)]));
        assert_eq!(events("{ x y:z }"), object(vec![prop("x", None), prop("y", Some("z"))]));
    }

    #[test]
    fn test_null_bareword() {
        assert_eq!(events("{a:null, b:'null'}"), object(vec![prop("a", None), prop("b", Some("null"))]));
    }

    #[test]
    fn test_quoted_and_bare_look_alike() {
        assert_eq!(events("{'a':'b'}"), events("{a:b}"));
        assert_eq!(events("{\"a\" : \"b\"}"), events("{a:b}"));
    }

    #[test]
    fn test_json_escapes() {
        assert_eq!(events(r"{a:'x\nyA\f'}"), object(vec![prop("a", Some("x\nyA\u{0C}"))]));
    }

    #[test]
    fn test_stray_characters_in_arrays() {
        let expected = object(vec![vec![
            JsonEvent::BeginProperty("x".to_string()),
            JsonEvent::BeginArray,
            JsonEvent::BeginElement,
            JsonEvent::Value(Some("y".to_string())),
            JsonEvent::EndElement,
            JsonEvent::EndArray,
            JsonEvent::EndProperty("x".to_string()),
        ]]);
        assert_eq!(events("{ x: [ y }"), expected);
        assert_eq!(events("{ x: [ ,y:, ] }"), expected);
    }

    #[test]
    fn test_nested_empty_object_does_not_close_parent() {
        let mut inner = vec![JsonEvent::BeginProperty("a".to_string()), JsonEvent::BeginObject];
        inner.extend([JsonEvent::EndObject, JsonEvent::EndProperty("a".to_string())]);
        assert_eq!(events("{a:{ }, b:c}"), object(vec![inner, prop("b", Some("c"))]));
    }

    #[test]
    fn test_quoted_empty_name_is_kept() {
        assert_eq!(events("{'':x, b:y}"), object(vec![prop("", Some("x")), prop("b", Some("y"))]));
        assert_eq!(events("{ , b:y}"), object(vec![]));
    }

    #[test]
    fn test_depth_limit_closes_open_levels() {
        let mut stream = CharStream::from_text("{a:[[[x]]], b:c}");
        let mut recorder = EventRecorder::new();
        JsonParser::with_options(&mut stream, JsonOptions::default().max_depth(3)).parse(&mut recorder);
        let element = |inner: Vec<JsonEvent>| {
            let mut events = vec![JsonEvent::BeginArray, JsonEvent::BeginElement];
            events.extend(inner);
            events.extend([JsonEvent::EndElement, JsonEvent::EndArray]);
            events
        };
        let mut a = vec![JsonEvent::BeginProperty("a".to_string())];
        a.extend(element(element(vec![JsonEvent::Value(None)])));
        a.push(JsonEvent::EndProperty("a".to_string()));
        assert_eq!(recorder.events, object(vec![a]));
    }

    #[test]
    fn test_very_deep_nesting() {
        let input = format!("{{a:{}}}", "[".repeat(100_000));
        let recorded = events(&input);
        let opened = recorded.iter().filter(|e| matches!(e, JsonEvent::BeginArray)).count();
        let closed = recorded.iter().filter(|e| matches!(e, JsonEvent::EndArray)).count();
        assert_eq!(opened, DEFAULT_MAX_DEPTH - 1);
        assert_eq!(closed, opened);
        assert_eq!(recorded.last(), Some(&JsonEvent::EndObject));
    }

    #[test]
    fn test_parse_from_stream() {
        let mut stream = CharStream::from_text("xx {a:b} {c:d}");
        let mut recorder = EventRecorder::new();
        JsonParser::new(&mut stream).parse(&mut recorder);
        assert_eq!(recorder.events, object(vec![prop("a", Some("b"))]));
        assert_eq!(stream.peek(), Some(' '));
    }
}

//! Relaxed JSON-like object notation.
//!
//! The grammar accepts bare words alongside quoted strings, tolerates missing
//! separators and recovers from truncated input:
//!
//! ```text
//! document := garbage* object
//! object   := '{' (property (',' property)*)? '}'
//! property := (quoted | bareword) (':' value)?
//! value    := object | array | quoted | bareword
//! array    := '[' (value (',' value)*)? ']'
//! ```
//!
//! Everything is expressed as a SAX-style event sequence delivered to a
//! [`JsonListener`]. Producers: [`JsonParser`] (text) and [`JsonBuilder`]
//! (programmatic calls). Consumers: [`JsonSerializer`] (canonical text),
//! [`tree::JsonTree`] (a navigable document) and [`EventRecorder`].
//!
//! ## Event Sequences
//!
//! `{a: x, b: [1, {}]}` emits:
//! ```text
//! BeginObject
//!   BeginProperty("a")  Value(Some("x"))  EndProperty("a")
//!   BeginProperty("b")
//!     BeginArray
//!       BeginElement  Value(Some("1"))  EndElement
//!       BeginElement  BeginObject EndObject  EndElement
//!     EndArray
//!   EndProperty("b")
//! EndObject
//! ```

mod builder;
mod parser;
mod serializer;
pub mod tree;

pub use builder::JsonBuilder;
pub use parser::{parse_str, JsonOptions, JsonParser, DEFAULT_MAX_DEPTH};
pub use serializer::{escape, JsonSerializer};

/// Receiver of relaxed JSON events. Every method defaults to a no-op.
pub trait JsonListener {
    fn begin_object(&mut self) {}
    fn end_object(&mut self) {}
    fn begin_property(&mut self, _name: &str) {}
    fn end_property(&mut self, _name: &str) {}
    fn begin_array(&mut self) {}
    fn end_array(&mut self) {}
    fn begin_element(&mut self) {}
    fn end_element(&mut self) {}
    /// A scalar value; `None` is null.
    fn on_value(&mut self, _value: Option<&str>) {}
}

impl<L: JsonListener + ?Sized> JsonListener for &mut L {
    fn begin_object(&mut self) {
        (**self).begin_object()
    }
    fn end_object(&mut self) {
        (**self).end_object()
    }
    fn begin_property(&mut self, name: &str) {
        (**self).begin_property(name)
    }
    fn end_property(&mut self, name: &str) {
        (**self).end_property(name)
    }
    fn begin_array(&mut self) {
        (**self).begin_array()
    }
    fn end_array(&mut self) {
        (**self).end_array()
    }
    fn begin_element(&mut self) {
        (**self).begin_element()
    }
    fn end_element(&mut self) {
        (**self).end_element()
    }
    fn on_value(&mut self, value: Option<&str>) {
        (**self).on_value(value)
    }
}

/// An owned event, as captured by [`EventRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonEvent {
    BeginObject,
    EndObject,
    BeginProperty(String),
    EndProperty(String),
    BeginArray,
    EndArray,
    BeginElement,
    EndElement,
    Value(Option<String>),
}

impl JsonEvent {
    /// Deliver this event to a listener.
    pub fn emit<L: JsonListener + ?Sized>(&self, listener: &mut L) {
        match self {
            Self::BeginObject => listener.begin_object(),
            Self::EndObject => listener.end_object(),
            Self::BeginProperty(name) => listener.begin_property(name),
            Self::EndProperty(name) => listener.end_property(name),
            Self::BeginArray => listener.begin_array(),
            Self::EndArray => listener.end_array(),
            Self::BeginElement => listener.begin_element(),
            Self::EndElement => listener.end_element(),
            Self::Value(value) => listener.on_value(value.as_deref()),
        }
    }
}

/// Listener collecting every event it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRecorder {
    pub events: Vec<JsonEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the recorded events into another listener.
    pub fn replay<L: JsonListener + ?Sized>(&self, listener: &mut L) {
        for event in &self.events {
            event.emit(listener);
        }
    }

    pub fn into_events(self) -> Vec<JsonEvent> {
        self.events
    }
}

impl JsonListener for EventRecorder {
    fn begin_object(&mut self) {
        self.events.push(JsonEvent::BeginObject);
    }
    fn end_object(&mut self) {
        self.events.push(JsonEvent::EndObject);
    }
    fn begin_property(&mut self, name: &str) {
        self.events.push(JsonEvent::BeginProperty(name.to_string()));
    }
    fn end_property(&mut self, name: &str) {
        self.events.push(JsonEvent::EndProperty(name.to_string()));
    }
    fn begin_array(&mut self) {
        self.events.push(JsonEvent::BeginArray);
    }
    fn end_array(&mut self) {
        self.events.push(JsonEvent::EndArray);
    }
    fn begin_element(&mut self) {
        self.events.push(JsonEvent::BeginElement);
    }
    fn end_element(&mut self) {
        self.events.push(JsonEvent::EndElement);
    }
    fn on_value(&mut self, value: Option<&str>) {
        self.events.push(JsonEvent::Value(value.map(str::to_string)));
    }
}

/// Parse `input` and render it back in canonical form.
///
/// ```
/// assert_eq!(
///     strparse_core::json::canonicalize("  { x : [ A,  B, C]   }  "),
///     "{x:['A','B','C']}"
/// );
/// ```
pub fn canonicalize(input: &str) -> String {
    let mut serializer = JsonSerializer::new();
    parse_str(input, &mut serializer);
    serializer.into_string()
}

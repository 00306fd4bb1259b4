//! Canonical text rendering of relaxed JSON events.

use std::fmt::{self, Write};

use phf::phf_map;

use super::JsonListener;

/// Characters written as two-character escapes. Each one forces quoting.
static ESCAPES: phf::Map<char, &'static str> = phf_map! {
    '\'' => "\\'",
    '"' => "\\\"",
    '\\' => "\\\\",
    '\t' => "\\t",
    '\n' => "\\n",
    '\r' => "\\r",
    '\u{0C}' => "\\f",
};

/// Punctuation kept verbatim that still forces quoting, so identifier-like
/// values such as URLs and timestamps stay readable.
#[inline]
fn forces_quotes(ch: char) -> bool {
    matches!(ch, ':' | ';' | '+' | '-' | '/' | '=' | '!' | '{' | '}' | '[' | ']' | ',')
}

/// Escape `text` into `out`. Returns whether the result needs quotes.
///
/// Spaces are written as `\ ` when `escape_spaces` is set or at the very
/// start of the text, and always force quoting. Control characters without a
/// short escape become `\uXXXX`.
pub fn escape(text: &str, escape_spaces: bool, out: &mut String) -> bool {
    let mut quote = false;
    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            out.push_str(if i == 0 || escape_spaces { "\\ " } else { " " });
            quote = true;
        } else if let Some(escaped) = ESCAPES.get(&ch) {
            out.push_str(escaped);
            quote = true;
        } else if forces_quotes(ch) {
            out.push(ch);
            quote = true;
        } else if ch < ' ' {
            // Writing into a String cannot fail.
            let _ = write!(out, "\\u{:04x}", ch as u32);
            quote = true;
        } else {
            out.push(ch);
        }
    }
    quote
}

/// Listener rendering events as canonical relaxed JSON.
///
/// Property names are quoted only when needed, scalar values are always
/// single-quoted and nulls print as `null`:
///
/// ```
/// use strparse_core::json::{JsonListener, JsonSerializer};
///
/// let mut out = JsonSerializer::new();
/// out.begin_object();
/// out.begin_property("rdf:type");
/// out.on_value(Some("Test"));
/// out.end_property("rdf:type");
/// out.end_object();
/// assert_eq!(out.into_string(), "{'rdf:type':'Test'}");
/// ```
#[derive(Debug)]
pub struct JsonSerializer<W = String> {
    out: W,
    /// Children written so far, one counter per open container.
    counts: Vec<usize>,
    scratch: String,
    error: Option<fmt::Error>,
}

impl JsonSerializer<String> {
    pub fn new() -> Self {
        Self::with_writer(String::new())
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    /// Drop the text written so far, keeping the allocation.
    pub fn clear(&mut self) {
        self.out.clear();
        self.counts.clear();
    }
}

impl Default for JsonSerializer<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> JsonSerializer<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out, counts: Vec::new(), scratch: String::new(), error: None }
    }

    /// Hand back the writer, or the first write error encountered.
    pub fn finish(self) -> Result<W, fmt::Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn print(&mut self, text: &str) {
        if self.error.is_none() {
            if let Err(err) = self.out.write_str(text) {
                self.error = Some(err);
            }
        }
    }

    fn flush_scratch(&mut self, quoted: bool) {
        let text = std::mem::take(&mut self.scratch);
        if quoted {
            self.print("'");
            self.print(&text);
            self.print("'");
        } else {
            self.print(&text);
        }
        self.scratch = text;
        self.scratch.clear();
    }

    /// Bump the child counter of the innermost container, writing a
    /// separator for every child but the first.
    fn separate(&mut self) {
        if let Some(count) = self.counts.last_mut() {
            *count += 1;
            if *count > 1 {
                self.print(",");
            }
        }
    }
}

impl<W: Write> JsonListener for JsonSerializer<W> {
    fn begin_object(&mut self) {
        self.print("{");
        self.counts.push(0);
    }

    fn end_object(&mut self) {
        self.print("}");
        self.counts.pop();
    }

    fn begin_property(&mut self, name: &str) {
        self.separate();
        let quoted = escape(name, true, &mut self.scratch) || name.is_empty();
        self.flush_scratch(quoted);
        self.print(":");
    }

    fn begin_array(&mut self) {
        self.print("[");
        self.counts.push(0);
    }

    fn end_array(&mut self) {
        self.print("]");
        self.counts.pop();
    }

    fn begin_element(&mut self) {
        self.separate();
    }

    fn on_value(&mut self, value: Option<&str>) {
        match value {
            None => self.print("null"),
            Some(value) => {
                escape(value, false, &mut self.scratch);
                self.flush_scratch(true);
            }
        }
    }
}

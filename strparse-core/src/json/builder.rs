//! Programmatic producer of relaxed JSON events.

use log::trace;

use super::JsonListener;
use crate::error::BuilderError;

#[derive(Debug)]
enum Frame {
    /// `element` is set when the container is an array element and closing
    /// it must also close the element.
    Object { element: bool },
    Array { element: bool },
    Property { name: String, has_value: bool },
}

/// Drives a [`JsonListener`] through checked method calls.
///
/// Every call is validated against the current nesting before anything is
/// emitted, so a rejected call leaves the listener untouched. Array element
/// events are emitted automatically.
///
/// ```
/// use strparse_core::json::{JsonBuilder, JsonSerializer};
///
/// let mut builder = JsonBuilder::new(JsonSerializer::new());
/// builder.begin_object()?.add_property("id", Some("007"))?;
/// builder.begin_property("tags")?.begin_array()?.add_array_values(["a", "b"])?;
/// builder.end()?.end()?.end()?;
/// assert!(builder.is_complete());
/// assert_eq!(builder.into_inner().into_string(), "{id:'007',tags:['a','b']}");
/// # Ok::<(), strparse_core::BuilderError>(())
/// ```
#[derive(Debug)]
pub struct JsonBuilder<L> {
    listener: L,
    stack: Vec<Frame>,
    complete: bool,
}

impl<L: JsonListener> JsonBuilder<L> {
    pub fn new(listener: L) -> Self {
        Self { listener, stack: Vec::new(), complete: false }
    }

    /// Whether a root value was opened and every level has been closed.
    pub fn is_complete(&self) -> bool {
        self.complete && self.stack.is_empty()
    }

    /// Current nesting depth. Properties count as a level.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_inner(self) -> L {
        self.listener
    }

    pub fn begin_object(&mut self) -> Result<&mut Self, BuilderError> {
        let element = self.place_container("an object")?;
        self.listener.begin_object();
        self.stack.push(Frame::Object { element });
        Ok(self)
    }

    pub fn begin_array(&mut self) -> Result<&mut Self, BuilderError> {
        let element = self.place_container("an array")?;
        self.listener.begin_array();
        self.stack.push(Frame::Array { element });
        Ok(self)
    }

    /// Open a property of the innermost object. Close it with [`end`](Self::end).
    pub fn begin_property(&mut self, name: &str) -> Result<&mut Self, BuilderError> {
        if !matches!(self.stack.last(), Some(Frame::Object { .. })) {
            return Err(BuilderError::PropertyOutsideObject(name.to_string()));
        }
        self.listener.begin_property(name);
        self.stack.push(Frame::Property { name: name.to_string(), has_value: false });
        Ok(self)
    }

    /// A complete property with a scalar value.
    pub fn add_property(&mut self, name: &str, value: Option<&str>) -> Result<&mut Self, BuilderError> {
        self.begin_property(name)?.property_value(value)?.end()
    }

    /// Set the scalar value of the open property.
    pub fn property_value(&mut self, value: Option<&str>) -> Result<&mut Self, BuilderError> {
        match self.stack.last_mut() {
            Some(Frame::Property { has_value: false, .. }) => {}
            Some(Frame::Property { name, .. }) => return Err(BuilderError::PropertyAlreadySet(name.clone())),
            _ => return Err(BuilderError::ValueOutsideProperty),
        }
        self.listener.on_value(value);
        if let Some(Frame::Property { has_value, .. }) = self.stack.last_mut() {
            *has_value = true;
        }
        Ok(self)
    }

    /// Append a scalar element to the innermost array.
    pub fn add_array_value(&mut self, value: Option<&str>) -> Result<&mut Self, BuilderError> {
        if !matches!(self.stack.last(), Some(Frame::Array { .. })) {
            return Err(BuilderError::ValueOutsideArray);
        }
        self.listener.begin_element();
        self.listener.on_value(value);
        self.listener.end_element();
        Ok(self)
    }

    pub fn add_array_values<I, V>(&mut self, values: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        if !matches!(self.stack.last(), Some(Frame::Array { .. })) {
            return Err(BuilderError::ValueOutsideArray);
        }
        for value in values {
            self.add_array_value(Some(value.as_ref()))?;
        }
        Ok(self)
    }

    /// Close the innermost open object, array or property. A property closed
    /// without a value gets a null one.
    pub fn end(&mut self) -> Result<&mut Self, BuilderError> {
        let frame = self.stack.pop().ok_or(BuilderError::NothingToClose)?;
        match frame {
            Frame::Object { element } => {
                self.listener.end_object();
                if element {
                    self.listener.end_element();
                }
            }
            Frame::Array { element } => {
                self.listener.end_array();
                if element {
                    self.listener.end_element();
                }
            }
            Frame::Property { name, has_value } => {
                if !has_value {
                    trace!("property `{name}` closed without a value");
                    self.listener.on_value(None);
                }
                self.listener.end_property(&name);
            }
        }
        if self.stack.is_empty() {
            self.complete = true;
        }
        Ok(self)
    }

    /// Check where a new container would go and emit the element opening if
    /// it lands in an array. Returns whether it did.
    fn place_container(&mut self, what: &'static str) -> Result<bool, BuilderError> {
        match self.stack.last_mut() {
            None if self.complete => Err(BuilderError::RootComplete),
            None => {
                self.complete = true;
                Ok(false)
            }
            Some(Frame::Array { .. }) => {
                self.listener.begin_element();
                Ok(true)
            }
            Some(Frame::Property { name, has_value }) => {
                if *has_value {
                    return Err(BuilderError::PropertyAlreadySet(name.clone()));
                }
                *has_value = true;
                Ok(false)
            }
            Some(Frame::Object { .. }) => Err(BuilderError::MisplacedContainer(what)),
        }
    }
}

//! Mail address lists: `Name <email>, "Quoted Name" <email>; bare@host`.
//!
//! Entries are separated by `,` or `;`. A name is either a `"`-quoted
//! literal or everything up to the next separator or `<`, trimmed. An
//! optional `<email>` follows; an unterminated `<` runs to the end of the
//! input. A name with an `@` past its first character and no `<email>` is
//! taken as the email.

use std::fmt;
use std::ops::ControlFlow;

use crate::scan::{self, ESCAPE};
use crate::source::{CharSource, StrSource};
use crate::stream::CharStream;

/// Receiver of parsed addresses. Return `ControlFlow::Break` to stop.
pub trait AddressListener {
    fn on_address(&mut self, email: &str, name: &str) -> ControlFlow<()>;
}

impl<F> AddressListener for F
where
    F: FnMut(&str, &str) -> ControlFlow<()>,
{
    fn on_address(&mut self, email: &str, name: &str) -> ControlFlow<()> {
        self(email, name)
    }
}

/// One list entry. Either part may be empty, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    pub name: String,
    pub email: String,
}

impl Address {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.email.is_empty()) {
            (true, _) => write!(f, "<{}>", self.email),
            (false, true) => write!(f, "{}", self.name),
            (false, false) => write!(f, "\"{}\" <{}>", self.name, self.email),
        }
    }
}

/// Collect every address in `input`.
///
/// ```
/// use strparse_core::address::{parse_addresses, Address};
///
/// assert_eq!(
///     parse_addresses("Amy <amy@example.com>; bob@example.com"),
///     vec![Address::new("Amy", "amy@example.com"), Address::new("", "bob@example.com")]
/// );
/// ```
pub fn parse_addresses(input: &str) -> Vec<Address> {
    let mut addresses = Vec::new();
    let mut stream = CharStream::new(StrSource::new(input));
    let _ = AddressParser::new(&mut stream).parse(&mut |email: &str, name: &str| -> ControlFlow<()> {
        addresses.push(Address::new(name, email));
        ControlFlow::Continue(())
    });
    addresses
}

pub struct AddressParser<'s, S> {
    stream: &'s mut CharStream<S>,
}

impl<'s, S: CharSource> AddressParser<'s, S> {
    pub fn new(stream: &'s mut CharStream<S>) -> Self {
        Self { stream }
    }

    /// Parse entries until the input ends or the listener breaks.
    pub fn parse<L: AddressListener + ?Sized>(mut self, listener: &mut L) -> ControlFlow<()> {
        loop {
            scan::skip_while(self.stream, |ch| scan::is_space(ch) || scan::is_delimiter(ch));
            if self.stream.is_terminated() {
                return ControlFlow::Continue(());
            }
            let mut name = self.name();
            let mut email = self.email();
            if email.is_empty() && name.char_indices().any(|(i, ch)| ch == '@' && i > 0) {
                email = std::mem::take(&mut name);
            }
            if name.is_empty() && email.is_empty() {
                continue;
            }
            if listener.on_address(&email, &name).is_break() {
                return ControlFlow::Break(());
            }
        }
    }

    fn name(&mut self) -> String {
        if self.stream.peek() == Some('"') {
            let name = scan::read_quoted(self.stream, ESCAPE).unwrap_or_default();
            scan::skip_spaces(self.stream);
            return name.trim().to_string();
        }
        let name = scan::read_run(self.stream, |ch| ch == '<' || scan::is_delimiter(ch));
        name.trim().to_string()
    }

    fn email(&mut self) -> String {
        if self.stream.peek() != Some('<') {
            return String::new();
        }
        self.stream.advance();
        let email = scan::read_run(self.stream, |ch| ch == '>');
        self.stream.advance();
        email.trim().to_string()
    }
}

//! Character sources feeding a [`CharStream`](crate::CharStream).

use std::str::Chars;

/// A pull-based supplier of characters.
///
/// `next_char` returns `None` once the input is exhausted. The stream never
/// calls it again after the first `None`.
pub trait CharSource {
    fn next_char(&mut self) -> Option<char>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        (**self).next_char()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        (**self).next_char()
    }
}

/// Characters of a borrowed string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    text: &'a str,
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, chars: text.chars() }
    }

    /// The full text this source was created from.
    pub fn text(&self) -> &'a str {
        self.text
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }
}

/// Adapts any `char` iterator.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator<Item = char>> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator<Item = char>> CharSource for IterSource<I> {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        self.iter.next()
    }
}

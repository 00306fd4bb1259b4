//! Token scanning primitives shared by the parsers.
//!
//! Every function works on the cursor of a [`CharStream`]: it inspects the
//! character under the cursor, advances past what it recognizes and returns
//! the consumed text (or whether anything was skipped). None of them keep
//! state between calls.

use phf::phf_map;

use crate::source::CharSource;
use crate::stream::CharStream;

/// Default escape character.
pub const ESCAPE: char = '\\';

/// Named escapes understood by every quoted literal. Anything else after the
/// escape character stands for itself.
static NAMED_ESCAPES: phf::Map<char, char> = phf_map! {
    'n' => '\n',
    'r' => '\r',
    't' => '\t',
};

/// The relaxed JSON grammar additionally knows form feeds (and `\uXXXX`,
/// handled in [`read_quoted_with`]).
static JSON_ESCAPES: phf::Map<char, char> = phf_map! {
    'n' => '\n',
    'r' => '\r',
    't' => '\t',
    'f' => '\u{0C}',
};

/// Which escape sequences a quoted literal decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeSet {
    /// `\n`, `\r`, `\t`.
    #[default]
    Named,
    /// `\n`, `\r`, `\t`, `\f` and `\uXXXX`.
    Json,
}

#[inline]
pub fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

#[inline]
pub fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"')
}

/// List delimiters.
#[inline]
pub fn is_delimiter(ch: char) -> bool {
    matches!(ch, ',' | ';')
}

/// Characters with structural meaning in the relaxed JSON grammar.
#[inline]
pub fn is_structural(ch: char) -> bool {
    matches!(ch, '{' | '}' | '[' | ']' | ':' | ',')
}

/// Decode the character following an escape character.
#[inline]
pub fn unescape(ch: char) -> char {
    NAMED_ESCAPES.get(&ch).copied().unwrap_or(ch)
}

/// Skip whitespace. Returns whether anything was skipped.
pub fn skip_spaces<S: CharSource>(stream: &mut CharStream<S>) -> bool {
    skip_while(stream, is_space)
}

/// Skip list delimiters. Returns whether anything was skipped.
pub fn skip_delimiters<S: CharSource>(stream: &mut CharStream<S>) -> bool {
    skip_while(stream, is_delimiter)
}

/// Skip characters while `pred` holds. Returns whether anything was skipped.
pub fn skip_while<S, P>(stream: &mut CharStream<S>, pred: P) -> bool
where
    S: CharSource,
    P: Fn(char) -> bool,
{
    let mut skipped = false;
    while let Some(ch) = stream.peek() {
        if !pred(ch) {
            break;
        }
        skipped = true;
        stream.advance();
    }
    skipped
}

/// Read a quoted literal starting at the cursor.
///
/// Returns `None` (consuming nothing) if the cursor is not on a quote
/// character. The closing quote is consumed. A literal left open at the end
/// of input is returned as read so far.
pub fn read_quoted<S: CharSource>(stream: &mut CharStream<S>, escape: char) -> Option<String> {
    read_quoted_with(stream, escape, EscapeSet::Named)
}

/// [`read_quoted`] with an explicit escape set.
pub fn read_quoted_with<S: CharSource>(
    stream: &mut CharStream<S>,
    escape: char,
    escapes: EscapeSet,
) -> Option<String> {
    let quote = stream.peek().filter(|&ch| is_quote(ch))?;
    stream.advance();
    let mut text = String::new();
    while let Some(ch) = stream.peek() {
        stream.advance();
        if ch == escape {
            let Some(next) = stream.peek() else { break };
            stream.advance();
            match escapes {
                EscapeSet::Named => text.push(unescape(next)),
                EscapeSet::Json if next == 'u' => read_unicode_escape(stream, &mut text),
                EscapeSet::Json => text.push(JSON_ESCAPES.get(&next).copied().unwrap_or(next)),
            }
        } else if ch == quote {
            return Some(text);
        } else {
            text.push(ch);
        }
    }
    log::debug!("unterminated quoted literal at {}", stream.pointer());
    Some(text)
}

/// Decode the `XXXX` of a `\uXXXX` escape. Fewer than four hex digits are
/// kept literally, together with the `u`.
fn read_unicode_escape<S: CharSource>(stream: &mut CharStream<S>, text: &mut String) {
    let mut value = 0u32;
    let mut digits = String::with_capacity(4);
    while digits.len() < 4 {
        let Some((ch, digit)) = stream.peek().and_then(|ch| ch.to_digit(16).map(|d| (ch, d))) else {
            break;
        };
        digits.push(ch);
        value = value * 16 + digit;
        stream.advance();
    }
    if digits.len() == 4 {
        text.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
    } else {
        text.push('u');
        text.push_str(&digits);
    }
}

/// Read an unquoted word up to whitespace or any character matched by `stop`.
///
/// The escape character makes the following character part of the word,
/// whatever it is (`toto\(titi` reads as `toto(titi`).
pub fn read_word<S, P>(stream: &mut CharStream<S>, escape: char, stop: P) -> String
where
    S: CharSource,
    P: Fn(char) -> bool,
{
    let mut word = String::new();
    while let Some(ch) = stream.peek() {
        if ch == escape {
            stream.advance();
            if let Some(next) = stream.peek() {
                word.push(next);
                stream.advance();
            }
            continue;
        }
        if is_space(ch) || stop(ch) {
            break;
        }
        word.push(ch);
        stream.advance();
    }
    word
}

/// Read a raw run of characters for which `stop` does not hold, with no
/// escape processing. The text is taken straight out of the stream buffer.
pub fn read_run<S, P>(stream: &mut CharStream<S>, stop: P) -> String
where
    S: CharSource,
    P: Fn(char) -> bool,
{
    let mut marker = stream.mark();
    skip_while(&mut marker, |ch| !stop(ch));
    let text = marker.text();
    marker.commit();
    text
}

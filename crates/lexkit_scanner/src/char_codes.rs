//! Byte and code point classification used by the scanner.

use unicode_general_category::{get_general_category, GeneralCategory};

pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const DOT: u8 = b'.';
pub const PLUS: u8 = b'+';
pub const MINUS: u8 = b'-';
pub const E_LOWER: u8 = b'e';
pub const E_UPPER: u8 = b'E';
pub const UNDERSCORE: char = '_';

/// Check if a byte is whitespace that goes into a token's indent.
#[inline]
pub fn is_white_space(b: u8) -> bool {
    matches!(b, SPACE | TAB | CARRIAGE_RETURN | LINE_FEED)
}

/// Check if a byte is a decimal digit.
#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// Check if a byte starts an exponent marker.
#[inline]
pub fn is_exponent_marker(b: u8) -> bool {
    b == E_LOWER || b == E_UPPER
}

/// Check if a code point counts as a letter for keyword scanning:
/// any code point in a letter category (Lu, Ll, Lt, Lm, Lo).
#[inline]
pub fn is_letter(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic();
    }
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Count line feeds in a byte slice.
#[inline]
pub fn count_line_feeds(bytes: &[u8]) -> u32 {
    memchr::memchr_iter(LINE_FEED, bytes).count() as u32
}

/// Width of the UTF-8 sequence introduced by `first`, or `None` if `first`
/// cannot start a sequence.
#[inline]
fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decode the code point at the start of `bytes`.
///
/// Returns the character and its encoded width, or `None` for an empty
/// slice or an invalid/truncated sequence.
pub fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let width = utf8_width(*bytes.first()?)?;
    let chunk = bytes.get(..width)?;
    let ch = std::str::from_utf8(chunk).ok()?.chars().next()?;
    Some((ch, width))
}

/// Number of bytes an Unknown token starting at `bytes` spans: one whole
/// code point, or a single byte when the input is not valid UTF-8 there.
#[inline]
pub fn unknown_width(bytes: &[u8]) -> usize {
    decode_char(bytes).map_or(1, |(_, width)| width)
}

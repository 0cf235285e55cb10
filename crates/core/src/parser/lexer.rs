//! Byte-level token helpers.
//!
//! The engine never builds a token stream. These helpers answer the few
//! questions the mutation stages ask of raw bytes: where does the next token
//! start, is this an indirect reference, and where does a key sit inside a
//! dictionary.

use std::ops::Range;

use super::objects::ObjRef;

/// Check if byte is PDF whitespace.
#[inline]
pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x00' | b'\x0c')
}

/// Check if byte is a PDF delimiter.
#[inline]
pub const fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Check if byte ends a name or keyword.
#[inline]
pub const fn is_token_end(b: u8) -> bool {
    is_whitespace(b) || is_delimiter(b)
}

/// Return the first non-whitespace position at or after `pos`.
pub fn skip_whitespace(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && is_whitespace(data[pos]) {
        pos += 1;
    }
    pos
}

fn read_digits(data: &[u8], pos: usize) -> Option<(u64, usize)> {
    let mut end = pos;
    while end < data.len() && data[end].is_ascii_digit() {
        end += 1;
    }
    if end == pos {
        return None;
    }
    let value = std::str::from_utf8(&data[pos..end]).ok()?.parse().ok()?;
    Some((value, end))
}

/// Parse an indirect reference `<objid> <genno> R` starting exactly at `pos`.
///
/// Returns the reference and the offset just past the `R`.
pub fn parse_ref(data: &[u8], pos: usize) -> Option<(ObjRef, usize)> {
    let (objid, cursor) = read_digits(data, pos)?;
    let gap = skip_whitespace(data, cursor);
    if gap == cursor {
        return None;
    }
    let (genno, cursor) = read_digits(data, gap)?;
    let gap = skip_whitespace(data, cursor);
    if gap == cursor || data.get(gap) != Some(&b'R') {
        return None;
    }
    let end = gap + 1;
    if end < data.len() && !is_token_end(data[end]) {
        return None;
    }
    let objid = u32::try_from(objid).ok()?;
    let genno = u32::try_from(genno).ok()?;
    Some((ObjRef::new(objid, genno), end))
}

/// Skip a literal string whose opening `(` is at `pos`.
///
/// Returns the offset just past the closing `)`, or the end of data.
fn skip_literal_string(data: &[u8], pos: usize) -> usize {
    let mut depth = 0usize;
    let mut i = pos;
    while i < data.len() {
        match data[i] {
            b'\\' => i += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    data.len()
}

/// Position of a key found directly inside a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch {
    /// Offset of the key's leading `/`.
    pub key_start: usize,
    /// Offset of the first non-whitespace byte of the value.
    pub value_start: usize,
}

/// Find `key` (including its leading `/`) at the top level of the
/// dictionary occupying `dict`.
///
/// Keys inside nested dictionaries and literal strings are ignored, and the
/// key must end at a token boundary so `/Page` never matches `/Pages`.
pub fn find_key(data: &[u8], dict: Range<usize>, key: &[u8]) -> Option<KeyMatch> {
    let end = dict.end.min(data.len());
    let mut depth = 0usize;
    let mut i = dict.start;
    while i < end {
        let rest = &data[i..end];
        if rest.starts_with(b"<<") {
            depth += 1;
            i += 2;
        } else if rest.starts_with(b">>") {
            depth = depth.saturating_sub(1);
            i += 2;
        } else if rest[0] == b'(' {
            i = skip_literal_string(data, i);
        } else if depth == 1 && rest.starts_with(key) {
            let after = i + key.len();
            if after < data.len() && !is_token_end(data[after]) {
                i += 1;
                continue;
            }
            return Some(KeyMatch {
                key_start: i,
                value_start: skip_whitespace(data, after),
            });
        } else {
            i += 1;
        }
    }
    None
}

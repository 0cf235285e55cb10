//! Dictionary span scanner.
//!
//! Dictionaries nest, so no regular expression can find where one ends.
//! This is the only place the engine tracks nesting; everything above it
//! works on the spans returned here.

use std::ops::Range;

use crate::error::{PolyError, Result};

/// Find the end of the dictionary whose first `<<` is at or after `start`.
///
/// Returns the offset just past the `>>` that brings the nesting depth back
/// to zero. Running off the end of `data` first is a structural error.
pub fn dict_end(data: &[u8], start: usize) -> Result<usize> {
    let mut depth: i64 = 0;
    let mut i = start;
    while i + 1 < data.len() {
        match &data[i..i + 2] {
            b"<<" => {
                depth += 1;
                i += 2;
            }
            b">>" => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => i += 1,
        }
    }
    Err(PolyError::StructuralScan { offset: start })
}

/// Span of the first dictionary at or after `from`, from its opening `<<`
/// through its closing `>>`.
pub fn dict_span(data: &[u8], from: usize) -> Result<Range<usize>> {
    let open = find(data, b"<<", from).ok_or(PolyError::StructuralScan { offset: from })?;
    let end = dict_end(data, open)?;
    Ok(open..end)
}

/// First occurrence of `needle` in `data[from..]`, as an absolute offset.
pub fn find(data: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= data.len() {
        return None;
    }
    data[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| from + pos)
}

/// Last occurrence of `needle` that lies entirely within `range`.
pub fn rfind(data: &[u8], needle: &[u8], range: Range<usize>) -> Option<usize> {
    let end = range.end.min(data.len());
    if range.start >= end {
        return None;
    }
    data[range.start..end]
        .windows(needle.len())
        .rposition(|w| w == needle)
        .map(|pos| range.start + pos)
}

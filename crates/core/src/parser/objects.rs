//! Object index: raw scans for `N G obj ... endobj` definitions.
//!
//! Nothing here is cached. Every mutation shifts byte offsets, so callers
//! rescan the current buffer whenever they need a span.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::bytes::Regex;

use super::dict::{dict_end, find};
use super::lexer::{find_key, parse_ref, skip_whitespace};
use crate::error::{PolyError, Result};

/// `N G obj` header, tolerating spaces, tabs and line breaks between tokens.
static OBJ_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)(\d+)[ \t\r\n]+(\d+)[ \t\r\n]+obj\b").expect("valid object header regex")
});

/// PDF indirect object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef {
    /// Object ID
    pub objid: u32,
    /// Generation number
    pub genno: u32,
}

impl ObjRef {
    /// Create a new object reference.
    pub const fn new(objid: u32, genno: u32) -> Self {
        Self { objid, genno }
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.objid, self.genno)
    }
}

/// Byte range of one `N G obj ... endobj` definition.
///
/// Valid only for the buffer it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSpan {
    pub objid: u32,
    pub genno: u32,
    pub range: Range<usize>,
}

impl ObjectSpan {
    /// Bytes of this definition within `data`.
    pub fn bytes<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.range.clone()]
    }

    /// Absolute span of the object's outer dictionary.
    ///
    /// `Ok(None)` when the object holds no dictionary; an error when the
    /// dictionary does not close before `endobj`.
    pub fn dict(&self, data: &[u8]) -> Result<Option<Range<usize>>> {
        let bounded = &data[..self.range.end];
        let Some(open) = find(bounded, b"<<", self.range.start) else {
            return Ok(None);
        };
        let end = dict_end(bounded, open)?;
        Ok(Some(open..end))
    }
}

fn capture_u32(bytes: &[u8]) -> Option<u32> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

/// Offset just past the `endobj` closing the definition whose body starts
/// at `body`.
///
/// Stream data is skipped by its `/Length`, so `endobj` or header-shaped
/// text inside a stream neither ends the object nor starts a new one.
fn definition_end(data: &[u8], body: usize) -> Option<usize> {
    let first = find(data, b"endobj", body)?;
    let resume = stream_data_end(data, body, first).unwrap_or(body);
    let close = find(data, b"endobj", resume).unwrap_or(first);
    Some(close + b"endobj".len())
}

/// End of the stream data following the dictionary at `body`, when the
/// object is a stream with a direct `/Length` that lands on `endstream`.
fn stream_data_end(data: &[u8], body: usize, limit: usize) -> Option<usize> {
    let open = skip_whitespace(data, body);
    if !data.get(open..)?.starts_with(b"<<") {
        return None;
    }
    let dict_close = dict_end(&data[..limit], open).ok()?;
    let keyword = skip_whitespace(data, dict_close);
    if !data.get(keyword..)?.starts_with(b"stream") {
        return None;
    }

    let mut start = keyword + b"stream".len();
    if data.get(start) == Some(&b'\r') {
        start += 1;
    }
    if data.get(start) == Some(&b'\n') {
        start += 1;
    }
    let end = start.checked_add(direct_length(data, open..dict_close)?)?;
    let after = skip_whitespace(data, end);
    data.get(after..)?.starts_with(b"endstream").then_some(after)
}

/// `/Length` of a stream dictionary when written as a plain integer.
fn direct_length(data: &[u8], dict: Range<usize>) -> Option<usize> {
    let found = find_key(data, dict.clone(), b"/Length")?;
    if parse_ref(data, found.value_start).is_some() {
        return None;
    }
    let value = data.get(found.value_start..dict.end)?;
    let digits = value.iter().take_while(|b| b.is_ascii_digit()).count();
    std::str::from_utf8(&value[..digits]).ok()?.parse().ok()
}

/// Highest object ID defined in `data`, or `None` when there are no
/// definitions at all.
pub fn highest_id(data: &[u8]) -> Option<u32> {
    definitions(data).map(|span| span.objid).max()
}

/// ID the engine allocates for the next synthesized object.
pub fn next_free_id(data: &[u8]) -> u32 {
    highest_id(data).map_or(1, |id| id.saturating_add(1))
}

/// Iterate over every object definition in buffer order, superseded ones
/// included.
pub fn definitions(data: &[u8]) -> impl Iterator<Item = ObjectSpan> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        loop {
            let cap = OBJ_HEADER.captures_at(data, pos)?;
            let header = cap.get(0)?;
            let end = definition_end(data, header.end())?;
            pos = end;
            if let (Some(objid), Some(genno)) = (capture_u32(&cap[1]), capture_u32(&cap[2])) {
                return Some(ObjectSpan {
                    objid,
                    genno,
                    range: header.start()..end,
                });
            }
        }
    })
}

/// Definitions a reader would resolve: the last one for each ID, in buffer
/// order. Earlier copies replaced by an incremental update are dropped.
pub fn current_definitions(data: &[u8]) -> Vec<ObjectSpan> {
    let all: Vec<ObjectSpan> = definitions(data).collect();
    let mut last = BTreeMap::new();
    for (index, span) in all.iter().enumerate() {
        last.insert(span.objid, index);
    }
    all.into_iter()
        .enumerate()
        .filter(|(index, span)| last.get(&span.objid) == Some(index))
        .map(|(_, span)| span)
        .collect()
}

/// Resolve `objid` to its current (last) definition.
pub fn locate(data: &[u8], objid: u32) -> Result<ObjectSpan> {
    definitions(data)
        .filter(|span| span.objid == objid)
        .last()
        .ok_or(PolyError::ObjectNotFound(objid))
}

/// Header offset and generation of every current definition, keyed by
/// object ID.
pub fn header_offsets(data: &[u8]) -> BTreeMap<u32, (usize, u32)> {
    definitions(data)
        .map(|span| (span.objid, (span.range.start, span.genno)))
        .collect()
}

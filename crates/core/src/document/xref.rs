//! Index and trailer rebuilder.
//!
//! With a classic `xref` table the document is cut at the table, the new
//! object appended, and a fresh table and trailer generated from the current
//! definition of every object. Xref streams and other encodings are not rebuilt;
//! the new object is spliced in ahead of `startxref` and the old index is
//! left stale, which readers recover from by scanning.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::{debug, warn};

use super::stream::StreamObject;
use crate::error::{PolyError, Result};
use crate::parser::objects;
use crate::utils::insert_at;

static ROOT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)/Root[ \t\r\n]*\d+[ \t\r\n]+\d+[ \t\r\n]+R").expect("valid root regex")
});

static INFO_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)/Info[ \t\r\n]*\d+[ \t\r\n]+\d+[ \t\r\n]+R").expect("valid info regex")
});

static XREF_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)[\r\n]xref[ \t]*[\r\n]").expect("valid xref regex")
});

static STARTXREF_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)[\r\n]startxref[ \t]*[\r\n]").expect("valid startxref regex")
});

/// Free-list head entry for object 0.
const FREE_HEAD: &str = "0000000000 65535 f \n";

/// Trailer references captured from the source document before any edit.
///
/// Kept as the exact source text so the rebuilt trailer cites the same
/// objects byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerRefs {
    root: Vec<u8>,
    info: Option<Vec<u8>>,
}

impl TrailerRefs {
    /// Capture the first `/Root` (required) and `/Info` (optional) entries.
    pub fn capture(data: &[u8]) -> Result<Self> {
        let root = ROOT_REF
            .find(data)
            .ok_or(PolyError::MissingRoot)?
            .as_bytes()
            .to_vec();
        let info = INFO_REF.find(data).map(|m| m.as_bytes().to_vec());
        Ok(Self { root, info })
    }

    /// The `/Root N G R` text as it appeared in the source.
    pub fn root(&self) -> &[u8] {
        &self.root
    }

    pub fn info(&self) -> Option<&[u8]> {
        self.info.as_deref()
    }
}

/// How the new object was added to the document's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdate {
    /// The classic table was regenerated.
    Rebuilt,
    /// The object was spliced in before `startxref`; the old index is stale.
    Spliced,
}

/// Append `stream` to the document and bring the index up to date.
pub fn finalize(
    data: Vec<u8>,
    stream: &StreamObject,
    trailer: &TrailerRefs,
) -> Result<(Vec<u8>, IndexUpdate)> {
    if let Some(xref) = XREF_KEYWORD.find_iter(&data).last() {
        let cut = xref.start() + 1;
        debug!(offset = cut, objid = stream.objid, "Rebuilding classic xref table");
        return Ok((rebuild(data, cut, stream, trailer), IndexUpdate::Rebuilt));
    }

    if let Some(startxref) = STARTXREF_KEYWORD.find_iter(&data).last() {
        let at = startxref.start() + 1;
        warn!(
            offset = at,
            objid = stream.objid,
            "No classic xref table; inserting object before startxref and leaving the index stale"
        );
        return Ok((insert_at(data, at, &stream.to_bytes()), IndexUpdate::Spliced));
    }

    Err(PolyError::NoIndexAnchor)
}

fn rebuild(mut data: Vec<u8>, cut: usize, stream: &StreamObject, trailer: &TrailerRefs) -> Vec<u8> {
    data.truncate(cut);
    data.extend_from_slice(&stream.to_bytes());

    let xref_pos = data.len();
    let offsets = objects::header_offsets(&data);
    let size = offsets.keys().max().map_or(1, |id| id + 1);
    data.extend_from_slice(xref_section(&offsets).as_bytes());
    data.extend_from_slice(&build_trailer(size, trailer));
    data.extend_from_slice(format!("startxref\n{xref_pos}\n%%EOF\n").as_bytes());
    data
}

/// Generate an `xref` section covering every object defined in `data`.
pub fn build_xref(data: &[u8]) -> String {
    xref_section(&objects::header_offsets(data))
}

/// Render `offsets` as an `xref` section.
///
/// Consecutive IDs share a subsection, so each entry lines up with its ID
/// even when the numbering has gaps. The first subsection always starts
/// with the free-list head for object 0.
fn xref_section(offsets: &BTreeMap<u32, (usize, u32)>) -> String {
    let mut runs: Vec<(u32, Vec<String>)> = vec![(0, vec![FREE_HEAD.to_string()])];
    for (&objid, &(offset, genno)) in offsets.iter().filter(|(id, _)| **id != 0) {
        let line = format!("{offset:010} {genno:05} n \n");
        match runs.last_mut() {
            Some((first, lines)) if *first as usize + lines.len() == objid as usize => {
                lines.push(line);
            }
            _ => runs.push((objid, vec![line])),
        }
    }

    let mut out = String::from("xref\n");
    for (first, lines) in runs {
        let _ = writeln!(out, "{first} {}", lines.len());
        for line in lines {
            out.push_str(&line);
        }
    }
    out
}

/// Generate a `trailer` dictionary.
pub fn build_trailer(size: u32, refs: &TrailerRefs) -> Vec<u8> {
    let mut out = format!("trailer\n<< /Size {size} ").into_bytes();
    out.extend_from_slice(refs.root());
    if let Some(info) = refs.info() {
        out.push(b' ');
        out.extend_from_slice(info);
    }
    out.extend_from_slice(b" >>\n");
    out
}

//! Page locator.
//!
//! A page is recognized by `/Type /Page` in its outer dictionary. The marker
//! can sit before the first embedded dictionary or after the last one, and a
//! plain substring search over the whole object would also hit `/Pages`
//! tree nodes, so each object is split into a header and a footer region
//! and only those are tested, with a boundary-checked match.

use std::ops::Range;
use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::{debug, trace, warn};

use crate::error::{PolyError, Result};
use crate::parser::dict::{find, rfind};
use crate::parser::objects::{self, ObjectSpan};
use crate::utils::insert_at;

static PAGE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)/Type\s*/Page(\s|/|>>)").expect("valid page type regex")
});

/// Which region of the outer dictionary carried the type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRegion {
    /// Between the opening `<<` and the first embedded dictionary.
    Header,
    /// Between the last embedded dictionary and the closing `>>`.
    Footer,
}

/// A located page object.
///
/// Offsets are absolute and valid only for the buffer the page was found
/// in. Editing stages consume the value so a stale page cannot be reused
/// after the buffer changes length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObject {
    pub objid: u32,
    pub genno: u32,
    /// The whole `N G obj ... endobj` definition.
    pub span: Range<usize>,
    /// The outer `<< ... >>` dictionary.
    pub dict: Range<usize>,
    pub marker: MarkerRegion,
}

impl PageObject {
    /// Bytes of the page definition within `data`.
    pub fn bytes<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.span.clone()]
    }

    /// Add a top-level `entry` (e.g. `/Contents 9 0 R`) to the page dictionary.
    ///
    /// The entry goes on the side of the dictionary away from the type
    /// marker, so the marker stays in the region the locator found it in and
    /// a later scan still recognizes this object as the page.
    pub fn insert_entry(self, data: Vec<u8>, entry: &[u8]) -> Vec<u8> {
        let mut fragment = Vec::with_capacity(entry.len() + 2);
        fragment.push(b' ');
        fragment.extend_from_slice(entry);
        fragment.push(b' ');
        let at = match self.marker {
            MarkerRegion::Header => self.dict.end - 2,
            MarkerRegion::Footer => self.dict.start + 2,
        };
        insert_at(data, at, &fragment)
    }
}

/// Test one object definition for the page type marker.
///
/// Objects without a dictionary are skipped. An unbalanced dictionary is a
/// structural error for the whole document.
pub fn classify(data: &[u8], span: &ObjectSpan) -> Result<Option<PageObject>> {
    let Some(dict) = span.dict(data)? else {
        return Ok(None);
    };

    let first_nested = find(&data[..dict.end], b"<<", dict.start + 2);
    let (header, footer) = match first_nested {
        Some(nested) => {
            let footer_start = rfind(data, b">>", dict.start + 2..dict.end - 2)
                .map_or(dict.end, |close| close + 2);
            (&data[dict.start..nested], &data[footer_start..dict.end])
        }
        None => (&data[dict.clone()], &data[dict.end..dict.end]),
    };

    let marker = if PAGE_TYPE.is_match(header) {
        MarkerRegion::Header
    } else if PAGE_TYPE.is_match(footer) {
        MarkerRegion::Footer
    } else {
        return Ok(None);
    };

    Ok(Some(PageObject {
        objid: span.objid,
        genno: span.genno,
        span: span.range.clone(),
        dict,
        marker,
    }))
}

/// Find the first page object in buffer order.
///
/// Only current definitions are considered: when an incremental update
/// redefines an object, the copy it replaced is skipped. This is not
/// necessarily the first page of the document's page tree.
pub fn find_page(data: &[u8]) -> Result<PageObject> {
    for span in objects::current_definitions(data) {
        trace!(objid = span.objid, offset = span.range.start, "Testing object for page type");
        if let Some(page) = classify(data, &span)? {
            debug!(
                objid = page.objid,
                offset = page.span.start,
                marker = ?page.marker,
                "Located page object"
            );
            return Ok(page);
        }
    }
    Err(PolyError::PageNotFound)
}

/// Find the page again after an edit has shifted offsets.
///
/// Normally the locator lands on the same object. If it does not, the
/// previously found object is resolved by ID instead.
pub fn relocate(data: &[u8], objid: u32) -> Result<PageObject> {
    let page = find_page(data)?;
    if page.objid == objid {
        return Ok(page);
    }
    warn!(
        expected = objid,
        found = page.objid,
        "Page locator moved to a different object after edit; resolving by id"
    );
    let span = objects::locate(data, objid)?;
    classify(data, &span)?.ok_or(PolyError::PageNotFound)
}

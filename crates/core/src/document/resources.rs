//! Resource graph editor.
//!
//! Registers the injected font with a page. Both `/Resources` on the page
//! and `/Font` inside the resources may be absent, embedded in place, or
//! held in a separate object; each combination ends in one insertion at an
//! offset inside the specific dictionary that was resolved. Nothing is
//! found-and-replaced by content, since many pages in one file commonly
//! share byte-identical resource dictionaries.

use std::ops::Range;

use tracing::debug;

use super::field::Field;
use super::page::PageObject;
use super::stream::FontResource;
use crate::error::{PolyError, Result};
use crate::parser::objects;
use crate::utils::{contains, insert_at};

/// Add `font` to the resources of `page`, creating whatever is missing.
pub fn attach_font(data: Vec<u8>, page: PageObject, font: &FontResource) -> Result<Vec<u8>> {
    let page_bytes = page.bytes(&data);
    if !contains(page_bytes, b"/Resources") && !contains(page_bytes, b"/Contents") {
        return Err(PolyError::UnrecognizedPageShape { objid: page.objid });
    }

    match Field::lookup(&data, page.dict.clone(), b"/Resources")? {
        Field::Absent => {
            debug!(objid = page.objid, "Page has no /Resources; adding one");
            Ok(page.insert_entry(data, &font.resources()))
        }
        Field::Direct(resources) => {
            debug!(
                objid = page.objid,
                offset = resources.start,
                "Using /Resources embedded in page"
            );
            add_to_resources(data, resources, font)
        }
        Field::Indirect { target, .. } => {
            let span = objects::locate(&data, target.objid)?;
            let resources = span
                .dict(&data)?
                .ok_or(PolyError::UnrecognizedResourcesShape { objid: page.objid })?;
            debug!(
                objid = page.objid,
                resources = target.objid,
                offset = resources.start,
                "Using /Resources from referenced object"
            );
            add_to_resources(data, resources, font)
        }
        Field::Array(_) | Field::Other(_) => {
            Err(PolyError::UnrecognizedResourcesShape { objid: page.objid })
        }
    }
}

/// Add `font` to the `/Font` table of the resource dictionary at `resources`.
fn add_to_resources(data: Vec<u8>, resources: Range<usize>, font: &FontResource) -> Result<Vec<u8>> {
    let field = Field::lookup(&data, resources.clone(), b"/Font")
        .map_err(|_| PolyError::MalformedFontDictionary)?;
    match field {
        Field::Absent => {
            debug!("Resources have no /Font table; adding one");
            Ok(append_entry(data, resources, &font.table()))
        }
        Field::Direct(table) => {
            debug!(offset = table.start, "Appending to embedded /Font table");
            Ok(append_entry(data, table, &font.entry()))
        }
        Field::Indirect { target, .. } => {
            let span = objects::locate(&data, target.objid)?;
            let table = span
                .dict(&data)
                .map_err(|_| PolyError::MalformedFontDictionary)?
                .ok_or(PolyError::MalformedFontDictionary)?;
            debug!(
                font_table = target.objid,
                offset = table.start,
                "Appending to /Font table in referenced object"
            );
            Ok(append_entry(data, table, &font.entry()))
        }
        Field::Array(_) | Field::Other(_) => Err(PolyError::MalformedFontDictionary),
    }
}

/// Insert `entry` just before the closing `>>` of the dictionary at `dict`.
fn append_entry(data: Vec<u8>, dict: Range<usize>, entry: &[u8]) -> Vec<u8> {
    let mut fragment = Vec::with_capacity(entry.len() + 2);
    fragment.push(b' ');
    fragment.extend_from_slice(entry);
    fragment.push(b' ');
    insert_at(data, dict.end - 2, &fragment)
}

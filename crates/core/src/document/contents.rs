//! Content stream linker.

use tracing::debug;

use super::field::Field;
use super::page::PageObject;
use crate::error::{PolyError, Result};
use crate::parser::objects::ObjRef;
use crate::utils::{insert_at, replace_range};

/// Make `page` draw the stream at `stream_ref` after its existing content.
///
/// - no `/Contents`: add `/Contents <ref>`
/// - an array: append `<ref>` before the closing `]`
/// - a single reference: rewrite it as `[<old> <ref>]`
pub fn attach_contents(data: Vec<u8>, page: PageObject, stream_ref: ObjRef) -> Result<Vec<u8>> {
    match Field::lookup(&data, page.dict.clone(), b"/Contents")? {
        Field::Absent => {
            debug!(objid = page.objid, stream = %stream_ref, "Adding /Contents to page");
            let entry = format!("/Contents {stream_ref}");
            Ok(page.insert_entry(data, entry.as_bytes()))
        }
        Field::Array(array) => {
            debug!(objid = page.objid, stream = %stream_ref, "Appending to /Contents array");
            let entry = format!(" {stream_ref}");
            Ok(insert_at(data, array.end - 1, entry.as_bytes()))
        }
        Field::Indirect { target, span } => {
            debug!(
                objid = page.objid,
                previous = %target,
                stream = %stream_ref,
                "Wrapping single /Contents reference in an array"
            );
            let mut array = b"[".to_vec();
            array.extend_from_slice(&data[span.clone()]);
            array.extend_from_slice(format!(" {stream_ref}]").as_bytes());
            Ok(replace_range(data, span, &array))
        }
        Field::Direct(_) | Field::Other(_) => {
            Err(PolyError::UnrecognizedContentsShape { objid: page.objid })
        }
    }
}

//! Polyglot generators.
//!
//! A generator turns a host document and a payload into a single file that
//! is still a valid host document and also carries the payload bytes.

use tracing::debug;

use super::options::InjectOptions;
use crate::document::stream::{FontResource, StreamObject, encode_literal, unique_font_name};
use crate::document::{TrailerRefs, attach_contents, attach_font, finalize, find_page, relocate};
use crate::error::Result;
use crate::parser::objects::next_free_id;

/// A polyglot generator for one host format.
///
/// `generate` must be a pure transformation: implementors hold only
/// configuration, so one value can serve any number of documents,
/// including from several threads.
pub trait Generator {
    /// Short identifier recorded in generation reports.
    fn name(&self) -> &str;

    /// Host format the generator writes, e.g. `"PDF"`.
    fn host_format(&self) -> &str;

    /// Build the polyglot. On error no output is produced.
    fn generate(&self, host: &[u8], payload: &[u8]) -> Result<Vec<u8>>;
}

/// Hides the payload as invisible text on the first page object found.
///
/// Adds a standard font to that page's resources, appends a content stream
/// that shows the payload with text rendering mode 3, links the stream
/// into the page's `/Contents`, and updates the xref table and trailer.
#[derive(Debug, Clone, Default)]
pub struct InvisibleTextGenerator {
    options: InjectOptions,
}

impl InvisibleTextGenerator {
    pub fn new(options: InjectOptions) -> Self {
        Self { options }
    }
}

impl Generator for InvisibleTextGenerator {
    fn name(&self) -> &str {
        "PDFInvisText"
    }

    fn host_format(&self) -> &str {
        "PDF"
    }

    fn generate(&self, host: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let options = &self.options;
        let literal = encode_literal(payload, options.payload_encoding)?;

        let page = find_page(host)?;
        let trailer = TrailerRefs::capture(host)?;

        let font = FontResource::new(
            unique_font_name(host, &options.font_name),
            options.base_font.clone(),
        );
        let stream = StreamObject::invisible_text(
            next_free_id(host),
            &font,
            options.font_size,
            options.origin,
            &literal,
        );

        let page_id = page.objid;
        let data = attach_font(host.to_vec(), page, &font)?;
        let page = relocate(&data, page_id)?;
        let data = attach_contents(data, page, stream.reference())?;
        let (data, update) = finalize(data, &stream, &trailer)?;

        debug!(
            page = page_id,
            stream = stream.objid,
            font = %font.name,
            index = ?update,
            host_len = host.len(),
            output_len = data.len(),
            "Generated polyglot"
        );
        Ok(data)
    }
}

/// Hide `payload` in `host` with default options.
pub fn generate(host: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    InvisibleTextGenerator::default().generate(host, payload)
}

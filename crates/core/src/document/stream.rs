//! The injected font resource and hidden content stream.

use crate::api::options::PayloadEncoding;
use crate::error::{PolyError, Result};
use crate::parser::lexer::is_token_end;
use crate::parser::objects::ObjRef;

/// Text rendering mode 3: neither fill nor stroke.
const RENDER_INVISIBLE: u8 = 3;

/// A non-embedded standard Type1 font registered under a resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    /// Resource name without the leading `/`.
    pub name: String,
    /// One of the standard 14 base fonts.
    pub base_font: String,
}

impl FontResource {
    pub fn new(name: impl Into<String>, base_font: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_font: base_font.into(),
        }
    }

    /// `/Name << ... >>`, ready to drop into an existing font table.
    pub fn entry(&self) -> Vec<u8> {
        format!(
            "/{} << /Type /Font /Subtype /Type1 /BaseFont /{} >>",
            self.name, self.base_font
        )
        .into_bytes()
    }

    /// `/Font << /Name << ... >> >>`, for a resource dictionary without one.
    pub fn table(&self) -> Vec<u8> {
        let mut out = b"/Font << ".to_vec();
        out.extend_from_slice(&self.entry());
        out.extend_from_slice(b" >>");
        out
    }

    /// `/Resources << /Font << ... >> >>`, for a page without resources.
    pub fn resources(&self) -> Vec<u8> {
        let mut out = b"/Resources << ".to_vec();
        out.extend_from_slice(&self.table());
        out.extend_from_slice(b" >>");
        out
    }
}

/// Check whether `/name` is already used as a name token in `data`.
pub fn name_in_use(data: &[u8], name: &str) -> bool {
    let needle = format!("/{name}");
    let needle = needle.as_bytes();
    data.windows(needle.len()).enumerate().any(|(pos, w)| {
        w == needle
            && data
                .get(pos + needle.len())
                .is_none_or(|&b| is_token_end(b))
    })
}

/// Pick a font resource name that no existing token in `data` uses.
pub fn unique_font_name(data: &[u8], preferred: &str) -> String {
    if !name_in_use(data, preferred) {
        return preferred.to_string();
    }
    (1u32..)
        .map(|n| format!("{preferred}{n}"))
        .find(|candidate| !name_in_use(data, candidate))
        .unwrap_or_else(|| preferred.to_string())
}

/// Render `payload` as the body of a `( ... )` string literal.
pub fn encode_literal(payload: &[u8], encoding: PayloadEncoding) -> Result<Vec<u8>> {
    match encoding {
        PayloadEncoding::Verbatim => {
            check_self_delimiting(payload)?;
            Ok(payload.to_vec())
        }
        PayloadEncoding::Escaped => {
            let mut out = Vec::with_capacity(payload.len() + payload.len() / 8);
            for &b in payload {
                match b {
                    b'\\' | b'(' | b')' => {
                        out.push(b'\\');
                        out.push(b);
                    }
                    b'\r' => out.extend_from_slice(b"\\r"),
                    b'\n' => out.extend_from_slice(b"\\n"),
                    _ => out.push(b),
                }
            }
            Ok(out)
        }
    }
}

/// A verbatim payload must not close the literal early or leave it open.
fn check_self_delimiting(payload: &[u8]) -> Result<()> {
    let mut depth = 1usize;
    let mut i = 0;
    while i < payload.len() {
        match payload[i] {
            b'\\' => {
                if i + 1 == payload.len() {
                    return Err(PolyError::InvalidPayload(
                        "trailing backslash escapes the closing parenthesis".into(),
                    ));
                }
                i += 1;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Err(PolyError::InvalidPayload(format!(
                        "unbalanced ')' at byte {i}"
                    )));
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 1 {
        return Err(PolyError::InvalidPayload(format!(
            "{} unclosed '('",
            depth - 1
        )));
    }
    Ok(())
}

/// The hidden content stream object appended to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamObject {
    pub objid: u32,
    body: Vec<u8>,
}

impl StreamObject {
    /// Content that selects `font`, switches to invisible rendering, moves
    /// to `origin` and shows `literal`.
    pub fn invisible_text(
        objid: u32,
        font: &FontResource,
        font_size: f32,
        origin: (f32, f32),
        literal: &[u8],
    ) -> Self {
        let mut body = format!(
            "BT /{} {} Tf {} Tr {} {} Td (",
            font.name, font_size, RENDER_INVISIBLE, origin.0, origin.1
        )
        .into_bytes();
        body.extend_from_slice(literal);
        body.extend_from_slice(b") Tj ET");
        Self { objid, body }
    }

    pub const fn reference(&self) -> ObjRef {
        ObjRef::new(self.objid, 0)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Full `N 0 obj ... endobj` definition, newline terminated.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!(
            "{} 0 obj\n<< /Length {} >>\nstream\n",
            self.objid,
            self.body.len()
        )
        .into_bytes();
        out.extend_from_slice(&self.body);
        out.extend_from_slice(b"\nendstream\nendobj\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_length_matches_body() {
        let font = FontResource::new("Font124573", "Times-Roman");
        let stream = StreamObject::invisible_text(12, &font, 24.0, (0.0, 0.0), b"<?php echo 1; ?>");
        assert_eq!(
            stream.body(),
            b"BT /Font124573 24 Tf 3 Tr 0 0 Td (<?php echo 1; ?>) Tj ET"
        );
        let bytes = stream.to_bytes();
        let expected = format!("12 0 obj\n<< /Length {} >>\nstream\n", stream.body().len());
        assert!(bytes.starts_with(expected.as_bytes()));
        assert!(bytes.ends_with(b") Tj ET\nendstream\nendobj\n"));
        assert_eq!(stream.reference().to_string(), "12 0 R");
    }

    #[test]
    fn verbatim_accepts_balanced_parentheses() {
        let out = encode_literal(b"alert(document.cookie)", PayloadEncoding::Verbatim).unwrap();
        assert_eq!(out, b"alert(document.cookie)");
    }

    #[test]
    fn verbatim_rejects_early_close() {
        assert!(encode_literal(b"x) Tj", PayloadEncoding::Verbatim).is_err());
        assert!(encode_literal(b"open(", PayloadEncoding::Verbatim).is_err());
        assert!(encode_literal(b"dir\\", PayloadEncoding::Verbatim).is_err());
    }

    #[test]
    fn escaped_always_succeeds() {
        let out = encode_literal(b"a)b(\\\n", PayloadEncoding::Escaped).unwrap();
        assert_eq!(out, b"a\\)b\\(\\\\\\n");
    }

    #[test]
    fn font_name_collision_gets_suffix() {
        let data = b"<< /Font << /Font124573 5 0 R /Font1245731 6 0 R >> >>";
        assert!(name_in_use(data, "Font124573"));
        assert!(!name_in_use(data, "Font12457"));
        assert_eq!(unique_font_name(data, "Font124573"), "Font1245732");
        assert_eq!(unique_font_name(data, "F9"), "F9");
    }

    #[test]
    fn font_fragments() {
        let font = FontResource::new("F9", "Courier");
        assert_eq!(
            font.resources(),
            b"/Resources << /Font << /F9 << /Type /Font /Subtype /Type1 /BaseFont /Courier >> >> >>"
        );
    }
}

//! Shared helpers for building host documents and reading back results.

#![allow(dead_code)]

use std::collections::BTreeMap;

/// Builds a small PDF from object bodies, with correct xref offsets.
pub struct PdfBuilder {
    objects: Vec<(u32, String)>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Catalog (1), page tree (2) and the given page dictionary as object 3.
    pub fn single_page(page: &str) -> Self {
        Self::new()
            .object(1, "<< /Type /Catalog /Pages 2 0 R >>")
            .object(2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>")
            .object(3, page)
    }

    pub fn object(mut self, objid: u32, body: &str) -> Self {
        self.objects.push((objid, body.to_string()));
        self
    }

    fn body(&self) -> (Vec<u8>, BTreeMap<u32, usize>) {
        let mut out = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec();
        let mut offsets = BTreeMap::new();
        for (objid, body) in &self.objects {
            offsets.insert(*objid, out.len());
            out.extend_from_slice(format!("{objid} 0 obj\n{body}\nendobj\n").as_bytes());
        }
        (out, offsets)
    }

    /// Document with a classic xref table and trailer.
    pub fn build(&self) -> Vec<u8> {
        let (mut out, offsets) = self.body();
        let size = offsets.keys().max().map_or(1, |id| id + 1);
        let xref_pos = out.len();
        out.extend_from_slice(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes());
        for objid in 1..size {
            match offsets.get(&objid) {
                Some(offset) => out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes()),
                None => out.extend_from_slice(b"0000000000 00001 f \n"),
            }
        }
        out.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_pos}\n%%EOF\n")
                .as_bytes(),
        );
        out
    }

    /// Document whose index is an xref stream: no `xref` keyword at all.
    pub fn build_with_xref_stream(&self) -> Vec<u8> {
        let (mut out, offsets) = self.body();
        let objid = offsets.keys().max().map_or(1, |id| id + 1);
        let xref_pos = out.len();
        out.extend_from_slice(
            format!(
                "{objid} 0 obj\n<< /Type /XRef /Size {} /W [1 4 2] /Root 1 0 R /Length 0 >>\nstream\n\nendstream\nendobj\nstartxref\n{xref_pos}\n%%EOF\n",
                objid + 1
            )
            .as_bytes(),
        );
        out
    }
}

/// Bytes of the first definition of `objid`, from its header to `endobj`.
pub fn object_bytes(data: &[u8], objid: u32) -> Option<Vec<u8>> {
    let header = format!("{objid} 0 obj");
    let start = find_header(data, header.as_bytes())?;
    let end = find(data, b"endobj", start)? + b"endobj".len();
    Some(data[start..end].to_vec())
}

fn find_header(data: &[u8], header: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = find(data, header, from) {
        if pos == 0 || !data[pos - 1].is_ascii_digit() {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

pub fn find(data: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| from + pos)
}

pub fn rfind(data: &[u8], needle: &[u8]) -> Option<usize> {
    data.windows(needle.len()).rposition(|w| w == needle)
}

/// A parsed classic xref section: `(objid, offset, genno, in_use)`.
pub fn read_xref(data: &[u8]) -> Vec<(u32, usize, u32, bool)> {
    let startxref = rfind(data, b"startxref").expect("startxref");
    let text = std::str::from_utf8(&data[startxref..]).expect("ascii tail");
    let pos: usize = text
        .lines()
        .nth(1)
        .expect("xref offset line")
        .trim()
        .parse()
        .expect("xref offset");
    assert!(data[pos..].starts_with(b"xref"), "startxref must point at xref");

    let table = std::str::from_utf8(&data[pos..startxref]).expect("ascii xref");
    let mut lines = table.lines().skip(1);
    let mut entries = Vec::new();
    while let Some(line) = lines.next() {
        if line.starts_with("trailer") {
            break;
        }
        let mut parts = line.split_whitespace();
        let first: u32 = parts.next().unwrap().parse().unwrap();
        let count: u32 = parts.next().unwrap().parse().unwrap();
        for i in 0..count {
            let entry = lines.next().expect("xref entry");
            assert_eq!(entry.len(), 19, "entry without EOL must be 19 bytes: {entry:?}");
            let offset = entry[0..10].parse().unwrap();
            let genno = entry[11..16].parse().unwrap();
            entries.push((first + i, offset, genno, &entry[17..18] == "n"));
        }
    }
    entries
}

/// Object IDs of every `N G obj` header, in buffer order.
pub fn header_ids(data: &[u8]) -> Vec<u32> {
    let text = String::from_utf8_lossy(data);
    let mut ids = Vec::new();
    let tokens: Vec<&str> = text.split_ascii_whitespace().collect();
    for window in tokens.windows(3) {
        if window[2] == "obj"
            && window[0].bytes().all(|b| b.is_ascii_digit())
            && window[1].bytes().all(|b| b.is_ascii_digit())
        {
            ids.push(window[0].parse().unwrap());
        }
    }
    ids
}

//! Shape of a dictionary-valued field.
//!
//! Any field the engine edits may legally be absent, written in place, or
//! stored in a separate object. Lookups classify the value once and the
//! editors match on the result instead of re-probing the bytes.

use std::ops::Range;

use crate::error::Result;
use crate::parser::dict::dict_end;
use crate::parser::lexer::{find_key, parse_ref};
use crate::parser::objects::ObjRef;

/// Classified value of a key inside a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The key does not appear at the top level of the dictionary.
    Absent,
    /// The value is a dictionary embedded in place; the span covers `<< ... >>`.
    Direct(Range<usize>),
    /// The value is an indirect reference; the span covers `N G R`.
    Indirect { target: ObjRef, span: Range<usize> },
    /// The value is an array; the span covers `[ ... ]`.
    Array(Range<usize>),
    /// Anything else, starting at the given offset.
    Other(usize),
}

impl Field {
    /// Look up `key` directly inside the dictionary occupying `dict`.
    ///
    /// Only a malformed embedded dictionary value is an error; every other
    /// shape is reported for the caller to accept or reject.
    pub fn lookup(data: &[u8], dict: Range<usize>, key: &[u8]) -> Result<Self> {
        let Some(found) = find_key(data, dict.clone(), key) else {
            return Ok(Self::Absent);
        };
        let start = found.value_start;
        let rest = &data[start.min(data.len())..dict.end.min(data.len())];

        if rest.starts_with(b"<<") {
            let end = dict_end(data, start)?;
            return Ok(Self::Direct(start..end));
        }
        if rest.starts_with(b"[") {
            return Ok(match rest.iter().position(|&b| b == b']') {
                Some(close) => Self::Array(start..start + close + 1),
                None => Self::Other(start),
            });
        }
        if let Some((target, end)) = parse_ref(data, start) {
            return Ok(Self::Indirect {
                target,
                span: start..end,
            });
        }
        Ok(Self::Other(start))
    }
}

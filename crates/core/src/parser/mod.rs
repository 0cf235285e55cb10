//! Raw-byte scanning primitives.
//!
//! - `dict`: balanced `<< ... >>` span scanner
//! - `objects`: object index over `N G obj ... endobj` definitions
//! - `lexer`: token helpers (whitespace, references, top-level keys)

pub mod dict;
pub mod lexer;
pub mod objects;

// Re-export main types for convenience
pub use dict::{dict_end, dict_span};
pub use lexer::{KeyMatch, find_key, parse_ref};
pub use objects::{ObjRef, ObjectSpan, current_definitions, highest_id, locate, next_free_id};

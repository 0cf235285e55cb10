//! polyforge - structural PDF mutation for building polyglot files.
//!
//! The engine locates a page in an existing document, registers a new font
//! in its resources, links a hidden content stream carrying the payload, and
//! regenerates the xref table and trailer. It works directly on raw bytes:
//! no object graph is built, and every stage rescans the current buffer.

pub mod api;
pub mod document;
pub mod error;
pub mod parser;
pub mod utils;

pub use api::{Generator, InjectOptions, InvisibleTextGenerator, PayloadEncoding, generate};
pub use error::{PolyError, Result};

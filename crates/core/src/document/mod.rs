//! Document mutation stages.
//!
//! This module contains:
//! - `page` - page locator (header/footer type-marker test)
//! - `field` - absent / direct / indirect classification of field values
//! - `resources` - resource graph editor (registers the injected font)
//! - `contents` - content stream linker
//! - `stream` - the injected font resource and hidden content stream
//! - `xref` - index and trailer rebuilder
//!
//! Each stage takes the document by value and returns the edited buffer.

pub mod contents;
pub mod field;
pub mod page;
pub mod resources;
pub mod stream;
pub mod xref;

// Re-export main types for convenience
pub use contents::attach_contents;
pub use field::Field;
pub use page::{MarkerRegion, PageObject, find_page, relocate};
pub use resources::attach_font;
pub use stream::{FontResource, StreamObject};
pub use xref::{IndexUpdate, TrailerRefs, finalize};

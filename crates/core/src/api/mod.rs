//! High-level API module for polyglot generation.
//!
//! # Example
//!
//! ```ignore
//! use polyforge_core::api::generate;
//!
//! let host = std::fs::read("document.pdf")?;
//! let payload = std::fs::read("payload.js")?;
//! let polyglot = generate(&host, &payload)?;
//! ```

pub mod generator;
pub mod options;
pub mod report;

// Re-export for convenience
pub use generator::{Generator, InvisibleTextGenerator, generate};
pub use options::{InjectOptions, PayloadEncoding};
pub use report::{GenStatus, GenerationReport};

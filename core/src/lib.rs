//! Content pipeline for a small markdown blog.
//!
//! Raw sources are parsed into [`Document`]s by [`parser::parse`] and gathered
//! into a [`ContentIndex`], which is built once at startup and only read after
//! that.

pub mod document;
pub mod error;
pub mod index;
pub mod markdown;
pub mod parser;
pub mod source;

pub use document::Document;
pub use error::{Error, Result};
pub use index::{BuildReport, ContentIndex, SkippedSource};
pub use parser::parse;
pub use source::{ContentSource, DirSource, MemorySource};

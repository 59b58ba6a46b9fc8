//! mobu-docs: fetcher and parser for the MotionBuilder Python SDK online
//! documentation.
//!
//! Turns versioned help-site pages into normalized member records
//! (name, declared type, parameter triples, restricted-markdown docstring)
//! that the stub generator reconciles onto reflected signatures. Backed by
//! an on-disk HTML cache with atomic writes.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod library;
pub mod markdown;
pub mod parser;
pub mod records;
pub mod toc;
pub mod url;

pub use cache::PageCache;
pub use error::{DocsError, Result};
pub use fetch::{DEFAULT_TIMEOUT, DEFAULT_WORKERS, DocFetcher};
pub use library::{DocLibrary, MODULE_PAGE_NAME};
pub use markdown::html_to_markdown;
pub use parser::parse_page;
pub use records::{DocMember, DocPage, DocParam};
pub use toc::parse_toc;

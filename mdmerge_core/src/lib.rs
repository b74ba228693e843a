//! `mdmerge_core` is the engine behind [mdmerge](https://crates.io/crates/mdmerge_cli). It
//! merges a set of Markdown documents into one by recursively expanding the
//! include directives embedded in their text, so long documents can be split
//! into files for editing and flattened again for a downstream Markdown
//! processor.
//!
//! ## Directives
//!
//! | Syntax | Kind | Content |
//! |---|---|---|
//! | `{{path}}` | MultiMarkdown transclusion | expanded recursively |
//! | `<<[path]` | Marked file include | expanded recursively |
//! | `<<(path)`, `<<[caption](path)` | LeanPub / Marked code include | verbatim, fenced |
//! | `<<{path}` | Marked raw include | verbatim |
//!
//! `{{TOC}}` is reserved for the renderer's table of contents and is never
//! expanded.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Inputs (files or stdin)
//!   → Index resolver (book.txt, #merge, several inputs → ordered entries)
//!   → Metadata stripper (every document after the first)
//!   → Fence tracker (per line: delimiter? inside a code block?)
//!   → Line scanner (literal / directive fragments)
//!   → Recursive expander (inclusion chain, splicing)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `MergeOptions` and `mdmerge.toml` loading.
//! - [`index`]: Index ("book") file detection and entry parsing.
//! - [`metadata`]: MultiMarkdown metadata and YAML front matter removal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdmerge_core::{merge, MergeOptions, Source};
//! use std::path::PathBuf;
//!
//! let options = MergeOptions::default();
//! let merged = merge(&[Source::File(PathBuf::from("book.md"))], &options)?;
//! print!("{merged}");
//! # Ok::<(), mdmerge_core::MergeError>(())
//! ```

pub use config::*;
pub use directive::*;
pub use document::*;
pub use error::*;
pub use expander::*;
pub use fence::*;
pub use index::*;
pub use merge::*;
pub use metadata::*;
pub use scanner::*;

pub mod config;
mod directive;
mod document;
#[allow(unused_assignments)]
mod error;
mod expander;
mod fence;
pub mod index;
mod merge;
pub mod metadata;
mod scanner;

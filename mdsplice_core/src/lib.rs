//! `mdsplice_core` is the engine behind [mdsplice](https://github.com/ifiokjr/mdsplice). It assembles final markdown documents from source templates by generating a table of contents from the document's headers and splicing in named blocks extracted from other files.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template document (README.src.md)
//!   → Line classifier (import directive, [TOC] placeholder, header, text)
//!   → Block importer (reads the referenced file, extracts the tagged block)
//!   → TOC builder (re-scans the template's headers, renders a nested link list)
//!   → Output document (README.md), all other lines copied verbatim
//! ```
//!
//! ## Template Syntax
//!
//! ```markdown
//! # My Library
//! [TOC]
//! ## Usage
//! @import "src/widget.h" {md_id=WidgetDocs}
//! ```
//!
//! The imported file marks the region to splice with `@@md#<id>` and ends it
//! with any other line starting with `@@md`:
//!
//! ```c
//! /**
//! @@md#WidgetDocs
//! A **Widget** draws itself.
//! @@md
//! */
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `mdsplice.toml` (document pairs, TOC options and discovery exclusions).
//! - [`project`]: Document discovery, parallel rendering, staleness checks and output writing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdsplice_core::project::load_project;
//! use mdsplice_core::project::render_project;
//! use mdsplice_core::project::write_outputs;
//! use std::path::Path;
//!
//! let ctx = load_project(Path::new(".")).unwrap();
//! let rendered = render_project(&ctx);
//! for failure in &rendered.errors {
//!     eprintln!("{}: {}", failure.pair.template.display(), failure.error);
//! }
//! write_outputs(&rendered).unwrap();
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use header::*;
pub use import::*;
pub use toc::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod header;
mod import;
pub mod project;
mod toc;

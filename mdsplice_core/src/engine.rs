use std::path::Path;

use crate::SpliceError;
use crate::SpliceResult;
use crate::header::is_header_line;
use crate::header::strip_line_ending;
use crate::import::IMPORT_PREFIX;
use crate::import::ImportDirective;
use crate::import::import_block;
use crate::toc::TOC_PLACEHOLDER;
use crate::toc::TocOptions;
use crate::toc::back_link;
use crate::toc::build_toc;

/// Options applied while transforming a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
	pub toc: TocOptions,
}

/// The role a single source line plays during transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
	/// `@import "<path>" {md_id=<id>}`
	Import,
	/// `[TOC]`
	TocPlaceholder,
	/// `#`, `##`, ... but never `#include`.
	Header,
	/// Anything else, passed through verbatim.
	Text,
}

/// Classify a line. Directives take precedence over headers.
pub fn classify_line(line: &str) -> LineKind {
	if line.starts_with(IMPORT_PREFIX) {
		LineKind::Import
	} else if line.starts_with(TOC_PLACEHOLDER) {
		LineKind::TocPlaceholder
	} else if is_header_line(line) {
		LineKind::Header
	} else {
		LineKind::Text
	}
}

/// Transform an in-memory document.
///
/// `path` identifies the document: import paths resolve against its parent
/// directory and errors report it. Every line that is not an import
/// directive or a `[TOC]` placeholder is copied through unchanged, including
/// its line terminator. The first failure aborts the whole transformation.
///
/// Imported block bodies are spliced in as-is and never transformed
/// themselves.
pub fn transform_source(
	source: &str,
	path: &Path,
	options: &TransformOptions,
) -> SpliceResult<String> {
	let lines: Vec<&str> = source.split_inclusive('\n').collect();
	let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
	let mut output = String::with_capacity(source.len());

	for (index, line) in lines.iter().enumerate() {
		match classify_line(line) {
			LineKind::Import => {
				let directive = ImportDirective::parse(line).map_err(|missing| {
					SpliceError::MalformedDirective {
						file: path.display().to_string(),
						line: index + 1,
						directive: strip_line_ending(line).to_string(),
						missing: missing.describe(),
					}
				})?;
				let imported = base_dir.join(&directive.imported_file);
				output.push_str(&import_block(&imported, &directive.block_id)?);
			}
			LineKind::TocPlaceholder => {
				output.push_str(&build_toc(lines.as_slice()));
			}
			LineKind::Header => {
				output.push_str(line);
				if options.toc.back_links {
					if !line.ends_with('\n') {
						output.push('\n');
					}
					output.push_str(&back_link(&options.toc));
				}
			}
			LineKind::Text => output.push_str(line),
		}
	}

	Ok(output)
}

/// Read and transform the document at `path`.
pub fn transform_file(path: &Path, options: &TransformOptions) -> SpliceResult<String> {
	let source = std::fs::read_to_string(path).map_err(|e| SpliceError::unreadable(path, e))?;
	tracing::debug!(path = %path.display(), "transforming document");
	transform_source(&source, path, options)
}

/// Transform `input` and write the result to `output`. Nothing is written
/// when the transformation fails.
pub fn process_file(input: &Path, output: &Path, options: &TransformOptions) -> SpliceResult<()> {
	let content = transform_file(input, options)?;
	std::fs::write(output, content)?;
	tracing::debug!(input = %input.display(), output = %output.display(), "wrote document");
	Ok(())
}

use std::path::Path;

use crate::SpliceError;
use crate::SpliceResult;

/// Line prefix identifying an import directive.
pub const IMPORT_PREFIX: &str = "@import";

/// Prefix shared by every tagged block marker. Any line starting with it
/// (after trimming) ends the block currently being extracted.
pub const BLOCK_MARKER: &str = "@@md";

const PATH_OPEN: &str = "@import \"";
const PATH_CLOSE: &str = "\"";
const ID_OPEN: &str = "md_id=";
const ID_CLOSE: &str = "}";

/// A parsed `@import "<path>" {md_id=<id>}` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
	/// Path of the imported document, relative to the importing document's
	/// directory.
	pub imported_file: String,
	/// Identifier of the tagged block to splice in.
	pub block_id: String,
}

/// Which part of an import directive could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
	/// No `"`-delimited path follows `@import`.
	Path,
	/// No `md_id=` identifier closed by `}`.
	BlockId,
}

impl MissingPart {
	/// Human readable name of the missing part, used in error messages.
	pub fn describe(self) -> &'static str {
		match self {
			Self::Path => "the quoted path after `@import`",
			Self::BlockId => "the `md_id=...}` block identifier",
		}
	}
}

impl ImportDirective {
	/// Parse an import directive line.
	///
	/// The path is the text between `@import "` and the next `"`, the block
	/// id the text between `md_id=` and the next `}`. Nothing else about the
	/// line is validated.
	pub fn parse(line: &str) -> Result<Self, MissingPart> {
		let imported_file = string_between(line, PATH_OPEN, PATH_CLOSE).ok_or(MissingPart::Path)?;
		let block_id = string_between(line, ID_OPEN, ID_CLOSE).ok_or(MissingPart::BlockId)?;

		Ok(Self {
			imported_file: imported_file.to_string(),
			block_id: block_id.to_string(),
		})
	}
}

fn string_between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
	let start = text.find(open)? + open.len();
	let rest = &text[start..];
	let end = rest.find(close)?;
	Some(&rest[..end])
}

/// A named region of an imported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedBlock {
	/// Identifier following `@@md#` on the start marker line.
	pub id: String,
	/// Lines strictly between the start and end markers, with their original
	/// line terminators.
	pub body: String,
}

/// Returns true if `line` opens the tagged block `block_id`.
///
/// This is a prefix match: `@@md#FooBar` also opens `Foo`.
pub fn is_block_start(line: &str, block_id: &str) -> bool {
	line.trim()
		.strip_prefix(BLOCK_MARKER)
		.and_then(|rest| rest.strip_prefix('#'))
		.is_some_and(|rest| rest.starts_with(block_id))
}

/// Returns true if `line` terminates a tagged block. Any marker line does,
/// including the start marker of another block.
pub fn is_block_end(line: &str) -> bool {
	line.trim().starts_with(BLOCK_MARKER)
}

/// Find the first block tagged `block_id` in `content`.
///
/// Returns `None` when no start marker matches. A block left open at the end
/// of the content runs to the end of the content.
pub fn find_block(content: &str, block_id: &str) -> Option<TaggedBlock> {
	let mut lines = content.split_inclusive('\n');
	lines.find(|line| is_block_start(line, block_id))?;

	let body = lines.take_while(|line| !is_block_end(line)).collect();
	Some(TaggedBlock {
		id: block_id.to_string(),
		body,
	})
}

/// Extract the body of the first block tagged `block_id`, or an empty string
/// when there is none.
///
/// ```
/// use mdsplice_core::extract_block;
///
/// let source = "/**\n@@md#Example\nSome *docs*.\n @@md\n*/\n";
/// assert_eq!(extract_block(source, "Example"), "Some *docs*.\n");
/// assert_eq!(extract_block(source, "Other"), "");
/// ```
pub fn extract_block(content: &str, block_id: &str) -> String {
	find_block(content, block_id)
		.map(|block| block.body)
		.unwrap_or_default()
}

/// Read `path` and extract the block tagged `block_id` from it.
///
/// An unreadable file is an error. A readable file without a matching block
/// imports nothing.
pub fn import_block(path: &Path, block_id: &str) -> SpliceResult<String> {
	let content = std::fs::read_to_string(path).map_err(|e| SpliceError::unreadable(path, e))?;

	match find_block(&content, block_id) {
		Some(block) => {
			tracing::debug!(path = %path.display(), block_id, "imported tagged block");
			Ok(block.body)
		}
		None => {
			tracing::warn!(
				path = %path.display(),
				block_id,
				"no tagged block found, importing nothing"
			);
			Ok(String::new())
		}
	}
}

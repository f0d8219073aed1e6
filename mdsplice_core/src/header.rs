/// Characters dropped from a header title when deriving its anchor.
pub const ANCHOR_IGNORED_CHARS: [char; 7] = [':', '+', ',', '!', '"', '(', ')'];

/// A markdown header line broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
	/// Number of leading `#` marks.
	pub level: usize,
	/// Text after the marks with trailing whitespace removed.
	pub title: String,
	/// Link target derived from the title, see [`anchor_slug`].
	pub anchor: String,
}

impl HeaderInfo {
	/// Parse a line already known to be a header line.
	///
	/// The level is the length of the first space-delimited token and the
	/// title is everything after that token and one separating space. A line
	/// terminator, if present, is ignored.
	///
	/// ```
	/// use mdsplice_core::HeaderInfo;
	///
	/// let header = HeaderInfo::parse("## Getting Started (Linux)\n");
	/// assert_eq!(header.level, 2);
	/// assert_eq!(header.title, "Getting Started (Linux)");
	/// assert_eq!(header.anchor, "getting-started-linux");
	/// ```
	pub fn parse(line: &str) -> Self {
		let line = strip_line_ending(line);
		let (marks, rest) = line.split_once(' ').unwrap_or((line, ""));
		let title = rest.trim_end().to_string();
		let anchor = anchor_slug(&title);

		Self {
			level: marks.chars().count(),
			title,
			anchor,
		}
	}
}

/// Returns true if `line` is a markdown header line.
///
/// Lines starting with `#include` are excluded so that C and C++ snippets
/// embedded in a document are not mistaken for headers.
pub fn is_header_line(line: &str) -> bool {
	line.starts_with('#') && !line.starts_with("#include")
}

/// Derive the in-document link anchor for a header title: lowercased, spaces
/// replaced with `-`, and [`ANCHOR_IGNORED_CHARS`] removed.
pub fn anchor_slug(title: &str) -> String {
	title
		.to_lowercase()
		.chars()
		.filter(|c| !ANCHOR_IGNORED_CHARS.contains(c))
		.map(|c| if c == ' ' { '-' } else { c })
		.collect()
}

/// Strip a trailing `\n` or `\r\n` from a single line.
pub(crate) fn strip_line_ending(line: &str) -> &str {
	let line = line.strip_suffix('\n').unwrap_or(line);
	line.strip_suffix('\r').unwrap_or(line)
}

use std::fmt::Write;

use serde::Deserialize;

use crate::header::HeaderInfo;
use crate::header::is_header_line;

/// Marker line emitted at the top of every generated table of contents. It is
/// the target of the `#TOC` links rendered by header back-links.
pub const TOC_ANCHOR_MARKER: &str = r#"<span id="TOC"/></span>"#;

/// Line prefix of the placeholder replaced by a generated table of contents.
pub const TOC_PLACEHOLDER: &str = "[TOC]";

/// Default image used for header back-links.
pub const DEFAULT_BACK_LINK_IMAGE: &str = "docs/toc.png";

/// Table of contents rendering options.
///
/// ```toml
/// [toc]
/// back_links = true
/// back_link_image = "docs/toc.png"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TocOptions {
	/// When true, every header line in the output is followed by an image
	/// link pointing back to the table of contents.
	#[serde(default)]
	pub back_links: bool,
	/// Image displayed by header back-links, relative to the output file.
	#[serde(default = "default_back_link_image")]
	pub back_link_image: String,
}

impl Default for TocOptions {
	fn default() -> Self {
		Self {
			back_links: false,
			back_link_image: default_back_link_image(),
		}
	}
}

fn default_back_link_image() -> String {
	DEFAULT_BACK_LINK_IMAGE.to_string()
}

/// Render the table of contents for a document.
///
/// Every header line in `lines` becomes one list entry, in document order,
/// indented by two spaces per level below the first. Anchors are not
/// deduplicated.
///
/// ```
/// use mdsplice_core::build_toc;
///
/// let toc = build_toc(&["# Intro\n", "text\n", "## Details\n"]);
/// assert_eq!(
/// 	toc,
/// 	"<span id=\"TOC\"/></span>\n\n* [Intro](#intro)\n  * [Details](#details)\n"
/// );
/// ```
pub fn build_toc<S: AsRef<str>>(lines: &[S]) -> String {
	let mut toc = format!("{TOC_ANCHOR_MARKER}\n\n");

	for header in collect_headers(lines) {
		let indent = "  ".repeat(header.level.saturating_sub(1));
		let _ = writeln!(toc, "{indent}* [{}](#{})", header.title, header.anchor);
	}

	toc
}

/// Collect every header of a document in order of appearance.
pub fn collect_headers<S: AsRef<str>>(lines: &[S]) -> Vec<HeaderInfo> {
	lines
		.iter()
		.map(AsRef::<str>::as_ref)
		.filter(|line| is_header_line(line))
		.map(HeaderInfo::parse)
		.collect()
}

/// Render the back-link line appended after headers when
/// [`TocOptions::back_links`] is enabled.
pub fn back_link(options: &TocOptions) -> String {
	format!("[![TOC]({})](#TOC)\n", options.back_link_image)
}

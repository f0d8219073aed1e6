use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::SpliceError;
use crate::SpliceResult;
use crate::engine::TransformOptions;
use crate::toc::TocOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdsplice.toml", ".mdsplice.toml", ".config/mdsplice.toml"];

/// Configuration loaded from an `mdsplice.toml` file.
///
/// ```toml
/// [[documents]]
/// template = "README.src.md"
/// output = "README.md"
///
/// [[documents]]
/// template = "src/api.src.md"
/// output = "src/api.md"
///
/// [toc]
/// back_links = false
/// back_link_image = "docs/toc.png"
///
/// [exclude]
/// patterns = ["vendor/", "third_party/"]
///
/// disable_gitignore = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SpliceConfig {
	/// Explicit (template, output) pairs. When empty, templates are
	/// discovered by walking the project for `*.src.md` files.
	#[serde(default)]
	pub documents: Vec<DocumentEntry>,
	/// Table of contents rendering options.
	#[serde(default)]
	pub toc: TocOptions,
	/// Paths skipped during template discovery.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// When true, `.gitignore` files are not consulted during template
	/// discovery.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// One `[[documents]]` entry. Paths are relative to the project root.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DocumentEntry {
	pub template: PathBuf,
	pub output: PathBuf,
}

/// Configuration for excluding files and directories from template
/// discovery.
///
/// Patterns follow gitignore syntax and are applied on top of any
/// `.gitignore` rules (unless `disable_gitignore` is set).
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl SpliceConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> SpliceResult<Option<SpliceConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)
			.map_err(|e| SpliceError::unreadable(&config_path, e))?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Parse config file contents.
	pub fn parse(content: &str) -> SpliceResult<SpliceConfig> {
		toml::from_str(content).map_err(|e| SpliceError::ConfigParse(e.to_string()))
	}

	/// The transform options described by this config.
	pub fn transform_options(&self) -> TransformOptions {
		TransformOptions {
			toc: self.toc.clone(),
		}
	}
}

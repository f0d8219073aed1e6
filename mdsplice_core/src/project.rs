use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use rayon::prelude::*;

use crate::SpliceError;
use crate::SpliceResult;
use crate::config::CONFIG_FILE_CANDIDATES;
use crate::config::SpliceConfig;
use crate::engine::TransformOptions;
use crate::engine::transform_file;

/// File name suffix of discovered templates. `README.src.md` renders to
/// `README.md`.
pub const TEMPLATE_SUFFIX: &str = ".src.md";

/// A template and the output file generated from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
	pub template: PathBuf,
	pub output: PathBuf,
}

/// A project root with its resolved documents, ready for rendering.
#[derive(Debug)]
pub struct ProjectContext {
	pub root: PathBuf,
	/// Resolved config file, if one was found.
	pub config_path: Option<PathBuf>,
	pub documents: Vec<DocumentPair>,
	pub options: TransformOptions,
}

/// Load the project at `root`.
///
/// Documents come from `[[documents]]` in the config when present, otherwise
/// from `*.src.md` templates found under `root`.
pub fn load_project(root: &Path) -> SpliceResult<ProjectContext> {
	let config_path = SpliceConfig::resolve_path(root);
	let config = SpliceConfig::load(root)?.unwrap_or_default();

	let documents: Vec<DocumentPair> = if config.documents.is_empty() {
		discover_templates(root, &config.exclude.patterns, config.disable_gitignore)?
			.into_iter()
			.filter_map(|template| {
				let output = output_path_for(&template)?;
				Some(DocumentPair { template, output })
			})
			.collect()
	} else {
		config
			.documents
			.iter()
			.map(|entry| {
				DocumentPair {
					template: root.join(&entry.template),
					output: root.join(&entry.output),
				}
			})
			.collect()
	};

	ensure_unique_outputs(&documents)?;
	tracing::debug!(root = %root.display(), documents = documents.len(), "loaded project");

	Ok(ProjectContext {
		root: root.to_path_buf(),
		config_path,
		options: config.transform_options(),
		documents,
	})
}

/// The output path for a discovered template, or `None` if `template` does
/// not end with [`TEMPLATE_SUFFIX`].
pub fn output_path_for(template: &Path) -> Option<PathBuf> {
	let name = template.file_name()?.to_str()?;
	let stem = name.strip_suffix(TEMPLATE_SUFFIX)?;
	if stem.is_empty() {
		return None;
	}
	Some(template.with_file_name(format!("{stem}.md")))
}

/// Every output must be unique and must never overwrite a template.
fn ensure_unique_outputs(documents: &[DocumentPair]) -> SpliceResult<()> {
	let templates: HashSet<&PathBuf> = documents.iter().map(|doc| &doc.template).collect();
	let mut seen = HashSet::new();
	for document in documents {
		if templates.contains(&document.output) {
			return Err(SpliceError::OutputIsTemplate {
				output: document.output.display().to_string(),
			});
		}
		if !seen.insert(&document.output) {
			return Err(SpliceError::DuplicateOutput {
				output: document.output.display().to_string(),
			});
		}
	}
	Ok(())
}

/// A document rendered in memory, alongside what is currently on disk.
#[derive(Debug)]
pub struct RenderedDocument {
	pub pair: DocumentPair,
	/// The freshly rendered content.
	pub content: String,
	/// The existing output file content, `None` if it could not be read.
	pub current: Option<String>,
}

impl RenderedDocument {
	/// Returns true when the output file is missing or differs from the
	/// rendered content.
	pub fn is_stale(&self) -> bool {
		self.current.as_deref() != Some(self.content.as_str())
	}
}

/// A document whose transformation failed.
#[derive(Debug)]
pub struct DocumentError {
	pub pair: DocumentPair,
	pub error: SpliceError,
}

/// Result of rendering every document in a project.
#[derive(Debug, Default)]
pub struct RenderResult {
	pub documents: Vec<RenderedDocument>,
	/// Failures are collected per document. A failing document never affects
	/// the others.
	pub errors: Vec<DocumentError>,
}

impl RenderResult {
	/// Documents whose output needs to be (re)written.
	pub fn stale(&self) -> impl Iterator<Item = &RenderedDocument> {
		self.documents.iter().filter(|doc| doc.is_stale())
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}
}

/// Render every document of the project. Documents are independent and are
/// rendered in parallel; results keep the project's document order.
pub fn render_project(ctx: &ProjectContext) -> RenderResult {
	let outcomes: Vec<Result<RenderedDocument, DocumentError>> = ctx
		.documents
		.par_iter()
		.map(|pair| render_document(pair, &ctx.options))
		.collect();

	let mut result = RenderResult::default();
	for outcome in outcomes {
		match outcome {
			Ok(document) => result.documents.push(document),
			Err(error) => result.errors.push(error),
		}
	}
	result
}

fn render_document(
	pair: &DocumentPair,
	options: &TransformOptions,
) -> Result<RenderedDocument, DocumentError> {
	match transform_file(&pair.template, options) {
		Ok(content) => {
			Ok(RenderedDocument {
				pair: pair.clone(),
				content,
				current: std::fs::read_to_string(&pair.output).ok(),
			})
		}
		Err(error) => {
			tracing::debug!(template = %pair.template.display(), %error, "failed to render document");
			Err(DocumentError {
				pair: pair.clone(),
				error,
			})
		}
	}
}

/// An output file that does not match its template.
#[derive(Debug)]
pub struct StaleOutput {
	pub pair: DocumentPair,
	pub current: Option<String>,
	pub expected: String,
}

/// Result of checking a project for stale outputs.
#[derive(Debug)]
pub struct CheckResult {
	pub stale: Vec<StaleOutput>,
	pub errors: Vec<DocumentError>,
}

impl CheckResult {
	/// Returns true if every output is up to date and no errors occurred.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty() && self.errors.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}
}

/// Check whether every output file matches what its template renders to.
pub fn check_project(ctx: &ProjectContext) -> CheckResult {
	let rendered = render_project(ctx);
	let stale = rendered
		.documents
		.into_iter()
		.filter(RenderedDocument::is_stale)
		.map(|doc| {
			StaleOutput {
				pair: doc.pair,
				current: doc.current,
				expected: doc.content,
			}
		})
		.collect();

	CheckResult {
		stale,
		errors: rendered.errors,
	}
}

/// Write every stale output to disk, creating parent directories as needed.
/// Returns the paths written.
pub fn write_outputs(result: &RenderResult) -> SpliceResult<Vec<PathBuf>> {
	let mut written = Vec::new();
	for document in result.stale() {
		let output = &document.pair.output;
		if let Some(parent) = output.parent() {
			if !parent.as_os_str().is_empty() {
				std::fs::create_dir_all(parent)?;
			}
		}
		std::fs::write(output, &document.content)?;
		tracing::debug!(output = %output.display(), "wrote output");
		written.push(output.clone());
	}
	Ok(written)
}

/// Collect every `*.src.md` template under `root`, sorted.
///
/// When `disable_gitignore` is false, files matched by the root `.gitignore`
/// are skipped. `exclude_patterns` follow gitignore syntax and are always
/// applied on top. Hidden directories, `target` and `node_modules` are never
/// entered, nor are subdirectories carrying their own config file.
pub fn discover_templates(
	root: &Path,
	exclude_patterns: &[String],
	disable_gitignore: bool,
) -> SpliceResult<Vec<PathBuf>> {
	let gitignore = if disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, exclude_patterns)?;

	let mut walker = TemplateWalker {
		gitignore,
		custom_exclude,
		visited_dirs: HashSet::new(),
		templates: Vec::new(),
	};
	walker.walk(root)?;

	let mut templates = walker.templates;
	templates.sort();
	Ok(templates)
}

struct TemplateWalker {
	gitignore: Gitignore,
	custom_exclude: Gitignore,
	visited_dirs: HashSet<PathBuf>,
	templates: Vec<PathBuf>,
}

impl TemplateWalker {
	fn walk(&mut self, dir: &Path) -> SpliceResult<()> {
		if !dir.is_dir() {
			return Ok(());
		}

		// Symlinked directories can loop back on themselves.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !self.visited_dirs.insert(canonical) {
			return Ok(());
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name) {
					continue;
				}
			}

			let is_dir = path.is_dir();
			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.custom_exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				// Directories with their own config are separate projects.
				if has_project_config(&path) {
					continue;
				}
				self.walk(&path)?;
			} else if is_template_file(&path) {
				self.templates.push(path);
			}
		}

		Ok(())
	}
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn has_project_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}

/// Check if a file is a discoverable template.
pub fn is_template_file(path: &Path) -> bool {
	output_path_for(path).is_some()
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> SpliceResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			SpliceError::InvalidExcludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}
	builder.build().map_err(|e| {
		SpliceError::InvalidExcludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

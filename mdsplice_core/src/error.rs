use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SpliceError {
	#[error(transparent)]
	#[diagnostic(code(mdsplice::io_error))]
	Io(#[from] std::io::Error),

	#[error("unable to read `{path}`")]
	#[diagnostic(
		code(mdsplice::unreadable_file),
		help("check that the file exists and that import paths are relative to the importing document")
	)]
	UnreadableFile {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed import directive at {file}:{line}: missing {missing}")]
	#[diagnostic(
		code(mdsplice::malformed_directive),
		help("import directives have the shape `@import \"relative/path\" {{md_id=BlockId}}`")
	)]
	MalformedDirective {
		file: String,
		line: usize,
		directive: String,
		missing: &'static str,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdsplice::config_parse),
		help("check that mdsplice.toml is valid TOML with [[documents]], [toc] and/or [exclude] sections")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(mdsplice::invalid_exclude_pattern))]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("output `{output}` is generated by more than one template")]
	#[diagnostic(
		code(mdsplice::duplicate_output),
		help("each [[documents]] entry must write to a distinct output file")
	)]
	DuplicateOutput { output: String },

	#[error("output `{output}` would overwrite a template")]
	#[diagnostic(
		code(mdsplice::output_is_template),
		help("rename the template so its output does not collide with another template")
	)]
	OutputIsTemplate { output: String },
}

impl SpliceError {
	/// Wrap an I/O failure on `path` as an [`SpliceError::UnreadableFile`].
	pub fn unreadable(path: &std::path::Path, source: std::io::Error) -> Self {
		Self::UnreadableFile {
			path: path.display().to_string(),
			source,
		}
	}
}

pub type SpliceResult<T> = Result<T, SpliceError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

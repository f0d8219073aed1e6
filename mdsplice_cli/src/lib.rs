use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Assemble markdown documents from source templates.",
	long_about = "mdsplice renders `*.src.md` templates into final markdown documents.\n\nA `[TOC]` \
	              line becomes a table of contents built from the document's headers, and an \
	              `@import \"path\" {md_id=Id}` line is replaced by the block tagged `@@md#Id` in \
	              the referenced file.\n\nQuick start:\n  mdsplice update  Render every \
	              template\n  mdsplice check   Verify generated documents are up to date\n  \
	              mdsplice list    Show template and output pairs"
)]
pub struct SpliceCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output, including debug logs.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render every template and write the outputs that changed.
	///
	/// Templates are listed in `mdsplice.toml` under `[[documents]]`, or
	/// discovered as `*.src.md` files when none are configured. A template
	/// that fails to render leaves its output untouched; the other templates
	/// are still written.
	Update {
		/// Preview which outputs would change without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Check that every generated document is up to date.
	///
	/// Exits with a non-zero status code if any output is missing or differs
	/// from what its template renders to. Ideal for CI pipelines.
	Check {
		/// Show a unified diff for each stale output.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// List the template and output pairs of the project.
	List,
}

use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdsplice_cli::Commands;
use mdsplice_cli::SpliceCli;
use mdsplice_core::project::DocumentError;
use mdsplice_core::project::ProjectContext;
use mdsplice_core::project::check_project;
use mdsplice_core::project::load_project;
use mdsplice_core::project::render_project;
use mdsplice_core::project::write_outputs;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

/// Exit status of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
	Success,
	Stale,
	Failed,
}

fn main() {
	let args = SpliceCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Update { dry_run }) => run_update(&args, dry_run),
		Some(Commands::Check { diff }) => run_check(&args, diff),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `mdsplice --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(Outcome::Success) => {}
		Ok(Outcome::Stale) => process::exit(1),
		Ok(Outcome::Failed) => process::exit(2),
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<mdsplice_core::SpliceError>() {
				Ok(splice_err) => {
					let report: miette::Report = (*splice_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// `--verbose` enables debug logs, otherwise `RUST_LOG` applies with a
/// default of `warn`.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("mdsplice=debug,mdsplice_core=debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn resolve_root(args: &SpliceCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_and_report(args: &SpliceCli) -> Result<ProjectContext, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_project(&root)?;

	if args.verbose {
		match &ctx.config_path {
			Some(path) => println!("Using config: {}", make_relative(path, &root)),
			None => println!("No config file found, discovering `*.src.md` templates."),
		}
		println!("Found {} document(s).", ctx.documents.len());
	}

	Ok(ctx)
}

fn run_update(args: &SpliceCli, dry_run: bool) -> Result<Outcome, Box<dyn std::error::Error>> {
	let ctx = load_and_report(args)?;
	let root = resolve_root(args);
	let rendered = render_project(&ctx);

	let mut stale: Vec<_> = rendered
		.stale()
		.map(|doc| make_relative(&doc.pair.output, &root))
		.collect();
	stale.sort();

	if stale.is_empty() {
		if !rendered.has_errors() {
			println!("All documents are already up to date.");
		}
	} else if dry_run {
		println!("Dry run: would update {} document(s):", stale.len());
		for rel in &stale {
			println!("  {rel}");
		}
	} else {
		let written = write_outputs(&rendered)?;
		println!("Updated {} document(s).", written.len());
		if args.verbose {
			for rel in &stale {
				println!("  {rel}");
			}
		}
	}

	if rendered.has_errors() {
		print_document_errors(rendered.errors, &root);
		return Ok(Outcome::Failed);
	}

	Ok(Outcome::Success)
}

fn run_check(args: &SpliceCli, show_diff: bool) -> Result<Outcome, Box<dyn std::error::Error>> {
	let ctx = load_and_report(args)?;
	let root = resolve_root(args);
	let result = check_project(&ctx);

	if result.is_ok() {
		println!("Check passed: all documents are up to date.");
		return Ok(Outcome::Success);
	}

	if !result.stale.is_empty() {
		eprintln!("Stale documents:");
		let mut stale: Vec<_> = result.stale.iter().collect();
		stale.sort_by_key(|entry| make_relative(&entry.pair.output, &root));
		for entry in stale {
			let output = make_relative(&entry.pair.output, &root);
			let template = make_relative(&entry.pair.template, &root);
			if entry.current.is_some() {
				eprintln!("  {output} (from {template}) is out of date");
			} else {
				eprintln!("  {output} (from {template}) is missing");
			}

			if show_diff {
				print_diff(entry.current.as_deref().unwrap_or(""), &entry.expected);
			}
		}
		eprintln!();
	}

	let summary = check_summary(result.stale.len(), result.errors.len());
	let has_errors = result.has_errors();
	if has_errors {
		print_document_errors(result.errors, &root);
	}
	eprintln!("{summary}");

	Ok(if has_errors {
		Outcome::Failed
	} else {
		Outcome::Stale
	})
}

fn check_summary(stale: usize, errors: usize) -> String {
	let mut parts = Vec::new();
	if errors > 0 {
		parts.push(format!("{errors} document(s) failed to render"));
	}
	if stale > 0 {
		parts.push(format!("{stale} document(s) are out of date"));
	}
	format!("{}. Run `mdsplice update` to fix.", parts.join(" and "))
}

fn run_list(args: &SpliceCli) -> Result<Outcome, Box<dyn std::error::Error>> {
	let ctx = load_and_report(args)?;
	let root = resolve_root(args);

	if ctx.documents.is_empty() {
		println!("No templates found.");
		return Ok(Outcome::Success);
	}

	println!("{}", colored!("Documents:", bold));
	for document in &ctx.documents {
		println!(
			"  {} -> {}",
			make_relative(&document.template, &root),
			make_relative(&document.output, &root)
		);
	}

	Ok(Outcome::Success)
}

fn print_document_errors(errors: Vec<DocumentError>, root: &Path) {
	for failure in errors {
		let template = make_relative(&failure.pair.template, root);
		let report =
			miette::Report::new(failure.error).wrap_err(format!("failed to render `{template}`"));
		eprintln!("{report:?}");
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

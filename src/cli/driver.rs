use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tsr_binder::BinderHost;
use tsr_common::{Observers, TransformOptions};
use tsr_core::{Pipeline, PipelineState, TransformOutcome, normalize_path};

use crate::cli::args::{CliArgs, ColorChoice};
use crate::cli::config::resolve_options;
use crate::cli::reporter::EventPrinter;

pub const EXIT_SUCCESS: i32 = 0;
/// The run stopped on diagnostics.
pub const EXIT_ABORTED: i32 = 1;

/// Directory the entry file lives in, absolute and normalized.
pub fn entry_base(entry: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(entry)
        .with_context(|| format!("failed to resolve entry file: {}", entry.display()))?;
    let absolute = normalize_path(&absolute);
    absolute
        .parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("entry file has no parent directory: {}", absolute.display()))
}

/// Transform `entry` with the binder host, printing events to `out` when
/// `options.log` is set.
pub fn transform<W: Write>(
    entry: &Path,
    options: TransformOptions,
    out: W,
    color: bool,
) -> Result<TransformOutcome> {
    let base = entry_base(entry)?;
    let host = BinderHost::new();
    let log = options.log;
    let mut printer = EventPrinter::new(out, color, &base, &options.temp_folder_name);
    let mut pipeline = Pipeline::new(&host, options);

    let mut observers = Observers::new();
    if log {
        observers.register(&mut printer);
    }
    let outcome = pipeline
        .transform(entry, &mut observers)
        .with_context(|| format!("failed to transform {}", entry.display()))?;
    info!(state = ?outcome.state, emitted = outcome.emitted.len(), "run finished");
    Ok(outcome)
}

/// Run the CLI and return the process exit code.
pub fn run(args: &CliArgs) -> Result<i32> {
    let options = resolve_options(args)?;
    let color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stderr().is_terminal(),
    };
    let outcome = transform(&args.entry, options, std::io::stderr(), color)?;
    Ok(match outcome.state {
        PipelineState::Done => EXIT_SUCCESS,
        _ => EXIT_ABORTED,
    })
}

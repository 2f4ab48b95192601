//! The `SemanticHost` backed by this crate's loader and binder.

use crate::program::Program;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsr_common::{CompilerOptions, Diagnostic};
use tsr_core::{SemanticHost, SemanticModel};
use tsr_emitter::{PrintOptions, print_to_string};
use tsr_parser::parse_source;

#[derive(Clone, Copy, Debug, Default)]
pub struct BinderHost;

impl BinderHost {
    pub fn new() -> Self {
        BinderHost
    }
}

impl SemanticHost for BinderHost {
    fn create_program(&self, roots: &[PathBuf], options: &CompilerOptions) -> Box<dyn SemanticModel> {
        Box::new(Program::new(roots, options))
    }

    /// Syntax errors in the current text of every non-declaration unit.
    fn emit_diagnostics(&self, model: &dyn SemanticModel) -> Vec<Diagnostic> {
        model
            .units()
            .iter()
            .filter(|unit| !unit.is_declaration_file)
            .flat_map(|unit| parse_source(&unit.file_name, &unit.text).diagnostics)
            .collect()
    }

    fn emit(
        &self,
        model: &dyn SemanticModel,
        root_dir: &Path,
        out_dir: &Path,
    ) -> io::Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for unit in model.units().iter().filter(|unit| !unit.is_declaration_file) {
            let relative = unit
                .path
                .strip_prefix(root_dir)
                .unwrap_or_else(|_| Path::new(&unit.file_name));
            let target = out_dir.join(relative).with_extension("js");
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let text = print_to_string(&unit.arena, unit.root, PrintOptions::javascript());
            fs::write(&target, text)?;
            debug!(file = %target.display(), "emitted");
            written.push(target);
        }
        info!(files = written.len(), out_dir = %out_dir.display(), "emit finished");
        Ok(written)
    }
}

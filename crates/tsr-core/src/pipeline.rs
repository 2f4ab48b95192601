//! Orchestration of a transform run.
//!
//! ```text
//! Idle -> CheckingPre -> Normalizing -> Reparsing -> Mutating -> CheckingPost -> Emitting -> Done
//!              |                                                      |
//!              +------------------------> Aborted <-------------------+
//! ```
//!
//! The program is derived three times: from the entry file, from the
//! normalised copy in the temp workspace, and from the mutated copy. Each
//! derivation gets its own `Scanner`; only library bindings (by file path)
//! and recorded type declarations cross from one generation to the next.

use crate::context::{LibBinding, MutationContext};
use crate::error::{Result, TransformError};
use crate::mutate::mutate_unit;
use crate::normalize::normalize_unit;
use crate::scanner::{DeclarationRecord, Scanner};
use crate::semantics::{SemanticHost, SemanticModel, UnitId};
use crate::workspace::{TempWorkspace, normalize_path};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tsr_common::{CompilerOptions, Diagnostic, Observers, TransformEvent, TransformOptions};
use tsr_emitter::{PrintOptions, print_to_string, quote_string};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    CheckingPre,
    Normalizing,
    Reparsing,
    Mutating,
    CheckingPost,
    Emitting,
    Done,
    Aborted,
}

#[derive(Debug)]
pub struct TransformOutcome {
    /// `Done` or `Aborted`.
    pub state: PipelineState,
    /// Diagnostics of the checking state that ended or passed the run.
    pub diagnostics: Vec<Diagnostic>,
    pub emitted: Vec<PathBuf>,
    pub declarations_file: Option<PathBuf>,
}

pub struct Pipeline<'h> {
    host: &'h dyn SemanticHost,
    options: TransformOptions,
    state: PipelineState,
}

impl<'h> Pipeline<'h> {
    pub fn new(host: &'h dyn SemanticHost, options: TransformOptions) -> Self {
        Pipeline {
            host,
            options,
            state: PipelineState::Idle,
        }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn enter(&mut self, state: PipelineState) {
        debug!(from = ?self.state, to = ?state, "pipeline state");
        self.state = state;
    }

    /// Transform the program rooted at `entry`.
    ///
    /// Diagnostics of the input or of the rewritten program end the run in
    /// `Aborted` unless `force` or `finishOnError` is set. Errors are
    /// reserved for I/O failures and broken invariants.
    pub fn transform(
        &mut self,
        entry: &Path,
        observers: &mut Observers<'_>,
    ) -> Result<TransformOutcome> {
        self.state = PipelineState::Idle;
        observers.emit(TransformEvent::Start);

        let entry = std::path::absolute(entry)
            .map(|path| normalize_path(&path))
            .map_err(|err| TransformError::io(entry, err))?;
        let Some(base) = entry.parent().map(Path::to_path_buf) else {
            return Err(TransformError::Invariant(format!(
                "entry file {} has no parent directory",
                entry.display()
            )));
        };
        let workspace = TempWorkspace::new(&base, &self.options.temp_folder_name);
        workspace.remove()?;
        info!(entry = %entry.display(), "transform");

        // Pre-transform check.
        self.enter(PipelineState::CheckingPre);
        let mut compiler_options = self.options.compiler_options.clone();
        compiler_options.root_dir = Some(base.display().to_string());
        let model = self.host.create_program(std::slice::from_ref(&entry), &compiler_options);
        let diagnostics = model.diagnostics();
        if let Some(outcome) = self.check(&workspace, diagnostics, observers)? {
            return Ok(outcome);
        }

        // Pass 1.
        self.enter(PipelineState::Normalizing);
        let transformed: Vec<PathBuf> = model
            .units()
            .iter()
            .filter(|unit| !unit.is_declaration_file)
            .map(|unit| unit.path.clone())
            .collect();
        observers.emit(TransformEvent::Transform(transformed));
        let libs = self.normalize(model.as_ref(), &workspace)?;
        drop(model);

        // Pass 2 on the re-derived program.
        self.enter(PipelineState::Reparsing);
        let temp_entry = workspace.temp_path_for(&entry)?;
        let mut temp_options = compiler_options.clone();
        temp_options.root_dir = Some(workspace.root().display().to_string());
        let model = self
            .host
            .create_program(std::slice::from_ref(&temp_entry), &temp_options);

        self.enter(PipelineState::Mutating);
        let declarations = self.mutate(model.as_ref(), &workspace, libs)?;
        drop(model);

        // Post-transform check.
        self.enter(PipelineState::CheckingPost);
        let model = self
            .host
            .create_program(std::slice::from_ref(&temp_entry), &temp_options);
        let diagnostics = self.host.emit_diagnostics(model.as_ref());
        let passed = diagnostics.clone();
        if let Some(outcome) = self.check(&workspace, diagnostics, observers)? {
            return Ok(outcome);
        }

        self.enter(PipelineState::Emitting);
        let out_dir = out_dir(&compiler_options, &base);
        let emitted = self
            .host
            .emit(model.as_ref(), workspace.root(), &out_dir)
            .map_err(|err| TransformError::io(&out_dir, err))?;
        debug!(files = emitted.len(), out_dir = %out_dir.display(), "emitted");
        let declarations_file = self.write_declarations(&out_dir, &declarations)?;

        observers.emit(TransformEvent::Cleanup);
        if !self.options.keep_temp_files {
            workspace.remove()?;
        }
        self.enter(PipelineState::Done);
        observers.emit(TransformEvent::End);
        Ok(TransformOutcome {
            state: PipelineState::Done,
            diagnostics: passed,
            emitted,
            declarations_file,
        })
    }

    /// Report `diagnostics` and decide whether the run stops here.
    fn check(
        &mut self,
        workspace: &TempWorkspace,
        diagnostics: Vec<Diagnostic>,
        observers: &mut Observers<'_>,
    ) -> Result<Option<TransformOutcome>> {
        if diagnostics.is_empty() {
            return Ok(None);
        }
        observers.emit(TransformEvent::diagnostics(&diagnostics));
        if self.options.continue_on_diagnostics() {
            warn!(count = diagnostics.len(), state = ?self.state, "continuing past diagnostics");
            return Ok(None);
        }

        info!(count = diagnostics.len(), state = ?self.state, "aborting on diagnostics");
        if !self.options.keep_temp_files {
            workspace.remove()?;
        }
        self.enter(PipelineState::Aborted);
        observers.emit(TransformEvent::Stop);
        Ok(Some(TransformOutcome {
            state: PipelineState::Aborted,
            diagnostics,
            emitted: Vec::new(),
            declarations_file: None,
        }))
    }

    /// Normalise every unit into the workspace. Declaration files are copied
    /// as they are. Returns the library binding chosen for each written file.
    fn normalize(
        &self,
        model: &dyn SemanticModel,
        workspace: &TempWorkspace,
    ) -> Result<FxHashMap<PathBuf, LibBinding>> {
        let mut scanner = Scanner::new(model);
        let mut libs = FxHashMap::default();
        for (index, unit) in model.units().iter().enumerate() {
            if unit.is_declaration_file {
                workspace.copy(&unit.path)?;
                continue;
            }
            let mut ctx =
                MutationContext::new(&mut scanner, &self.options, UnitId(index as u32), None);
            normalize_unit(&mut ctx)?;
            let (arena, root, lib) = ctx.finish();
            let text = print_to_string(&arena, root, PrintOptions::default());
            let target = workspace.write(&unit.path, &text)?;
            debug!(file = %target.display(), lib = %lib.name, "wrote normalized unit");
            libs.insert(target, lib);
        }
        Ok(libs)
    }

    /// Mutate every unit of the re-derived program in place.
    fn mutate(
        &self,
        model: &dyn SemanticModel,
        workspace: &TempWorkspace,
        mut libs: FxHashMap<PathBuf, LibBinding>,
    ) -> Result<Vec<DeclarationRecord>> {
        let mut scanner = Scanner::new(model);
        for (index, unit) in model.units().iter().enumerate() {
            if unit.is_declaration_file {
                continue;
            }
            let lib = libs.remove(&unit.path);
            let mut ctx =
                MutationContext::new(&mut scanner, &self.options, UnitId(index as u32), lib);
            mutate_unit(&mut ctx)?;
            let (arena, root, lib) = ctx.finish();
            let text = print_to_string(&arena, root, PrintOptions::default());
            workspace.rewrite(&unit.path, &text)?;
            debug!(file = %unit.path.display(), uses_lib = lib.used, "wrote mutated unit");
        }
        Ok(scanner.collect_declarations())
    }

    /// `<out_dir>/<declarationFileName>.js`, one `declare` call per recorded
    /// type binding. Nothing is written when no binding was recorded.
    fn write_declarations(
        &self,
        out_dir: &Path,
        declarations: &[DeclarationRecord],
    ) -> Result<Option<PathBuf>> {
        if declarations.is_empty() {
            return Ok(None);
        }
        let libs: IndexSet<&str> = declarations
            .iter()
            .map(|record| record.lib_name.as_str())
            .collect();
        let module = quote_string(&self.options.lib_module);
        let mut text = String::new();
        for lib in &libs {
            let _ = writeln!(text, "import {lib} from {module};");
        }
        text.push('\n');
        for record in declarations {
            let _ = writeln!(text, "{}.declare({});", record.lib_name, record.expression);
        }

        fs::create_dir_all(out_dir).map_err(|err| TransformError::io(out_dir, err))?;
        let path = out_dir.join(self.options.declaration_file());
        fs::write(&path, text).map_err(|err| TransformError::io(&path, err))?;
        debug!(file = %path.display(), count = declarations.len(), "wrote declarations");
        Ok(Some(path))
    }
}

/// `outDir` resolved against `base`, or `base` itself.
fn out_dir(options: &CompilerOptions, base: &Path) -> PathBuf {
    match options.out_dir.as_deref() {
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    }
}

//! Loading the files of a program.
//!
//! Root files are read and parsed first; relative import and export
//! specifiers are then followed breadth-first. Non-relative specifiers name
//! external modules, which are never loaded.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_core::{NodeRef, SourceUnit, UnitId, normalize_path};
use tsr_parser::{Node, NodeIndex, parse_source};

/// Extensions tried, in order, for a relative specifier without one.
const CANDIDATE_SUFFIXES: &[&str] = &[".ts", ".d.ts", "/index.ts", "/index.d.ts"];

#[derive(Debug, Default)]
pub struct LoadedProgram {
    pub units: Vec<SourceUnit>,
    /// Global and syntactic diagnostics, plus unresolved relative modules.
    pub diagnostics: Vec<Diagnostic>,
    /// Import and export declarations whose specifier resolved to a unit.
    pub module_targets: FxHashMap<NodeRef, UnitId>,
}

/// Read every file reachable from `roots`.
///
/// `root_dir` only shortens the file names used in diagnostics.
pub fn load_program(roots: &[PathBuf], root_dir: Option<&Path>) -> LoadedProgram {
    let mut program = LoadedProgram::default();
    let mut by_path: FxHashMap<PathBuf, UnitId> = FxHashMap::default();
    let mut queue: VecDeque<UnitId> = VecDeque::new();

    for root in roots {
        let path = normalize_path(&absolute(root));
        if by_path.contains_key(&path) {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => {
                let id = push_unit(&mut program, &mut by_path, path, text, root_dir);
                queue.push_back(id);
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "root file not readable");
                let shown = root.display().to_string();
                program
                    .diagnostics
                    .push(Diagnostic::global(&diagnostic_messages::FILE_NOT_FOUND, &[&shown]));
            }
        }
    }

    while let Some(id) = queue.pop_front() {
        let requests = module_requests(&program.units[id.index()]);
        for (declaration, specifier, start, length) in requests {
            if !is_relative(&specifier) {
                trace!(specifier = %specifier, "external module");
                continue;
            }
            let unit = &program.units[id.index()];
            let directory = unit.path.parent().map(Path::to_path_buf).unwrap_or_default();
            let Some(target) = resolve_relative(&directory, &specifier) else {
                let file_name = unit.file_name.clone();
                program.diagnostics.push(Diagnostic::from_message(
                    file_name,
                    start,
                    length,
                    &diagnostic_messages::CANNOT_FIND_MODULE,
                    &[&specifier],
                ));
                continue;
            };

            let target_id = match by_path.get(&target) {
                Some(&existing) => existing,
                None => {
                    let Ok(text) = fs::read_to_string(&target) else {
                        continue;
                    };
                    let new_id = push_unit(&mut program, &mut by_path, target, text, root_dir);
                    queue.push_back(new_id);
                    new_id
                }
            };
            program
                .module_targets
                .insert(NodeRef::new(id, declaration), target_id);
        }
    }

    debug!(
        units = program.units.len(),
        diagnostics = program.diagnostics.len(),
        "program loaded"
    );
    program
}

fn push_unit(
    program: &mut LoadedProgram,
    by_path: &mut FxHashMap<PathBuf, UnitId>,
    path: PathBuf,
    text: String,
    root_dir: Option<&Path>,
) -> UnitId {
    let file_name = display_name(&path, root_dir);
    let parsed = parse_source(&file_name, &text);
    let id = UnitId(program.units.len() as u32);
    program.diagnostics.extend(parsed.diagnostics);
    program.units.push(SourceUnit {
        is_declaration_file: file_name.ends_with(".d.ts"),
        path: path.clone(),
        file_name,
        text: parsed.text,
        arena: parsed.arena,
        root: parsed.root,
    });
    by_path.insert(path, id);
    id
}

/// `(declaration, specifier, start, length)` for every top-level import and
/// re-export with a string specifier.
fn module_requests(unit: &SourceUnit) -> Vec<(NodeIndex, String, u32, u32)> {
    let Some(Node::SourceFile { statements }) = unit.node(unit.root) else {
        return Vec::new();
    };
    statements
        .iter()
        .filter_map(|&statement| {
            let specifier = match unit.node(statement)? {
                Node::ImportDeclaration {
                    module_specifier, ..
                }
                | Node::ExportDeclaration {
                    module_specifier, ..
                } => *module_specifier,
                _ => return None,
            };
            let Some(Node::StringLiteral { text }) = unit.node(specifier) else {
                return None;
            };
            let range = unit.arena.range(specifier);
            Some((
                statement,
                text.clone(),
                range.pos,
                range.end.saturating_sub(range.pos),
            ))
        })
        .collect()
}

pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

/// Resolve a relative specifier against `directory` to an existing file.
pub fn resolve_relative(directory: &Path, specifier: &str) -> Option<PathBuf> {
    let base = normalize_path(&directory.join(specifier));
    if specifier.ends_with(".ts") && base.is_file() {
        return Some(base);
    }
    // `./a.js` names the output of `./a.ts`.
    let stem = specifier
        .strip_suffix(".js")
        .map(|stem| normalize_path(&directory.join(stem)))
        .unwrap_or(base);
    let stem = stem.to_string_lossy();
    CANDIDATE_SUFFIXES
        .iter()
        .map(|suffix| PathBuf::from(format!("{stem}{suffix}")))
        .find(|candidate| candidate.is_file())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn display_name(path: &Path, root_dir: Option<&Path>) -> String {
    root_dir
        .and_then(|root| path.strip_prefix(root).ok())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

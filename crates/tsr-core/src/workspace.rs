//! The temporary directory intermediate sources are written to.

use crate::error::{Result, TransformError};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// `<base>/<temp folder>`, mirroring the layout of the files under `base`.
#[derive(Clone, Debug)]
pub struct TempWorkspace {
    base: PathBuf,
    root: PathBuf,
}

impl TempWorkspace {
    pub fn new(base: impl Into<PathBuf>, folder_name: &str) -> Self {
        let base = base.into();
        let root = base.join(folder_name);
        TempWorkspace { base, root }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the intermediate copy of `path` lives.
    pub fn temp_path_for(&self, path: &Path) -> Result<PathBuf> {
        let relative = path
            .strip_prefix(&self.base)
            .map_err(|_| TransformError::OutsideRoot {
                path: path.to_path_buf(),
                root: self.base.clone(),
            })?;
        Ok(self.root.join(relative))
    }

    /// Write `text` as the intermediate copy of `path`.
    pub fn write(&self, path: &Path, text: &str) -> Result<PathBuf> {
        let target = self.temp_path_for(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| TransformError::io(parent, err))?;
        }
        fs::write(&target, text).map_err(|err| TransformError::io(&target, err))?;
        Ok(target)
    }

    /// Overwrite a file that already lives in the workspace.
    pub fn rewrite(&self, target: &Path, text: &str) -> Result<()> {
        if !target.starts_with(&self.root) {
            return Err(TransformError::OutsideRoot {
                path: target.to_path_buf(),
                root: self.root.clone(),
            });
        }
        fs::write(target, text).map_err(|err| TransformError::io(target, err))
    }

    /// Copy `path` into the workspace unchanged.
    pub fn copy(&self, path: &Path) -> Result<PathBuf> {
        let target = self.temp_path_for(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| TransformError::io(parent, err))?;
        }
        fs::copy(path, &target).map_err(|err| TransformError::io(path, err))?;
        Ok(target)
    }

    /// Delete the workspace if it exists.
    pub fn remove(&self) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }
        debug!(path = %self.root.display(), "removing temp workspace");
        fs::remove_dir_all(&self.root).map_err(|err| TransformError::io(&self.root, err))
    }
}

/// Lexically resolve `.` and `..` components.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

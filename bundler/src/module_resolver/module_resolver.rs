use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::{
    ast::ModuleAst,
    error::{BundleError, BundleResult, ErrorType},
    graph::{Module, ModuleGraph, ModuleId},
    parser,
};

use super::filesystem::FileSystem;

/// File name a directory import resolves to.
pub const INDEX_FILE: &str = "index.js";

/// Resolves import specifiers to canonical paths and loads the transitive
/// module closure. The cache is per-build: created with the resolver,
/// consumed into the graph.
#[derive(Debug)]
pub struct ModuleResolver<F: FileSystem> {
    cache: HashMap<PathBuf, ModuleId>,
    modules: Vec<Module>,
    filesystem: F,
}

impl<F: FileSystem> ModuleResolver<F> {
    pub fn new(filesystem: F) -> Self {
        Self {
            cache: HashMap::new(),
            modules: Vec::new(),
            filesystem,
        }
    }

    /// Resolves `specifier`, as written in the module at `importer`, to a
    /// canonical path. Only relative specifiers are supported; a specifier
    /// resolving to a directory maps to its index file.
    pub fn resolve(&self, importer: &Path, specifier: &str) -> BundleResult<PathBuf> {
        if !specifier.starts_with("./") && !specifier.starts_with("../") {
            return Err(BundleError::new(
                ErrorType::UnsupportedSpecifier,
                None,
                format!(
                    "Cannot resolve '{}' imported from '{}': only relative specifiers are supported",
                    specifier,
                    importer.display()
                ),
            ));
        }

        let importer_dir = importer.parent().unwrap_or_else(|| Path::new(""));
        let joined = normalize(&importer_dir.join(specifier));

        if self.filesystem.is_dir(&joined) {
            let index_path = joined.join(INDEX_FILE);
            if self.filesystem.is_file(&index_path) {
                return Ok(index_path);
            }
            return Err(BundleError::new(
                ErrorType::ModuleNotFound,
                None,
                format!(
                    "Directory '{}' imported from '{}' has no {}",
                    joined.display(),
                    importer.display(),
                    INDEX_FILE
                ),
            ));
        }

        if self.filesystem.is_file(&joined) {
            return Ok(joined);
        }

        Err(BundleError::new(
            ErrorType::ModuleNotFound,
            None,
            format!(
                "Module '{}' imported from '{}' not found",
                specifier,
                importer.display()
            ),
        ))
    }

    /// Loads the module at `path` and, recursively, everything it imports.
    ///
    /// The cache entry is inserted *before* recursing into dependencies, so
    /// a module imported from several sites is loaded and parsed once, and a
    /// cyclic import chain terminates by returning the in-progress module id.
    pub fn load_module(&mut self, path: &Path) -> BundleResult<ModuleId> {
        let path = normalize(path);
        if let Some(&id) = self.cache.get(&path) {
            return Ok(id);
        }

        let raw_content = self
            .filesystem
            .read_file(&path)
            .map_err(|e| e.with_path(&path))?;
        let pairs = parser::parse(&raw_content).map_err(|e| e.with_path(&path))?;
        let ast = ModuleAst::build(pairs).map_err(|e| e.with_path(&path))?;

        let sources: Vec<String> = ast
            .imports
            .iter()
            .map(|import| import.value.source.clone())
            .collect();

        let id = self.modules.len();
        self.modules.push(Module {
            path: path.clone(),
            raw_content,
            ast,
            dependencies: Vec::new(),
            transformed_content: None,
        });
        self.cache.insert(path.clone(), id);

        let mut dependencies = Vec::with_capacity(sources.len());
        for source in &sources {
            let dependency_path = self.resolve(&path, source).map_err(|e| e.with_path(&path))?;
            dependencies.push(self.load_module(&dependency_path)?);
        }
        log::debug!(
            "loaded module '{}' with {} dependencies",
            path.display(),
            dependencies.len()
        );
        self.modules[id].dependencies = dependencies;

        Ok(id)
    }

    pub fn into_graph(self, entry: ModuleId) -> ModuleGraph {
        ModuleGraph {
            modules: self.modules,
            entry,
        }
    }
}

/// Lexical path normalization: folds `.` and `..` components without
/// touching the filesystem, so canonical paths stay relative and behave the
/// same under the real and the in-memory filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else {
                    parts.push(component);
                }
            }
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_relative_components() {
        assert_eq!(normalize(Path::new("./src/a.js")), PathBuf::from("src/a.js"));
        assert_eq!(
            normalize(Path::new("src/nested/../a.js")),
            PathBuf::from("src/a.js")
        );
        assert_eq!(
            normalize(Path::new("src/./nested/./b.js")),
            PathBuf::from("src/nested/b.js")
        );
        assert_eq!(normalize(Path::new("../a.js")), PathBuf::from("../a.js"));
    }
}

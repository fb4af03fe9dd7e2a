use std::path::{Path, PathBuf};

use crate::{
    ast::ModuleAst,
    error::BundleResult,
    module_resolver::{FileSystem, ModuleResolver},
};

/// Index into the graph's module arena. Dependency edges are ids rather than
/// owned references so a diamond or a cycle is just repeated ids.
pub type ModuleId = usize;

/// One source file. Created during graph construction, transformed exactly
/// once during bundling, read-only afterwards.
#[derive(Debug)]
pub struct Module {
    /// Canonical, resolved path; also the stable key the runtime uses.
    pub path: PathBuf,
    pub raw_content: String,
    pub ast: ModuleAst,
    /// Dependencies in source-declaration order, index-aligned with
    /// `ast.imports`.
    pub dependencies: Vec<ModuleId>,
    /// Authoritative text to emit once the interface transform has run.
    pub transformed_content: Option<String>,
}

/// The entry module plus the transitive closure reachable through imports.
#[derive(Debug)]
pub struct ModuleGraph {
    pub modules: Vec<Module>,
    pub entry: ModuleId,
}

impl ModuleGraph {
    /// Builds the graph by loading the entry module; traversal order is the
    /// resolver's recursion (depth-first, source-declaration order).
    pub fn build<F: FileSystem>(entry_path: &Path, filesystem: F) -> BundleResult<Self> {
        let mut resolver = ModuleResolver::new(filesystem);
        let entry = resolver.load_module(entry_path)?;
        Ok(resolver.into_graph(entry))
    }

    pub fn entry_module(&self) -> &Module {
        &self.modules[self.entry]
    }
}

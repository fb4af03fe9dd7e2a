mod runtime;

pub use runtime::{js_string, module_key, OUTPUT_FILE_NAME};

use std::collections::HashSet;
use std::path::Path;

use crate::{
    error::{BundleError, BundleResult, ErrorType},
    graph::{ModuleGraph, ModuleId},
    module_resolver::FileSystem,
    transform,
};

/// One named output file. For this bundler there is exactly one.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
}

/// Graph → bundle → write, the whole pipeline. Output is built fully in
/// memory; on error nothing is written.
pub fn build<F: FileSystem + Clone>(
    entry_path: &Path,
    out_dir: &Path,
    filesystem: &F,
) -> BundleResult<Vec<OutputFile>> {
    let mut graph = ModuleGraph::build(entry_path, filesystem.clone())?;
    let output_files = bundle(&mut graph)?;
    for file in &output_files {
        filesystem.write_file(&out_dir.join(&file.name), &file.content)?;
    }
    Ok(output_files)
}

/// Transforms every reachable module once and serializes the graph into a
/// single artifact: the module table wrapped in the loader runtime.
pub fn bundle(graph: &mut ModuleGraph) -> BundleResult<Vec<OutputFile>> {
    let order = collect_modules(graph);
    log::debug!("collected {} modules from entry", order.len());

    for &id in &order {
        let dep_keys: Vec<String> = graph.modules[id]
            .dependencies
            .iter()
            .map(|&dep| module_key(&graph.modules[dep].path))
            .collect();
        let transformed = transform::transform_module(&graph.modules[id], &dep_keys);
        graph.modules[id].transformed_content = Some(transformed);
    }

    let table = module_table(graph, &order)?;
    let entry_key = module_key(&graph.entry_module().path);
    log::debug!("emitting bundle with entry '{}'", entry_key);

    let content = runtime::emit(&table, &entry_key);
    Ok(vec![OutputFile {
        name: OUTPUT_FILE_NAME.to_string(),
        content,
    }])
}

/// Depth-first flattening from the entry, dependencies in declared order,
/// each module collected exactly once even when reached through a diamond
/// or a cycle.
fn collect_modules(graph: &ModuleGraph) -> Vec<ModuleId> {
    fn collect(
        graph: &ModuleGraph,
        id: ModuleId,
        visited: &mut HashSet<ModuleId>,
        order: &mut Vec<ModuleId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        order.push(id);
        for &dependency in &graph.modules[id].dependencies {
            collect(graph, dependency, visited, order);
        }
    }

    let mut order = Vec::new();
    let mut visited = HashSet::new();
    collect(graph, graph.entry, &mut visited, &mut order);
    order
}

fn module_table(graph: &ModuleGraph, order: &[ModuleId]) -> BundleResult<String> {
    let mut seen_keys = HashSet::new();
    let mut table = String::from("{");

    for &id in order {
        let module = &graph.modules[id];
        let key = module_key(&module.path);
        if !seen_keys.insert(key.clone()) {
            return Err(BundleError::new(
                ErrorType::DuplicateModuleKey,
                None,
                format!("two modules serialize to the same table key '{}'", key),
            ));
        }
        let body = module
            .transformed_content
            .as_deref()
            .unwrap_or(module.raw_content.as_str());
        table.push_str(&format!(
            "\n  {}: function(exports, require) {{\n{}  }},",
            js_string(&key),
            body
        ));
    }

    table.push_str("\n}");
    Ok(table)
}

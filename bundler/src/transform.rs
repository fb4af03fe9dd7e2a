//! The interface transform: rewrites a module's native import/export syntax
//! into the `exports`/`require` parameter convention the loader runtime
//! passes to every module body.

use crate::ast::export_decl::ExportDecl;
use crate::ast::import_decl::ImportDecl;
use crate::bundler::js_string;
use crate::graph::Module;

struct Splice {
    start: usize,
    end: usize,
    replacement: String,
}

/// Produces the module's transformed text. `dep_keys` holds the canonical
/// table key of each dependency, index-aligned with the module's import
/// declarations — rewritten `require()` calls use the resolved key, never
/// the raw specifier, so they match the module table by construction.
pub fn transform_module(module: &Module, dep_keys: &[String]) -> String {
    let source = &module.raw_content;
    let mut splices = Vec::new();

    for (import, key) in module.ast.imports.iter().zip(dep_keys) {
        splices.push(Splice {
            start: import.pos.start,
            end: import.pos.end,
            replacement: rewrite_import(&import.value, key),
        });
    }

    let mut footer = String::new();
    for export in &module.ast.exports {
        let text = &source[export.pos.start..export.pos.end];
        let replacement = match &export.value {
            ExportDecl::Default => rewrite_default(text),
            ExportDecl::List { specifiers } => {
                let assignments: Vec<String> = specifiers
                    .iter()
                    .map(|specifier| {
                        let exported = specifier.exported.as_ref().unwrap_or(&specifier.local);
                        format!("exports.{} = {};", exported, specifier.local)
                    })
                    .collect();
                assignments.join(" ") + "\n"
            }
            ExportDecl::Binding { name } => {
                footer.push_str(&format!("exports.{name} = {name};\n"));
                strip_export_keyword(text).to_string()
            }
        };
        splices.push(Splice {
            start: export.pos.start,
            end: export.pos.end,
            replacement,
        });
    }

    splices.sort_by_key(|splice| splice.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for splice in &splices {
        out.push_str(&source[cursor..splice.start]);
        out.push_str(&splice.replacement);
        cursor = splice.end;
    }
    out.push_str(&source[cursor..]);

    // Binding exports are assigned at the end of the body so the assignment
    // sees the final value; a cyclic importer may observe them incomplete,
    // matching the runtime's loading semantics.
    if !footer.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&footer);
    }

    out
}

fn rewrite_import(import: &ImportDecl, key: &str) -> String {
    let require = format!("require({})", js_string(key));
    let mut lines = Vec::new();

    if let Some(name) = &import.namespace {
        lines.push(format!("const {name} = {require};"));
    }
    if let Some(name) = &import.default {
        lines.push(format!("const {name} = {require}.default;"));
    }
    if !import.named.is_empty() {
        let fields: Vec<String> = import
            .named
            .iter()
            .map(|specifier| match &specifier.local {
                Some(local) => format!("{}: {}", specifier.imported, local),
                None => specifier.imported.clone(),
            })
            .collect();
        lines.push(format!("const {{ {} }} = {require};", fields.join(", ")));
    }
    if lines.is_empty() {
        // side-effect import
        lines.push(format!("{require};"));
    }

    lines.join("\n") + "\n"
}

fn rewrite_default(text: &str) -> String {
    let rest = strip_export_keyword(text);
    let rest = rest.strip_prefix("default").unwrap_or(rest);
    format!("exports.default ={rest}")
}

fn strip_export_keyword(text: &str) -> &str {
    let trimmed = text.trim_start();
    trimmed
        .strip_prefix("export")
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ModuleAst;
    use crate::parser;
    use std::path::PathBuf;

    fn module(source: &str) -> Module {
        let pairs = parser::parse(source).unwrap();
        Module {
            path: PathBuf::from("main.js"),
            raw_content: source.to_string(),
            ast: ModuleAst::build(pairs).unwrap(),
            dependencies: Vec::new(),
            transformed_content: None,
        }
    }

    #[test]
    fn rewrites_named_import_to_destructured_require() {
        let module = module("import { x, y as z } from './a.js';\nconsole.log(x);\n");
        let out = transform_module(&module, &["./a.js".to_string()]);
        assert_eq!(out, "const { x, y: z } = require(\"./a.js\");\nconsole.log(x);\n");
    }

    #[test]
    fn rewrites_default_and_namespace_imports() {
        let module = module("import d from './a.js';\nimport * as ns from './b.js';\n");
        let out = transform_module(&module, &["./a.js".to_string(), "./b.js".to_string()]);
        assert_eq!(
            out,
            "const d = require(\"./a.js\").default;\nconst ns = require(\"./b.js\");\n"
        );
    }

    #[test]
    fn rewrites_side_effect_import_to_bare_require() {
        let module = module("import './setup.js';\n");
        let out = transform_module(&module, &["./setup.js".to_string()]);
        assert_eq!(out, "require(\"./setup.js\");\n");
    }

    #[test]
    fn wrapped_import_collapses_to_single_require() {
        let module = module("import {\n  x,\n  y\n} from './a.js';\nconsole.log(x + y);\n");
        let out = transform_module(&module, &["./a.js".to_string()]);
        assert_eq!(
            out,
            "const { x, y } = require(\"./a.js\");\nconsole.log(x + y);\n"
        );
    }

    #[test]
    fn uses_resolved_key_not_raw_specifier() {
        let module = module("import { x } from './utils';\n");
        let out = transform_module(&module, &["./utils/index.js".to_string()]);
        assert_eq!(out, "const { x } = require(\"./utils/index.js\");\n");
    }

    #[test]
    fn binding_export_is_stripped_and_assigned_at_end() {
        let module = module("export const x = 1;\nconst y = x + 1;\n");
        let out = transform_module(&module, &[]);
        assert_eq!(out, "const x = 1;\nconst y = x + 1;\nexports.x = x;\n");
    }

    #[test]
    fn function_export_spanning_lines_keeps_body() {
        let module = module("export function add(a, b) {\n  return a + b;\n}\n");
        let out = transform_module(&module, &[]);
        assert_eq!(
            out,
            "function add(a, b) {\n  return a + b;\n}\nexports.add = add;\n"
        );
    }

    #[test]
    fn default_export_becomes_exports_default() {
        let module = module("export default 42;\n");
        let out = transform_module(&module, &[]);
        assert_eq!(out, "exports.default = 42;\n");
    }

    #[test]
    fn export_list_with_alias() {
        let module = module("const a = 1;\nconst b = 2;\nexport { a, b as c };\n");
        let out = transform_module(&module, &[]);
        assert_eq!(out, "const a = 1;\nconst b = 2;\nexports.a = a; exports.c = b;\n");
    }
}

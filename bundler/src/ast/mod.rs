pub mod export_decl;
pub mod import_decl;
pub mod node;

use pest::iterators::Pairs;

use crate::{error::BundleResult, no_rule, parser::Rule};

use export_decl::ExportDecl;
use import_decl::ImportDecl;
use node::Node;

/// The analyzable surface of one module: its top-level import and export
/// declarations, each with the source span it was parsed from. Everything
/// else in the module body is opaque to the bundler.
#[derive(Debug)]
pub struct ModuleAst {
    pub imports: Vec<Node<ImportDecl>>,
    pub exports: Vec<Node<ExportDecl>>,
}

impl ModuleAst {
    pub fn build(pairs: Pairs<Rule>) -> BundleResult<Self> {
        let mut imports = Vec::new();
        let mut exports = Vec::new();

        for pair in pairs {
            match pair.as_rule() {
                Rule::import_decl => imports.push(Node::build(pair)?),
                Rule::export_decl => exports.push(Node::build(pair)?),
                Rule::raw_line | Rule::EOI => {}
                _ => return Err(no_rule!(pair)),
            }
        }

        Ok(Self { imports, exports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn parse(source: &str) -> ModuleAst {
        ModuleAst::build(parser::parse(source).unwrap()).unwrap()
    }

    #[test]
    fn recognizes_import_forms() {
        let ast = parse(concat!(
            "import './side.js';\n",
            "import d from './d.js';\n",
            "import * as ns from './ns.js';\n",
            "import { a, b as c } from './named.js';\n",
            "import d2, { e } from './mixed.js';\n",
        ));
        assert_eq!(ast.imports.len(), 5);

        let side = &ast.imports[0].value;
        assert_eq!(side.source, "./side.js");
        assert!(side.default.is_none() && side.namespace.is_none() && side.named.is_empty());

        assert_eq!(ast.imports[1].value.default.as_deref(), Some("d"));
        assert_eq!(ast.imports[2].value.namespace.as_deref(), Some("ns"));

        let named = &ast.imports[3].value.named;
        assert_eq!(named.len(), 2);
        assert_eq!(named[0].imported, "a");
        assert!(named[0].local.is_none());
        assert_eq!(named[1].imported, "b");
        assert_eq!(named[1].local.as_deref(), Some("c"));

        let mixed = &ast.imports[4].value;
        assert_eq!(mixed.default.as_deref(), Some("d2"));
        assert_eq!(mixed.named.len(), 1);
    }

    #[test]
    fn recognizes_export_forms() {
        let ast = parse(concat!(
            "export const x = 1;\n",
            "export function f() {}\n",
            "export default x;\n",
            "export { x, f as g };\n",
        ));
        assert_eq!(ast.exports.len(), 4);
        assert!(matches!(&ast.exports[0].value, ExportDecl::Binding { name } if name == "x"));
        assert!(matches!(&ast.exports[1].value, ExportDecl::Binding { name } if name == "f"));
        assert!(matches!(&ast.exports[2].value, ExportDecl::Default));
        assert!(
            matches!(&ast.exports[3].value, ExportDecl::List { specifiers } if specifiers.len() == 2)
        );
    }

    #[test]
    fn wrapped_named_import_spans_lines() {
        let source = "import {\n  x,\n  y as z,\n} from './a.js';\nconsole.log(x);\n";
        let ast = parse(source);
        assert_eq!(ast.imports.len(), 1);

        let import = &ast.imports[0].value;
        assert_eq!(import.source, "./a.js");
        assert_eq!(import.named.len(), 2);
        assert_eq!(import.named[1].local.as_deref(), Some("z"));

        let pos = ast.imports[0].pos;
        assert_eq!(
            &source[pos.start..pos.end],
            "import {\n  x,\n  y as z,\n} from './a.js';\n"
        );
    }

    #[test]
    fn wrapped_export_list_spans_lines() {
        let ast = parse("const a = 1;\nconst b = 2;\nexport {\n  a,\n  b as c,\n};\n");
        assert_eq!(ast.exports.len(), 1);
        assert!(
            matches!(&ast.exports[0].value, ExportDecl::List { specifiers } if specifiers.len() == 2)
        );
    }

    #[test]
    fn multi_declarator_export_is_rejected() {
        let error = ModuleAst::build(parser::parse("export const x = 1, y = 2;\n").unwrap())
            .unwrap_err();
        assert_eq!(error.error_type(), crate::error::ErrorType::SyntaxError);
        assert!(error.message().contains('x'));
    }

    #[test]
    fn commas_inside_initializers_are_single_declarators() {
        let ast = parse(concat!(
            "export const x = f(1, 2);\n",
            "export const y = [1, 2];\n",
            "export const z = { a: 1, b: 2 };\n",
        ));
        assert_eq!(ast.exports.len(), 3);
    }

    #[test]
    fn plain_code_produces_no_declarations() {
        let ast = parse("const importLike = 1;\nexporter();\nconsole.log('import x');\n");
        assert!(ast.imports.is_empty());
        assert!(ast.exports.is_empty());
    }

    #[test]
    fn re_export_is_not_recognized() {
        // `export ... from` passes through as plain code
        let ast = parse("export { x } from './a.js';\n");
        assert!(ast.exports.is_empty());
        assert!(ast.imports.is_empty());
    }

    #[test]
    fn declaration_spans_cover_whole_lines() {
        let source = "import { x } from './a.js';\nconsole.log(x);\n";
        let ast = parse(source);
        let pos = ast.imports[0].pos;
        assert_eq!(&source[pos.start..pos.end], "import { x } from './a.js';\n");
    }
}

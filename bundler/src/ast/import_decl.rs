use pest::iterators::Pairs;

use crate::{error::BundleResult, no_rule, parser::Rule};

use super::node::NodeBuilder;

/// One top-level static import declaration.
///
/// `source` is the raw specifier string; `default`, `namespace` and `named`
/// describe the imported bindings. A side-effect import (`import './a.js';`)
/// has none of the three.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub source: String,
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportSpecifier>,
}

#[derive(Debug, Clone)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: Option<String>,
}

impl NodeBuilder for ImportDecl {
    fn build(pairs: Pairs<Rule>) -> BundleResult<Self> {
        let mut decl = ImportDecl {
            source: String::new(),
            default: None,
            namespace: None,
            named: Vec::new(),
        };

        for pair in pairs {
            match pair.as_rule() {
                Rule::default_import => {
                    decl.default = Some(pair.as_str().to_string());
                }
                Rule::namespace_import => {
                    let identifier = pair.into_inner().next().unwrap();
                    decl.namespace = Some(identifier.as_str().to_string());
                }
                Rule::named_imports => {
                    for specifier in pair.into_inner() {
                        decl.named.push(ImportSpecifier::build(specifier.into_inner())?);
                    }
                }
                Rule::string => {
                    decl.source = pair.into_inner().next().unwrap().as_str().to_string();
                }
                _ => return Err(no_rule!(pair)),
            }
        }

        Ok(decl)
    }
}

impl ImportSpecifier {
    fn build(mut pairs: Pairs<Rule>) -> BundleResult<Self> {
        let imported = pairs.next().unwrap().as_str().to_string();
        let local = pairs.next().map(|p| p.as_str().to_string());
        Ok(Self { imported, local })
    }
}

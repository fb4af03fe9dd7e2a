use pest::iterators::Pairs;

use crate::{
    error::{BundleError, BundleResult, ErrorType, Pos},
    no_rule,
    parser::Rule,
};

use super::node::NodeBuilder;

/// One top-level export declaration.
#[derive(Debug, Clone)]
pub enum ExportDecl {
    /// `export default <expression>`
    Default,
    /// `export { a, b as c };`
    List { specifiers: Vec<ExportSpecifier> },
    /// `export const|let|var|function|class <name> ...`
    Binding { name: String },
}

#[derive(Debug, Clone)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: Option<String>,
}

impl NodeBuilder for ExportDecl {
    fn build(mut pairs: Pairs<Rule>) -> BundleResult<Self> {
        let pair = pairs.next().unwrap();
        match pair.as_rule() {
            Rule::export_default => Ok(ExportDecl::Default),
            Rule::export_list => {
                let mut specifiers = Vec::new();
                for specifier in pair.into_inner() {
                    specifiers.push(ExportSpecifier::build(specifier.into_inner())?);
                }
                Ok(ExportDecl::List { specifiers })
            }
            Rule::export_binding => {
                let mut inner = pair.into_inner();
                let kind = inner.next().unwrap();
                let is_variable = matches!(kind.as_str(), "const" | "let" | "var");
                let name = inner.next().unwrap().as_str().to_string();

                // Only the first declarator's binding would be exported, so a
                // `const x = 1, y = 2;` export is rejected instead of silently
                // dropping `y`.
                if is_variable {
                    if let Some(rest) = inner.next() {
                        if has_top_level_comma(rest.as_str()) {
                            let (line, col) = rest.line_col();
                            return Err(BundleError::new(
                                ErrorType::SyntaxError,
                                Some(Pos {
                                    line,
                                    col,
                                    start: rest.as_span().start(),
                                    end: rest.as_span().end(),
                                }),
                                format!(
                                    "multi-declarator export of '{}' is not supported; use one export statement per binding",
                                    name
                                ),
                            ));
                        }
                    }
                }

                Ok(ExportDecl::Binding { name })
            }
            _ => Err(no_rule!(pair)),
        }
    }
}

impl ExportSpecifier {
    fn build(mut pairs: Pairs<Rule>) -> BundleResult<Self> {
        let local = pairs.next().unwrap().as_str().to_string();
        let exported = pairs.next().map(|p| p.as_str().to_string());
        Ok(Self { local, exported })
    }
}

/// Scans a declarator tail for a comma outside brackets, strings and line
/// comments, stopping at the statement's own `;`. Commas on continuation
/// lines of a wrapped initializer are out of reach of this check.
fn has_top_level_comma(text: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = '\0';

    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            prev = c;
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ';' => return false,
            '/' if prev == '/' => return false,
            ',' if depth == 0 => return true,
            _ => {}
        }
        prev = c;
    }
    false
}

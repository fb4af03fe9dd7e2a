use pest::{
    error::{ErrorVariant, InputLocation, LineColLocation},
    iterators::Pairs,
    Parser,
};
use pest_derive::Parser;

use crate::error::{BundleError, ErrorType, Pos};

#[derive(Parser)]
#[grammar = "module.pest"]
struct ModuleParser;

pub fn parse(source: &str) -> Result<Pairs<Rule>, BundleError> {
    let mut pairs = ModuleParser::parse(Rule::program, source).map_err(|e| {
        let mut pos = match e.line_col {
            LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => Pos {
                line: pos.0,
                col: pos.1,
                start: 0,
                end: 0,
            },
        };
        match e.location {
            InputLocation::Pos(p) => {
                pos.start = p;
                pos.end = p + 1;
            }
            InputLocation::Span((start, end)) => {
                pos.start = start;
                pos.end = end;
            }
        };

        let error_message = match e.variant {
            ErrorVariant::ParsingError { positives, .. } => {
                format!("Expected one of {:?}", positives)
            }
            ErrorVariant::CustomError { message } => message,
        };
        BundleError::new(ErrorType::SyntaxError, Some(pos), error_message)
    })?;

    // The program rule always matches exactly once; its children are the
    // recognized top-level declarations and raw lines.
    Ok(pairs.next().unwrap().into_inner())
}

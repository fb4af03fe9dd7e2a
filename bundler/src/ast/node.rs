use pest::iterators::{Pair, Pairs};

use crate::{
    error::{BundleResult, Pos},
    parser::Rule,
};

#[derive(Debug, Clone)]
pub struct Node<T> {
    pub value: T,
    pub pos: Pos,
}

pub trait NodeBuilder: Sized {
    fn build(pairs: Pairs<Rule>) -> BundleResult<Self>;
}

impl<T: NodeBuilder> Node<T> {
    pub fn build(pair: Pair<Rule>) -> BundleResult<Self> {
        let (line, col) = pair.line_col();
        let span = pair.as_span();
        let pos = Pos {
            line,
            col,
            start: span.start(),
            end: span.end(),
        };
        Ok(Node {
            value: T::build(pair.into_inner())?,
            pos,
        })
    }
}

pub mod ast;
pub mod bundler;
pub mod error;
pub mod graph;
pub mod module_resolver;
pub mod parser;
pub mod transform;

mod filesystem;
mod module_resolver;

pub use filesystem::{FileSystem, StandardFileSystem, VirtualFileSystem};
pub use module_resolver::{normalize, ModuleResolver, INDEX_FILE};

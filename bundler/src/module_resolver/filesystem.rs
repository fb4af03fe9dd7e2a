use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{BundleError, BundleResult, ErrorType};

/// The filesystem collaborator. Each call is one scoped operation; the core
/// never holds an open handle.
pub trait FileSystem {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> BundleResult<String>;
    fn write_file(&self, path: &Path, content: &str) -> BundleResult<()>;
}

pub struct StandardFileSystem;

impl Clone for StandardFileSystem {
    fn clone(&self) -> Self {
        StandardFileSystem
    }
}

impl FileSystem for StandardFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_file(&self, path: &Path) -> BundleResult<String> {
        std::fs::read_to_string(path).map_err(|e| {
            BundleError::new(
                ErrorType::ModuleNotFound,
                None,
                format!("Failed to read file: {}", e),
            )
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> BundleResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BundleError::new(
                    ErrorType::IoError,
                    None,
                    format!("Failed to create directory '{}': {}", parent.display(), e),
                )
            })?;
        }
        std::fs::write(path, content).map_err(|e| {
            BundleError::new(
                ErrorType::IoError,
                None,
                format!("Failed to write file '{}': {}", path.display(), e),
            )
        })
    }
}

/// In-memory filesystem used by tests and embedding hosts. A path is a file
/// when it is a key of `files`, and a directory when some key lives under it.
pub struct VirtualFileSystem {
    files: HashMap<String, String>,
    written: RefCell<HashMap<String, String>>,
}

impl Clone for VirtualFileSystem {
    fn clone(&self) -> Self {
        VirtualFileSystem {
            files: self.files.clone(),
            written: RefCell::new(self.written.borrow().clone()),
        }
    }
}

impl VirtualFileSystem {
    pub fn new(files: HashMap<String, String>) -> Self {
        Self {
            files,
            written: RefCell::new(HashMap::new()),
        }
    }

    /// Everything written through `write_file` so far.
    pub fn written(&self) -> HashMap<String, String> {
        self.written.borrow().clone()
    }

    fn lookup(&self, path: &Path) -> Option<&String> {
        let path_str = path.to_string_lossy().to_string();

        if let Some(content) = self.files.get(&path_str) {
            return Some(content);
        }

        // Tolerate a leading "./"
        let cleaned_path = path_str.strip_prefix("./").unwrap_or(&path_str);
        self.files.get(cleaned_path)
    }
}

impl FileSystem for VirtualFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_string();
        let prefix = if path_str.ends_with('/') {
            path_str
        } else {
            format!("{}/", path_str)
        };

        self.files
            .keys()
            .any(|file_path| file_path.starts_with(&prefix))
    }

    fn read_file(&self, path: &Path) -> BundleResult<String> {
        self.lookup(path).cloned().ok_or_else(|| {
            BundleError::new(
                ErrorType::ModuleNotFound,
                None,
                format!(
                    "File not found in virtual filesystem: {}",
                    path.to_string_lossy()
                ),
            )
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> BundleResult<()> {
        self.written
            .borrow_mut()
            .insert(path.to_string_lossy().to_string(), content.to_string());
        Ok(())
    }
}

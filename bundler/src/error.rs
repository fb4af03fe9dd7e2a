use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BundleError {
    pos: Option<Pos>,
    file: Option<PathBuf>,
    message: String,
    error_type: ErrorType,
}

pub type BundleResult<T> = Result<T, BundleError>;

#[macro_export]
macro_rules! no_rule {
    ($pair:expr) => {
        $crate::error::BundleError::new(
            $crate::error::ErrorType::SyntaxError,
            Some($crate::error::Pos {
                line: $pair.line_col().0,
                col: $pair.line_col().1,
                start: $pair.as_span().start(),
                end: $pair.as_span().end(),
            }),
            format!("Unexpected rule: {:?}", $pair.as_rule()),
        )
    };
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    SyntaxError,
    ModuleNotFound,
    UnsupportedSpecifier,
    DuplicateModuleKey,
    IoError,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorType::SyntaxError => write!(f, "Syntax Error"),
            ErrorType::ModuleNotFound => write!(f, "Module Not Found"),
            ErrorType::UnsupportedSpecifier => write!(f, "Unsupported Specifier"),
            ErrorType::DuplicateModuleKey => write!(f, "Duplicate Module Key"),
            ErrorType::IoError => write!(f, "IO Error"),
        }
    }
}

impl BundleError {
    pub fn new(error_type: ErrorType, pos: Option<Pos>, message: String) -> Self {
        Self {
            pos,
            file: None,
            message,
            error_type,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Canonical path of the module the error was found in, when known.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Records the canonical path of the module the error was found in; the
    /// innermost path wins when errors bubble through nested loads.
    pub fn with_path(mut self, path: &Path) -> Self {
        if self.file.is_none() {
            self.file = Some(path.to_path_buf());
        }
        self
    }

    /// Pretty-prints the error against the offending module's source text,
    /// underlining the line the position points at.
    pub fn report(&self, input: &str) {
        match self.pos {
            Some(pos) => {
                match &self.file {
                    Some(file) => eprintln!("Error in {} at {}:{}", file.display(), pos.line, pos.col),
                    None => eprintln!("Error at {}:{}", pos.line, pos.col),
                }
                self.print_err_line(input);
            }
            None => match &self.file {
                Some(file) => eprintln!("Error in {}:", file.display()),
                None => eprintln!("Error:"),
            },
        }
        eprintln!("{}: {}", self.error_type, self.message);
    }

    fn print_err_line(&self, input: &str) {
        if self.pos.is_none() {
            return;
        }
        let pos = self.pos.unwrap();

        let line = match input.lines().nth(pos.line - 1) {
            Some(line) => line.to_string(),
            None => return,
        };

        let line_indent = " ".repeat(pos.line.to_string().len());
        eprintln!("{} |", line_indent);
        eprintln!("{} | {}", pos.line, line);
        eprintln!("{} |{}^---", line_indent, " ".repeat(pos.col));
        eprintln!("{} |", line_indent);
    }
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error_type)?;
        if let Some(file) = &self.file {
            write!(f, " in '{}'", file.display())?;
        }
        if let Some(pos) = self.pos {
            write!(f, " at {}:{}", pos.line, pos.col)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_file_and_position() {
        let error = BundleError::new(
            ErrorType::SyntaxError,
            Some(Pos {
                line: 2,
                col: 5,
                start: 10,
                end: 12,
            }),
            "bad token".to_string(),
        )
        .with_path(Path::new("src/a.js"));
        assert_eq!(
            error.to_string(),
            "Syntax Error in 'src/a.js' at 2:5: bad token"
        );
    }

    #[test]
    fn innermost_path_wins() {
        let error = BundleError::new(ErrorType::ModuleNotFound, None, "missing".to_string())
            .with_path(Path::new("a.js"))
            .with_path(Path::new("main.js"));
        assert_eq!(error.file(), Some(Path::new("a.js")));
        assert_eq!(error.to_string(), "Module Not Found in 'a.js': missing");
    }
}

use std::path::PathBuf;

/// Alias for `Result<T, SourceError>`.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while reading Rust sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A file or directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A file is not valid Rust.
    #[error("{file}:{line}:{column}: {message}")]
    Parse {
        /// File name, or `<source>` for in-memory input.
        file: String,
        /// 1-based line of the error.
        line: usize,
        /// 0-based column of the error.
        column: usize,
        /// The parser's message.
        message: String,
    },

    /// Two declarations resolve to the same type path.
    #[error("{file}: type {ty} is already declared")]
    DuplicateType {
        /// File holding the second declaration.
        file: String,
        /// The qualified type path.
        ty: String,
    },
}

impl SourceError {
    pub(crate) fn parse(file: impl Into<String>, err: &syn::Error) -> Self {
        let start = err.span().start();
        Self::Parse {
            file: file.into(),
            line: start.line,
            column: start.column,
            message: err.to_string(),
        }
    }
}

use thiserror::Error;

/// Errors raised while validating command-line input, independent of the
/// decoder library's own `ConfigError`/`MatrixError`.
#[derive(Debug, Error)]
pub enum UserInputError {
    #[error("NbMonteCarlo must be at least 1")]
    ZeroMonteCarlo,
    #[error("NbIterMax must be at least 1")]
    ZeroIterMax,
    #[error("NbOper must be at least 1")]
    ZeroOper,
    #[error("EbN must contain at least one operating point")]
    EmptyEbnList,
    #[error("EbN entry {0:?} is not a valid floating-point number")]
    BadEbnEntry(String),
}

/// Errors raised while parsing a `FileMatrix` alist-style parity-check file.
#[derive(Debug, Error)]
pub enum MatrixFileError {
    #[error("could not read matrix file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("matrix file is empty")]
    Empty,
    #[error("header line must contain \"n m gf dc\", found {0:?}")]
    BadHeader(String),
    #[error("row {row} does not contain {expected} (var, coeff) pairs, found {found}")]
    BadRowArity {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row} entry {entry} is not a valid integer pair: {text:?}")]
    BadEntry {
        row: usize,
        entry: usize,
        text: String,
    },
}

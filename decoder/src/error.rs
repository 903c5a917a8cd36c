use thiserror::Error;

/// Errors raised while building or configuring decoder tables and state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported field order GF({0}); only 64 and 256 are supported")]
    UnsupportedField(u32),
    #[error("bubble check-node processor requires column degree 2, found {0}")]
    UnsupportedColumnDegree(usize),
    #[error("row degree is not constant across the parity-check matrix: row {row} has degree {found}, expected {expected}")]
    InconsistentRowDegree {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("truncated message size nm must be at least 1, found {0}")]
    InvalidMessageSize(usize),
    #[error("NbOper must be at least 1, found {0}")]
    InvalidOperationBudget(usize),
}

/// Errors raised while validating or loading a parity-check matrix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("parity-check matrix is not full rank")]
    NotFullRank,
    #[error("row {row} references variable index {index} out of range (N = {n})")]
    VariableIndexOutOfRange { row: usize, index: usize, n: usize },
    #[error("row {row} carries coefficient {value} out of range for GF({gf})")]
    CoefficientOutOfRange { row: usize, value: u32, gf: u32 },
    #[error("matrix dimensions are inconsistent: {0}")]
    InconsistentDimensions(String),
}

/// Raised when a buffer could not be sized or allocated for the requested code parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("buffer size overflowed computing {what} from (N={n}, M={m}, dc={dc}, nm={nm}, q={q})")]
    SizeOverflow {
        what: &'static str,
        n: usize,
        m: usize,
        dc: usize,
        nm: usize,
        q: usize,
    },
}

/// A degenerate condition inside the arithmetic core that should be unreachable in correct use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("division by the zero element of GF({gf}) at operand {operand}")]
    DivisionByZero { gf: u32, operand: u32 },
}

/// Top-level error type unifying the four kinds surfaced by the decoder library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecoderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

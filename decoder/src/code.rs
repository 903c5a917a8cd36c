//! The immutable, post-load representation of a parity-check code: dimensions,
//! per-row/column degrees, and the edge incidence structure both sides of the
//! Tanner graph address edges through.

use crate::error::MatrixError;
use getset::{CopyGetters, Getters};

/// Code parameters as produced by an external loader (see `channel` module for
/// the matching external-collaborator convention). Immutable after construction.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct CodeParams {
    #[getset(get_copy = "pub")]
    n: usize,
    #[getset(get_copy = "pub")]
    m: usize,
    #[getset(get_copy = "pub")]
    gf: u32,
    #[getset(get_copy = "pub")]
    row_degree: usize,
    #[getset(get = "pub")]
    column_degree: Vec<usize>,
    /// `mat[m][k]`: variable-node index of the k-th edge of check m.
    #[getset(get = "pub")]
    mat: Vec<Vec<usize>>,
    /// `mat_value[m][k]`: the non-zero GF(q) coefficient on that edge.
    #[getset(get = "pub")]
    mat_value: Vec<Vec<u16>>,
    /// Global edge label for the k-th edge of check m: `edge(m, k)`.
    #[getset(get = "pub")]
    row_edge_start: Vec<usize>,
    /// `n_to_b[n][k]`: the edges incident to variable `n`, in incidence order.
    #[getset(get = "pub")]
    n_to_b: Vec<Vec<usize>>,
    #[getset(get_copy = "pub")]
    num_edges: usize,
}

impl CodeParams {
    /// Builds and structurally validates a code from its raw incidence arrays.
    /// Performs dimension/degree/coefficient checks plus a lightweight
    /// zero-row rank probe; does not perform a full encoder-grade Gaussian
    /// elimination.
    pub fn new(
        n: usize,
        gf: u32,
        mat: Vec<Vec<usize>>,
        mat_value: Vec<Vec<u16>>,
    ) -> Result<Self, MatrixError> {
        let m = mat.len();
        if mat_value.len() != m {
            return Err(MatrixError::InconsistentDimensions(format!(
                "mat has {} rows but mat_value has {}",
                m,
                mat_value.len()
            )));
        }
        let row_degree = mat.first().map(|r| r.len()).unwrap_or(0);
        let mut row_edge_start = Vec::with_capacity(m + 1);
        let mut acc = 0usize;
        let mut n_to_b: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut column_degree = vec![0usize; n];

        for (row, (vars, coeffs)) in mat.iter().zip(mat_value.iter()).enumerate() {
            if vars.len() != row_degree {
                return Err(MatrixError::InconsistentDimensions(format!(
                    "row {row} has degree {}, expected constant degree {row_degree}",
                    vars.len()
                )));
            }
            if coeffs.len() != vars.len() {
                return Err(MatrixError::InconsistentDimensions(format!(
                    "row {row}: mat and mat_value length mismatch"
                )));
            }
            row_edge_start.push(acc);
            for (k, (&var, &coeff)) in vars.iter().zip(coeffs.iter()).enumerate() {
                if var >= n {
                    return Err(MatrixError::VariableIndexOutOfRange { row, index: var, n });
                }
                if coeff == 0 || coeff as u32 >= gf {
                    return Err(MatrixError::CoefficientOutOfRange {
                        row,
                        value: coeff as u32,
                        gf,
                    });
                }
                n_to_b[var].push(acc + k);
                column_degree[var] += 1;
            }
            acc += row_degree;
        }
        row_edge_start.push(acc);
        let num_edges = acc;

        Ok(CodeParams {
            n,
            m,
            gf,
            row_degree,
            column_degree,
            mat,
            mat_value,
            row_edge_start,
            n_to_b,
            num_edges,
        })
    }

    pub fn k(&self) -> usize {
        self.n.saturating_sub(self.m)
    }

    /// A lightweight rank probe: rejects a matrix containing an all-zero row
    /// over GF(q) after row reduction. Not a full Gaussian elimination; there
    /// is no encoder in this crate to certify against, only the structurally
    /// degenerate all-zero-row case needs catching here.
    pub fn check_full_rank(&self, tables: &crate::gf::GfTables) -> Result<(), MatrixError> {
        if self.m == 0 {
            return Ok(());
        }
        let gf = self.gf as usize;
        let mut rows: Vec<Vec<u16>> = (0..self.m)
            .map(|m| {
                let mut dense = vec![0u16; self.n];
                for (k, &var) in self.mat[m].iter().enumerate() {
                    dense[var] = self.mat_value[m][k];
                }
                dense
            })
            .collect();
        let mut pivot_row = 0usize;
        for col in 0..self.n {
            if pivot_row >= rows.len() {
                break;
            }
            if let Some(sel) = (pivot_row..rows.len()).find(|&r| rows[r][col] != 0) {
                rows.swap(pivot_row, sel);
                let pivot_val = rows[pivot_row][col];
                for r in 0..rows.len() {
                    if r == pivot_row || rows[r][col] == 0 {
                        continue;
                    }
                    let factor = tables.div(rows[r][col], pivot_val);
                    for c in col..self.n {
                        let sub = tables.mul(factor, rows[pivot_row][c]);
                        rows[r][c] = tables.add(rows[r][c], sub);
                    }
                }
                pivot_row += 1;
            }
        }
        let _ = gf;
        if rows[pivot_row..].iter().all(|r| r.iter().all(|&v| v == 0)) {
            Ok(())
        } else {
            Err(MatrixError::NotFullRank)
        }
    }
}

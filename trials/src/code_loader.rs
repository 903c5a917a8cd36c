//! Concrete `loadCode` collaborator: parses the on-disk `FileMatrix` format
//! into a validated `nbldpc_decoder::CodeParams`.
//!
//! The format is a plain-text, alist-derived sparse representation extended
//! with per-edge GF(q) coefficients (glossary: "alist format"):
//!
//! ```text
//! N M GF DC
//! v1 c1 v2 c2 ... v_dc c_dc        (row 0)
//! v1 c1 v2 c2 ... v_dc c_dc        (row 1)
//! ...
//! ```
//!
//! `N`/`M` are the code's variable/check counts, `GF` is the field order,
//! `DC` the constant row degree. Each of the following `M` lines lists the
//! row's `DC` edges as 1-based variable index / non-zero GF coefficient
//! pairs. Blank lines and lines starting with `#` are ignored.

use crate::error::MatrixFileError;
use nbldpc_decoder::CodeParams;
use std::path::Path;

pub fn load_code_params(path: &Path) -> Result<CodeParams, MatrixFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| MatrixFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_file_matrix(&text)
}

fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn parse_file_matrix(text: &str) -> Result<CodeParams, MatrixFileError> {
    let mut lines = significant_lines(text);
    let header = lines.next().ok_or(MatrixFileError::Empty)?;
    let header_fields: Vec<&str> = header.split_whitespace().collect();
    let [n_str, m_str, gf_str, dc_str] = header_fields[..] else {
        return Err(MatrixFileError::BadHeader(header.to_string()));
    };
    let parse_usize = |s: &str| -> Result<usize, MatrixFileError> {
        s.parse().map_err(|_| MatrixFileError::BadHeader(header.to_string()))
    };
    let n = parse_usize(n_str)?;
    let m = parse_usize(m_str)?;
    let gf: u32 = gf_str
        .parse()
        .map_err(|_| MatrixFileError::BadHeader(header.to_string()))?;
    let dc = parse_usize(dc_str)?;
    let _ = n;

    let mut mat = Vec::with_capacity(m);
    let mut mat_value = Vec::with_capacity(m);
    for row in 0..m {
        let line = lines.next().ok_or(MatrixFileError::BadRowArity {
            row,
            expected: dc,
            found: 0,
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != dc * 2 {
            return Err(MatrixFileError::BadRowArity {
                row,
                expected: dc,
                found: tokens.len() / 2,
            });
        }
        let mut vars = Vec::with_capacity(dc);
        let mut coeffs = Vec::with_capacity(dc);
        for entry in 0..dc {
            let var_1based: usize = tokens[entry * 2].parse().map_err(|_| MatrixFileError::BadEntry {
                row,
                entry,
                text: tokens[entry * 2].to_string(),
            })?;
            let coeff: u16 = tokens[entry * 2 + 1].parse().map_err(|_| MatrixFileError::BadEntry {
                row,
                entry,
                text: tokens[entry * 2 + 1].to_string(),
            })?;
            vars.push(var_1based.saturating_sub(1));
            coeffs.push(coeff);
        }
        mat.push(vars);
        mat_value.push(coeffs);
    }

    CodeParams::new(n, gf, mat, mat_value).map_err(|_| MatrixFileError::BadHeader(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_check_two_variable_code() {
        let text = "3 64 64 2\n1 1 2 1\n";
        let code = parse_file_matrix(text).unwrap();
        assert_eq!(code.n(), 3);
        assert_eq!(code.m(), 1);
        assert_eq!(code.row_degree(), 2);
        assert_eq!(code.mat()[0], vec![0, 1]);
        assert_eq!(code.mat_value()[0], vec![1, 1]);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let text = "# header comment\n3 64 64 2\n\n1 1 2 1\n";
        let code = parse_file_matrix(text).unwrap();
        assert_eq!(code.m(), 1);
    }

    #[test]
    fn rejects_row_with_wrong_arity() {
        let text = "3 64 64 2\n1 1\n";
        assert!(matches!(
            parse_file_matrix(text),
            Err(MatrixFileError::BadRowArity { row: 0, .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_header() {
        let text = "three 64 64 2\n1 1 2 1\n";
        assert!(matches!(parse_file_matrix(text), Err(MatrixFileError::BadHeader(_))));
    }
}

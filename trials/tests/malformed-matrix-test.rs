use nbldpc_trials::code_loader::load_code_params;
use nbldpc_trials::error::MatrixFileError;
use std::io::Write;

fn write_temp_matrix(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn missing_file_reports_io_error_without_panicking() {
    let path = std::env::temp_dir().join("s8_does_not_exist.txt");
    let _ = std::fs::remove_file(&path);
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::Io { .. }));
}

#[test]
fn empty_file_is_rejected() {
    let path = write_temp_matrix("s8_empty.txt", "");
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::Empty));
}

#[test]
fn row_with_fewer_entries_than_declared_degree_is_rejected() {
    // Header declares DC=4 but the only row lists two edges.
    let path = write_temp_matrix("s8_short_row.txt", "4 64 64 4\n1 1 2 1\n");
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::BadRowArity { row: 0, expected: 4, .. }));
}

#[test]
fn row_with_inconsistent_degree_across_rows_is_rejected() {
    // Row 0 has three edges, row 1 only two, despite a constant-degree header.
    let path = write_temp_matrix(
        "s8_inconsistent_degree.txt",
        "4 64 64 3\n1 1 2 1 3 1\n2 1 3 1\n",
    );
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::BadRowArity { row: 1, .. }));
}

#[test]
fn non_numeric_entry_is_rejected_with_position() {
    let path = write_temp_matrix("s8_bad_entry.txt", "3 64 64 2\n1 1 x 1\n");
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::BadEntry { row: 0, entry: 1, .. }));
}

#[test]
fn variable_index_out_of_range_is_rejected_without_panicking() {
    // N=3 but a row references variable 5, which CodeParams::new must reject.
    let path = write_temp_matrix("s8_var_out_of_range.txt", "3 64 64 2\n1 1 5 1\n");
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::BadHeader(_)));
}

#[test]
fn zero_coefficient_is_rejected_without_panicking() {
    let path = write_temp_matrix("s8_zero_coeff.txt", "3 64 64 2\n1 0 2 1\n");
    let err = load_code_params(&path).unwrap_err();
    assert!(matches!(err, MatrixFileError::BadHeader(_)));
}

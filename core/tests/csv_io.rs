//! Reading uploads and writing exports.

use loan_default_core::{sample::SampleGenerator, Column, ErrorKind, PipelineError, Table};

#[test]
fn column_types_are_inferred() {
    let csv = "id,count,amount,note,gap\n1,3,1.5,x,\n2,4,2,y,7\n";
    let t = Table::read_csv(csv.as_bytes()).unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.column("id"), Some(&Column::Int(vec![1, 2])));
    assert_eq!(t.column("amount"), Some(&Column::Float(vec![1.5, 2.0])));
    assert_eq!(t.column("note").map(Column::type_name), Some("text"));
    let gap = t.f64_values("gap").unwrap();
    assert!(gap[0].is_nan());
    assert_eq!(gap[1], 7.0);
}

#[test]
fn header_whitespace_is_trimmed() {
    let csv = " customer_id , loan_id\nc1,l1\n";
    let t = Table::read_csv(csv.as_bytes()).unwrap();
    assert!(t.has_column("customer_id"));
    assert!(t.has_column("loan_id"));
}

#[test]
fn duplicate_header_is_rejected() {
    let csv = "a,b,a\n1,2,3\n";
    let err = Table::read_csv(csv.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err, PipelineError::DuplicateColumn { ref column } if column == "a"));
}

#[test]
fn ragged_rows_are_rejected() {
    let csv = "a,b\n1,2\n3\n";
    assert!(matches!(
        Table::read_csv(csv.as_bytes()),
        Err(PipelineError::Csv(_))
    ));
}

#[test]
fn missing_floats_write_as_empty_cells() {
    let t = Table::from_columns([
        ("x", Column::Float(vec![1.0, f64::NAN, 0.25])),
        ("n", Column::Int(vec![1, 2, 3])),
    ])
    .unwrap();
    let text = String::from_utf8(t.to_csv_bytes().unwrap()).unwrap();
    assert_eq!(text, "x,n\n1.0,1\n,2\n0.25,3\n");
}

#[test]
fn push_column_checks_length() {
    let mut t = Table::new();
    t.push_column("a", Column::Int(vec![1, 2])).unwrap();
    let err = t.push_column("b", Column::Int(vec![1])).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::LengthMismatch { expected: 2, actual: 1, .. }
    ));
}

#[test]
fn select_rows_and_drop_columns_leave_source_alone() {
    let t = Table::from_columns([
        ("a", Column::Int(vec![10, 20, 30])),
        ("b", Column::Text(vec!["x".into(), "y".into(), "z".into()])),
    ])
    .unwrap();
    let picked = t.select_rows(&[2, 0]).without_columns(&["b"]);
    assert_eq!(picked.column("a"), Some(&Column::Int(vec![30, 10])));
    assert!(!picked.has_column("b"));
    assert_eq!(t.len(), 3);
    assert!(t.has_column("b"));
}

#[test]
fn upload_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.csv");

    let upload = SampleGenerator::new(11).generate(30).unwrap();
    upload.to_csv_path(&path).unwrap();
    let reread = Table::from_csv_path(&path).unwrap();

    assert_eq!(reread.len(), 30);
    assert_eq!(reread.column_names(), upload.column_names());
    assert_eq!(reread.to_csv_bytes().unwrap(), upload.to_csv_bytes().unwrap());
}

#[test]
fn unreadable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Table::from_csv_path(dir.path().join("absent.csv")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

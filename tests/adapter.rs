use std::path::Path;

use pampa_predict::data::model::ColumnSelector;
use pampa_predict::{run, Config, Error};
use tempfile::tempdir;

fn config() -> Config {
    Config {
        model_path: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("checkpoints/pampa5_svm.json")),
        ..Config::default()
    }
}

#[test]
fn summary_counts_failures() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "id,smiles,note\n1,CCO,a\n2,C1CC,b\n3,,c\n4,OCC1OC(O)C(O)C(O)C1O,d\n").unwrap();

    let summary = run(&config(), &input, &output).unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.predicted, 2);
    assert_eq!(summary.failed, 2);

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2], "2,C1CC,b,");
    assert_eq!(lines[3], "3,,c,");
}

#[test]
fn wide_rows_keep_probability_under_its_header() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "id,smiles\n1,CCO\n4,CCN,extra\n").unwrap();

    run(&config(), &input, &output).unwrap();
    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["id", "smiles", "column_3", "pampa5_proba1"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][2], "");
    assert_eq!(&rows[1][2], "extra");
    for row in &rows {
        let p: f64 = row[3].parse().unwrap();
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn polar_compounds_score_higher_than_lipophilic_ones() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    // glucose vs. a long alkane
    std::fs::write(&input, "smiles\nOCC1OC(O)C(O)C(O)C1O\nCCCCCCCCCCCC\n").unwrap();

    run(&config(), &input, &output).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    let p: Vec<f64> = text
        .lines()
        .skip(1)
        .map(|l| l.rsplit(',').next().unwrap().parse().unwrap())
        .collect();
    assert!(p[0] > p[1], "{p:?}");
}

#[test]
fn unknown_column_is_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "id,structure\n1,CCO\n").unwrap();

    let cfg = Config {
        smiles_column: ColumnSelector::Name("smiles_col".into()),
        ..config()
    };
    let err = run(&cfg, &input, &output).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(_)));
    assert!(!output.exists());
}

#[test]
fn corrupt_model_is_fatal() {
    let dir = tempdir().unwrap();
    let model = dir.path().join("model.json");
    std::fs::write(
        &model,
        r#"{ "name": "x", "version": "0", "features": {}, "kernel": { "type": "linear" },
             "support_vectors": [[1.0, 2.0]], "dual_coef": [1.0], "intercept": 0.0,
             "platt": { "a": -1.0, "b": 0.0 } }"#,
    )
    .unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "smiles\nCCO\n").unwrap();

    let cfg = Config {
        model_path: Some(model),
        ..config()
    };
    let err = run(&cfg, &input, &output).unwrap_err();
    assert!(matches!(err, Error::ModelCorrupt { .. }));
    assert!(err.to_string().contains("support vector 0"));
    assert!(!output.exists());
}

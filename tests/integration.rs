//! End-to-end scenarios across the analysis engine.

use analizar::prelude::*;

/// Deterministic jitter in roughly [-0.5, 0.5].
fn jitter(i: usize) -> f32 {
    ((i as f32) * 0.731).sin() * 0.5
}

/// A 100-row table with three numeric columns, one of them constant.
fn table_with_constant_column() -> Table {
    let rows: Vec<Vec<String>> = (0..100)
        .map(|i| {
            vec![
                (i as f32 * 0.1 + jitter(i)).to_string(),
                (50.0 - i as f32 * 0.3 + jitter(i + 7)).to_string(),
                "4.2".to_string(),
            ]
        })
        .collect();

    Table::from_rows(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec![ColumnKind::Numeric, ColumnKind::Numeric, ColumnKind::Numeric],
        rows,
    )
    .unwrap()
}

/// Two 2D blobs around (0,0) and (10,10) with a numeric class column.
fn blob_table() -> Table {
    let mut rows = Vec::new();
    for i in 0..25 {
        rows.push(vec![
            jitter(i).to_string(),
            jitter(i + 3).to_string(),
            "0".to_string(),
        ]);
    }
    for i in 0..25 {
        rows.push(vec![
            (10.0 + jitter(i + 11)).to_string(),
            (10.0 + jitter(i + 17)).to_string(),
            "1".to_string(),
        ]);
    }

    Table::from_rows(
        vec!["f1".to_string(), "f2".to_string(), "class".to_string()],
        vec![ColumnKind::Numeric, ColumnKind::Numeric, ColumnKind::Int],
        rows,
    )
    .unwrap()
}

#[test]
fn constant_column_normalization_is_a_typed_error() {
    let table = table_with_constant_column();

    // The constant column must surface as a typed error, never NaN.
    let result = analizar::stats::normalize_separately(&table, &["a", "b", "c"]);
    match result {
        Err(AnalizarError::InvalidSelection { message }) => {
            assert!(message.contains("constant"));
        }
        other => panic!("expected InvalidSelection, got {other:?}"),
    }

    // Dropping the constant column makes the selection valid.
    let normalized = analizar::stats::normalize_separately(&table, &["a", "b"]).unwrap();
    for &v in normalized.as_slice() {
        assert!(v.is_finite());
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn descriptive_statistics_over_the_table() {
    let table = table_with_constant_column();

    let means = analizar::stats::mean(&table, &["a", "b", "c"]).unwrap();
    assert_eq!(means.len(), 3);
    assert!((means[2] - 4.2).abs() < 1e-5);

    let (value, freq) = analizar::stats::mode(&table, &["c"]).unwrap()[0];
    assert!((value - 4.2).abs() < 1e-5);
    assert_eq!(freq, 100);

    let ranges = analizar::stats::range(&table, &["c"]).unwrap();
    assert_eq!(ranges[0], (4.2, 4.2));

    let variances = analizar::stats::variance(&table, &["c"]).unwrap();
    assert!(variances[0].abs() < 1e-6);
}

#[test]
fn regression_solvers_agree_and_report_consistent_r2() {
    let table = table_with_constant_column();

    let ls = least_squares(&table, &["a"], "b").unwrap();
    let ne = normal_equation(&table, &["a"], "b").unwrap();

    for j in 0..ls.coefficients.len() {
        assert!((ls.coefficients[j] - ne.coefficients[j]).abs() < 0.05);
    }

    // The reported R² matches one recomputed from the coefficients.
    let x = table.column("a").unwrap();
    let y = table.column("b").unwrap();
    let predicted: Vec<f32> = (0..x.len())
        .map(|i| ls.coefficients[0] * x[i] + ls.coefficients[1])
        .collect();
    let r2 = r_squared(&Vector::from_vec(predicted), &y);
    assert!((r2 - ls.r_squared).abs() < 1e-3);
}

#[test]
fn classify_evaluate_and_write_back_predictions() {
    let table = blob_table();
    let x = table.numeric_data(&["f1", "f2"], None).unwrap();
    let categories: Vec<f32> = table.column("class").unwrap().as_slice().to_vec();

    let mut model = NaiveBayes::new();
    model.build(&x, &categories).unwrap();
    let result = model.classify(&x).unwrap();

    // Well-separated blobs: near-perfect training-set agreement.
    let truth: Vec<usize> = categories.iter().map(|&c| c as usize).collect();
    let acc = accuracy(&result.codes, &truth);
    assert!(acc >= 0.95, "accuracy {acc}");

    let cm = confusion_matrix(&result.codes, &truth);
    assert_eq!(cm.shape(), (2, 2));
    let rendered = format_confusion_matrix(&cm);
    assert_eq!(rendered.lines().count(), 2);

    // Append predictions and round-trip through the on-disk convention.
    let mut out = table.clone();
    out.add_numeric_column("predicted", &result.labels).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("predictions.csv");
    out.write_delimited(&path).unwrap();

    let restored = Table::read_delimited(&path).unwrap();
    assert_eq!(restored.n_rows(), out.n_rows());
    assert_eq!(
        restored.column("predicted").unwrap().as_slice(),
        out.column("predicted").unwrap().as_slice()
    );
}

#[test]
fn knn_matches_naive_bayes_on_separated_blobs() {
    let table = blob_table();
    let x = table.numeric_data(&["f1", "f2"], None).unwrap();
    let categories: Vec<f32> = table.column("class").unwrap().as_slice().to_vec();

    let mut knn = Knn::new();
    knn.build(&x, &categories).unwrap();
    let result = knn.classify(&x).unwrap();

    let truth: Vec<usize> = categories.iter().map(|&c| c as usize).collect();
    assert!(accuracy(&result.codes, &truth) >= 0.95);
}

#[test]
fn pca_projection_feeds_clustering() {
    let table = blob_table();

    let result = pca(&table, &["f1", "f2"], false).unwrap();
    assert_eq!(result.projected().shape(), (50, 2));

    // The projection behaves like any other table downstream.
    let projected_table = result.to_table().unwrap();
    assert_eq!(projected_table.headers(), vec!["pc1", "pc2"]);

    let clustering = kmeans(&projected_table, &["pc1", "pc2"], 2).unwrap();
    assert_eq!(clustering.codes.len(), 50);
    assert!(clustering.codes.iter().all(|&c| c < 2));
    assert!(clustering.n_iter <= 100);

    // Seeded from the known split, component space keeps the blobs apart.
    let projected_data = projected_table.numeric_data(&["pc1", "pc2"], None).unwrap();
    let mut categories = vec![0usize; 25];
    categories.extend(vec![1usize; 25]);
    let seeded = KMeans::new(2)
        .with_whiten(false)
        .with_categories(categories.clone())
        .fit(&projected_data)
        .unwrap();
    assert_eq!(seeded.codes, categories);
}

#[test]
fn seeded_clustering_recovers_category_structure() {
    let table = blob_table();
    let data = table.numeric_data(&["f1", "f2"], None).unwrap();
    let categories: Vec<usize> = table
        .column("class")
        .unwrap()
        .as_slice()
        .iter()
        .map(|&c| c as usize)
        .collect();

    let result = KMeans::new(2)
        .with_categories(categories.clone())
        .fit(&data)
        .unwrap();

    assert_eq!(result.codes, categories);
    assert!(result.n_iter <= 100);
}

#[test]
fn table_read_regress_and_mutate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("line.csv");
    std::fs::write(
        &path,
        "label,x,y\nstring,numeric,numeric\nr1,1,3.1\nr2,2,4.9\nr3,3,7.2\nr4,4,8.8\nr5,5,11.1\n",
    )
    .unwrap();

    let mut table = Table::read_delimited(&path).unwrap();
    assert_eq!(table.headers(), vec!["x", "y"]);

    let fit = least_squares(&table, &["x"], "y").unwrap();
    assert!((fit.coefficients[0] - 2.0).abs() < 0.2);
    assert!(fit.r_squared > 0.95);

    // Column deletion stays atomic across both views.
    table.delete_column("label").unwrap();
    assert_eq!(table.n_raw_cols(), 2);
    assert_eq!(table.n_cols(), 2);
    assert!(table.delete_column("label").is_err());
    assert_eq!(table.n_raw_cols(), 2);
}

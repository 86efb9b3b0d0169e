//! Property-based tests for the analysis invariants.

use analizar::prelude::*;
use proptest::prelude::*;

/// Builds a single-column numeric table from raw values.
fn column_table(values: &[f32]) -> Table {
    let rows: Vec<Vec<String>> = values.iter().map(|v| vec![v.to_string()]).collect();
    Table::from_rows(
        vec!["x".to_string()],
        vec![ColumnKind::Numeric],
        rows,
    )
    .expect("single column table")
}

/// Relabels arbitrary codes into dense zero-based codes.
fn densify(codes: &[usize]) -> Vec<usize> {
    let mut distinct: Vec<usize> = codes.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    codes
        .iter()
        .map(|c| distinct.iter().position(|d| d == c).expect("present"))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn normalize_separately_stays_in_unit_interval(
        values in proptest::collection::vec(-100.0f32..100.0, 3..40)
    ) {
        let table = column_table(&values);
        let lo = values.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        prop_assume!(hi > lo);

        let normalized = analizar::stats::normalize_separately(&table, &["x"])
            .expect("non-constant column");

        let mut saw_zero = false;
        let mut saw_one = false;
        for &v in normalized.as_slice() {
            prop_assert!((0.0..=1.0).contains(&v));
            if v == 0.0 {
                saw_zero = true;
            }
            if v == 1.0 {
                saw_one = true;
            }
        }
        // The min maps to 0 and the max maps to 1 exactly.
        prop_assert!(saw_zero);
        prop_assert!(saw_one);
    }

    #[test]
    fn kmeans_assigns_every_row_to_its_nearest_mean(
        values in proptest::collection::vec(-50.0f32..50.0, 12..60),
        k in 1usize..4,
        seed in 0u64..1000,
    ) {
        let n = values.len() / 2;
        prop_assume!(n >= k);
        let data = Matrix::from_vec(n, 2, values[..n * 2].to_vec()).expect("n x 2 matrix");

        let result = KMeans::new(k)
            .with_random_state(seed)
            .fit(&data)
            .expect("valid clustering input");

        prop_assert_eq!(result.codes.len(), n);
        prop_assert!(result.n_iter <= 100);

        // Whitening is part of the run; recheck distances in that space.
        let whitened = analizar::cluster::whiten(&data);
        for (i, &code) in result.codes.iter().enumerate() {
            prop_assert!(code < k);
            let own = {
                let mut d = 0.0;
                for j in 0..2 {
                    let diff = whitened.get(i, j) - result.codebook.get(code, j);
                    d += diff * diff;
                }
                d.sqrt()
            };
            prop_assert!((own - result.errors[i]).abs() < 1e-3);
            for other in 0..k {
                let mut d = 0.0;
                for j in 0..2 {
                    let diff = whitened.get(i, j) - result.codebook.get(other, j);
                    d += diff * diff;
                }
                prop_assert!(own <= d.sqrt() + 1e-4);
            }
        }
    }

    #[test]
    fn confusion_matrix_counts_are_conserved(
        raw_true in proptest::collection::vec(0usize..4, 2..50),
        pred_shift in 0usize..3,
    ) {
        let y_true = densify(&raw_true);
        let n_classes = y_true.iter().max().expect("non-empty") + 1;
        let y_pred: Vec<usize> = y_true
            .iter()
            .map(|&c| (c + pred_shift) % n_classes)
            .collect();

        let cm = confusion_matrix(&y_pred, &y_true);
        prop_assert_eq!(cm.shape(), (n_classes, n_classes));

        // Every observation lands in exactly one cell.
        let total: usize = cm.as_slice().iter().sum();
        prop_assert_eq!(total, y_true.len());

        // Row sums equal the per-class truth counts.
        for class in 0..n_classes {
            let row_sum: usize = (0..n_classes).map(|j| cm.get(class, j)).sum();
            let truth_count = y_true.iter().filter(|&&c| c == class).count();
            prop_assert_eq!(row_sum, truth_count);
        }
    }

    #[test]
    fn least_squares_residual_orthogonality(
        xs in proptest::collection::vec(-10.0f32..10.0, 8..20),
        slope in -3.0f32..3.0,
        intercept in -5.0f32..5.0,
    ) {
        // Distinct x values keep the design matrix well conditioned.
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite"));
        sorted.dedup_by(|a, b| (*a - *b).abs() < 0.5);
        prop_assume!(sorted.len() >= 5);

        let ys: Vec<f32> = sorted.iter().map(|x| slope * x + intercept).collect();
        let rows: Vec<Vec<String>> = sorted
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| vec![x.to_string(), y.to_string()])
            .collect();
        let table = Table::from_rows(
            vec!["x".to_string(), "y".to_string()],
            vec![ColumnKind::Numeric, ColumnKind::Numeric],
            rows,
        )
        .expect("two column table");

        let fit = least_squares(&table, &["x"], "y").expect("well conditioned");

        // Exact linear data: coefficients recovered, fit essentially perfect.
        prop_assert!((fit.coefficients[0] - slope).abs() < 0.05);
        prop_assert!((fit.coefficients[1] - intercept).abs() < 0.25);
        prop_assert!(fit.sse < 0.1);
    }
}

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use housing_pipeline::inference::Predictor;
use housing_pipeline::model::LinearModel;
use housing_pipeline::preprocessing::{known_indicator_names, HousingPreprocessor, CANONICAL_COLUMNS};
use polars::prelude::*;

const CATEGORIES: [&str; 5] = ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"];

fn create_raw_data(n_rows: usize) -> DataFrame {
    let mut columns: Vec<Column> = CANONICAL_COLUMNS[..9]
        .iter()
        .enumerate()
        .map(|(c, name)| {
            // Every 17th cell missing
            let values: Vec<Option<f64>> = (0..n_rows)
                .map(|r| if (r + c) % 17 == 0 { None } else { Some((r * 7 + c) as f64) })
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();

    let proximity: Vec<&str> = (0..n_rows).map(|r| CATEGORIES[r % CATEGORIES.len()]).collect();
    columns.push(Column::new("ocean_proximity".into(), proximity));
    columns.push(Column::new("agency".into(), vec!["a"; n_rows]));

    DataFrame::new(columns).unwrap()
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");
    let preprocessor = HousingPreprocessor::new();

    for n_rows in [1000, 10000, 50000].iter() {
        let df = create_raw_data(*n_rows);

        group.bench_with_input(BenchmarkId::new("transform", n_rows), &df, |b, df| {
            b.iter(|| preprocessor.transform(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    let mut names: Vec<String> = CANONICAL_COLUMNS[..8].iter().map(|s| s.to_string()).collect();
    names.extend(known_indicator_names("ocean_proximity"));
    let model = LinearModel::new(vec![0.5; names.len()], 1.0).with_feature_names(names);
    let predictor = Predictor::new();

    for n_rows in [1000, 10000, 50000].iter() {
        let transformed = HousingPreprocessor::new()
            .transform(&create_raw_data(*n_rows))
            .unwrap()
            .frame;

        group.bench_with_input(BenchmarkId::new("score", n_rows), &transformed, |b, df| {
            b.iter(|| predictor.predict(black_box(df), &model).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform, bench_predict);
criterion_main!(benches);

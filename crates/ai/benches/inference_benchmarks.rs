use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use heartrisk_ai::{
    DecisionTree, InferenceEngine, LogisticRegression, RandomForest, StandardScaler, TreeNode,
};
use heartrisk_core::{FeatureSchema, PatientRecord};

fn sample_record() -> PatientRecord {
    PatientRecord::from([
        ("age", 63.0),
        ("sex", 1.0),
        ("cp", 3.0),
        ("trestbps", 145.0),
        ("chol", 233.0),
        ("fbs", 1.0),
        ("restecg", 0.0),
        ("thalach", 150.0),
        ("exang", 0.0),
        ("oldpeak", 2.3),
        ("slope", 0.0),
        ("ca", 0.0),
        ("thal", 1.0),
    ])
}

fn scaler() -> StandardScaler {
    StandardScaler::new(
        vec![54.4, 0.68, 0.97, 131.6, 246.3, 0.15, 0.53, 149.6, 0.33, 1.04, 1.4, 0.73, 2.31],
        vec![9.0, 0.47, 1.03, 17.5, 51.8, 0.36, 0.53, 22.9, 0.47, 1.16, 0.62, 1.02, 0.61],
    )
}

fn logistic_engine() -> InferenceEngine {
    let coefficients = vec![
        0.02, -0.9, 0.85, -0.25, -0.2, 0.05, 0.2, 0.45, -0.5, -0.6, 0.4, -0.8, -0.55,
    ];
    InferenceEngine::new(FeatureSchema::canonical())
        .with_scaler(Arc::new(scaler()))
        .with_classifier(Arc::new(LogisticRegression::new(coefficients, 0.1)))
}

/// Depth-`depth` complete tree splitting on features round-robin.
fn complete_tree(depth: usize) -> DecisionTree {
    let mut nodes = Vec::new();
    build(&mut nodes, 0, depth);
    DecisionTree::new(13, nodes)
}

fn build(nodes: &mut Vec<TreeNode>, level: usize, depth: usize) -> usize {
    let idx = nodes.len();
    if level == depth {
        nodes.push(TreeNode::Leaf {
            value: [(idx % 7) as f64 + 1.0, (idx % 5) as f64 + 1.0],
        });
        return idx;
    }
    nodes.push(TreeNode::Leaf { value: [1.0, 1.0] });
    let left = build(nodes, level + 1, depth);
    let right = build(nodes, level + 1, depth);
    nodes[idx] = TreeNode::Split {
        feature: level % 13,
        threshold: 0.0,
        left,
        right,
    };
    idx
}

fn forest_engine(n_trees: usize) -> InferenceEngine {
    let forest = RandomForest {
        n_features: 13,
        trees: (0..n_trees).map(|_| complete_tree(7)).collect(),
        feature_importances: vec![1.0 / 13.0; 13],
    };
    InferenceEngine::new(FeatureSchema::canonical())
        .with_scaler(Arc::new(scaler()))
        .with_classifier(Arc::new(forest))
}

fn bench_single_prediction(c: &mut Criterion) {
    let record = sample_record();
    let mut group = c.benchmark_group("predict_single");

    let engine = logistic_engine();
    group.bench_function("logistic_regression", |b| {
        b.iter(|| engine.predict(black_box(&record)).unwrap())
    });

    for n_trees in [10, 100] {
        let engine = forest_engine(n_trees);
        group.bench_with_input(
            BenchmarkId::new("random_forest", n_trees),
            &n_trees,
            |b, _| b.iter(|| engine.predict(black_box(&record)).unwrap()),
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let engine = forest_engine(100);
    let mut group = c.benchmark_group("predict_batch");

    for size in [10usize, 100, 1000] {
        let records: Vec<PatientRecord> = (0..size)
            .map(|i| sample_record().with("age", 30.0 + (i % 50) as f64))
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| engine.predict_batch(black_box(records)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_prediction, bench_batch);
criterion_main!(benches);

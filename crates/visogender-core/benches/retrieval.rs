//! Benchmarks for the VisoGender retrieval bias calculator.
//!
//! Run with: cargo bench -p visogender-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use visogender_core::{
    calculate_retrieval_bias, summarize_metrics, GenderLabel, OccupationResult,
    RetrievalOptions, RetrievalResults,
};

const OCCUPATIONS: usize = 50;
const CANDIDATES: usize = 20;

fn synthetic_results() -> RetrievalResults {
    let mut rng = StdRng::seed_from_u64(42);
    (0..OCCUPATIONS)
        .map(|i| {
            let logits = (0..CANDIDATES).map(|_| rng.gen::<f64>()).collect();
            let genders = (0..CANDIDATES)
                .map(|_| {
                    if rng.gen_bool(0.5) {
                        GenderLabel::Masculine
                    } else {
                        GenderLabel::Feminine
                    }
                })
                .collect();
            (format!("occupation_{i:02}"), OccupationResult::new(logits, genders))
        })
        .collect()
}

fn benchmark_retrieval_bias(c: &mut Criterion) {
    let results = synthetic_results();
    let options = RetrievalOptions::default();

    c.bench_function("retrieval_bias_gender", |b| {
        b.iter(|| {
            let _ = calculate_retrieval_bias(black_box(&results), &options);
        })
    });
}

fn benchmark_retrieval_bias_diff_gender(c: &mut Criterion) {
    let results = synthetic_results();
    let options = RetrievalOptions::new(true);

    c.bench_function("retrieval_bias_diff_gender", |b| {
        b.iter(|| {
            let _ = calculate_retrieval_bias(black_box(&results), &options);
        })
    });
}

fn benchmark_summary(c: &mut Criterion) {
    let results = synthetic_results();
    let Ok(bias) = calculate_retrieval_bias(&results, &RetrievalOptions::default()) else {
        eprintln!("Skipping summary benchmark: synthetic results failed to analyze");
        return;
    };
    let metrics = ["bias@5", "bias@10", "maxskew@5", "maxskew@10", "ndkl", "bias_count@10"];

    c.bench_function("summarize_metrics", |b| {
        b.iter(|| {
            let _ = summarize_metrics(black_box(&bias), &metrics, 2);
        })
    });
}

criterion_group!(
    benches,
    benchmark_retrieval_bias,
    benchmark_retrieval_bias_diff_gender,
    benchmark_summary
);
criterion_main!(benches);

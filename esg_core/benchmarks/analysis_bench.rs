use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use esg_core::{build_feature_vector, AnalysisEngine, FeatureSchema, SimulationInput};

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let engine = AnalysisEngine::builtin().expect("builtin artifacts load");
    let schema = FeatureSchema::builtin().expect("builtin schema parses");

    for governance in [0i64, 50, 100] {
        let input = SimulationInput::default().with_pillar(esg_core::Pillar::Governance, governance);
        group.bench_with_input(
            BenchmarkId::new("build_features", governance),
            &input,
            |b, input| b.iter(|| build_feature_vector(input, &schema)),
        );
        group.bench_with_input(
            BenchmarkId::new("analyze", governance),
            &input,
            |b, input| b.iter(|| engine.analyze(input)),
        );
    }

    group.finish();
}

criterion_group!(analysis_benches, bench_analysis);
criterion_main!(analysis_benches);

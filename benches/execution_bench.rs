use criterion::{criterion_group, criterion_main, Criterion};
use env_matrix::core::config::CaseSpec;
use env_matrix::core::execution::{run_case, RunOptions};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

fn bench_run_case(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let envs = tempfile::tempdir().unwrap();
    let opts = RunOptions::new(envs.path().to_path_buf(), 500);
    let case = CaseSpec {
        name: "bench_case".to_string(),
        setup: vec![],
        verify: "echo bench".to_string(),
        timeout_secs: Some(10),
        ..CaseSpec::default()
    };
    let cancel = CancellationToken::new();

    c.bench_function("run_case", |b| {
        b.to_async(&rt).iter(|| async {
            let _ = run_case(case.clone(), &opts, &cancel).await;
        });
    });
}

criterion_group!(benches, bench_run_case);
criterion_main!(benches);

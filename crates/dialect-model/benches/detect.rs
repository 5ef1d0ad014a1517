use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dialect_model::detect;

fn synthetic_model(lines: usize) -> String {
    let mut text = String::from("* Analog Devices opamp macromodel\n.SUBCKT OPX 1 2 3 4 5\n");
    for i in 0..lines {
        text.push_str(&format!("R{i} {i} 0 1k\n"));
    }
    text.push_str("E1 3 0 TABLE (V(1,2)) = (-1,-10) (1,10)\n.ENDS OPX\n");
    text
}

fn bench_detect(c: &mut Criterion) {
    let small = synthetic_model(50);
    let large = synthetic_model(5_000);

    c.bench_function("detect_small_model", |b| {
        b.iter(|| detect(black_box(&small)))
    });
    c.bench_function("detect_large_model", |b| {
        b.iter(|| detect(black_box(&large)))
    });
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use gridbt_exp::{expand, SweepSpec};

fn bench_expand(c: &mut Criterion) {
    let spec = SweepSpec::from_yaml_str(
        "window: [2, 3, 4, 5, 6, 7]\n\
         stop_loss: [0.5, 1.0, 1.5, 2.0]\n\
         quantity: [10, 20, 50]\n\
         strategy:\n\
           breakout:\n\
             band: [5, 10, 20]\n\
           meanrev:\n\
             band: [3, 7, 14]\n",
    )
    .expect("classify");
    c.bench_function("expand_432_configs", |b| {
        b.iter(|| expand(&spec).expect("expand"))
    });
}

criterion_group!(benches, bench_expand);
criterion_main!(benches);

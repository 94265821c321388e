use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evonet::{
    network::{NeuralNetwork, Topology},
    rng::RandomNumberGenerator,
};

fn bench_feed_forward(c: &mut Criterion) {
    let mut rng = RandomNumberGenerator::from_seed(42);

    let mut group = c.benchmark_group("feed_forward");
    for layers in [vec![12, 8, 4], vec![12, 16, 16, 4], vec![64, 128, 128, 64, 16]] {
        let network = NeuralNetwork::new(Topology::new(layers.clone()).unwrap(), &mut rng);
        let input = rng.fetch_uniform(-1.0, 1.0, layers[0]);

        group.bench_function(&format!("feed_forward_{:?}", layers), |b| {
            b.iter(|| {
                let output = network.feed_forward(black_box(&input));
                assert!(output.is_ok());
            })
        });
    }
    group.finish();
}

fn bench_persistence(c: &mut Criterion) {
    let mut rng = RandomNumberGenerator::from_seed(7);
    let network = NeuralNetwork::new(Topology::new(vec![12, 16, 16, 4]).unwrap(), &mut rng);
    let bytes = network.to_bytes().unwrap();

    c.bench_function("encode_network", |b| {
        b.iter(|| black_box(&network).to_bytes().unwrap())
    });
    c.bench_function("decode_network", |b| {
        b.iter(|| NeuralNetwork::from_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_feed_forward, bench_persistence);
criterion_main!(benches);

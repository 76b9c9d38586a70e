use criterion::{black_box, criterion_group, criterion_main, Criterion};

use draco::{AttributeBuffer, AttributeRole, Decoder, Encoder, Geometry, GeometryType, PointCloud, PointCloudBuilder};

const NUM_POINTS: usize = 10_000;

fn positions() -> Vec<[f32; 3]> {
    (0..NUM_POINTS)
        .map(|i| {
            let t = i as f32 * 0.001;
            [t.sin(), t.cos(), t]
        })
        .collect()
}

fn point_cloud(values: &[[f32; 3]]) -> PointCloud {
    let mut builder = PointCloudBuilder::new();
    builder.start(values.len());
    builder
        .set_attribute(values.len(), values, AttributeRole::Position)
        .expect("set positions");
    builder.finish().expect("finish point cloud")
}

// ---------------------------------------------------------------------------
// Set path
// ---------------------------------------------------------------------------

fn bench_set_attribute(c: &mut Criterion) {
    let values = positions();
    c.bench_function("set_attribute_10k_vec3", |b| {
        b.iter(|| point_cloud(black_box(&values)));
    });
}

// ---------------------------------------------------------------------------
// Get path
// ---------------------------------------------------------------------------

fn bench_attr_data_same_kind(c: &mut Criterion) {
    let pc = point_cloud(&positions());
    let attr = pc.attr(0).expect("position attribute");
    let mut buffer = Some(AttributeBuffer::Float32(Vec::new()));
    c.bench_function("attr_data_10k_f32_reused", |b| {
        b.iter(|| {
            let (values, ok) = pc.attr_data(&attr, buffer.take());
            assert!(ok);
            buffer = Some(black_box(values));
        });
    });
}

fn bench_attr_data_widening(c: &mut Criterion) {
    let pc = point_cloud(&positions());
    let attr = pc.attr(0).expect("position attribute");
    c.bench_function("attr_values_10k_f32_to_f64", |b| {
        b.iter(|| black_box(pc.attr_values(&attr, Vec::<f64>::new())));
    });
}

// ---------------------------------------------------------------------------
// Codec round trip
// ---------------------------------------------------------------------------

fn bench_encode_decode(c: &mut Criterion) {
    let pc = point_cloud(&positions());
    let encoder = Encoder::new();
    let decoder = Decoder::new();
    c.bench_function("encode_decode_10k_vec3", |b| {
        b.iter(|| {
            let bytes = encoder.encode_point_cloud(&pc).expect("encode");
            black_box(decoder.decode(GeometryType::PointCloud, &bytes).expect("decode"))
        });
    });
}

criterion_group!(
    benches,
    bench_set_attribute,
    bench_attr_data_same_kind,
    bench_attr_data_widening,
    bench_encode_decode
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use geocodec::backend::native::NativeBuilder;
use geocodec::io::geojson::{GeoJsonReader, GeoJsonWriter};
use serde_json::{json, Value};

fn create_data() -> Value {
    let features = (0..1000)
        .map(|i| {
            json!({
                "type": "Feature",
                "id": i,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[i, 0], [i + 1, 0], [i + 1, 1], [i, 1], [i, 0]]]
                },
                "properties": {"name": format!("cell {i}"), "area": 1.0}
            })
        })
        .collect::<Vec<_>>();
    json!({"type": "FeatureCollection", "features": features})
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = create_data();
    let reader = GeoJsonReader::new(&NativeBuilder);
    c.bench_function("read 1000-feature collection", |b| {
        b.iter(|| {
            let _shape = reader.read(&data).unwrap().unwrap();
        })
    });

    let shape = reader.read(&data).unwrap().unwrap();
    let writer = GeoJsonWriter::new(&NativeBuilder);
    c.bench_function("write 1000-feature collection", |b| {
        b.iter(|| {
            let _text = writer.write_string(&shape).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

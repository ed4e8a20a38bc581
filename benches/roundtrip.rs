use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lasfile::{Builder, Point, Reader, Writer, point::Format};
use std::{hint::black_box, io::Cursor};

fn roundtrip(format: Format, npoints: usize) {
    let mut builder = Builder::default();
    builder.point_format = format;
    let header = builder.into_header().unwrap();
    let mut writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
    let point = Point {
        gps_time: format.has_gps_time.then_some(1.),
        color: format.has_color.then(Default::default),
        ..Default::default()
    };
    for _ in 0..npoints {
        writer.write_point(point.clone()).unwrap();
    }
    let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    for point in reader.points() {
        let _ = black_box(point.unwrap());
    }
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    for npoints in [0, 1, 100, 10_000] {
        group.bench_with_input(BenchmarkId::new("format_0", npoints), &npoints, |b, &n| {
            b.iter(|| roundtrip(Format::default(), n))
        });
    }
    let format = Format {
        has_gps_time: true,
        has_color: true,
        extra_bytes: 0,
    };
    group.bench_with_input(BenchmarkId::new("format_3", 10_000), &10_000, |b, &n| {
        b.iter(|| roundtrip(format, n))
    });
    group.finish();
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);

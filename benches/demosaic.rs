use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fits_raster_rs::image_pipeline::{
    CfaPattern, DecodeConfig, ImageMetadata, OutputShape, PixelLayout, RasterPipeline, SampleType,
};

fn generate_mock_mosaic(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 2);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 31 + y * 17) % 4096) as i16).to_be_bytes();
            data.extend_from_slice(&value);
        }
    }
    data
}

fn mosaic_metadata(width: usize, height: usize) -> ImageMetadata {
    ImageMetadata::new(width, height, 1, SampleType::Int16)
        .with_scaling(32768.0, 1.0)
        .with_cfa(CfaPattern::Rggb)
}

fn benchmark_demosaic_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("demosaic_by_size");

    let sizes = vec![
        (256, 256, "256x256"),
        (1024, 768, "1024x768"),
        (4096, 2160, "4096x2160"),
    ];

    for (width, height, label) in sizes {
        let mock_data = generate_mock_mosaic(width, height);
        let metadata = mosaic_metadata(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &mock_data, |b, data| {
            let pipeline = RasterPipeline::new(DecodeConfig::default()).unwrap();
            b.iter(|| {
                let _ = pipeline.decode(&metadata, black_box(data));
            });
        });
    }

    group.finish();
}

fn benchmark_thread_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("demosaic_threads");
    let mock_data = generate_mock_mosaic(2048, 1536);
    let metadata = mosaic_metadata(2048, 1536);

    for threads in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &mock_data, |b, data| {
            let config = DecodeConfig::builder().threads(threads).build();
            let pipeline = RasterPipeline::new(config).unwrap();
            b.iter(|| {
                let _ = pipeline.decode(&metadata, black_box(data));
            });
        });
    }

    group.finish();
}

fn benchmark_output_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_shapes");
    let mock_data = generate_mock_mosaic(1024, 1024);
    let metadata = mosaic_metadata(1024, 1024);

    let shapes = vec![
        (OutputShape::Interleaved, PixelLayout::Argb, "argb"),
        (OutputShape::Interleaved, PixelLayout::Rgb, "rgb"),
        (OutputShape::Interleaved, PixelLayout::Mono, "mono"),
        (OutputShape::Planar, PixelLayout::Argb, "planar"),
        (OutputShape::CfaSplit, PixelLayout::Argb, "cfa_split"),
    ];

    for (shape, layout, label) in shapes {
        group.bench_with_input(BenchmarkId::from_parameter(label), &mock_data, |b, data| {
            let config = DecodeConfig::builder().shape(shape).layout(layout).build();
            let pipeline = RasterPipeline::new(config).unwrap();
            b.iter(|| {
                let _ = pipeline.decode(&metadata, black_box(data));
            });
        });
    }

    group.finish();
}

fn benchmark_component_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("component_types");
    let mock_data = generate_mock_mosaic(1024, 1024);
    let metadata = mosaic_metadata(1024, 1024);
    let pipeline = RasterPipeline::new(DecodeConfig::default()).unwrap();

    group.bench_function("f32", |b| {
        b.iter(|| {
            let _ = pipeline.decode_as::<f32>(&metadata, black_box(&mock_data));
        });
    });

    group.bench_function("u16", |b| {
        b.iter(|| {
            let _ = pipeline.decode_as::<u16>(&metadata, black_box(&mock_data));
        });
    });

    group.bench_function("u8", |b| {
        b.iter(|| {
            let _ = pipeline.decode_as::<u8>(&metadata, black_box(&mock_data));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_demosaic_sizes,
    benchmark_thread_counts,
    benchmark_output_shapes,
    benchmark_component_types
);
criterion_main!(benches);

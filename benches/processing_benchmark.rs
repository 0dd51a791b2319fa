use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use utm_converter::models::{Axis, OutputMode, PlanarPoint, ProjectionConfig, Table};
use utm_converter::processors::{build_output_table, RowConverter};
use utm_converter::projection::UtmProjector;
use utm_converter::readers::TableLoader;
use utm_converter::utils::coordinates::{dms_to_decimal, format_brazilian, format_international, to_dms};
use utm_converter::writers::TableWriter;

// Grid of points around the central meridian of zone 23S
fn create_test_points(count: usize) -> Vec<PlanarPoint> {
    (0..count)
        .map(|i| {
            PlanarPoint::new(
                200_000.0 + (i % 600) as f64 * 1_000.0,
                7_000_000.0 + (i / 600) as f64 * 1_000.0,
            )
        })
        .collect()
}

fn create_test_table(rows: usize) -> Table {
    let mut data = vec![vec![
        "Vertice".to_string(),
        "E/Long".to_string(),
        "N/Lat".to_string(),
    ]];
    for (i, point) in create_test_points(rows).iter().enumerate() {
        data.push(vec![
            format!("P{}", i),
            format!("{:.3}", point.easting).replace('.', ","),
            format!("{:.3}", point.northing).replace('.', ","),
        ]);
    }
    Table::new(
        vec!["Nome".to_string(), "X".to_string(), "Y".to_string()],
        data,
    )
}

fn benchmark_inverse_projection(c: &mut Criterion) {
    let projector = UtmProjector::new(ProjectionConfig::sirgas2000_23s());
    let points = create_test_points(1_000);

    c.bench_function("utm_inverse_1000", |b| {
        b.iter(|| {
            let mut converted = 0;
            for point in &points {
                if projector.inverse(*point).is_ok() {
                    converted += 1;
                }
            }
            black_box(converted)
        })
    });
}

fn benchmark_dms_formatting(c: &mut Criterion) {
    let values: Vec<f64> = (0..1_000).map(|i| -50.0 + i as f64 * 0.01337).collect();

    c.bench_function("dms_formatting", |b| {
        b.iter(|| {
            let mut total_len = 0;
            for &value in &values {
                let dms = to_dms(value);
                total_len += format_international(&dms, 2).len();
                total_len += format_brazilian(&dms, Axis::Longitude, 3).len();
            }
            black_box(total_len)
        })
    });
}

fn benchmark_dms_parsing(c: &mut Criterion) {
    let dms_coordinates = vec![
        "-45° 00' 00.00\"",
        "27 07 20,891 S",
        "47 26 17,532 W",
        "-22:57:30.55",
        "22° 57' 30.55\"",
    ];

    c.bench_function("dms_parsing", |b| {
        b.iter(|| {
            let mut results = Vec::new();
            for dms in &dms_coordinates {
                if let Ok(decimal) = dms_to_decimal(dms) {
                    results.push(decimal);
                }
            }
            black_box(results.len())
        })
    });
}

fn benchmark_table_loading(c: &mut Criterion) {
    let table = create_test_table(1_000);
    let bytes = TableWriter::new().with_bom(false).to_bytes(&table).unwrap_or_default();
    let loader = TableLoader::new();

    c.bench_function("table_loading_1000", |b| {
        b.iter(|| black_box(loader.load_bytes(&bytes).map(|t| t.table.row_count())))
    });
}

fn benchmark_varying_table_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_conversion_by_size");
    let converter = RowConverter::new(ProjectionConfig::sirgas2000_23s());

    for &size in &[10, 100, 1_000, 10_000] {
        let table = create_test_table(size);
        group.bench_with_input(BenchmarkId::new("rows", size), &table, |b, table| {
            b.iter(|| {
                let outcomes = converter.convert_table(table, 1, 2);
                let output = build_output_table(table, &outcomes, OutputMode::Append, 1, 2);
                black_box(output.map(|t| t.row_count()).unwrap_or(0))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_inverse_projection,
    benchmark_dms_formatting,
    benchmark_dms_parsing,
    benchmark_table_loading,
    benchmark_varying_table_sizes
);
criterion_main!(benches);

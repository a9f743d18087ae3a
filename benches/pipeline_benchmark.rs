use bikeshare_processor::analyzers::{build_station_day_features, RideAnalyzer};
use bikeshare_processor::models::{StationRecord, StationTable, TripRecord, WeatherRecord, WeatherTable};
use bikeshare_processor::processors::time_features::extract_time_features;
use bikeshare_processor::processors::{DataMerger, WeatherNormalizer};
use bikeshare_processor::PipelineConfig;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Trips spread over `days` days with hourly weather, leaving every tenth hour
// without a windspeed so the fallback chains have work to do.
fn create_test_data(trip_count: usize, station_count: usize, days: i64) -> (Vec<TripRecord>, WeatherTable, StationTable) {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let minutes = days * 24 * 60;

    let trips = (0..trip_count)
        .map(|i| {
            let started_at = start + Duration::minutes((i as i64 * 7919) % minutes);
            TripRecord::new(
                format!("S{}", i % station_count),
                Some((i % 60) as i64),
                started_at,
                extract_time_features(&started_at),
            )
        })
        .collect();

    let mut records: Vec<WeatherRecord> = (0..days * 24)
        .map(|h| {
            let windspeed = (h % 10 != 0).then(|| (h % 30) as f64);
            WeatherRecord::new(
                start + Duration::hours(h),
                Some(5.0 + (h % 24) as f64),
                windspeed,
                (h % 7 == 0).then(|| "rain".to_string()),
            )
        })
        .collect();
    WeatherNormalizer::default().normalize(&mut records);

    let stations = StationTable::new(
        (0..station_count)
            .map(|s| StationRecord::new(format!("S{}", s), format!("Station {}", s)))
            .collect(),
    );

    (
        trips,
        WeatherTable {
            records,
            ..WeatherTable::default()
        },
        stations,
    )
}

fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let merger = DataMerger::new(&PipelineConfig::default());

    for trip_count in [1_000, 10_000, 100_000] {
        let (trips, weather, stations) = create_test_data(trip_count, 50, 30);
        group.bench_with_input(BenchmarkId::from_parameter(trip_count), &trip_count, |b, _| {
            b.iter(|| merger.merge(black_box(&trips), black_box(&weather), black_box(&stations)))
        });
    }
    group.finish();
}

fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let merger = DataMerger::new(&PipelineConfig::default());
    let analyzer = RideAnalyzer::new();

    for trip_count in [10_000, 100_000] {
        let (trips, weather, stations) = create_test_data(trip_count, 50, 30);
        let table = merger.merge(&trips, &weather, &stations).unwrap();

        group.bench_with_input(BenchmarkId::new("views", trip_count), &table, |b, table| {
            b.iter(|| analyzer.analyze(black_box(table)))
        });
        group.bench_with_input(BenchmarkId::new("station_days", trip_count), &table, |b, table| {
            b.iter(|| build_station_day_features(black_box(&table.observations)))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_merge, benchmark_aggregation);
criterion_main!(benches);

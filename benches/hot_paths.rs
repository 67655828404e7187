use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use disaster_watch::map::build_markers;
use disaster_watch::report::{
    aggregate, extract_coordinates, filter_reports, FilterCriteria, Report,
};
use std::hint::black_box;

/// Deterministic synthetic report collection shaped like the real feed
fn synthetic_reports(n: usize) -> Vec<Report> {
    let categories = [
        "fire",
        "flood",
        "damaged_buildings",
        "landslide",
        "fallen_trees",
        "volcanic haze",
    ];
    let regions = ["Delhi", "Mumbai", "Pune", "Chennai", "Kolkata"];
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();

    (0..n)
        .map(|i| {
            let lat = -60.0 + (i % 120) as f64;
            let lon = -170.0 + (i % 340) as f64;
            Report {
                id: format!("r{i}"),
                prediction: categories[i % categories.len()].to_string(),
                note: format!("observation {i} near the river bank"),
                location: format!(
                    "{}, India - Latitude: {lat:.4}, Longitude: {lon:.4}",
                    regions[i % regions.len()]
                ),
                image_url: None,
                created_at: base + Duration::hours((i % 2000) as i64),
                confidence: (i % 3 == 0).then(|| (i % 100) as f64 / 100.0),
            }
        })
        .collect()
}

fn bench_extract_coordinates(c: &mut Criterion) {
    let location = "Kochi, India - heavy flooding reported upstream \
                    (Latitude: 9.9312, Longitude: 76.2673) by two observers";
    c.bench_function("extract_coordinates", |b| {
        b.iter(|| extract_coordinates(black_box(location)))
    });
}

fn bench_filter(c: &mut Criterion) {
    let reports = synthetic_reports(10_000);
    let criteria = FilterCriteria {
        search_term: "river".to_string(),
        start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15),
        end_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 15),
    };
    c.bench_function("filter_10k", |b| {
        b.iter(|| filter_reports(black_box(&reports), black_box(&criteria)))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let reports = synthetic_reports(10_000);
    c.bench_function("aggregate_10k", |b| {
        b.iter(|| aggregate(black_box(&reports)))
    });
}

fn bench_build_markers(c: &mut Criterion) {
    let reports = synthetic_reports(10_000);
    c.bench_function("build_markers_10k", |b| {
        b.iter(|| build_markers(black_box(&reports)))
    });
}

criterion_group!(
    benches,
    bench_extract_coordinates,
    bench_filter,
    bench_aggregate,
    bench_build_markers
);
criterion_main!(benches);

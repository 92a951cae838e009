use criterion::{black_box, criterion_group, criterion_main, Criterion};
use energy_charts::{donut_chart, stacked_series_chart, ChartSeries, DonutSlice, ToSvg};
use energy_core::{Locale, Vector};

fn build_series(n_years: usize) -> (Vec<String>, Vec<ChartSeries>) {
    let years: Vec<String> = (0..n_years).map(|i| (1995 + i).to_string()).collect();
    let series = Vector::ALL
        .iter()
        .enumerate()
        .map(|(k, v)| {
            let values = (0..n_years)
                .map(|i| ((i * 37 + k * 11) % 97) as f64 * 1000.0)
                .collect();
            ChartSeries::new(v.key(), v.label(Locale::Fr), v.color(), values)
        })
        .collect();
    (years, series)
}

fn bench_charts(c: &mut Criterion) {
    let (years, series) = build_series(30);
    c.bench_function("stacked area 30y x 7 series + svg", |b| {
        b.iter(|| {
            let chart = stacked_series_chart(black_box(&years), black_box(&series), Locale::Fr);
            black_box(chart.to_svg())
        })
    });

    let slices: Vec<DonutSlice> = series
        .iter()
        .map(|s| DonutSlice::new(s.key.clone(), s.label.clone(), s.color.clone(), s.value(0)))
        .collect();
    c.bench_function("donut 7 slices + svg", |b| {
        b.iter(|| black_box(donut_chart(black_box(&slices), Locale::Fr).to_svg()))
    });
}

criterion_group!(benches, bench_charts);
criterion_main!(benches);

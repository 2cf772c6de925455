use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use optionlab::historical::DEFAULT_WINDOWS;
use optionlab::prelude::*;
use std::hint::black_box;

fn atm_call() -> OptionContract {
    OptionContract::call(100.0, 100.0, 0.5, 0.04).expect("valid contract")
}

fn bench_pricing(c: &mut Criterion) {
    let contract = atm_call();

    c.bench_function("black_scholes_price", |b| {
        b.iter(|| black_box(BlackScholes::price(black_box(&contract), black_box(0.25))))
    });

    c.bench_function("black_scholes_greeks", |b| {
        b.iter(|| black_box(BlackScholes::greeks(black_box(&contract), black_box(0.25))))
    });
}

fn bench_implied_volatility(c: &mut Criterion) {
    let mut group = c.benchmark_group("implied_volatility");

    for (name, strike) in [("itm", 80.0), ("atm", 100.0), ("otm", 125.0)] {
        let contract = OptionContract::call(100.0, strike, 0.5, 0.04).expect("valid contract");
        let premium = contract.price(0.3);

        for method in [RootFinder::Brent, RootFinder::Bisection] {
            let config = SolverConfig::new().with_method(method);
            group.bench_with_input(
                BenchmarkId::new(format!("{method:?}"), name),
                &premium,
                |b, &premium| {
                    b.iter(|| {
                        solve_iv(black_box(&contract), black_box(premium), &config)
                            .expect("premium inside bracket")
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_historical_volatility(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date");
    let mut group = c.benchmark_group("historical_volatility");

    for len in [252usize, 504, 2520] {
        let closes: Vec<f64> = (0..len)
            .map(|i| 100.0 * (0.01 * (i as f64 * 0.37).sin()).exp())
            .collect();
        let series = PriceSeries::from_closes(start, &closes).expect("valid series");

        group.bench_with_input(BenchmarkId::from_parameter(len), &series, |b, series| {
            b.iter(|| historical_volatility(black_box(series), &DEFAULT_WINDOWS))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pricing,
    bench_implied_volatility,
    bench_historical_volatility
);
criterion_main!(benches);

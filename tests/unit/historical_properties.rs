use chrono::NaiveDate;
use optionlab::historical::DEFAULT_WINDOWS;
use optionlab::prelude::*;

fn series(len: usize) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
    let closes: Vec<f64> = (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 * (0.0005 * t + 0.02 * (t * 0.9).sin() + 0.01 * (t * 2.3).cos()).exp()
        })
        .collect();
    PriceSeries::from_closes(start, &closes).unwrap()
}

#[test]
fn test_row_count_is_length_minus_longest_window() {
    for len in [0, 1, 20, 119, 120, 121, 200, 504] {
        let curve = historical_volatility(&series(len), &DEFAULT_WINDOWS);
        assert_eq!(curve.len(), len.saturating_sub(120), "len {len}");
        assert_eq!(curve.is_empty(), len <= 120);
    }

    for windows in [vec![5], vec![30, 10], vec![2, 3, 4]] {
        let longest = *windows.iter().max().unwrap();
        let curve = historical_volatility(&series(50), &windows);
        assert_eq!(curve.len(), 50 - longest);
    }
}

#[test]
fn test_windows_share_dates() {
    let data = series(300);
    let curve = historical_volatility(&data, &DEFAULT_WINDOWS);
    let dates = curve.dates();

    for window in curve.series() {
        let window_dates: Vec<NaiveDate> = window.points.iter().map(|p| p.date).collect();
        assert_eq!(window_dates, dates);
    }
    assert_eq!(dates.first(), Some(&data.points()[120].date));
    assert_eq!(dates.last(), Some(&data.last().unwrap().date));
}

#[test]
fn test_matches_direct_computation() {
    let data = series(80);
    let curve = historical_volatility(&data, &[20]);

    let returns: Vec<f64> = data.log_returns().into_iter().map(|(_, r)| r).collect();
    let tail = &returns[returns.len() - 20..];
    let mean = tail.iter().sum::<f64>() / 20.0;
    let variance = tail.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 19.0;
    let expected = variance.sqrt() * 252f64.sqrt();

    let (_, latest) = curve.latest()[0];
    assert!((latest - expected).abs() < 1e-12);
}

#[test]
fn test_volatilities_are_non_negative() {
    let curve = historical_volatility(&series(400), &DEFAULT_WINDOWS);
    for window in curve.series() {
        assert!(window.points.iter().all(|p| p.volatility >= 0.0));
    }
}

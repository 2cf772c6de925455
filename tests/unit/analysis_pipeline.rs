use chrono::{Duration, NaiveDate};
use optionlab::prelude::*;
use std::sync::Arc;
use std::thread;

fn valuation() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn history(len: usize, daily_swing: f64) -> PriceSeries {
    let start = valuation() - Duration::days(len as i64 - 1);
    let closes: Vec<f64> = (0..len)
        .map(|i| 14.0 * (1.0 + daily_swing * if i % 2 == 0 { 1.0 } else { -1.0 }))
        .collect();
    PriceSeries::from_closes(start, &closes).unwrap()
}

fn source() -> InMemoryPriceSource {
    let source = InMemoryPriceSource::new();
    source.insert("ENI.MI", history(500, 0.005));
    source
}

#[test]
fn test_end_to_end_put_analysis() {
    let source = source();
    let expiry = valuation() + Duration::days(30);
    let contract = OptionContract::put(14.0 * 0.995, 14.0, 30.0 / 365.0, 0.04).unwrap();
    let premium = contract.price(0.28);

    let request =
        AnalysisRequest::new("eni.mi", "put", 14.0, premium, expiry, valuation(), 0.04).unwrap();
    let report = OptionAnalyzer::default().analyze(&request, &source).unwrap();

    assert_eq!(report.request_id, request.id());
    assert!((report.implied_volatility - 0.28).abs() < 1e-6);
    assert!(report.greeks.delta < 0.0 && report.greeks.delta > -1.0);
    assert!(report.greeks.theta_per_day < 0.0);

    // 500 closes inside the two-year lookback, longest window 120.
    assert_eq!(report.historical.len(), 380);

    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.latest_by_window.len(), 5);

    let chart = report.volatility_cone();
    assert_eq!(chart.series.len(), 5);
    assert_eq!(chart.reference_line.label, "IV: 28.00%");
}

#[test]
fn test_iv_relative_to_realized_cone() {
    let source = source();
    let expiry = valuation() + Duration::days(60);
    let spot = 14.0 * 0.995;
    let contract = OptionContract::call(spot, 14.0, 60.0 / 365.0, 0.03).unwrap();

    // Alternating ±0.5% closes realize roughly 16% annualized.
    let rich = AnalysisRequest::new(
        "ENI.MI",
        "call",
        14.0,
        contract.price(0.60),
        expiry,
        valuation(),
        0.03,
    )
    .unwrap();
    let report = OptionAnalyzer::default().analyze(&rich, &source).unwrap();
    assert_eq!(report.comparison.unwrap().position, IvPosition::AboveCone);

    let cheap = AnalysisRequest::new(
        "ENI.MI",
        "call",
        14.0,
        contract.price(0.05),
        expiry,
        valuation(),
        0.03,
    )
    .unwrap();
    let report = OptionAnalyzer::default().analyze(&cheap, &source).unwrap();
    assert_eq!(report.comparison.unwrap().position, IvPosition::BelowCone);
}

#[test]
fn test_missing_ticker_cannot_be_analyzed() {
    let request = AnalysisRequest::new(
        "NOPE",
        "call",
        10.0,
        1.0,
        valuation() + Duration::days(10),
        valuation(),
        0.04,
    )
    .unwrap();

    let err = OptionAnalyzer::default()
        .analyze(&request, &source())
        .unwrap_err();
    assert_eq!(
        err,
        OptionLabError::MissingMarketData {
            ticker: "NOPE".to_string()
        }
    );
}

#[test]
fn test_premium_below_intrinsic_is_reported() {
    // Deep in-the-money put quoted under its intrinsic value.
    let request = AnalysisRequest::new(
        "ENI.MI",
        "put",
        20.0,
        1.0,
        valuation() + Duration::days(90),
        valuation(),
        0.04,
    )
    .unwrap();

    let err = OptionAnalyzer::default()
        .analyze(&request, &source())
        .unwrap_err();
    assert!(matches!(err, OptionLabError::NoRootInBracket { .. }));
    assert!(err.to_string().contains("moneyness"));
}

#[test]
fn test_custom_configuration() {
    let config = AnalyzerConfig::new()
        .with_historical(
            HistoricalVolConfig::new()
                .with_windows(vec![10, 20])
                .with_trading_days_per_year(260.0),
        )
        .with_solver(SolverConfig::new().with_method(RootFinder::Bisection))
        .with_history_days(90);

    let request = AnalysisRequest::new(
        "ENI.MI",
        "call",
        14.0,
        0.4,
        valuation() + Duration::days(45),
        valuation(),
        0.02,
    )
    .unwrap();

    let report = OptionAnalyzer::new(config).analyze(&request, &source()).unwrap();
    // 91 closes in [valuation - 90, valuation].
    assert_eq!(report.historical.len(), 91 - 20);
    assert_eq!(report.historical.windows(), vec![10, 20]);

    let bad = AnalyzerConfig::new().with_historical(HistoricalVolConfig::new().with_windows(vec![1]));
    let err = OptionAnalyzer::new(bad)
        .analyze(&request, &source())
        .unwrap_err();
    assert!(matches!(err, OptionLabError::InvalidArgument { .. }));
}

#[test]
fn test_concurrent_requests_share_nothing() {
    let source = Arc::new(source());
    let analyzer = Arc::new(OptionAnalyzer::default());

    let handles: Vec<_> = [0.15, 0.25, 0.35, 0.45]
        .into_iter()
        .map(|vol| {
            let source = Arc::clone(&source);
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || {
                let contract = OptionContract::call(14.0 * 0.995, 15.0, 183.0 / 365.0, 0.03).unwrap();
                let request = AnalysisRequest::new(
                    "ENI.MI",
                    "call",
                    15.0,
                    contract.price(vol),
                    valuation() + Duration::days(183),
                    valuation(),
                    0.03,
                )
                .unwrap();
                let report = analyzer.analyze(&request, source.as_ref()).unwrap();
                (vol, report.implied_volatility)
            })
        })
        .collect();

    for handle in handles {
        let (expected, solved) = handle.join().unwrap();
        assert!((solved - expected).abs() < 1e-4);
    }
}

#[test]
fn test_report_package_survives_json() {
    let contract = OptionContract::call(14.0 * 0.995, 14.5, 91.0 / 365.0, 0.04).unwrap();
    let request = AnalysisRequest::new(
        "ENI.MI",
        "call",
        14.5,
        contract.price(0.3),
        valuation() + Duration::days(91),
        valuation(),
        0.04,
    )
    .unwrap();
    let report = OptionAnalyzer::default().analyze(&request, &source()).unwrap();

    let json = AnalysisReportPackage::new(report.clone())
        .unwrap()
        .to_json()
        .unwrap();
    let restored = AnalysisReportPackage::from_json(&json)
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(restored, report);
}

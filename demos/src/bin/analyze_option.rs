//! Command line walk-through of a single option analysis.
//!
//! Usage:
//!
//! ```text
//! analyze_option [--synthetic] [--save REPORT.json] <TICKER> <call|put> <STRIKE> <PREMIUM> \
//!     <EXPIRATION YYYY-MM-DD> [RATE] [HISTORY.json]
//! ```
//!
//! `HISTORY.json` is an array of `{"date": "YYYY-MM-DD", "close": f64}` objects.
//! Without it the analysis stops with missing market data, unless `--synthetic`
//! asks for a generated two-year history (the chart title says so).
//! `--save` writes the checksummed report package.

use chrono::{Duration, Local, NaiveDate};
use optionlab::prelude::*;
use std::env;
use std::fs;
use tracing::{error, info, warn};

const DEFAULT_RATE: f64 = 0.04;

struct Options {
    synthetic: bool,
    save: Option<String>,
    positional: Vec<String>,
}

fn parse_options(args: impl Iterator<Item = String>) -> Result<Options, OptionLabError> {
    let mut options = Options {
        synthetic: false,
        save: None,
        positional: Vec::new(),
    };

    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--synthetic" => options.synthetic = true,
            "--save" => {
                let path = args
                    .next()
                    .ok_or_else(|| OptionLabError::invalid_argument("save", "missing path"))?;
                options.save = Some(path);
            }
            _ => options.positional.push(arg),
        }
    }
    Ok(options)
}

fn synthetic_history(ticker: &str, end: NaiveDate) -> Result<PriceSeries, OptionLabError> {
    let len = 504;
    let start = end - Duration::days(len as i64 - 1);
    let closes: Vec<f64> = (0..len)
        .map(|i| {
            let t = i as f64;
            14.0 * (0.0002 * t + 0.012 * (t * 0.83).sin() + 0.006 * (t * 2.9).cos()).exp()
        })
        .collect();
    warn!("Using {} synthetic closes for {}", len, ticker);
    PriceSeries::from_closes(start, &closes)
}

fn load_history(path: &str) -> Result<PriceSeries, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    let series: PriceSeries = serde_json::from_str(&raw)?;
    info!("Loaded {} closes from {}", series.len(), path);
    Ok(series)
}

fn parse_number(args: &[String], index: usize, field: &str) -> Result<f64, OptionLabError> {
    let raw = args
        .get(index)
        .ok_or_else(|| OptionLabError::invalid_argument(field, "missing"))?;
    raw.parse::<f64>()
        .map_err(|e| OptionLabError::invalid_argument(field, format!("{raw}: {e}")))
}

fn save_report(report: &AnalysisReport, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let package = AnalysisReportPackage::new(report.clone())?;
    fs::write(path, package.to_json()?)?;

    // Read it back so a corrupted write is caught here.
    AnalysisReportPackage::from_json(&fs::read_to_string(path)?)?.validate()?;
    info!("Saved report {} to {} (sha256 {})", report.request_id, path, package.checksum);
    Ok(())
}

/// History for `ticker`: the file argument, generated closes with
/// `--synthetic`, otherwise nothing.
fn price_source(
    options: &Options,
    ticker: &str,
    today: NaiveDate,
) -> Result<InMemoryPriceSource, Box<dyn std::error::Error>> {
    let source = InMemoryPriceSource::new();
    match options.positional.get(6) {
        Some(path) => source.insert(ticker, load_history(path)?),
        None if options.synthetic => source.insert(ticker, synthetic_history(ticker, today)?),
        None => info!("No history file given for {}", ticker),
    }
    Ok(source)
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let args = &options.positional;
    let ticker = args.first().map(String::as_str).unwrap_or_default();
    let side = args.get(1).map(String::as_str).unwrap_or_default();
    let strike = parse_number(args, 2, "strike")?;
    let premium = parse_number(args, 3, "premium")?;
    let expiration = match args.get(4) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| OptionLabError::invalid_argument("expiration", format!("{raw}: {e}")))?,
        None => return Err(OptionLabError::invalid_argument("expiration", "missing").into()),
    };
    let rate = match args.get(5) {
        Some(_) => parse_number(args, 5, "risk_free_rate")?,
        None => DEFAULT_RATE,
    };

    let today = Local::now().date_naive();
    let request = AnalysisRequest::new(ticker, side, strike, premium, expiration, today, rate)?;

    let source = price_source(options, request.ticker(), today)?;
    let report = OptionAnalyzer::default().analyze(&request, &source)?;
    for line in report.summary() {
        println!("{line}");
    }

    let mut chart = report.volatility_cone();
    if options.synthetic && args.get(6).is_none() {
        chart.title = format!("{} (synthetic history)", chart.title);
    }
    println!("{}", serde_json::to_string_pretty(&chart)?);

    if let Some(path) = &options.save {
        save_report(&report, path)?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let result = parse_options(env::args())
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(|options| run(&options));
    if let Err(e) = result {
        error!("Analysis failed: {}", e);
        std::process::exit(1);
    }
}

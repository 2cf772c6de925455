use optionlab::prelude::*;

const SPOTS: [f64; 5] = [20.0, 80.0, 100.0, 125.0, 400.0];
const STRIKES: [f64; 4] = [50.0, 95.0, 100.0, 140.0];
const RATES: [f64; 3] = [0.0, 0.03, 0.08];
const TIMES: [f64; 4] = [0.05, 0.25, 1.0, 2.5];
const SIDES: [OptionSide; 2] = [OptionSide::Call, OptionSide::Put];

#[test]
fn test_expired_options_are_worth_intrinsic() {
    for spot in SPOTS {
        for strike in STRIKES {
            for vol in [0.0, 1e-7, 0.2, 1.5] {
                let call = price(spot, strike, 0.0, 0.05, vol, OptionSide::Call);
                let put = price(spot, strike, 0.0, 0.05, vol, OptionSide::Put);
                assert_eq!(call, (spot - strike).max(0.0));
                assert_eq!(put, (strike - spot).max(0.0));
            }
        }
    }
}

#[test]
fn test_degenerate_volatility_is_discounted_intrinsic() {
    for spot in SPOTS {
        for strike in STRIKES {
            for rate in RATES {
                for time in TIMES {
                    let discount = (-rate * time).exp();
                    for vol in [0.0, 5e-7, 1e-6] {
                        let call = price(spot, strike, time, rate, vol, OptionSide::Call);
                        let put = price(spot, strike, time, rate, vol, OptionSide::Put);
                        assert!((call - (spot - strike * discount).max(0.0)).abs() < 1e-9);
                        assert!((put - (strike * discount - spot).max(0.0)).abs() < 1e-9);
                    }
                }
            }
        }
    }
}

#[test]
fn test_put_call_parity() {
    for spot in SPOTS {
        for strike in STRIKES {
            for rate in RATES {
                for time in TIMES {
                    for vol in [0.05, 0.2, 0.6, 1.5] {
                        let call = price(spot, strike, time, rate, vol, OptionSide::Call);
                        let put = price(spot, strike, time, rate, vol, OptionSide::Put);
                        let forward_gap = spot - strike * (-rate * time).exp();
                        assert!(
                            (call - put - forward_gap).abs() < 1e-6,
                            "parity broken at S={spot} K={strike} r={rate} T={time} σ={vol}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_round_trip_calibration() {
    for spot in [80.0, 100.0, 125.0] {
        for strike in [90.0, 100.0, 110.0] {
            for time in [0.25, 1.0, 2.0] {
                for side in SIDES {
                    for vol in [0.01, 0.1, 0.3, 0.8, 1.5, 3.0] {
                        let contract = OptionContract::new(spot, strike, time, 0.04, side).unwrap();
                        let premium = contract.price(vol);
                        // Skip quotes whose time value is lost to rounding.
                        if premium - contract.discounted_intrinsic_value() < 1e-7 {
                            continue;
                        }
                        let iv = implied_volatility(premium, spot, strike, time, 0.04, side)
                            .unwrap_or_else(|err| {
                                panic!("no IV for S={spot} K={strike} T={time} {side} σ={vol}: {err}")
                            });
                        assert!(
                            (iv - vol).abs() < 1e-4,
                            "S={spot} K={strike} T={time} {side} σ={vol} recovered {iv}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_quote_below_zero_volatility_floor_is_undefined() {
    for (spot, strike) in [(120.0_f64, 100.0_f64), (100.0, 100.0), (100.0, 60.0)] {
        let rate: f64 = 0.05;
        let time: f64 = 0.5;
        let floor = (spot - strike * (-rate * time).exp()).max(0.0);
        if floor <= 0.0 {
            continue;
        }
        let err = implied_volatility(floor * 0.9, spot, strike, time, rate, OptionSide::Call)
            .unwrap_err();
        assert!(matches!(err, OptionLabError::NoRootInBracket { .. }));
        assert!(err.is_recoverable());
    }
}

#[test]
fn test_delta_bounds() {
    for spot in SPOTS {
        for strike in STRIKES {
            for time in [0.0, 0.01, 0.5, 3.0] {
                for vol in [0.0, 0.05, 0.3, 2.0] {
                    let call = greeks(spot, strike, time, 0.03, vol, OptionSide::Call);
                    let put = greeks(spot, strike, time, 0.03, vol, OptionSide::Put);
                    assert!((0.0..=1.0).contains(&call.delta), "call delta {}", call.delta);
                    assert!((-1.0..=0.0).contains(&put.delta), "put delta {}", put.delta);
                }
            }
        }
    }
}

#[test]
fn test_textbook_scenario() {
    let side: OptionSide = "call".parse().unwrap();
    let value = price(100.0, 100.0, 1.0, 0.05, 0.2, side);
    assert!((value - 10.4506).abs() < 1e-3);

    let result = greeks(100.0, 100.0, 1.0, 0.05, 0.2, side);
    assert!((result.delta - 0.6368).abs() < 1e-4);
    assert!((result.gamma - 0.01876).abs() < 1e-5);
    assert!((result.vega - 0.3752).abs() < 1e-4);
    assert!((result.theta_per_day + 0.01757).abs() < 1e-5);
}

#[test]
fn test_invalid_side_is_rejected() {
    let err = "straddle".parse::<OptionSide>().unwrap_err();
    assert!(matches!(err, OptionLabError::InvalidArgument { .. }));
    assert!(err.to_string().contains("side"));
}

#[test]
fn test_solver_methods_agree() {
    let contract = OptionContract::put(100.0, 110.0, 0.75, 0.02).unwrap();
    let premium = contract.price(0.45);

    let brent = solve_iv(&contract, premium, &SolverConfig::default()).unwrap();
    let bisection = solve_iv(
        &contract,
        premium,
        &SolverConfig::new().with_method(RootFinder::Bisection),
    )
    .unwrap();

    assert!((brent.iv - 0.45).abs() < 1e-8);
    assert!((bisection.iv - 0.45).abs() < 1e-8);
    assert_eq!(brent.price_used, premium);
}

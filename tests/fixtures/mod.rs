#![allow(dead_code)]

use quantedge_delta::{Ohlcv, Price, Timestamp};
use serde::{Deserialize, de::DeserializeOwned};

/// OHLCV bar parsed from the reference CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(skip_deserializing, default = "closed")]
    pub closed: bool,
}

fn closed() -> bool {
    true
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Reference buy/sell/delta triple with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefDelta {
    pub open_time: u64,
    pub buy: f64,
    pub sell: f64,
    pub delta: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/ethusdt-1h.csv";

/// Load reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load buy/sell/delta reference data (SVD, CVD).
pub fn load_ref_deltas(path: &str) -> Vec<RefDelta> {
    load_records(path, "invalid reference record")
}

/// Assert two f64 values are within tolerance. NaN only matches NaN.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "{context}: expected NaN, got {actual:.10}");
        return;
    }

    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Creates forming versions of a bar to simulate live repaints.
///
/// Returns 2 forming bars (with shifted close/high/low and partial volume)
/// followed by the original, closed bar. All share the same `open_time`.
pub fn repaint_sequence(bar: &RefBar) -> Vec<RefBar> {
    let t = bar.open_time;
    vec![
        // First tick: only open is known, close near open
        RefBar {
            open: bar.open,
            high: bar.open * 1.001,
            low: bar.open * 0.999,
            close: bar.open * 1.0005,
            volume: bar.volume * 0.1,
            open_time: t,
            closed: false,
        },
        // Mid-bar: partial movement toward final values
        RefBar {
            open: bar.open,
            high: bar.open.midpoint(bar.high),
            low: bar.open.midpoint(bar.low),
            close: bar.open.midpoint(bar.close),
            volume: bar.volume * 0.5,
            open_time: t,
            closed: false,
        },
        // Final: real OHLCV values
        RefBar {
            closed: true,
            ..bar.clone()
        },
    ]
}

/// Assert buy/sell pairs match between closed and repainted indicators.
pub fn assert_values_match(
    bar_idx: usize,
    closed: Option<(f64, f64)>,
    repainted: Option<(f64, f64)>,
    tolerance: f64,
) {
    match (closed, repainted) {
        (None, None) => {} // both warming up, fine
        (Some((cb, cs)), Some((rb, rs))) => {
            for (side, c, r) in [("buy", cb, rb), ("sell", cs, rs)] {
                assert_near(r, c, tolerance, &format!("{side} diverged at bar {bar_idx}"));
            }
        }
        (c, r) => {
            panic!("warm-up mismatch at bar {bar_idx}: closed={c:?}, repainted={r:?}");
        }
    }
}

/// Generate reference match + repaint tests for a cumulative config.
///
/// Usage: `reference_test!(cvd_14_ema, CvdConfig::ema(nz(14)), "tests/fixtures/data/cvd-14-ema.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            #[allow(unused_imports)]
            use quantedge_delta::{
                CumulationMode, Cvd, CvdConfig, CvdValue, IndicatorConfig,
                IndicatorConfigBuilder,
            };
            use std::num::NonZero;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            fn sides(value: Option<CvdValue>) -> Option<(f64, f64)> {
                value.map(|v| (v.cumulative_buy(), v.cumulative_sell()))
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_deltas($ref_path);
                let config: CvdConfig = $config;
                let mut ind = Cvd::new(config);

                let mut ref_idx = 0;
                for bar in &bars {
                    ind.compute(bar);

                    if ref_idx < reference.len()
                        && bar.open_time == reference[ref_idx].open_time
                    {
                        let value = ind.value().unwrap_or_else(|| {
                            panic!("{} returned None at t={}", stringify!($name), bar.open_time)
                        });
                        let expected = &reference[ref_idx];
                        let context = format!(
                            "{} at bar {ref_idx} (t={})",
                            stringify!($name),
                            bar.open_time
                        );
                        assert_near(value.cumulative_buy(), expected.buy, $tolerance, &context);
                        assert_near(value.cumulative_sell(), expected.sell, $tolerance, &context);
                        assert_near(
                            value.cumulative_delta(),
                            expected.delta,
                            $tolerance,
                            &context,
                        );
                        ref_idx += 1;
                    } else {
                        assert!(
                            ind.value().is_none(),
                            "{} produced a value during warm-up at t={}",
                            stringify!($name),
                            bar.open_time
                        );
                    }
                }

                assert_eq!(
                    ref_idx,
                    reference.len(),
                    "not all reference values checked: {ref_idx}/{}",
                    reference.len()
                );
                assert_eq!(reference.len(), bars.len() + 1 - config.required_bars());
            }

            #[test]
            fn repaint_matches_closed() {
                let bars = load_reference_ohlcvs();
                let config: CvdConfig = $config;
                let mut closed = Cvd::new(config);
                let mut repainted = Cvd::new(config);

                for (i, bar) in bars.iter().enumerate() {
                    closed.compute(bar);
                    for tick in repaint_sequence(bar) {
                        repainted.compute(&tick);
                    }
                    assert_values_match(
                        i,
                        sides(closed.value()),
                        sides(repainted.value()),
                        $tolerance,
                    );
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}

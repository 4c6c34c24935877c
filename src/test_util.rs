// src/test_util.rs

use crate::{Ohlcv, Price, Timestamp};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_time: u64,
    pub closed: bool,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: 0.0,
            open_time: 0,
            closed: true,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn at(mut self, open_time: u64) -> Self {
        self.open_time = open_time;
        self
    }

    /// Marks the bar as still forming.
    pub fn forming(mut self) -> Self {
        self.closed = false;
        self
    }
}

/// Full-body bullish bar: the whole volume is buy volume.
pub fn bull(volume: f64, time: u64) -> Bar {
    Bar::new(10.0, 20.0, 10.0, 20.0).with_volume(volume).at(time)
}

/// Full-body bearish bar: the whole volume is sell volume.
pub fn bear(volume: f64, time: u64) -> Bar {
    Bar::new(20.0, 20.0, 10.0, 10.0).with_volume(volume).at(time)
}

/// Flat bar with symmetric wicks: volume splits evenly.
pub fn even(volume: f64, time: u64) -> Bar {
    Bar::new(15.0, 20.0, 10.0, 15.0).with_volume(volume).at(time)
}

/// Zero-range bar: every estimate is NaN.
pub fn flat(volume: f64, time: u64) -> Bar {
    Bar::new(10.0, 10.0, 10.0, 10.0).with_volume(volume).at(time)
}

impl Ohlcv for Bar {
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

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Direction, Ohlcv, Price};

/// Geometry of a single candle, expressed as shares of its high-low range.
///
/// A candle is bullish only when `open < close`. A flat candle
/// (`open == close`) is treated as bearish, so its (empty) body is
/// attributed to the sell side.
///
/// ```text
///        high ┬          upper wick
///             │
///   max(o, c) ┼──┐
///             │  │       body
///   min(o, c) ┼──┘
///             │          lower wick
///         low ┴
/// ```
///
/// The three percentages sum to `1.0` for any bar with `high > low`. A
/// zero-range bar makes every percentage NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeometry {
    bullish: bool,
    spread: Price,
    upper_wick: Price,
    lower_wick: Price,
    body: Price,
}

impl CandleGeometry {
    /// Measures the candle.
    #[must_use]
    pub fn of(ohlcv: &impl Ohlcv) -> Self {
        let (open, high, low, close) = (ohlcv.open(), ohlcv.high(), ohlcv.low(), ohlcv.close());

        let bullish = open < close;
        let spread = high - low;

        let (upper_wick, lower_wick) = if bullish {
            (high - close, open - low)
        } else {
            (high - open, close - low)
        };

        Self {
            bullish,
            spread,
            upper_wick,
            lower_wick,
            body: spread - (upper_wick + lower_wick),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.bullish
    }

    /// `high − low`.
    #[inline]
    #[must_use]
    pub fn spread(&self) -> Price {
        self.spread
    }

    #[inline]
    #[must_use]
    pub fn upper_wick(&self) -> Price {
        self.upper_wick
    }

    #[inline]
    #[must_use]
    pub fn lower_wick(&self) -> Price {
        self.lower_wick
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> Price {
        self.body
    }

    #[inline]
    #[must_use]
    pub fn upper_wick_percent(&self) -> f64 {
        self.upper_wick / self.spread
    }

    #[inline]
    #[must_use]
    pub fn lower_wick_percent(&self) -> f64 {
        self.lower_wick / self.spread
    }

    #[inline]
    #[must_use]
    pub fn body_percent(&self) -> f64 {
        self.body / self.spread
    }

    /// Average of both wick shares. Wicks are contested ground, so each side
    /// gets half.
    #[inline]
    #[must_use]
    pub fn wicks_effective_percent(&self) -> f64 {
        (self.upper_wick_percent() + self.lower_wick_percent()) / 2.0
    }

    /// Share of volume attributed to buyers: half the wicks, plus the whole
    /// body on a bullish candle.
    #[inline]
    #[must_use]
    pub fn buy_percent(&self) -> f64 {
        self.wicks_effective_percent() + if self.bullish { self.body_percent() } else { 0.0 }
    }

    /// Share of volume attributed to sellers: half the wicks, plus the whole
    /// body on a bearish candle.
    #[inline]
    #[must_use]
    pub fn sell_percent(&self) -> f64 {
        self.wicks_effective_percent() + if self.bullish { 0.0 } else { self.body_percent() }
    }
}

/// Estimated buy and sell volume of a single bar.
///
/// Both sides are non-negative magnitudes. Their sum equals the bar volume,
/// except for a zero-range bar (`high == low`) where both are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeltaSample {
    buy: f64,
    sell: f64,
}

impl DeltaSample {
    #[must_use]
    pub const fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }

    /// Splits the bar volume between buyers and sellers from the candle
    /// geometry alone.
    ///
    /// # Example
    ///
    /// ```
    /// use quantedge_delta::DeltaSample;
    /// # use quantedge_delta::{Ohlcv, Price, Timestamp};
    /// #
    /// # struct Bar(f64, f64, f64, f64, f64);
    /// # impl Ohlcv for Bar {
    /// #     fn open(&self) -> Price { self.0 }
    /// #     fn high(&self) -> Price { self.1 }
    /// #     fn low(&self) -> Price { self.2 }
    /// #     fn close(&self) -> Price { self.3 }
    /// #     fn volume(&self) -> f64 { self.4 }
    /// #     fn open_time(&self) -> Timestamp { 0 }
    /// # }
    ///
    /// // open 10, high 13, low 9, close 12, volume 100
    /// let sample = DeltaSample::estimate(&Bar(10.0, 13.0, 9.0, 12.0, 100.0));
    ///
    /// assert_eq!(sample.buy(), 75.0);
    /// assert_eq!(sample.sell(), 25.0);
    /// assert_eq!(sample.delta(), 50.0);
    /// ```
    #[must_use]
    pub fn estimate(ohlcv: &impl Ohlcv) -> Self {
        let geometry = CandleGeometry::of(ohlcv);
        let volume = ohlcv.volume();

        Self {
            buy: volume * geometry.buy_percent(),
            sell: volume * geometry.sell_percent(),
        }
    }

    /// Estimated buy volume.
    #[inline]
    #[must_use]
    pub fn buy(&self) -> f64 {
        self.buy
    }

    /// Estimated sell volume, as a positive magnitude.
    #[inline]
    #[must_use]
    pub fn sell(&self) -> f64 {
        self.sell
    }

    /// `buy − sell`.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.buy - self.sell
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::of(self.delta())
    }

    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.direction().is_bullish()
    }

    /// `true` when the sample came from a zero-range bar and carries NaN.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.buy.is_nan() || self.sell.is_nan()
    }
}

impl Display for DeltaSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Delta(b: {}, s: {}, d: {})",
            self.buy,
            self.sell,
            self.delta()
        )
    }
}

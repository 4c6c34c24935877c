use std::{fmt::Display, num::NonZero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    ConfigError, CumulationConfig, CumulationMode, DeltaSample, Direction, HistoryBuffer,
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Side, Style, Timestamp,
    cumulation::CumulationConfigBuilder,
};

/// Configuration for the Cumulative Volume Delta ([`Cvd`]) indicator.
///
/// Wraps a [`CumulationConfig`], the history retention, and the
/// presentation [`Style`].
///
/// By default every bar is kept, so [`Cvd::reconfigure`] can switch to any
/// window length and recompute from history. A retention limit bounds
/// memory; the effective limit is never below the window length.
///
/// # Example
///
/// ```
/// use quantedge_delta::{CumulationMode, CvdConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = CvdConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .mode(CumulationMode::Sma)
///     .scale_factor(0.5)
///     .retention(NonZero::new(500).unwrap())
///     .build();
///
/// assert_eq!(config.required_bars(), 20);
/// assert_eq!(config.cumulation().scale_factor().value(), 0.5);
/// assert_eq!(config.retention().map(NonZero::get), Some(500));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct CvdConfig {
    cumulation: CumulationConfig,
    retention: Option<NonZero<usize>>,
    style: Style,
}

impl IndicatorConfig for CvdConfig {
    type Builder = CvdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        CvdConfigBuilder::new()
    }

    #[inline]
    fn required_bars(&self) -> usize {
        self.cumulation.length()
    }

    #[inline]
    fn style(&self) -> &Style {
        &self.style
    }
}

impl CvdConfig {
    #[inline]
    #[must_use]
    pub fn cumulation(&self) -> &CumulationConfig {
        &self.cumulation
    }

    /// Requested history retention, `None` to keep every bar.
    #[inline]
    #[must_use]
    pub fn retention(&self) -> Option<NonZero<usize>> {
        self.retention
    }

    /// Retention applied to the history: at least the window length.
    #[inline]
    fn history_limit(&self) -> Option<NonZero<usize>> {
        self.retention
            .map(|retention| retention.max(self.cumulation.window()))
    }

    /// Normalized EMA cumulation over `length` bars.
    #[must_use]
    pub fn ema(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// Normalized SMA cumulation over `length` bars.
    #[must_use]
    pub fn sma(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .mode(CumulationMode::Sma)
            .build()
    }
}

impl Default for CvdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for CvdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CvdConfig({}", self.cumulation)?;
        if let Some(retention) = self.retention {
            write!(f, ", retention: {retention}")?;
        }
        write!(f, ")")
    }
}

/// Builder for [`CvdConfig`].
///
/// Defaults: the [`CumulationConfig`] defaults (length 14, EMA, normalized),
/// unbounded retention, and style = [`Style::CUMULATIVE`].
pub struct CvdConfigBuilder {
    cumulation: CumulationConfigBuilder,
    retention: Option<NonZero<usize>>,
    style: Style,
}

impl CvdConfigBuilder {
    fn new() -> Self {
        Self {
            cumulation: CumulationConfig::builder(),
            retention: None,
            style: Style::CUMULATIVE,
        }
    }

    /// Sets the cumulation window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.cumulation = self.cumulation.length(length);
        self
    }

    #[inline]
    #[must_use]
    pub fn mode(mut self, mode: CumulationMode) -> Self {
        self.cumulation = self.cumulation.mode(mode);
        self
    }

    #[inline]
    #[must_use]
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.cumulation = self.cumulation.normalize(normalize);
        self
    }

    #[inline]
    #[must_use]
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.cumulation = self.cumulation.scale_factor(scale_factor);
        self
    }

    #[inline]
    #[must_use]
    pub fn ema_smoothing(mut self, smoothing: f64) -> Self {
        self.cumulation = self.cumulation.ema_smoothing(smoothing);
        self
    }

    /// Caps the number of bars kept in history. Reconfiguring to a window
    /// longer than the bars kept waits for new bars.
    #[inline]
    #[must_use]
    pub fn retention(mut self, retention: NonZero<usize>) -> Self {
        self.retention = Some(retention);
        self
    }
}

impl IndicatorConfigBuilder<CvdConfig> for CvdConfigBuilder {
    #[inline]
    fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[inline]
    fn try_build(self) -> Result<CvdConfig, ConfigError> {
        Ok(CvdConfig {
            cumulation: self.cumulation.try_build()?,
            retention: self.retention,
            style: self.style,
        })
    }
}

/// Cumulative volume delta output.
///
/// Carries the raw estimate of the current bar together with the
/// cumulated buy and sell volume. Both cumulations are positive magnitudes;
/// the sign is applied only in [`cumulative_delta`](Self::cumulative_delta).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CvdValue {
    sample: DeltaSample,
    buy: f64,
    sell: f64,
}

impl CvdValue {
    /// Estimate of the current bar alone.
    #[inline]
    #[must_use]
    pub fn sample(&self) -> DeltaSample {
        self.sample
    }

    #[inline]
    #[must_use]
    pub fn cumulative_buy(&self) -> f64 {
        self.buy
    }

    #[inline]
    #[must_use]
    pub fn cumulative_sell(&self) -> f64 {
        self.sell
    }

    /// `cumulative_buy − cumulative_sell`.
    #[inline]
    #[must_use]
    pub fn cumulative_delta(&self) -> f64 {
        self.buy - self.sell
    }

    /// Direction of the cumulative delta. The raw bar keeps its own
    /// classification in [`sample`](Self::sample).
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::of(self.cumulative_delta())
    }

    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.direction().is_bullish()
    }
}

impl Display for CvdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CVD(b: {}, s: {}, d: {})",
            self.buy,
            self.sell,
            self.cumulative_delta()
        )
    }
}

/// Cumulative Volume Delta (CVD).
///
/// Estimates buy and sell volume per bar (see [`DeltaSample::estimate`]),
/// keeps the estimates in history, and smooths each side over the last
/// `length` of them with an SMA or EMA. Returns `None` until `length` bars are in history.
///
/// The whole window is re-aggregated on every update rather than patched
/// incrementally, so a repaint, a new bar, or a
/// [`reconfigure`](Cvd::reconfigure) all produce the same value a fresh pass
/// over the history would.
///
/// Supports live repainting: a bar fed after an update whose
/// [`is_closed`](Ohlcv::is_closed) was `false` replaces the current bar
/// instead of advancing the window.
///
/// A zero-range bar (`high == low`) yields NaN for every cumulation whose
/// window contains it. It leaves the window after `length` more bars.
///
/// # Example
///
/// ```
/// use quantedge_delta::{Cvd, CvdConfig};
/// use std::num::NonZero;
/// # use quantedge_delta::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, f64, f64, f64, f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.1 }
/// #     fn low(&self) -> Price { self.2 }
/// #     fn close(&self) -> Price { self.3 }
/// #     fn volume(&self) -> f64 { self.4 }
/// #     fn open_time(&self) -> Timestamp { self.5 }
/// # }
///
/// let mut cvd = Cvd::new(CvdConfig::sma(NonZero::new(2).unwrap()));
///
/// // Full-body bull bar: all buy volume.
/// assert!(cvd.compute(&Bar(10.0, 20.0, 10.0, 20.0, 100.0, 1)).is_none());
///
/// // Full-body bear bar: all sell volume.
/// let value = cvd.compute(&Bar(20.0, 20.0, 10.0, 10.0, 40.0, 2)).unwrap();
///
/// // Normalized SMA(2): mean × 2 = sum.
/// assert_eq!(value.cumulative_buy(), 100.0);
/// assert_eq!(value.cumulative_sell(), 40.0);
/// assert_eq!(value.cumulative_delta(), 60.0);
/// assert!(value.is_bullish());
/// ```
#[derive(Clone, Debug)]
pub struct Cvd {
    config: CvdConfig,
    history: HistoryBuffer,
    last_open_time: Option<Timestamp>,
    current: Option<CvdValue>,
}

impl Cvd {
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CvdConfig {
        &self.config
    }

    /// Estimate of the most recent bar, available during warm-up too.
    #[inline]
    #[must_use]
    pub fn last_sample(&self) -> Option<DeltaSample> {
        self.history.get(0).copied()
    }

    /// Replaces the configuration and recomputes the current value from the
    /// stored history.
    ///
    /// The result equals a fresh indicator fed the same bars, as long as
    /// the history still holds `length` of them. Lowering the retention
    /// drops the oldest samples for good.
    pub fn reconfigure(&mut self, config: CvdConfig) {
        if config == self.config {
            return;
        }

        debug!(from = %self.config, to = %config, "reconfiguring CVD from history");

        self.history.set_retention(config.history_limit());
        self.config = config;
        self.current = self.last_sample().and_then(|sample| self.cumulate(sample));
    }

    #[inline]
    fn cumulate(&self, sample: DeltaSample) -> Option<CvdValue> {
        let cumulation = &self.config.cumulation;

        Some(CvdValue {
            sample,
            buy: cumulation.cumulate(&self.history, Side::Buy)?,
            sell: cumulation.cumulate(&self.history, Side::Sell)?,
        })
    }
}

impl Indicator for Cvd {
    type Config = CvdConfig;
    type Output = CvdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            history: HistoryBuffer::new(config.history_limit()),
            last_open_time: None,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<CvdValue> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t <= kline.open_time()),
            "open_time must be non-decreasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            kline.open_time(),
        );
        self.last_open_time = Some(kline.open_time());

        let sample = DeltaSample::estimate(kline);
        if sample.is_degenerate() {
            debug!(open_time = kline.open_time(), "zero-range bar, delta undefined");
        }

        if self.history.update(sample, kline.is_closed()) {
            trace!(
                open_time = kline.open_time(),
                stored = self.history.len(),
                "bar appended"
            );
        }

        self.current = self.cumulate(sample);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<CvdValue> {
        self.current
    }
}

impl Display for Cvd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CVD({}, {})",
            self.config.cumulation.length(),
            self.config.cumulation.mode()
        )
    }
}

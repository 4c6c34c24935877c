use std::fmt::Display;

use tracing::debug;

use crate::{
    ConfigError, DeltaSample, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Style,
};

/// Configuration for the Single Volume Delta ([`Svd`]) indicator.
///
/// The estimator has no parameters; the config only carries the
/// presentation [`Style`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub struct SvdConfig {
    style: Style,
}

impl IndicatorConfig for SvdConfig {
    type Builder = SvdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SvdConfigBuilder::new()
    }

    #[inline]
    fn required_bars(&self) -> usize {
        1
    }

    #[inline]
    fn style(&self) -> &Style {
        &self.style
    }
}

impl Display for SvdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SvdConfig")
    }
}

/// Builder for [`SvdConfig`].
///
/// Defaults: style = [`Style::SINGLE`].
pub struct SvdConfigBuilder {
    style: Style,
}

impl SvdConfigBuilder {
    fn new() -> Self {
        Self {
            style: Style::SINGLE,
        }
    }
}

impl IndicatorConfigBuilder<SvdConfig> for SvdConfigBuilder {
    #[inline]
    fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[inline]
    fn try_build(self) -> Result<SvdConfig, ConfigError> {
        Ok(SvdConfig { style: self.style })
    }
}

/// Single Volume Delta (SVD).
///
/// Splits each bar's volume into estimated buy and sell volume from the
/// candle geometry (see [`DeltaSample::estimate`]). The output is available
/// from the first bar.
///
/// Repainting a forming bar simply re-estimates it; there is no history to
/// maintain.
///
/// # Example
///
/// ```
/// use quantedge_delta::{Svd, SvdConfig};
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
/// let mut svd = Svd::new(SvdConfig::default());
///
/// let sample = svd.compute(&Bar(10.0, 13.0, 9.0, 12.0, 100.0)).unwrap();
/// assert_eq!(sample.delta(), 50.0);
/// assert!(sample.is_bullish());
/// ```
#[derive(Clone, Debug)]
pub struct Svd {
    config: SvdConfig,
    current: Option<DeltaSample>,
}

impl Svd {
    /// Presentation settings this indicator was configured with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SvdConfig {
        &self.config
    }
}

impl Indicator for Svd {
    type Config = SvdConfig;
    type Output = DeltaSample;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<DeltaSample> {
        let sample = DeltaSample::estimate(kline);
        if sample.is_degenerate() {
            debug!(open_time = kline.open_time(), "zero-range bar, delta undefined");
        }

        self.current = Some(sample);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<DeltaSample> {
        self.current
    }
}

impl Display for Svd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SVD")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, bear, bull, flat};

    fn svd() -> Svd {
        Svd::new(SvdConfig::default())
    }

    mod compute {
        use super::*;

        #[test]
        fn value_from_first_bar() {
            let mut svd = svd();
            let s = svd
                .compute(&Bar::new(10.0, 13.0, 9.0, 12.0).with_volume(100.0))
                .unwrap();
            assert_eq!(s.buy(), 75.0);
            assert_eq!(s.sell(), 25.0);
            assert_eq!(s.delta(), 50.0);
        }

        #[test]
        fn each_bar_is_independent() {
            let mut svd = svd();
            svd.compute(&bull(100.0, 1));
            let s = svd.compute(&bear(40.0, 2)).unwrap();
            assert_eq!(s.delta(), -40.0);
        }

        #[test]
        fn degenerate_bar_is_nan_not_error() {
            let mut svd = svd();
            let s = svd.compute(&flat(100.0, 1)).unwrap();
            assert!(s.delta().is_nan());
            // Recovers on the next bar.
            assert_eq!(svd.compute(&bull(10.0, 2)).unwrap().delta(), 10.0);
        }
    }

    mod repaint {
        use super::*;

        #[test]
        fn forming_bar_is_re_estimated() {
            let mut svd = svd();
            svd.compute(&bull(100.0, 1).forming());
            let s = svd.compute(&bear(100.0, 1)).unwrap();
            assert_eq!(s.delta(), -100.0);
        }

        #[test]
        fn identical_snapshot_is_idempotent() {
            let mut svd = svd();
            let bar = Bar::new(10.0, 13.0, 9.0, 12.0).with_volume(100.0).forming();
            let first = svd.compute(&bar);
            assert_eq!(svd.compute(&bar), first);
            assert_eq!(svd.compute(&bar), first);
        }
    }

    mod value_accessor {
        use super::*;

        #[test]
        fn none_before_first_bar() {
            assert_eq!(svd().value(), None);
        }

        #[test]
        fn matches_last_compute() {
            let mut svd = svd();
            let computed = svd.compute(&bull(5.0, 1));
            assert_eq!(svd.value(), computed);
        }
    }

    mod config {
        use super::*;

        #[test]
        fn default_style_is_single() {
            assert_eq!(*SvdConfig::default().style(), Style::SINGLE);
        }

        #[test]
        fn builder_default_matches_default() {
            assert_eq!(SvdConfig::builder().build(), SvdConfig::default());
        }

        #[test]
        fn style_is_passed_through() {
            let style = Style {
                render_buy_sell: false,
                ..Style::SINGLE
            };
            let svd = Svd::new(SvdConfig::builder().style(style).build());
            assert_eq!(svd.config().style(), &style);
        }

        #[test]
        fn needs_one_bar() {
            assert_eq!(SvdConfig::default().required_bars(), 1);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(svd().to_string(), "SVD");
            assert_eq!(SvdConfig::default().to_string(), "SvdConfig");
        }
    }
}

use crate::{ConfigError, Ohlcv, Style};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a volume delta [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its
/// parameters and the presentational [`Style`] forwarded to the renderer.
/// Configs are value types: cheap to clone, compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Number of bars that must be in history before the indicator produces
    /// a value.
    fn required_bars(&self) -> usize;

    /// Presentation settings. Never read by the computation.
    fn style(&self) -> &Style;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>: Sized
where
    Config: IndicatorConfig,
{
    /// Sets the presentation settings.
    #[must_use]
    fn style(self, style: Style) -> Self;

    /// Builds the config, rejecting invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid parameter.
    fn try_build(self) -> Result<Config, ConfigError>;

    /// Builds the config. Panics if a parameter is invalid.
    #[must_use]
    fn build(self) -> Config {
        match self.try_build() {
            Ok(config) => config,
            Err(e) => panic!("{e}"),
        }
    }
}

/// A streaming volume delta indicator.
///
/// Indicators maintain internal state and update incrementally on each call
/// to [`compute`](Indicator::compute). Output is `None` until enough bars
/// have been received.
///
/// # Example
///
/// ```
/// use quantedge_delta::{Cvd, CvdConfig, Indicator};
/// use std::num::NonZero;
/// # use quantedge_delta::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { 10.0 }
/// #     fn high(&self) -> Price { 20.0 }
/// #     fn low(&self) -> Price { 10.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn volume(&self) -> f64 { self.1 }
/// #     fn open_time(&self) -> Timestamp { self.2 }
/// # }
///
/// let mut cvd = Cvd::new(CvdConfig::sma(NonZero::new(2).unwrap()));
///
/// assert!(cvd.compute(&Bar(20.0, 100.0, 1)).is_none());
/// assert!(cvd.compute(&Bar(20.0, 100.0, 2)).is_some());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type.
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds a bar and returns the updated indicator value,
    /// or `None` if not enough bars have been seen yet.
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<Self::Output>;

    /// Returns the last computed indicator value without advancing state,
    /// or `None` if not yet available.
    ///
    /// This is a cached field read: O(1) with no computation.
    fn value(&self) -> Option<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CvdConfig, SvdConfig};

    fn built_with_defaults<C: IndicatorConfig>() -> C {
        C::builder().build()
    }

    fn styled<C: IndicatorConfig>(style: Style) -> C {
        C::builder().style(style).build()
    }

    #[test]
    fn generic_build_matches_default() {
        assert_eq!(built_with_defaults::<SvdConfig>(), SvdConfig::default());
        assert_eq!(built_with_defaults::<CvdConfig>(), CvdConfig::default());
    }

    #[test]
    fn generic_style_is_kept() {
        let style = Style {
            render_buy_sell: false,
            ..Style::CUMULATIVE
        };
        assert_eq!(*styled::<CvdConfig>(style).style(), style);
        assert_eq!(*styled::<SvdConfig>(style).style(), style);
    }
}

//! Streaming buy/sell volume delta estimation for Rust.
//!
//! Volume is split into estimated buy and sell volume from bar geometry
//! alone (wicks are shared, the body goes to the candle's side), with no
//! tick or order-flow data. The cumulative variant smooths each side over a
//! window with an SMA or EMA.
//!
//! Indicators accept any type implementing [`Ohlcv`] and return typed
//! results. Values are `None` until enough bars have been received.
//!
//! Each indicator type ([`Svd`], [`Cvd`]) exposes [`new`](Cvd::new),
//! [`compute`](Cvd::compute), and [`value`](Cvd::value) as inherent
//! methods, no trait import needed. Import [`Indicator`] only for generic
//! code.

mod cumulation;
mod cvd;
mod error;
mod history;
mod indicator;
mod ohlcv;
mod sample;
mod style;
mod svd;

pub use crate::error::ConfigError;
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price, Timestamp};
pub use crate::style::{Direction, Rgba, Style};

pub use crate::cumulation::{
    CumulationConfig, CumulationConfigBuilder, CumulationMode, ScaleFactor, Smoothing, ema, sma,
};
pub use crate::cvd::{Cvd, CvdConfig, CvdConfigBuilder, CvdValue};
pub use crate::history::{HistoryBuffer, Side};
pub use crate::sample::{CandleGeometry, DeltaSample};
pub use crate::svd::{Svd, SvdConfig, SvdConfigBuilder};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, kline: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, kline)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Svd, SvdConfig, DeltaSample);
impl_indicator_methods!(Cvd, CvdConfig, CvdValue);

#[cfg(test)]
mod test_util;

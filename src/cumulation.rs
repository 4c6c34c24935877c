use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, HistoryBuffer, Side};

/// Smoothing applied over the cumulation window.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CumulationMode {
    /// Unweighted mean of the window.
    Sma,
    /// Exponentially weighted mean of the window, recomputed from the
    /// oldest sample on every update.
    #[default]
    Ema,
}

impl Display for CumulationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// EMA smoothing numerator: `k = smoothing / (length + 1)`.
///
/// Wraps a finite, positive `f64`. Defaults to `2.0`, the conventional
/// EMA weight.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Smoothing(f64);

impl Smoothing {
    /// # Panics
    ///
    /// Panics if `value` is not finite or not positive.
    #[must_use]
    pub fn new(value: f64) -> Self {
        match Self::try_new(value) {
            Ok(smoothing) => smoothing,
            Err(e) => panic!("{e}"),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSmoothing`] if `value` is not finite or
    /// not positive.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidSmoothing(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Smoothing {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Smoothing {}

impl Hash for Smoothing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Final multiplier applied to a cumulation, for visual scaling next to
/// other plots.
///
/// Wraps a finite `f64`. Defaults to `1.0`.
#[derive(Clone, Copy, Debug)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// # Panics
    ///
    /// Panics if `value` is not finite.
    #[must_use]
    pub fn new(value: f64) -> Self {
        match Self::try_new(value) {
            Ok(scale) => scale,
            Err(e) => panic!("{e}"),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidScaleFactor`] if `value` is not finite.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidScaleFactor(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for ScaleFactor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for ScaleFactor {}

impl Hash for ScaleFactor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

const DEFAULT_LENGTH: NonZero<usize> = NonZero::new(14).unwrap();

/// How buy and sell history is aggregated into cumulative values.
///
/// Defaults: length 14, [`CumulationMode::Ema`], normalization on, scale
/// factor 1.0, EMA smoothing 2.0.
///
/// # Normalization
///
/// Averages are much smaller than single large bars. With `normalize`
/// enabled the average is multiplied by `length`, giving a sum-sized result
/// with the same profile.
///
/// # Example
///
/// ```
/// use quantedge_delta::{CumulationConfig, CumulationMode};
/// use std::num::NonZero;
///
/// let config = CumulationConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .mode(CumulationMode::Sma)
///     .normalize(false)
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.multiplier(), 1.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct CumulationConfig {
    length: NonZero<usize>,
    mode: CumulationMode,
    normalize: bool,
    scale_factor: ScaleFactor,
    smoothing: Smoothing,
}

impl CumulationConfig {
    /// Returns a new builder with default values.
    #[must_use]
    pub fn builder() -> CumulationConfigBuilder {
        CumulationConfigBuilder::new()
    }

    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    #[inline]
    pub(crate) fn window(&self) -> NonZero<usize> {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> CumulationMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    #[inline]
    #[must_use]
    pub fn scale_factor(&self) -> ScaleFactor {
        self.scale_factor
    }

    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// `length` when normalizing, `1` otherwise.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn multiplier(&self) -> f64 {
        if self.normalize {
            self.length.get() as f64
        } else {
            1.0
        }
    }

    /// Aggregates one side of the history over the configured window.
    ///
    /// Returns `None` while fewer than `length` samples are stored. A NaN
    /// sample anywhere in the window yields `Some(NaN)`.
    #[must_use]
    pub fn cumulate(&self, history: &HistoryBuffer, side: Side) -> Option<f64> {
        let series = |offset| history.value(side, offset);

        let average = match self.mode {
            CumulationMode::Sma => sma(series, self.length.get()),
            CumulationMode::Ema => ema(series, self.length.get(), self.smoothing.0),
        }?;

        Some(average * self.multiplier() * self.scale_factor.0)
    }
}

impl Default for CumulationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for CumulationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, normalize: {}, scale: {}, smoothing: {}",
            self.length, self.mode, self.normalize, self.scale_factor.0, self.smoothing.0
        )
    }
}

/// Builder for [`CumulationConfig`].
///
/// Starts from the defaults listed on [`CumulationConfig`]. Smoothing and
/// scale factor are validated by [`try_build`](Self::try_build).
pub struct CumulationConfigBuilder {
    length: NonZero<usize>,
    mode: CumulationMode,
    normalize: bool,
    scale_factor: f64,
    smoothing: f64,
}

impl CumulationConfigBuilder {
    fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            mode: CumulationMode::default(),
            normalize: true,
            scale_factor: ScaleFactor::default().0,
            smoothing: Smoothing::default().0,
        }
    }

    /// Sets the cumulation window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn mode(mut self, mode: CumulationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables multiplying the average by the window length.
    #[inline]
    #[must_use]
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    #[inline]
    #[must_use]
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[inline]
    #[must_use]
    pub fn ema_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Builds the config, rejecting invalid smoothing or scale factor.
    ///
    /// # Errors
    ///
    /// See [`Smoothing::try_new`] and [`ScaleFactor::try_new`].
    pub fn try_build(self) -> Result<CumulationConfig, ConfigError> {
        Ok(CumulationConfig {
            length: self.length,
            mode: self.mode,
            normalize: self.normalize,
            scale_factor: ScaleFactor::try_new(self.scale_factor)?,
            smoothing: Smoothing::try_new(self.smoothing)?,
        })
    }

    /// Builds the config. Panics on invalid smoothing or scale factor.
    #[must_use]
    pub fn build(self) -> CumulationConfig {
        match self.try_build() {
            Ok(config) => config,
            Err(e) => panic!("{e}"),
        }
    }
}

/// Simple moving average of the `length` most recent values of `series`.
///
/// `series(offset)` returns the value `offset` bars back. Returns `None`
/// when `length` is zero or any offset in `0..length` is unavailable.
#[must_use]
pub fn sma(series: impl Fn(usize) -> Option<f64>, length: usize) -> Option<f64> {
    if length == 0 {
        return None;
    }

    let mut sum = 0.0;
    for offset in 0..length {
        sum += series(offset)?;
    }

    #[allow(clippy::cast_precision_loss)]
    let length = length as f64;

    Some(sum / length)
}

/// Exponential moving average of the `length` most recent values of
/// `series`, recomputed over the window alone.
///
/// With `k = smoothing / (length + 1)`, the oldest value seeds the average
/// as `value × k` (not as the window SMA). Each newer value then applies
/// `value × k + previous × (1 − k)`, ending at offset `0`.
///
/// Returns `None` when `length` is zero or any offset in `0..length` is
/// unavailable.
///
/// # Example
///
/// ```
/// use quantedge_delta::ema;
///
/// // Oldest to newest: 4, 8, 12. k = 2 / (3 + 1) = 0.5.
/// let window = [12.0, 8.0, 4.0];
/// let result = ema(|offset| window.get(offset).copied(), 3, 2.0);
///
/// // seed 4 × 0.5 = 2; 8 × 0.5 + 2 × 0.5 = 5; 12 × 0.5 + 5 × 0.5 = 8.5
/// assert_eq!(result, Some(8.5));
/// ```
#[must_use]
pub fn ema(series: impl Fn(usize) -> Option<f64>, length: usize, smoothing: f64) -> Option<f64> {
    let oldest = length.checked_sub(1)?;

    #[allow(clippy::cast_precision_loss)]
    let k = smoothing / (length + 1) as f64;

    let mut ema = series(oldest)? * k;
    for offset in (0..oldest).rev() {
        ema = (series(offset)? * k) + (ema * (1.0 - k));
    }

    Some(ema)
}

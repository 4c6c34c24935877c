/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Must be non-decreasing between consecutive calls to
/// [`Indicator::compute`](crate::Indicator::compute).
pub type Timestamp = u64;

/// OHLCV bar data used as input to all indicators.
///
/// Implement this on your own kline/candle type to avoid per-tick
/// conversion. Indicators accept `&impl Ohlcv` and read the bar geometry
/// and volume internally.
///
/// # Bar boundaries
///
/// Indicators detect new bars through [`is_closed`](Ohlcv::is_closed): a
/// bar fed while the previous update was still open repaints the current
/// slot, a bar fed after a closed update advances the history.
///
/// The default implementation reports every bar as closed, which is what a
/// historical (non-live) feed needs.
///
/// # Example
///
/// ```
/// use quantedge_delta::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
///     ts: u64,
///     is_final: bool,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> f64 { self.v }
///     fn open_time(&self) -> Timestamp { self.ts }
///     fn is_closed(&self) -> bool { self.is_final }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Must be non-negative.
    fn volume(&self) -> f64;

    /// Bar open timestamp or sequence number.
    ///
    /// Values must be non-decreasing between calls. Behaviour is undefined if
    /// `open_time` decreases.
    fn open_time(&self) -> Timestamp;

    /// Whether the bar is final. Defaults to `true`.
    ///
    /// Live feeds return `false` while the bar is still forming; the next
    /// update then replaces it instead of appending a new bar.
    fn is_closed(&self) -> bool {
        true
    }
}

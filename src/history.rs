use std::{collections::VecDeque, num::NonZero};

use crate::DeltaSample;

/// Which magnitude of a [`DeltaSample`] a history read returns.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[inline]
    #[must_use]
    pub fn of(self, sample: &DeltaSample) -> f64 {
        match self {
            Self::Buy => sample.buy(),
            Self::Sell => sample.sell(),
        }
    }
}

/// Time-ordered store of [`DeltaSample`]s addressed by lookback offset
/// (`0` = most recent).
///
/// Every appended bar is kept unless a retention limit is set, in which
/// case the oldest bar is evicted once the limit is reached. Slot `0` stays
/// writable until the bar it holds is reported closed; later updates replace
/// it in place.
///
/// Reads past the stored history return `None`.
#[derive(Clone, Debug)]
pub struct HistoryBuffer {
    samples: VecDeque<DeltaSample>,
    retention: Option<NonZero<usize>>,
    /// Slot 0 holds a bar that is still forming.
    forming: bool,
}

impl HistoryBuffer {
    /// Creates an empty history. `None` keeps every bar.
    #[must_use]
    pub fn new(retention: Option<NonZero<usize>>) -> Self {
        Self {
            samples: VecDeque::with_capacity(retention.map_or(0, NonZero::get)),
            retention,
            forming: false,
        }
    }

    /// Writes the estimate of the current bar.
    ///
    /// Replaces slot `0` if the previous write was for a bar still forming,
    /// otherwise appends a new slot and shifts all offsets by one. Returns
    /// `true` when a new slot was appended.
    #[inline]
    pub fn update(&mut self, sample: DeltaSample, closed: bool) -> bool {
        let appended = if self.forming
            && let Some(current) = self.samples.back_mut()
        {
            *current = sample;
            false
        } else {
            self.push(sample);
            true
        };

        self.forming = !closed;

        appended
    }

    /// Sample stored `offset` bars back, or `None` past the available history.
    #[inline]
    #[must_use]
    pub fn get(&self, offset: usize) -> Option<&DeltaSample> {
        let index = self.samples.len().checked_sub(offset + 1)?;
        self.samples.get(index)
    }

    /// Buy or sell magnitude stored `offset` bars back.
    #[inline]
    #[must_use]
    pub fn value(&self, side: Side, offset: usize) -> Option<f64> {
        self.get(offset).map(|sample| side.of(sample))
    }

    /// Number of stored samples.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples kept, `None` when unbounded.
    #[inline]
    #[must_use]
    pub fn retention(&self) -> Option<NonZero<usize>> {
        self.retention
    }

    /// `true` once at least `length` samples are stored.
    #[inline]
    #[must_use]
    pub fn is_ready(&self, length: usize) -> bool {
        self.samples.len() >= length
    }

    /// Changes the retention limit, dropping the oldest samples that no
    /// longer fit. Raising or removing the limit keeps everything stored.
    pub fn set_retention(&mut self, retention: Option<NonZero<usize>>) {
        self.retention = retention;
        self.trim();
    }

    #[inline]
    fn push(&mut self, sample: DeltaSample) {
        self.samples.push_back(sample);
        self.trim();
    }

    #[inline]
    fn trim(&mut self) {
        if let Some(limit) = self.retention {
            let excess = self.samples.len().saturating_sub(limit.get());
            self.samples.drain(..excess);
        }
    }
}

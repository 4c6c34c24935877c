use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a delta value, used for colour selection.
///
/// Only a strictly positive value is bullish. Zero and NaN fall on the
/// bearish side.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Buyers dominate: value `> 0`.
    Bullish,
    /// Sellers dominate or the value is flat/undefined.
    Bearish,
}

impl Direction {
    /// Classifies a delta value.
    #[inline]
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self == Self::Bullish
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// 8-bit RGBA colour.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

const DEFAULT_ALPHA: u8 = 200;

/// Presentation settings forwarded untouched to whatever renders the output.
///
/// None of the computations read these values. They travel with the
/// indicator config so a chart host can restore its plots from a single
/// value.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Style {
    pub bull_color: Rgba,
    pub bear_color: Rgba,
    /// Width of the delta histogram.
    pub delta_width: u32,
    /// Width of the buy and sell lines.
    pub buy_sell_width: u32,
    /// Whether the buy and sell lines are drawn at all.
    pub render_buy_sell: bool,
}

impl Style {
    /// Defaults for single-bar delta plots.
    pub const SINGLE: Self = Self {
        bull_color: Rgba::new(0, 100, 0, DEFAULT_ALPHA),
        bear_color: Rgba::new(139, 0, 0, DEFAULT_ALPHA),
        delta_width: 5,
        buy_sell_width: 2,
        render_buy_sell: true,
    };

    /// Defaults for cumulative delta plots: a wider histogram.
    pub const CUMULATIVE: Self = Self {
        delta_width: 50,
        ..Self::SINGLE
    };

    /// Colour for a delta of the given direction.
    #[inline]
    #[must_use]
    pub fn color_for(&self, direction: Direction) -> Rgba {
        match direction {
            Direction::Bullish => self.bull_color,
            Direction::Bearish => self.bear_color,
        }
    }

    /// Colour of the buy line: transparent when buy/sell rendering is off.
    #[must_use]
    pub fn buy_color(&self) -> Rgba {
        if self.render_buy_sell {
            self.bull_color
        } else {
            Rgba::TRANSPARENT
        }
    }

    /// Colour of the sell line: transparent when buy/sell rendering is off.
    #[must_use]
    pub fn sell_color(&self) -> Rgba {
        if self.render_buy_sell {
            self.bear_color
        } else {
            Rgba::TRANSPARENT
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::SINGLE
    }
}

//! Colour brackets for scores

use super::score::{Metric, Score};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness on a 0..=255 scale
    pub fn brightness(&self) -> f64 {
        (f64::from(self.r) * 299.0 + f64::from(self.g) * 587.0 + f64::from(self.b) * 114.0)
            / 1000.0
    }

    /// Dark backgrounds need white text
    pub fn use_white_text(&self) -> bool {
        self.brightness() < 125.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Half-open range `[from, to)`; `to = None` is unbounded
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    pub from: f64,
    pub to: Option<f64>,
    pub color: Rgb,
}

impl Bracket {
    const fn new(from: f64, to: Option<f64>, color: Rgb) -> Self {
        Self { from, to, color }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.from && self.to.map_or(true, |to| value < to)
    }
}

pub const WIN_RATE_BRACKETS: &[Bracket] = &[
    Bracket::new(0.0, Some(0.45), Rgb::new(0, 0, 0)),
    Bracket::new(0.45, Some(0.47), Rgb::new(205, 51, 51)),
    Bracket::new(0.47, Some(0.49), Rgb::new(215, 121, 0)),
    Bracket::new(0.49, Some(0.52), Rgb::new(215, 182, 0)),
    Bracket::new(0.52, Some(0.54), Rgb::new(109, 149, 33)),
    Bracket::new(0.54, Some(0.56), Rgb::new(76, 118, 46)),
    Bracket::new(0.56, Some(0.60), Rgb::new(74, 146, 183)),
    Bracket::new(0.60, Some(0.65), Rgb::new(131, 87, 157)),
    Bracket::new(0.65, None, Rgb::new(90, 49, 117)),
];

pub const WN8_BRACKETS: &[Bracket] = &[
    Bracket::new(0.0, Some(300.0), Rgb::new(147, 13, 13)),
    Bracket::new(300.0, Some(450.0), Rgb::new(205, 51, 51)),
    Bracket::new(450.0, Some(650.0), Rgb::new(204, 122, 0)),
    Bracket::new(650.0, Some(900.0), Rgb::new(204, 184, 0)),
    Bracket::new(900.0, Some(1200.0), Rgb::new(132, 155, 36)),
    Bracket::new(1200.0, Some(1600.0), Rgb::new(77, 115, 38)),
    Bracket::new(1600.0, Some(2000.0), Rgb::new(64, 153, 191)),
    Bracket::new(2000.0, Some(2450.0), Rgb::new(57, 114, 198)),
    Bracket::new(2450.0, Some(2900.0), Rgb::new(121, 61, 182)),
    Bracket::new(2900.0, None, Rgb::new(64, 16, 112)),
];

pub fn brackets_for(metric: Metric) -> &'static [Bracket] {
    match metric {
        Metric::WinRate => WIN_RATE_BRACKETS,
        Metric::Wn8 => WN8_BRACKETS,
    }
}

/// Background colour for a score; black when unavailable or out of range
pub fn color_for(metric: Metric, score: Score) -> Rgb {
    let Some(value) = score.value() else {
        return Rgb::BLACK;
    };

    brackets_for(metric)
        .iter()
        .find(|bracket| bracket.contains(value))
        .map_or(Rgb::BLACK, |bracket| bracket.color)
}

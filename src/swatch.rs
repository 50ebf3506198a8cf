use serde::{Deserialize, Serialize};

use crate::color::{Color, Hsl};

/// A representative color and the number of pixels it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    color: Color,
    population: u64,
}

impl Swatch {
    pub fn new(color: Color, population: u64) -> Self {
        Self { color, population }
    }

    pub fn color(self) -> Color {
        self.color
    }

    pub fn population(self) -> u64 {
        self.population
    }

    pub fn hsl(self) -> Hsl {
        self.color.to_hsl()
    }
}

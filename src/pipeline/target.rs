use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{hue_distance, Hsl};
use crate::config::MatcherConfig;
use crate::error::{Result, ThemeError};
use crate::swatch::Swatch;

/// Below this saturation a swatch is treated as gray and has no usable hue.
const ACHROMATIC_SATURATION: f32 = 0.05;

/// The semantic role a swatch can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetKind {
    Vibrant,
    LightVibrant,
    DarkVibrant,
    Muted,
    LightMuted,
    DarkMuted,
}

/// Acceptable range for one HSL component, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

/// Relative importance of each scoring term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub saturation: f32,
    pub lightness: f32,
    pub population: f32,
}

/// A named saturation/lightness profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    pub saturation: Band,
    pub lightness: Band,
    #[serde(default = "default_weights")]
    pub weights: Weights,
}

pub const DEFAULT_WEIGHTS: Weights = Weights {
    saturation: 0.35,
    lightness: 0.45,
    population: 0.20,
};

fn default_weights() -> Weights {
    DEFAULT_WEIGHTS
}

const VIBRANT_SATURATION: Band = Band::new(0.35, 1.0);
const MUTED_SATURATION: Band = Band::new(0.0, 0.4);
const LIGHT_LIGHTNESS: Band = Band::new(0.55, 1.0);
const NORMAL_LIGHTNESS: Band = Band::new(0.3, 0.7);
const DARK_LIGHTNESS: Band = Band::new(0.0, 0.45);

/// The six built-in targets, in selection priority order.
pub const DEFAULT_TARGETS: [Target; 6] = [
    Target::new(TargetKind::Vibrant, VIBRANT_SATURATION, NORMAL_LIGHTNESS),
    Target::new(TargetKind::LightVibrant, VIBRANT_SATURATION, LIGHT_LIGHTNESS),
    Target::new(TargetKind::DarkVibrant, VIBRANT_SATURATION, DARK_LIGHTNESS),
    Target::new(TargetKind::Muted, MUTED_SATURATION, NORMAL_LIGHTNESS),
    Target::new(TargetKind::LightMuted, MUTED_SATURATION, LIGHT_LIGHTNESS),
    Target::new(TargetKind::DarkMuted, MUTED_SATURATION, DARK_LIGHTNESS),
];

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// 1 anywhere inside the band and 0 outside it. Every in-band value fits
    /// equally, so population decides between in-band swatches.
    pub fn fit(&self, value: f32) -> f32 {
        if (self.min..=self.max).contains(&value) {
            1.0
        } else {
            0.0
        }
    }

    fn is_valid(&self) -> bool {
        0.0 <= self.min && self.min <= self.max && self.max <= 1.0
    }
}

impl Target {
    pub const fn new(kind: TargetKind, saturation: Band, lightness: Band) -> Self {
        Self {
            kind,
            saturation,
            lightness,
            weights: DEFAULT_WEIGHTS,
        }
    }

    /// Weighted fit of a swatch. `max_population` is the largest population
    /// among all candidate swatches.
    pub fn score(&self, hsl: Hsl, population: u64, max_population: u64) -> f32 {
        let population_fit = population as f32 / max_population.max(1) as f32;
        self.weights.saturation * self.saturation.fit(hsl.saturation)
            + self.weights.lightness * self.lightness.fit(hsl.lightness)
            + self.weights.population * population_fit
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.saturation.is_valid() {
            return Err(ThemeError::invalid_config(
                "saturation band",
                format!("{:?}", self.kind),
            ));
        }
        if !self.lightness.is_valid() {
            return Err(ThemeError::invalid_config(
                "lightness band",
                format!("{:?}", self.kind),
            ));
        }
        let w = self.weights;
        if w.saturation < 0.0 || w.lightness < 0.0 || w.population < 0.0 {
            return Err(ThemeError::invalid_config(
                "weights",
                format!("{:?}", self.kind),
            ));
        }
        Ok(())
    }
}

/// Swatches chosen per target, kept in priority order. Targets with no match
/// are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSelection {
    entries: Vec<(TargetKind, Swatch)>,
}

impl TargetSelection {
    pub fn get(&self, kind: TargetKind) -> Option<Swatch> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, swatch)| swatch)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetKind, Swatch)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick the best unused swatch for every target in priority order, steering
/// away from hues another target already took when a good enough
/// alternative exists.
pub fn match_targets(swatches: &[Swatch], config: &MatcherConfig) -> TargetSelection {
    let mut selection = TargetSelection::default();
    if swatches.is_empty() {
        debug!("no swatches to match");
        return selection;
    }

    let hsl: Vec<Hsl> = swatches.iter().map(|s| s.hsl()).collect();
    let max_population = swatches.iter().map(|s| s.population()).max().unwrap_or(1);
    let mut used = vec![false; swatches.len()];
    let mut taken_hues: Vec<(TargetKind, f32)> = Vec::new();

    for target in &config.targets {
        let mut ranked: Vec<(usize, f32)> = (0..swatches.len())
            .filter(|&i| !used[i])
            .map(|i| {
                let score = target.score(hsl[i], swatches[i].population(), max_population);
                (i, score)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| swatches[b.0].population().cmp(&swatches[a.0].population()))
                .then_with(|| a.0.cmp(&b.0))
        });

        let Some(&(best, best_score)) = ranked.first() else {
            debug!("{:?}: no unused swatch left", target.kind);
            continue;
        };

        let clashes = |i: usize| {
            is_chromatic(hsl[i])
                && taken_hues.iter().any(|&(kind, hue)| {
                    kind != target.kind && hue_distance(hue, hsl[i].hue) < config.hue_threshold
                })
        };

        let pick = if clashes(best) {
            ranked[1..]
                .iter()
                .find(|&&(i, score)| score >= config.acceptable_score && !clashes(i))
                .map(|&(i, _)| i)
                .unwrap_or(best)
        } else {
            best
        };

        debug!(
            "{:?}: picked {} (score {:.3}, best {:.3})",
            target.kind,
            swatches[pick].color(),
            ranked.iter().find(|(i, _)| *i == pick).map_or(0.0, |&(_, s)| s),
            best_score
        );

        used[pick] = true;
        if is_chromatic(hsl[pick]) {
            taken_hues.push((target.kind, hsl[pick].hue));
        }
        selection.entries.push((target.kind, swatches[pick]));
    }

    selection
}

fn is_chromatic(hsl: Hsl) -> bool {
    hsl.saturation >= ACHROMATIC_SATURATION
}

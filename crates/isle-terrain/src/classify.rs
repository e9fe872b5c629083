//! Height-band classification into per-cell colors.

use isle_config::{ClassifyFallback, SurfaceConfig};
use isle_field::{ColorField, HeightField, Rgba};
use tracing::debug;

/// A named height band with an inclusive upper threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainBand {
    /// Label such as `"water"` or `"sand"`.
    pub name: String,
    /// Highest field value, in `[0, 1]`, that still belongs to this band.
    pub threshold: f32,
    /// Color painted on cells in the band.
    pub color: Rgba,
}

impl TerrainBand {
    pub fn new(name: impl Into<String>, threshold: f32, color: Rgba) -> Self {
        Self {
            name: name.into(),
            threshold,
            color,
        }
    }
}

/// Ordered band table.
///
/// Bands are kept sorted by ascending threshold. A cell takes the color of
/// the first band whose threshold is `>=` the cell value.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainClassifier {
    bands: Vec<TerrainBand>,
    fallback: ClassifyFallback,
}

impl TerrainClassifier {
    /// Build a classifier from bands in any order.
    ///
    /// Bands with a NaN threshold are dropped, the rest are clamped to
    /// `[0, 1]` and stably sorted, so equal thresholds keep their input order.
    pub fn new(bands: impl IntoIterator<Item = TerrainBand>, fallback: ClassifyFallback) -> Self {
        let mut dropped = 0usize;
        let mut bands: Vec<TerrainBand> = bands
            .into_iter()
            .filter_map(|mut band| {
                if band.threshold.is_nan() {
                    dropped += 1;
                    return None;
                }
                band.threshold = band.threshold.clamp(0.0, 1.0);
                Some(band)
            })
            .collect();
        bands.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        if dropped > 0 {
            debug!(dropped, "dropped bands with NaN thresholds");
        }
        Self { bands, fallback }
    }

    pub fn from_config(surface: &SurfaceConfig) -> Self {
        Self::new(
            surface
                .bands
                .iter()
                .map(|b| TerrainBand::new(b.name.clone(), b.height, Rgba(b.color))),
            surface.fallback,
        )
    }

    /// The sorted band table.
    pub fn bands(&self) -> &[TerrainBand] {
        &self.bands
    }

    pub fn fallback(&self) -> ClassifyFallback {
        self.fallback
    }

    /// The band covering `height`, or `None` if it lies above every threshold.
    pub fn band_for(&self, height: f32) -> Option<&TerrainBand> {
        self.bands.iter().find(|band| height <= band.threshold)
    }

    /// Color for a single value, applying the fallback above the last band.
    pub fn color_for(&self, height: f32) -> Rgba {
        match self.band_for(height) {
            Some(band) => band.color,
            None => match self.fallback {
                ClassifyFallback::LastBand => {
                    self.bands.last().map_or(Rgba::TRANSPARENT, |b| b.color)
                }
                ClassifyFallback::Transparent => Rgba::TRANSPARENT,
            },
        }
    }

    /// Classify every cell of `field`.
    pub fn classify(&self, field: &HeightField) -> ColorField {
        field.map(|&v| self.color_for(v))
    }
}

/// One-shot classification with an ad-hoc band list.
pub fn classify(field: &HeightField, bands: &[TerrainBand], fallback: ClassifyFallback) -> ColorField {
    TerrainClassifier::new(bands.iter().cloned(), fallback).classify(field)
}

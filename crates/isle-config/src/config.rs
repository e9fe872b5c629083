//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain generation inputs.
    pub terrain: TerrainConfig,
    /// Where and what to export.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which intermediate result a generation pass presents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum DrawMode {
    /// Raw layered noise, grayscale on a flat mesh.
    Noise,
    /// Radial falloff mask, grayscale on a flat mesh.
    Falloff,
    /// Noise multiplied by falloff, grayscale on a flat mesh.
    Combined,
    /// Classified colors on a flat mesh.
    Color,
    /// Full-height mesh with classified colors and vegetation.
    #[default]
    Mesh,
}

/// Texture sampling mode carried as image metadata.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest-neighbour sampling.
    #[default]
    Point,
    /// Bilinear sampling.
    Bilinear,
}

/// Color given to cells higher than every classification band.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClassifyFallback {
    /// Use the color of the highest band.
    #[default]
    LastBand,
    /// Leave the cell fully transparent.
    Transparent,
}

/// The immutable input bundle for one generation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for every random draw of the pass.
    pub seed: u64,
    /// Field width in cells.
    pub width: u32,
    /// Field height in cells.
    pub height: u32,
    /// Which intermediate result to present.
    pub draw_mode: DrawMode,
    /// Layered noise parameters.
    pub noise: NoiseConfig,
    /// Island falloff band.
    pub falloff: FalloffConfig,
    /// Mesh and texture settings.
    pub surface: SurfaceConfig,
    /// Vegetation scattering.
    pub vegetation: VegetationConfig,
    /// Start/destination selection.
    pub waypoints: WaypointConfig,
}

/// Layered coherent noise parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Feature size in cells. Values `<= 0` are clamped to a small epsilon.
    pub scale: f32,
    /// Number of layers.
    pub octaves: u32,
    /// Amplitude multiplier between layers, `[0, 1]`.
    pub persistence: f32,
    /// Frequency multiplier between layers, `>= 1`.
    pub lacunarity: f32,
    /// Extra offset added to every layer's random offset.
    pub offset: (f32, f32),
}

/// Falloff band in normalized Chebyshev distance from the center.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FalloffConfig {
    /// Distance where the mask starts dropping from 1.
    pub start: f32,
    /// Distance where the mask reaches 0.
    pub end: f32,
}

/// One classification band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainBandConfig {
    /// Display name, e.g. "water".
    pub name: String,
    /// Inclusive upper bound of normalized height for this band.
    pub height: f32,
    /// RGBA color.
    pub color: [u8; 4],
}

/// Mesh and texture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Sampling mode recorded on generated textures.
    pub filter_mode: FilterMode,
    /// Vertical scale applied after the height curve.
    pub height_multiplier: f32,
    /// `(time, value)` keys of the height curve. Empty means identity.
    pub height_curve: Vec<(f32, f32)>,
    /// Classification bands, any order.
    pub bands: Vec<TerrainBandConfig>,
    /// Color for cells above every band.
    pub fallback: ClassifyFallback,
}

/// Vegetation scattering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VegetationConfig {
    /// Whether the mesh draw mode scatters vegetation.
    pub enabled: bool,
    /// Number of placement attempts per pass.
    pub density: u32,
    /// Lowest surface altitude that accepts vegetation.
    pub min_height: f32,
    /// Altitude the placement rays start from.
    pub max_height: f32,
    /// Steepest accepted slope, in degrees from vertical.
    pub max_slope_degrees: f32,
    /// Field value below which ground counts as underwater.
    pub submersion_threshold: f32,
}

/// Start/destination selection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaypointConfig {
    /// Minimum straight-line distance between start and destination.
    pub min_distance: f32,
    /// Altitude the probing rays start from.
    pub probe_altitude: f32,
    /// Draw budget for each of the two points.
    pub max_attempts: u32,
    /// Field value a point must exceed to be walkable.
    pub walkable_threshold: f32,
    /// Radius of the dark marker outline on the map.
    pub marker_outline_radius: i32,
    /// Radius of the bright marker fill on the map.
    pub marker_fill_radius: i32,
    /// Outline color.
    pub marker_outline_color: [u8; 4],
    /// Fill color.
    pub marker_fill_color: [u8; 4],
}

/// Export settings for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the exported files.
    pub directory: PathBuf,
    /// Write `texture.png` and `map.png`.
    pub write_textures: bool,
    /// Write `terrain.obj`.
    pub write_mesh: bool,
    /// Write `placements.ron`.
    pub write_placements: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 100,
            height: 100,
            draw_mode: DrawMode::Mesh,
            noise: NoiseConfig::default(),
            falloff: FalloffConfig::default(),
            surface: SurfaceConfig::default(),
            vegetation: VegetationConfig::default(),
            waypoints: WaypointConfig::default(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 15.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: (0.0, 0.0),
        }
    }
}

impl Default for FalloffConfig {
    fn default() -> Self {
        Self {
            start: 0.5,
            end: 0.95,
        }
    }
}

impl Default for TerrainBandConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            height: 1.0,
            color: [255, 255, 255, 255],
        }
    }
}

impl TerrainBandConfig {
    fn new(name: &str, height: f32, color: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            height,
            color,
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Point,
            height_multiplier: 20.0,
            height_curve: vec![(0.0, 0.0), (0.3, 0.0), (1.0, 1.0)],
            bands: vec![
                TerrainBandConfig::new("deep_water", 0.2, [24, 60, 160, 255]),
                TerrainBandConfig::new("water", 0.3, [50, 100, 200, 255]),
                TerrainBandConfig::new("sand", 0.35, [210, 200, 130, 255]),
                TerrainBandConfig::new("grass", 0.6, [86, 152, 40, 255]),
                TerrainBandConfig::new("forest", 0.75, [62, 107, 30, 255]),
                TerrainBandConfig::new("rock", 0.9, [90, 70, 60, 255]),
                TerrainBandConfig::new("snow", 1.0, [250, 250, 250, 255]),
            ],
            fallback: ClassifyFallback::LastBand,
        }
    }
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            density: 200,
            min_height: 0.5,
            max_height: 25.0,
            max_slope_degrees: 60.0,
            submersion_threshold: 0.3,
        }
    }
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            min_distance: 30.0,
            probe_altitude: 100.0,
            max_attempts: 10_000,
            walkable_threshold: 0.3,
            marker_outline_radius: 6,
            marker_fill_radius: 5,
            marker_outline_color: [0, 0, 0, 255],
            marker_fill_color: [255, 0, 0, 255],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_textures: true,
            write_mesh: true,
            write_placements: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Sanitizing ---

impl TerrainConfig {
    /// Return a copy with every user-tunable parameter forced into its valid range.
    ///
    /// Dimensions are at least 1, lacunarity at least 1, persistence and the
    /// falloff band within `[0, 1]`, and the slope limit within `[0, 90]`.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        if out.clamp_ranges() {
            log::warn!("terrain config adjusted into valid ranges");
        }
        out
    }

    /// Clamp in place. Returns `true` if any clamped field changed.
    fn clamp_ranges(&mut self) -> bool {
        let mut changed = false;
        adjust(&mut self.width, |w| w.max(1), &mut changed);
        adjust(&mut self.height, |h| h.max(1), &mut changed);

        let noise = &mut self.noise;
        adjust(&mut noise.lacunarity, |v| finite_or(v, 1.0).max(1.0), &mut changed);
        adjust(&mut noise.persistence, |v| finite_or(v, 0.5).clamp(0.0, 1.0), &mut changed);

        let falloff = &mut self.falloff;
        adjust(&mut falloff.start, |v| finite_or(v, 1.0).clamp(0.0, 1.0), &mut changed);
        adjust(&mut falloff.end, |v| finite_or(v, 1.0).clamp(0.0, 1.0), &mut changed);

        let vegetation = &mut self.vegetation;
        adjust(
            &mut vegetation.max_slope_degrees,
            |v| finite_or(v, 60.0).clamp(0.0, 90.0),
            &mut changed,
        );
        let ceiling = vegetation.max_height;
        adjust(&mut vegetation.min_height, |v| if v > ceiling { ceiling } else { v }, &mut changed);

        adjust(
            &mut self.waypoints.min_distance,
            |v| finite_or(v, 0.0).max(0.0),
            &mut changed,
        );
        changed
    }
}

/// Replace `slot` with `clamp(slot)`, flagging `changed` if the value moved.
fn adjust<T: Copy + PartialEq>(slot: &mut T, clamp: impl FnOnce(T) -> T, changed: &mut bool) {
    let value = clamp(*slot);
    if *slot != value {
        *slot = value;
        *changed = true;
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

// --- Load / Save ---

/// Directory name used under the OS config root.
pub const APP_DIR_NAME: &str = "isle";

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Where [`Config::load_or_create`] got its config from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from an existing file.
    Loaded,
    /// No file existed; defaults were written.
    Created,
}

impl Config {
    /// The OS-specific default config directory, e.g. `~/.config/isle` on Linux.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join(APP_DIR_NAME))
    }

    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// if it does not exist yet.
    ///
    /// Runs before logging is up, so the caller reports the [`ConfigOrigin`].
    pub fn load_or_create(config_dir: &Path) -> Result<(Self, ConfigOrigin), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            return Ok((config, ConfigOrigin::Created));
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = ron::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;
        Ok((config, ConfigOrigin::Loaded))
    }

    /// Write this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        // Depth 4 keeps each surface band on one line.
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty)?;

        let path = config_dir.join(CONFIG_FILE);
        std::fs::write(&path, text).map_err(|source| ConfigError::Write { path, source })
    }
}

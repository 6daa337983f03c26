use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

const DEFAULT_SOURCE_URL: &str = "stub://open";
const DEFAULT_TARGET_FPS: u32 = 10;
const DEFAULT_FRAME_WIDTH: u32 = 640;
const DEFAULT_FRAME_HEIGHT: u32 = 400;
const DEFAULT_SMOOTHING_ALPHA: f32 = 1.0;

// -------------------- Engine tunables --------------------

/// Which side wins when the left and right aggregates are exactly equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    Left,
    #[default]
    Right,
}

impl FromStr for TieBreak {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(TieBreak::Left),
            "right" => Ok(TieBreak::Right),
            other => Err(anyhow!("tie_break must be 'left' or 'right', got '{}'", other)),
        }
    }
}

/// Tunables for region scoring and the decision policy.
///
/// Fixed for the lifetime of a `NavigationEngine`; build a new engine to retune.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Top of the obstacle-height band, as a fraction of frame height.
    pub band_top: f64,
    /// Bottom of the band (exclusive), as a fraction of frame height.
    pub band_bottom: f64,
    /// Samples at or above this value are "no reading".
    pub invalid_depth_mm: u16,
    /// Median below this scores 0.0; at this value scores 0.3.
    pub min_safe_mm: u16,
    /// Median at or above this scores 1.0.
    pub max_clear_mm: u16,
    /// A region needs strictly more valid samples than this to be scored.
    pub min_valid_samples: usize,
    pub safety_threshold: f32,
    /// Forward wins while its score is at least this fraction of the best qualifying side.
    pub forward_ratio: f32,
    /// Path score strictly above this earns `long_step_m`.
    pub long_step_score: f32,
    /// Path score strictly above this earns `medium_step_m`.
    pub medium_step_score: f32,
    pub long_step_m: f32,
    pub medium_step_m: f32,
    pub short_step_m: f32,
    pub tie_break: TieBreak,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            band_top: 0.35,
            band_bottom: 0.65,
            invalid_depth_mm: 5000,
            min_safe_mm: 400,
            max_clear_mm: 2000,
            min_valid_samples: 50,
            safety_threshold: 0.35,
            forward_ratio: 0.85,
            long_step_score: 0.8,
            medium_step_score: 0.6,
            long_step_m: 0.30,
            medium_step_m: 0.20,
            short_step_m: 0.15,
            tie_break: TieBreak::Right,
        }
    }
}

impl NavigationConfig {
    /// Reject configurations that would make scoring or the policy ill-defined.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("band_top", self.band_top), ("band_bottom", self.band_bottom)] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1], got {}", name, value);
            }
        }
        if self.band_top >= self.band_bottom {
            bail!(
                "band_top ({}) must be below band_bottom ({})",
                self.band_top,
                self.band_bottom
            );
        }
        if self.min_safe_mm == 0 {
            bail!("min_safe_mm must be greater than zero");
        }
        if self.max_clear_mm <= self.min_safe_mm {
            bail!(
                "max_clear_mm ({}) must exceed min_safe_mm ({})",
                self.max_clear_mm,
                self.min_safe_mm
            );
        }
        if self.invalid_depth_mm <= self.min_safe_mm {
            bail!(
                "invalid_depth_mm ({}) must exceed min_safe_mm ({})",
                self.invalid_depth_mm,
                self.min_safe_mm
            );
        }
        if !(0.0..=1.0).contains(&self.safety_threshold) {
            bail!(
                "safety_threshold must be within [0, 1], got {}",
                self.safety_threshold
            );
        }
        if !(self.forward_ratio > 0.0 && self.forward_ratio <= 1.0) {
            bail!(
                "forward_ratio must be within (0, 1], got {}",
                self.forward_ratio
            );
        }
        for (name, value) in [
            ("long_step_score", self.long_step_score),
            ("medium_step_score", self.medium_step_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1], got {}", name, value);
            }
        }
        if self.medium_step_score > self.long_step_score {
            bail!("medium_step_score must not exceed long_step_score");
        }
        for (name, value) in [
            ("short_step_m", self.short_step_m),
            ("medium_step_m", self.medium_step_m),
            ("long_step_m", self.long_step_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive distance, got {}", name, value);
            }
        }
        if self.short_step_m > self.medium_step_m || self.medium_step_m > self.long_step_m {
            bail!("step distances must not decrease from short to long");
        }
        Ok(())
    }
}

// -------------------- navd settings --------------------

#[derive(Debug, Deserialize, Default)]
struct NavdConfigFile {
    source: Option<SourceConfigFile>,
    navigation: Option<NavigationConfig>,
    smoothing: Option<SmoothingConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    url: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct SmoothingConfigFile {
    alpha: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct NavdConfig {
    pub source: SourceSettings,
    pub navigation: NavigationConfig,
    /// Exponential smoothing weight for new scores; 1.0 disables smoothing.
    pub smoothing_alpha: f32,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub url: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl NavdConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("NAV_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: NavdConfigFile) -> Self {
        let source = file.source.unwrap_or_default();
        Self {
            source: SourceSettings {
                url: source.url.unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
                target_fps: source.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
                width: source.width.unwrap_or(DEFAULT_FRAME_WIDTH),
                height: source.height.unwrap_or(DEFAULT_FRAME_HEIGHT),
            },
            navigation: file.navigation.unwrap_or_default(),
            smoothing_alpha: file
                .smoothing
                .and_then(|smoothing| smoothing.alpha)
                .unwrap_or(DEFAULT_SMOOTHING_ALPHA),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("NAV_SOURCE_URL") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        if let Ok(fps) = std::env::var("NAV_TARGET_FPS") {
            self.source.target_fps = fps
                .trim()
                .parse()
                .map_err(|_| anyhow!("NAV_TARGET_FPS must be an integer frame rate"))?;
        }
        if let Ok(threshold) = std::env::var("NAV_SAFETY_THRESHOLD") {
            self.navigation.safety_threshold = threshold
                .trim()
                .parse()
                .map_err(|_| anyhow!("NAV_SAFETY_THRESHOLD must be a number"))?;
        }
        if let Ok(tie_break) = std::env::var("NAV_TIE_BREAK") {
            self.navigation.tie_break = tie_break.parse()?;
        }
        if let Ok(alpha) = std::env::var("NAV_SMOOTHING_ALPHA") {
            self.smoothing_alpha = alpha
                .trim()
                .parse()
                .map_err(|_| anyhow!("NAV_SMOOTHING_ALPHA must be a number"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.navigation.validate()?;
        if self.source.target_fps == 0 {
            return Err(anyhow!("target_fps must be greater than zero"));
        }
        if self.source.width == 0 || self.source.height == 0 {
            return Err(anyhow!("source width and height must be greater than zero"));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(anyhow!(
                "smoothing alpha must be within (0, 1], got {}",
                self.smoothing_alpha
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<NavdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

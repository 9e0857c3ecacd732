use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::Rgb;

/// Renderer-wide tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Ground distance covered by one lattice cell (meters)
    pub meters_per_gridline: f64,
    /// Size of one lattice cell in grid units
    pub gridline_spacing: f64,
    /// Lines drawn on each side of the centre line, per axis
    pub gridline_count: u32,
    /// Frame cadence the host loop aims for (Hz)
    pub target_frame_rate_hz: f64,
    /// Camera model parameters
    pub camera: CameraConfig,
    /// Line brightness parameters
    pub shading: ShadingConfig,
    /// Render-position smoothing parameters
    pub smoothing: SmoothingConfig,
    /// Viewer marker appearance
    pub marker: MarkerConfig,
}

/// Camera model parameters, all distances in grid units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal field of view (degrees)
    pub horizontal_fov_deg: f64,
    /// Minimum forward distance that is drawn
    pub near_plane: f64,
    /// Height of the eye above the grid
    pub eye_height: f64,
    /// Distance the camera is pulled back along the view direction
    pub backup_distance: f64,
}

/// Shade = clamp((N - |i|) / N * (base + tilt_gain * cos(tilt)), 0, 255)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Centre-line grey level when looking at the horizon
    pub base: f64,
    /// Extra grey level added as the view turns straight down
    pub tilt_gain: f64,
}

/// Render-position smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Jumps larger than this many gridlines snap instead of easing
    pub snap_threshold_lines: f64,
    /// Upper bound on the frame time fed to the ease step (seconds)
    pub max_frame_dt_s: f64,
}

/// Viewer marker appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Circle radius (pixels)
    pub radius_px: f64,
    /// Stroke colour
    pub color: Rgb,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            meters_per_gridline: 10.0,
            gridline_spacing: 1.0,
            gridline_count: 20,
            target_frame_rate_hz: 30.0,
            camera: CameraConfig::default(),
            shading: ShadingConfig::default(),
            smoothing: SmoothingConfig::default(),
            marker: MarkerConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: 45.0,
            near_plane: 0.1,
            eye_height: 0.5,
            backup_distance: 2.0,
        }
    }
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self { base: 50.0, tilt_gain: 77.0 }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            snap_threshold_lines: 10.0,
            max_frame_dt_s: 1.0,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { radius_px: 6.0, color: Rgb::RED }
    }
}

impl GridConfig {
    /// Half-length of every gridline, in grid units
    pub fn extent(&self) -> f64 {
        self.gridline_count as f64 * self.gridline_spacing
    }

    /// Nominal time between frames (seconds)
    pub fn frame_interval_s(&self) -> f64 {
        1.0 / self.target_frame_rate_hz
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    #[error("missing parameter {parameter}")]
    MissingParameter { parameter: String },
    #[error("config i/o: {message}")]
    Io { message: String },
    #[error("config serialization: {message}")]
    Serialization { message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Outcome of checking a configuration
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, parameter: &str, value: impl ToString, reason: &str) {
        self.errors.push(invalid(parameter, value, reason));
    }
}

fn invalid(parameter: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Owns the active configuration and its backing file
pub struct ConfigurationManager {
    config: GridConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Manager holding the default configuration
    pub fn new() -> Self {
        Self {
            config: GridConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Manager loaded from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn into_config(self) -> GridConfig {
        self.config
    }

    /// Replace the whole configuration after validation
    pub fn update_config(&mut self, config: GridConfig) -> ConfigResult<()> {
        first_error(Self::validate_config(&config))?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON; missing fields take their defaults
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        let config: GridConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("failed to parse config file '{}': {}", path_str, e),
        })?;

        let validation = Self::validate_config(&config);
        for warning in &validation.warnings {
            tracing::warn!(path = %path_str, "{}", warning);
        }
        first_error(validation)?;

        tracing::debug!(path = %path_str, "loaded grid configuration");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::Serialization {
            message: format!("failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the file the configuration was last loaded from or saved to
    pub fn save(&mut self) -> ConfigResult<()> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::MissingParameter {
                parameter: "config_file_path".to_string(),
            }),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    // Runtime parameter adjustment. Each setter returns the previous value.

    pub fn set_gridline_count(&mut self, count: u32) -> ConfigResult<u32> {
        if count == 0 {
            return Err(invalid("gridline_count", count, "at least one gridline per side is required"));
        }
        let old = std::mem::replace(&mut self.config.gridline_count, count);
        self.is_modified = true;
        Ok(old)
    }

    pub fn set_horizontal_fov(&mut self, fov_deg: f64) -> ConfigResult<f64> {
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(invalid("horizontal_fov_deg", fov_deg, "must be between 0 and 180 degrees"));
        }
        let old = std::mem::replace(&mut self.config.camera.horizontal_fov_deg, fov_deg);
        self.is_modified = true;
        Ok(old)
    }

    pub fn set_near_plane(&mut self, near_plane: f64) -> ConfigResult<f64> {
        if !(near_plane > 0.0 && near_plane.is_finite()) {
            return Err(invalid("near_plane", near_plane, "must be positive"));
        }
        let old = std::mem::replace(&mut self.config.camera.near_plane, near_plane);
        self.is_modified = true;
        Ok(old)
    }

    pub fn set_backup_distance(&mut self, backup: f64) -> ConfigResult<f64> {
        if !(backup >= 0.0 && backup.is_finite()) {
            return Err(invalid("backup_distance", backup, "must be non-negative"));
        }
        let old = std::mem::replace(&mut self.config.camera.backup_distance, backup);
        self.is_modified = true;
        Ok(old)
    }

    pub fn set_snap_threshold(&mut self, lines: f64) -> ConfigResult<f64> {
        if !(lines > 0.0 && lines.is_finite()) {
            return Err(invalid("snap_threshold_lines", lines, "must be positive"));
        }
        let old = std::mem::replace(&mut self.config.smoothing.snap_threshold_lines, lines);
        self.is_modified = true;
        Ok(old)
    }

    /// Check every parameter; warnings flag legal but doubtful values
    pub fn validate_config(config: &GridConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !(config.meters_per_gridline > 0.0 && config.meters_per_gridline.is_finite()) {
            result.reject("meters_per_gridline", config.meters_per_gridline, "must be positive");
        }
        if !(config.gridline_spacing > 0.0 && config.gridline_spacing.is_finite()) {
            result.reject("gridline_spacing", config.gridline_spacing, "must be positive");
        }
        if config.gridline_count == 0 {
            result.reject("gridline_count", config.gridline_count, "at least one gridline per side is required");
        }
        if !(config.target_frame_rate_hz > 0.0 && config.target_frame_rate_hz.is_finite()) {
            result.reject("target_frame_rate_hz", config.target_frame_rate_hz, "must be positive");
        }

        let camera = &config.camera;
        if !(camera.horizontal_fov_deg > 0.0 && camera.horizontal_fov_deg < 180.0) {
            result.reject("horizontal_fov_deg", camera.horizontal_fov_deg, "must be between 0 and 180 degrees");
        }
        if !(camera.near_plane > 0.0 && camera.near_plane.is_finite()) {
            result.reject("near_plane", camera.near_plane, "must be positive");
        }
        if !(camera.eye_height >= 0.0 && camera.eye_height.is_finite()) {
            result.reject("eye_height", camera.eye_height, "must be non-negative");
        }
        if !(camera.backup_distance >= 0.0 && camera.backup_distance.is_finite()) {
            result.reject("backup_distance", camera.backup_distance, "must be non-negative");
        }
        if camera.eye_height + camera.backup_distance < camera.near_plane {
            result.warnings.push(format!(
                "eye_height + backup_distance ({}) is inside the near plane ({}); a straight-down view draws nothing",
                camera.eye_height + camera.backup_distance,
                camera.near_plane
            ));
        }

        let smoothing = &config.smoothing;
        if !(smoothing.snap_threshold_lines > 0.0 && smoothing.snap_threshold_lines.is_finite()) {
            result.reject("snap_threshold_lines", smoothing.snap_threshold_lines, "must be positive");
        }
        if !(smoothing.max_frame_dt_s > 0.0 && smoothing.max_frame_dt_s.is_finite()) {
            result.reject("max_frame_dt_s", smoothing.max_frame_dt_s, "must be positive");
        } else if smoothing.max_frame_dt_s > 1.0 {
            result.warnings.push(format!(
                "max_frame_dt_s = {} lets a delayed frame overshoot the true position",
                smoothing.max_frame_dt_s
            ));
        }

        if !(config.shading.base.is_finite() && config.shading.tilt_gain.is_finite()) {
            result.reject("shading", format!("{:?}", config.shading), "must be finite");
        }
        if !(config.marker.radius_px >= 0.0 && config.marker.radius_px.is_finite()) {
            result.reject("marker.radius_px", config.marker.radius_px, "must be non-negative");
        }

        result
    }
}

fn first_error(validation: ValidationResult) -> ConfigResult<()> {
    match validation.errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

//! Configuration Management

use crate::capture::DetectorCommand;
use crate::gesture::GestureThresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Classifier thresholds
    #[serde(default)]
    pub gesture: GestureThresholds,
    /// Dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Capture settings
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Replay settings
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Minimum spacing between fired actions (ms)
    pub cooldown_ms: u64,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Detector executable
    pub detector_command: String,
    /// Arguments placed before the camera and detector parameters
    #[serde(default)]
    pub detector_args: Vec<String>,
    /// Camera device index
    pub camera_index: u32,
    /// Ring buffer size
    pub ring_buffer_size: usize,
    /// How long to wait for the detector handshake (ms)
    pub ready_timeout_ms: u64,
}

/// Replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Spacing assumed for recorded frames without a timestamp (ms)
    pub frame_interval_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { cooldown_ms: 1000 }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            detector_command: "python3".to_string(),
            detector_args: vec!["scripts/hand_detect.py".to_string()],
            camera_index: 0,
            ring_buffer_size: 16,
            ready_timeout_ms: 15_000,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let direction = self.gesture.direction_threshold;
        if !direction.is_finite() || direction <= 0.0 {
            return Err(crate::Error::Config(format!(
                "direction_threshold must be a positive number, got {}", direction
            )));
        }
        let vertical = self.gesture.vertical_alignment_threshold;
        if !vertical.is_finite() || vertical <= 0.0 {
            return Err(crate::Error::Config(format!(
                "vertical_alignment_threshold must be a positive number, got {}", vertical
            )));
        }
        if self.dispatch.cooldown_ms == 0 {
            return Err(crate::Error::Config("cooldown_ms must be > 0".to_string()));
        }
        if !self.capture.ring_buffer_size.is_power_of_two() {
            return Err(crate::Error::Config(format!(
                "ring_buffer_size must be a power of 2, got {}", self.capture.ring_buffer_size
            )));
        }
        if self.capture.detector_command.trim().is_empty() {
            return Err(crate::Error::Config("detector_command must not be empty".to_string()));
        }
        if self.capture.ready_timeout_ms == 0 {
            return Err(crate::Error::Config("ready_timeout_ms must be > 0".to_string()));
        }
        if self.replay.frame_interval_ms == 0 {
            return Err(crate::Error::Config("frame_interval_ms must be > 0".to_string()));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".gesture_media").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.dispatch.cooldown_ms)
    }

    pub fn replay_frame_interval(&self) -> Duration {
        Duration::from_millis(self.replay.frame_interval_ms)
    }

    /// Detector launch settings.
    pub fn detector_command(&self) -> DetectorCommand {
        DetectorCommand {
            program: self.capture.detector_command.clone(),
            args: self.capture.detector_args.clone(),
            camera_index: self.capture.camera_index,
            ready_timeout: Duration::from_millis(self.capture.ready_timeout_ms),
        }
    }
}

//! Viewer configuration
//!
//! Every field has a default, so a RON file only needs the values it wants
//! to change:
//!
//! ```ron
//! (
//!     target_size: 4.0,
//!     asset_root: "public",
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vitrine_core::{Error, Point3f, Result, Rgb};

/// Tunables for camera, controls, normalization and the modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Largest dimension of a normalized model
    pub target_size: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    /// Packed `0xRRGGBB`
    pub background: u32,
    /// Delay between hiding the modal and tearing the session down
    pub close_delay_ms: u64,
    /// Directory that model paths are resolved against
    pub asset_root: PathBuf,
    /// 4x multisampling
    pub msaa: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_size: 5.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            camera_position: [8.0, 5.0, 8.0],
            min_distance: 6.5,
            max_distance: 15.0,
            enable_damping: true,
            damping_factor: 0.05,
            background: 0x222222,
            close_delay_ms: 500,
            asset_root: PathBuf::from("assets"),
            msaa: true,
        }
    }
}

impl ViewerConfig {
    /// Parse a RON document
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).map_err(|e| Error::Config(format!("invalid viewer config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_ron_str(&source)?;
        log::info!("loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.target_size.is_finite() && self.target_size > 0.0) {
            return Err(Error::Config(format!("target_size must be positive, got {}", self.target_size)));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(Error::Config(format!("need 0 < near < far, got {} and {}", self.near, self.far)));
        }
        if !(self.min_distance > 0.0 && self.max_distance >= self.min_distance) {
            return Err(Error::Config(format!(
                "need 0 < min_distance <= max_distance, got {} and {}",
                self.min_distance, self.max_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(Error::Config(format!("damping_factor must be in [0, 1], got {}", self.damping_factor)));
        }
        Ok(())
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn background_color(&self) -> Rgb {
        Rgb::from_hex(self.background)
    }

    pub fn camera_position(&self) -> Point3f {
        Point3f::from(self.camera_position)
    }

    /// Resolve a site-absolute model path such as `/projects/fire.glb`
    pub fn resolve_asset(&self, model_path: &str) -> PathBuf {
        self.asset_root.join(model_path.trim_start_matches('/'))
    }
}

//! Game tuning and configuration
//!
//! Every gameplay constant can be overridden from a JSON file. Missing keys
//! fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Bounds;

/// Seed used when no configuration is supplied
pub const DEFAULT_SEED: u64 = 12345;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values that parse but cannot describe a playable arena
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: i32,
    pub arena_height: i32,
    /// Broad-phase region lines per axis
    pub region_divisions: usize,

    // === Motion ===
    /// Speed lost per tick to drag
    pub drag: f32,
    /// Speed gained per tick of steering
    pub acceleration: f32,
    /// Extra speed given to a fired projectile
    pub launch_speed: f32,

    // === Entities ===
    pub agent_size: i32,
    pub ammo_size: i32,
    /// Projectiles in the pool, spawned in mirrored pairs
    pub ammo_count: usize,

    // === Loop ===
    /// Tick period in milliseconds, used to convert ticks to wall time
    pub tick_ms: u64,
    /// Seed for the projectile layout
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            region_divisions: REGION_DIVS,

            drag: DRAG,
            acceleration: ACCELERATION,
            launch_speed: LAUNCH_SPEED,

            agent_size: AGENT_SIZE,
            ammo_size: AMMO_SIZE,
            ammo_count: AMMO_COUNT,

            tick_ms: TICK_MS,
            seed: DEFAULT_SEED,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values that would break the kernel's construction contracts
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if self.region_divisions == 0 {
            return invalid("region_divisions must be at least 1".into());
        }
        if self.agent_size < 2 || self.ammo_size < 2 {
            return invalid(format!(
                "entity sizes must be at least 2 (agent {}, ammo {})",
                self.agent_size, self.ammo_size
            ));
        }
        let smallest_side = self.arena_width.min(self.arena_height);
        if smallest_side <= 2 * self.agent_size.max(self.ammo_size) {
            return invalid(format!(
                "arena {}x{} is too small for its entities",
                self.arena_width, self.arena_height
            ));
        }
        if self.ammo_count % 2 != 0 {
            return invalid(format!("ammo_count must be even, got {}", self.ammo_count));
        }
        for (name, value) in [
            ("drag", self.drag),
            ("acceleration", self.acceleration),
            ("launch_speed", self.launch_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a finite non-negative number"));
            }
        }
        Ok(())
    }

    /// Full arena rectangle
    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.arena_width, self.arena_height)
    }
}

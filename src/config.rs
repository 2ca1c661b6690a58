use std::path::Path;

use glam::DVec3;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::tracking::{Heliostat, TrackingOptions};
use crate::types::{EphemerisKind, Location, SolverOptions, Strategy};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeliostatConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub solver: SolverOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub azimuth_offset_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub midpoint: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub point: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub interval_minutes: u32,
    pub strategy: Strategy,
    pub ephemeris: EphemerisKind,
    pub warm_start: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

// Durbanville, South Africa
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: -33.8352,
            longitude: 18.6510,
            altitude_m: 0.0,
            azimuth_offset_deg: 0.0,
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            midpoint: [-10.0, 0.0, 2.7],
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            point: [-0.5, -13.0, 0.5],
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let defaults = TrackingOptions::default();
        Self {
            interval_minutes: defaults.interval_minutes,
            strategy: defaults.strategy,
            ephemeris: defaults.ephemeris,
            warm_start: defaults.warm_start,
        }
    }
}

impl Default for HeliostatConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            site: SiteConfig::default(),
            mirror: MirrorConfig::default(),
            target: TargetConfig::default(),
            tracking: TrackingConfig::default(),
            solver: SolverOptions::default(),
        }
    }
}

impl HeliostatConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, ConfigError> {
        let config: HeliostatConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: source_path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !(-90.0..=90.0).contains(&self.site.latitude) {
            errors.push(format!(
                "site.latitude must be in [-90, 90], got {}. Example: latitude = -33.8352",
                self.site.latitude
            ));
        }

        if !(-180.0..=180.0).contains(&self.site.longitude) {
            errors.push(format!(
                "site.longitude must be in [-180, 180], got {}. Example: longitude = 18.651",
                self.site.longitude
            ));
        }

        if !self.site.azimuth_offset_deg.is_finite() || !self.site.altitude_m.is_finite() {
            errors.push("site.azimuth_offset_deg and site.altitude_m must be finite".to_string());
        }

        if self.mirror.midpoint.iter().chain(&self.target.point).any(|c| !c.is_finite()) {
            errors.push("mirror.midpoint and target.point must be finite".to_string());
        } else if self.mirror_midpoint().distance(self.target_point()) <= f64::EPSILON {
            errors.push(format!(
                "target.point must differ from mirror.midpoint, both are {:?}",
                self.target.point
            ));
        }

        if !(1..=1440).contains(&self.tracking.interval_minutes) {
            errors.push(format!(
                "tracking.interval_minutes must be 1-1440, got {}. Example: interval_minutes = 5",
                self.tracking.interval_minutes
            ));
        }

        if self.solver.max_iterations == 0 {
            errors.push("solver.max_iterations must be > 0. Example: max_iterations = 1000".to_string());
        }

        if !(self.solver.x_tolerance > 0.0) {
            errors.push(format!(
                "solver.x_tolerance must be > 0, got {}. Example: x_tolerance = 1e-9",
                self.solver.x_tolerance
            ));
        }

        if !(self.solver.f_tolerance >= 0.0) {
            errors.push(format!(
                "solver.f_tolerance must be >= 0, got {}. Example: f_tolerance = 1e-12",
                self.solver.f_tolerance
            ));
        }

        if !(self.solver.initial_step_deg > 0.0) {
            errors.push(format!(
                "solver.initial_step_deg must be > 0, got {}. Example: initial_step_deg = 5.0",
                self.solver.initial_step_deg
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("\n")))
        }
    }

    pub fn mirror_midpoint(&self) -> DVec3 {
        DVec3::from_array(self.mirror.midpoint)
    }

    pub fn target_point(&self) -> DVec3 {
        DVec3::from_array(self.target.point)
    }

    pub fn location(&self) -> Location {
        Location {
            latitude: self.site.latitude,
            longitude: self.site.longitude,
            altitude_m: self.site.altitude_m,
        }
    }

    pub fn heliostat(&self) -> Heliostat {
        Heliostat {
            location: self.location(),
            azimuth_offset_deg: self.site.azimuth_offset_deg,
            mirror_midpoint: self.mirror_midpoint(),
            target_point: self.target_point(),
        }
    }

    pub fn tracking_options(&self) -> TrackingOptions {
        TrackingOptions {
            interval_minutes: self.tracking.interval_minutes,
            strategy: self.tracking.strategy,
            ephemeris: self.tracking.ephemeris,
            warm_start: self.tracking.warm_start,
            solver: self.solver,
        }
    }
}

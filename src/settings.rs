use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drs::DRS_THRESHOLD_KMH;
use crate::error::{Result, TunnelError};
use crate::flow::DEFAULT_POINTS_PER_LINE;
use crate::parameters::TunnelParameters;

/// Which parameter changes rebuild the flow lines while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RespawnPolicy {
    /// Only a new wind speed respawns; angle and wing changes steer live lines.
    #[default]
    WindSpeed,
    /// Wind speed, angle of attack or wing changes respawn.
    AnyParameter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelSettings {
    pub parameters: TunnelParameters,
    pub line_count: usize,
    pub points_per_line: usize,
    pub tick_interval_ms: u64,
    // upper bound on fixed ticks run for one long frame
    pub max_catch_up_ticks: u32,
    pub respawn_policy: RespawnPolicy,
    pub seed: Option<u64>,
    pub auto_start_delay_ms: u64,
    pub drs_threshold_kmh: f64,
}

impl Default for TunnelSettings {
    fn default() -> Self {
        Self {
            parameters: TunnelParameters::default(),
            line_count: 300,
            points_per_line: DEFAULT_POINTS_PER_LINE,
            tick_interval_ms: 16,
            max_catch_up_ticks: 8,
            respawn_policy: RespawnPolicy::default(),
            seed: None,
            auto_start_delay_ms: 1000,
            drs_threshold_kmh: DRS_THRESHOLD_KMH,
        }
    }
}

impl TunnelSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: TunnelSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| TunnelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), "loaded tunnel settings");
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;

        if self.points_per_line < 2 {
            return Err(TunnelError::InvalidSetting {
                name: "points_per_line",
                reason: format!("need at least 2 points, got {}", self.points_per_line),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(TunnelError::InvalidSetting {
                name: "tick_interval_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.max_catch_up_ticks == 0 {
            return Err(TunnelError::InvalidSetting {
                name: "max_catch_up_ticks",
                reason: "must be positive".to_string(),
            });
        }
        if !self.drs_threshold_kmh.is_finite() {
            return Err(TunnelError::InvalidSetting {
                name: "drs_threshold_kmh",
                reason: format!("not a finite speed: {}", self.drs_threshold_kmh),
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn auto_start_delay(&self) -> Duration {
        Duration::from_millis(self.auto_start_delay_ms)
    }
}

//! TOML-based scenario configuration and preset station rosters.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::{DynamicsParams, StationBaseline};

/// Top-level scenario configuration parsed from TOML.
///
/// Every section has defaults; an empty file yields the `india` preset.
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or pick a built-in
/// roster with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Station dynamics parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Station roster, in display order.
    #[serde(default = "india_roster")]
    pub stations: Vec<StationConfig>,
}

/// Station dynamics parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed for the initial drift phase; random when absent.
    pub seed: Option<u64>,
    /// Minimum seconds between two advances.
    pub throttle_secs: f64,
    /// Wall-clock seconds per unit of drift phase (must be > 0).
    pub phase_divisor_secs: f64,
    /// Phase offset between consecutive stations.
    pub station_phase_offset: f64,
    /// Fraction of the gap to baseline reliability closed per advance (0.0–1.0).
    pub reversion_rate: f64,
    /// Half-width of the uniform reliability jitter.
    pub reliability_jitter: f64,
    /// Upper bound on queue length.
    pub max_queue: u32,
    /// Lower reliability bound.
    pub min_reliability: f64,
    /// Upper reliability bound.
    pub max_reliability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let d = DynamicsParams::default();
        Self {
            seed: None,
            throttle_secs: d.throttle_secs,
            phase_divisor_secs: d.phase_divisor_secs,
            station_phase_offset: d.station_phase_offset,
            reversion_rate: d.reversion_rate,
            reliability_jitter: d.reliability_jitter,
            max_queue: d.max_queue,
            min_reliability: d.min_reliability,
            max_reliability: d.max_reliability,
        }
    }
}

impl SimulationConfig {
    /// Dynamics parameters described by this section.
    pub fn dynamics(&self) -> DynamicsParams {
        DynamicsParams {
            throttle_secs: self.throttle_secs,
            phase_divisor_secs: self.phase_divisor_secs,
            station_phase_offset: self.station_phase_offset,
            reversion_rate: self.reversion_rate,
            reliability_jitter: self.reliability_jitter,
            max_queue: self.max_queue,
            min_reliability: self.min_reliability,
            max_reliability: self.max_reliability,
        }
    }
}

/// One roster entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    /// Unique station id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Typical approach speed (km/h).
    pub avg_speed_kph: f64,
    /// Initial queue length.
    #[serde(default)]
    pub queue_length: u32,
    /// Baseline reliability; also the initial reliability.
    pub reliability: f64,
}

impl StationConfig {
    fn new(
        id: &str,
        name: &str,
        lat: f64,
        lng: f64,
        avg_speed_kph: f64,
        queue_length: u32,
        reliability: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lng,
            avg_speed_kph,
            queue_length,
            reliability,
        }
    }

    /// Immutable baseline for this entry.
    pub fn baseline(&self) -> StationBaseline {
        StationBaseline {
            id: self.id.clone(),
            name: self.name.clone(),
            lat: self.lat,
            lng: self.lng,
            avg_speed_kph: self.avg_speed_kph,
            baseline_reliability: self.reliability,
        }
    }
}

fn india_roster() -> Vec<StationConfig> {
    vec![
        StationConfig::new("blr-1", "Koramangala Swap Hub", 12.9352, 77.6245, 42.0, 4, 0.93),
        StationConfig::new("blr-2", "Whitefield Energy Point", 12.9698, 77.7499, 45.0, 3, 0.95),
        StationConfig::new("blr-3", "Hebbal QuickSwap", 13.0358, 77.597, 48.0, 2, 0.90),
        StationConfig::new("bom-1", "Andheri Swap Center", 19.1197, 72.8468, 38.0, 6, 0.90),
        StationConfig::new("bom-2", "BKC Charge & Swap", 19.0606, 72.867, 35.0, 7, 0.88),
        StationConfig::new("del-1", "Connaught Circle Swap", 28.6315, 77.2167, 40.0, 5, 0.92),
        StationConfig::new("del-2", "Gurugram RapidSwap", 28.4595, 77.0266, 46.0, 3, 0.94),
        StationConfig::new("pun-1", "Hinjawadi Swap Spot", 18.5919, 73.7389, 44.0, 1, 0.96),
        StationConfig::new("hyd-1", "HITEC Power Swap", 17.4483, 78.3915, 43.0, 2, 0.93),
        StationConfig::new("gen-1", "Expressway Swap North", 22.5726, 88.3639, 47.0, 3, 0.91),
        StationConfig::new("gen-2", "Ring Road Swap West", 23.0225, 72.5714, 45.0, 2, 0.95),
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"stations[2].reliability"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Every production station across the five metro areas.
    pub fn india() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            stations: india_roster(),
        }
    }

    /// Bengaluru stations only, with a fixed seed for repeatable demos.
    pub fn bengaluru() -> Self {
        Self {
            simulation: SimulationConfig {
                seed: Some(42),
                ..SimulationConfig::default()
            },
            stations: india_roster()
                .into_iter()
                .filter(|s| s.id.starts_with("blr-"))
                .collect(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["india", "bengaluru"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "india" => Ok(Self::india()),
            "bengaluru" => Ok(Self::bengaluru()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(ConfigError {
                field,
                message: message.to_string(),
            });
        };
        let s = &self.simulation;

        if !(s.throttle_secs.is_finite() && s.throttle_secs >= 0.0) {
            push("simulation.throttle_secs".into(), "must be finite and >= 0");
        }
        if !(s.phase_divisor_secs.is_finite() && s.phase_divisor_secs > 0.0) {
            push("simulation.phase_divisor_secs".into(), "must be finite and > 0");
        }
        if !s.station_phase_offset.is_finite() {
            push("simulation.station_phase_offset".into(), "must be finite");
        }
        if !(0.0..=1.0).contains(&s.reversion_rate) {
            push("simulation.reversion_rate".into(), "must be in [0.0, 1.0]");
        }
        if !(s.reliability_jitter.is_finite() && s.reliability_jitter >= 0.0) {
            push("simulation.reliability_jitter".into(), "must be finite and >= 0");
        }
        if !(0.0..=1.0).contains(&s.min_reliability) {
            push("simulation.min_reliability".into(), "must be in [0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&s.max_reliability) {
            push("simulation.max_reliability".into(), "must be in [0.0, 1.0]");
        }
        if s.min_reliability > s.max_reliability {
            push(
                "simulation.min_reliability".into(),
                "must be <= simulation.max_reliability",
            );
        }

        if self.stations.is_empty() {
            push("stations".into(), "must contain at least one station");
        }

        let mut seen = HashSet::new();
        for (i, st) in self.stations.iter().enumerate() {
            let field = |name: &str| format!("stations[{i}].{name}");
            if st.id.trim().is_empty() {
                push(field("id"), "must not be empty");
            } else if !seen.insert(st.id.as_str()) {
                push(field("id"), "duplicate station id");
            }
            if !(-90.0..=90.0).contains(&st.lat) {
                push(field("lat"), "must be in [-90, 90]");
            }
            if !(-180.0..=180.0).contains(&st.lng) {
                push(field("lng"), "must be in [-180, 180]");
            }
            if !(st.avg_speed_kph.is_finite() && st.avg_speed_kph > 0.0) {
                push(field("avg_speed_kph"), "must be finite and > 0");
            }
            if st.queue_length > s.max_queue {
                push(field("queue_length"), "must be <= simulation.max_queue");
            }
            if !(s.min_reliability..=s.max_reliability).contains(&st.reliability) {
                push(
                    field("reliability"),
                    "must be within [simulation.min_reliability, simulation.max_reliability]",
                );
            }
        }

        errors
    }
}

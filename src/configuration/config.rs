//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – step size, step count, optional gravity floor and output path
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   dt: 60.0                # step size
//!   steps: 1440             # number of steps
//!   min_separation: 1.0     # optional, distance floor for gravity
//!   output: "earth_moon.csv"  # optional, CSV path
//!
//! bodies:
//!   - name: "earth"         # optional
//!     pos: [ 0.0, 0.0, 0.0 ]
//!     vel: [ 0.0, 0.0, 0.0 ]
//!     mu: 3.986004418e14
//!   - name: "moon"
//!     pos: [ 3.844e8, 0.0, 0.0 ]
//!     vel: [ 0.0, 1022.0, 0.0 ]
//!     mu: 4.9048695e12
//! ```
//!
//! The runtime scenario (`simulation::scenario`) is built from this after
//! [`ScenarioConfig::validate`] has accepted it.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Global numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    pub dt: f64, // time step size
    pub steps: usize, // number of steps to integrate
    #[serde(default)]
    pub min_separation: Option<f64>, // gravity distance floor, unset means unguarded
    #[serde(default)]
    pub output: Option<String>, // CSV destination
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: Option<String>, // display label
    pub pos: [f64; 3], // initial position
    pub vel: [f64; 3], // initial velocity
    pub mu: f64, // gravitational parameter
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(src).context("invalid scenario YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the integrator would happily accept but that make no
    /// sense for a real run
    pub fn validate(&self) -> Result<()> {
        let p = &self.parameters;
        ensure!(
            p.dt.is_finite() && p.dt > 0.0,
            "dt must be a positive finite number, got {}",
            p.dt
        );
        if let Some(sep) = p.min_separation {
            ensure!(
                sep.is_finite() && sep > 0.0,
                "min_separation must be a positive finite number, got {sep}"
            );
        }

        for (i, b) in self.bodies.iter().enumerate() {
            let label = b.name.clone().unwrap_or_else(|| format!("body{i}"));
            ensure!(
                b.mu.is_finite() && b.mu >= 0.0,
                "{label}: mu must be a non-negative finite number, got {}",
                b.mu
            );
            ensure!(
                b.pos.iter().chain(b.vel.iter()).all(|c| c.is_finite()),
                "{label}: position and velocity must be finite"
            );
        }

        Ok(())
    }
}

/// Read and validate a scenario file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open scenario {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid scenario {}", path.display()))?;
    Ok(cfg)
}

/// Scenarios shipped with the crate
pub fn bundled_scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

/// Locate a scenario file
///
/// Absolute paths and paths that exist are used as given. Otherwise a
/// relative name is looked up in `bundled_dir`, falling back to the name
/// itself so the open error reports what the user typed.
pub fn resolve_scenario(file: &Path, bundled_dir: &Path) -> PathBuf {
    if file.is_absolute() || file.exists() {
        return file.to_path_buf();
    }
    let bundled = bundled_dir.join(file);
    if bundled.exists() {
        bundled
    } else {
        file.to_path_buf()
    }
}

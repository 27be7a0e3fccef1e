//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - numerical parameters (`Parameters`)
//! - the initial state (bodies at t = 0)
//! - the active force set (`ForceSet`)

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::output::csv::DEFAULT_OUTPUT;
use crate::simulation::forces::{ForceSet, NewtonianGravity};
use crate::simulation::integrator::ForwardEuler;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, History, NVec3, State};

/// Runtime bundle constructed from a [`ScenarioConfig`]
pub struct Scenario {
    pub parameters: Parameters,
    pub bodies: State,
    pub forces: ForceSet,
    pub output: Option<String>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies: State = cfg
            .bodies
            .into_iter()
            .map(|bc: BodyConfig| Body {
                name: bc.name,
                pos: NVec3::from(bc.pos),
                vel: NVec3::from(bc.vel),
                mu: bc.mu,
            })
            .collect();

        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            steps: p_cfg.steps,
            min_separation: p_cfg.min_separation,
        };

        Self::new(parameters, bodies).with_output(p_cfg.output)
    }

    /// Scenario with Newtonian gravity as its only force term
    pub fn new(parameters: Parameters, bodies: State) -> Self {
        let gravity = NewtonianGravity {
            min_separation: parameters.min_separation,
        };
        let forces = ForceSet::new().with(gravity);

        Self {
            parameters,
            bodies,
            forces,
            output: None,
        }
    }

    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    /// Where the trajectory goes: `flag` (the `-o` option) first, then the
    /// scenario's own `output`, then [`DEFAULT_OUTPUT`]
    pub fn output_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.output.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Integrate the scenario with forward Euler
    pub fn run(&self) -> History {
        let p = &self.parameters;
        info!(
            "running {} bodies for {} steps of dt = {} (t_end = {})",
            self.bodies.len(),
            p.steps,
            p.dt,
            p.t_end()
        );

        let euler = ForwardEuler::new(p.dt, p.steps, self.bodies.clone(), &self.forces);
        let history = euler.run();
        debug!("produced {} states", history.len());

        if let Some(n) = history.first_non_finite() {
            warn!(
                "non-finite values from state {n} (t = {}); check for coincident bodies",
                history.time_at(n)
            );
        }

        history
    }
}

//! Numerical parameters for a simulation run
//!
//! `Parameters` holds runtime settings:
//! - step size and step count (`dt`, `steps`),
//! - optional minimum separation for the gravity term

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64, // step size
    pub steps: usize, // number of steps
    pub min_separation: Option<f64>, // gravity distance floor
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: 100.0,
            steps: 100,
            min_separation: None,
        }
    }
}

impl Parameters {
    /// Elapsed time covered by a full run
    pub fn t_end(&self) -> f64 {
        self.steps as f64 * self.dt
    }
}

//! Fixed-step time integration for the N-body system
//!
//! Provides a forward Euler integrator driven by any [`ForceModel`]. It is
//! first order (O(dt) local truncation error) and not symplectic, so energy
//! drifts over long runs.

use super::forces::ForceModel;
use super::states::{History, State};

/// Forward Euler integrator over a fixed number of steps
///
/// For step `n` (state `n-1` -> state `n`) and every body `i`:
///
/// ```text
/// a        = force(state[n-1], t = (n-1) * dt)[i]
/// v_n[i]   = v_{n-1}[i] + dt * a
/// x_n[i]   = x_{n-1}[i] + dt * v_{n-1}[i]      // previous velocity
/// ```
///
/// `name` and `mu` are carried through unchanged. Nothing is validated here:
/// a zero `dt` gives a constant history and NaN/Inf from the force model flow
/// straight into the output.
pub struct ForwardEuler<'a> {
    pub dt: f64, // time step
    pub steps: usize, // number of steps to take
    pub initial_conditions: State, // state at t = 0
    force: &'a dyn ForceModel,
}

impl<'a> ForwardEuler<'a> {
    pub fn new(
        dt: f64,
        steps: usize,
        initial_conditions: State,
        force: &'a dyn ForceModel,
    ) -> Self {
        Self {
            dt,
            steps,
            initial_conditions,
            force,
        }
    }

    /// Integrate from the initial conditions, returning `steps + 1` states
    ///
    /// Repeatable: every call starts from the constructor's snapshot.
    pub fn run(&self) -> History {
        let mut states = Vec::with_capacity(self.steps + 1);
        states.push(self.initial_conditions.clone());

        for n in 1..=self.steps {
            // time of the state the forces are evaluated on
            let t = (n - 1) as f64 * self.dt;
            let next = self.step(&states[n - 1], t);
            states.push(next);
        }

        History {
            dt: self.dt,
            states,
        }
    }

    /// Advance one state by a single step
    pub fn step(&self, prev: &State, t: f64) -> State {
        let dt = self.dt;
        let accels = self.force.accelerations(t, prev);

        prev.iter()
            .zip(accels.iter())
            .map(|(b, a)| {
                let mut next = b.clone();
                next.vel = b.vel + dt * *a;
                next.pos = b.pos + dt * b.vel;
                next
            })
            .collect()
    }
}

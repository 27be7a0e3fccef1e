//! Force / acceleration contributors for the n-body engine
//!
//! Defines the [`ForceModel`] trait, direct Newtonian gravity driven by each
//! body's gravitational parameter, a closure adapter and a set that sums
//! several models

use crate::simulation::states::{Body, NVec3};

/// Source of accelerations on the bodies of a [`State`](crate::State)
///
/// Implementations add their contribution into `out[i]` for each body `i`,
/// leaving the buffer positionally aligned with `state`. `t` is the time of
/// `state` and is only meaningful for time-dependent models.
pub trait ForceModel {
    fn acceleration(&self, t: f64, state: &[Body], out: &mut [NVec3]);

    /// Fresh acceleration per body, starting from zero
    fn accelerations(&self, t: f64, state: &[Body]) -> Vec<NVec3> {
        let mut out = vec![NVec3::zeros(); state.len()];
        self.acceleration(t, state, &mut out);
        out
    }
}

/// Direct O(N^2) Newtonian gravity
///
/// `a_i = sum_{j != i} mu_j * (x_j - x_i) / |x_j - x_i|^3`, with `j` walked in
/// ascending order so every body's sum is reproducible to the last bit.
///
/// Two bodies at the same position divide by zero and produce NaN/Inf unless
/// `min_separation` is set, in which case the distance in the denominator is
/// never allowed below it.
#[derive(Debug, Clone, Default)]
pub struct NewtonianGravity {
    pub min_separation: Option<f64>, // distance floor, off by default
}

impl NewtonianGravity {
    pub fn new() -> Self {
        Self {
            min_separation: None,
        }
    }

    pub fn with_min_separation(min_separation: f64) -> Self {
        Self {
            min_separation: Some(min_separation),
        }
    }

    /// Acceleration on body `i` due to every other body in `state`
    pub fn acceleration_on(&self, i: usize, state: &[Body]) -> NVec3 {
        let xi = state[i].pos;
        let mut acc = NVec3::zeros();

        for (j, bj) in state.iter().enumerate() {
            if j == i {
                continue;
            }

            // r points from i to j, so i is pulled along +r
            let r = bj.pos - xi;

            let mut dist = r.norm();
            if let Some(floor) = self.min_separation {
                dist = dist.max(floor);
            }

            let coef = bj.mu / dist.powi(3);
            acc += coef * r;
        }

        acc
    }
}

impl ForceModel for NewtonianGravity {
    #[cfg(not(feature = "parallel"))]
    fn acceleration(&self, _t: f64, state: &[Body], out: &mut [NVec3]) {
        for (i, a) in out.iter_mut().enumerate().take(state.len()) {
            *a += self.acceleration_on(i, state);
        }
    }

    #[cfg(feature = "parallel")]
    fn acceleration(&self, _t: f64, state: &[Body], out: &mut [NVec3]) {
        use rayon::prelude::*;

        // each body still sums its own j terms serially
        out.par_iter_mut()
            .take(state.len())
            .enumerate()
            .for_each(|(i, a)| *a += self.acceleration_on(i, state));
    }
}

/// Adapter turning a plain function or closure into a [`ForceModel`]
///
/// The closure returns one acceleration per body; extra entries are ignored
/// and missing ones contribute nothing.
pub struct ForceFn<F>(pub F);

impl<F> ForceModel for ForceFn<F>
where
    F: Fn(f64, &[Body]) -> Vec<NVec3>,
{
    fn acceleration(&self, t: f64, state: &[Body], out: &mut [NVec3]) {
        for (a, da) in out.iter_mut().zip((self.0)(t, state)) {
            *a += da;
        }
    }
}

/// Collection of acceleration terms
/// Each term implements [`ForceModel`] and their contributions are summed
/// into a single acceleration vector per body, in registration order
#[derive(Default)]
pub struct ForceSet {
    terms: Vec<Box<dyn ForceModel + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceModel + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl ForceModel for ForceSet {
    fn acceleration(&self, t: f64, state: &[Body], out: &mut [NVec3]) {
        for term in &self.terms {
            term.acceleration(t, state, out);
        }
    }
}

//! Core state types for the N-body simulation.
//!
//! - `Body`    one point mass using `NVec3`
//! - `State`   the ordered bodies at one instant
//! - `History` every state produced by a run, plus the `dt` that spaced them
//!
//! Index position inside a `State` is a body's identity across time.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: Option<String>, // display label only
    pub pos: NVec3, // position
    pub vel: NVec3, // velocity
    pub mu: f64, // gravitational parameter (G * m)
}

impl Body {
    pub fn new(pos: NVec3, vel: NVec3, mu: f64) -> Self {
        Self {
            name: None,
            pos,
            vel,
            mu,
        }
    }

    pub fn named(name: impl Into<String>, pos: NVec3, vel: NVec3, mu: f64) -> Self {
        Self {
            name: Some(name.into()),
            pos,
            vel,
            mu,
        }
    }

    /// Label used by the CSV header and the session listing
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("body{index}"),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|c| c.is_finite())
    }
}

/// Configuration of the whole system at one instant
pub type State = Vec<Body>;

/// Ordered states of one run, `states[n]` sits at time `n * dt`
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    pub dt: f64, // step size the states were produced with
    pub states: Vec<State>,
}

impl History {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Elapsed time at state `n`
    pub fn time_at(&self, n: usize) -> f64 {
        n as f64 * self.dt
    }

    pub fn initial(&self) -> Option<&State> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State> {
        self.states.iter()
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Equality on the raw bits of every position and velocity
    ///
    /// Unlike `==` this holds for two runs that both went NaN, so it is the
    /// check for reproducibility. `dt`, names and `mu` must also match.
    pub fn bitwise_eq(&self, other: &History) -> bool {
        fn body_bits(b: &Body) -> impl Iterator<Item = u64> + '_ {
            b.pos.iter().chain(b.vel.iter()).map(|c| c.to_bits())
        }

        self.dt.to_bits() == other.dt.to_bits()
            && self.states.len() == other.states.len()
            && self.states.iter().zip(&other.states).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        x.name == y.name
                            && x.mu.to_bits() == y.mu.to_bits()
                            && body_bits(x).eq(body_bits(y))
                    })
            })
    }

    /// Index of the first state holding a NaN or infinite position/velocity
    pub fn first_non_finite(&self) -> Option<usize> {
        self.states
            .iter()
            .position(|state| !state.iter().all(Body::is_finite))
    }
}

impl std::ops::Index<usize> for History {
    type Output = State;

    fn index(&self, n: usize) -> &State {
        &self.states[n]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a State;
    type IntoIter = std::slice::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

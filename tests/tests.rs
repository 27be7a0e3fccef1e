use std::cell::RefCell;

use approx::assert_relative_eq;

use orbsim::simulation::forces::{ForceFn, ForceModel, ForceSet, NewtonianGravity};
use orbsim::simulation::integrator::ForwardEuler;
use orbsim::simulation::states::{Body, NVec3, State};

/// Test particle (mu = 0) at the origin and a unit-mu body at (1, 0, 0)
pub fn probe_and_primary() -> State {
    vec![
        Body::named("probe", NVec3::zeros(), NVec3::zeros(), 0.0),
        Body::named("primary", NVec3::new(1.0, 0.0, 0.0), NVec3::zeros(), 1.0),
    ]
}

/// Build a simple 2-body state separated along the x-axis
pub fn two_body_state(dist: f64, mu1: f64, mu2: f64) -> State {
    vec![
        Body::new(NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros(), mu1),
        Body::new(NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros(), mu2),
    ]
}

/// Handful of bodies at scattered positions, deterministic
pub fn scattered_state(n: usize) -> State {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            Body::new(
                NVec3::new((i_f * 0.37).sin() * 5.0, (i_f * 0.13).cos() * 5.0, (i_f * 0.07).sin() * 5.0),
                NVec3::new((i_f * 0.11).cos(), 0.0, (i_f * 0.29).sin()),
                0.1 + 0.01 * i_f,
            )
        })
        .collect()
}

/// Uniform field pulling every body along `a`
pub fn uniform_field(a: NVec3) -> ForceFn<impl Fn(f64, &[Body]) -> Vec<NVec3>> {
    ForceFn(move |_t: f64, state: &[Body]| vec![a; state.len()])
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_no_pairs_gives_zero() {
    let gravity = NewtonianGravity::new();

    assert!(gravity.accelerations(0.0, &[]).is_empty());

    let lone = vec![Body::new(NVec3::new(3.0, -2.0, 1.0), NVec3::new(1.0, 1.0, 1.0), 5.0)];
    assert_eq!(gravity.accelerations(0.0, &lone), vec![NVec3::zeros()]);
}

#[test]
fn gravity_output_aligned_with_input() {
    let state = scattered_state(7);
    let acc = NewtonianGravity::new().accelerations(0.0, &state);

    assert_eq!(acc.len(), state.len());
}

#[test]
fn gravity_massless_body_feels_pull_but_exerts_none() {
    // A (mu = 0) at origin, B (mu = 3) at distance 2 along x
    let state = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), 0.0),
        Body::new(NVec3::new(2.0, 0.0, 0.0), NVec3::zeros(), 3.0),
    ];
    let acc = NewtonianGravity::new().accelerations(0.0, &state);

    // |a_A| = M / d^2 = 3 / 4, toward B
    assert_eq!(acc[0], NVec3::new(0.75, 0.0, 0.0));
    assert_eq!(acc[1], NVec3::zeros());
}

#[test]
fn gravity_points_toward_other_body() {
    let state = two_body_state(2.0, 1.0, 1.0);
    let acc = NewtonianGravity::new().accelerations(0.0, &state);

    let dx = state[1].pos - state[0].pos;
    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(acc[1].dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_inverse_square_law() {
    let gravity = NewtonianGravity::new();
    let acc_r = gravity.accelerations(0.0, &two_body_state(1.0, 1.0, 1.0));
    let acc_2r = gravity.accelerations(0.0, &two_body_state(2.0, 1.0, 1.0));

    let ratio = acc_r[0].norm() / acc_2r[0].norm();
    assert_relative_eq!(ratio, 4.0, epsilon = 1e-12);
}

#[test]
fn gravity_scales_with_other_bodys_mu() {
    let gravity = NewtonianGravity::new();
    let acc = gravity.accelerations(0.0, &two_body_state(1.0, 2.0, 6.0));

    // body 0 is pulled by mu = 6, body 1 by mu = 2
    assert_relative_eq!(acc[0].norm(), 6.0, epsilon = 1e-12);
    assert_relative_eq!(acc[1].norm(), 2.0, epsilon = 1e-12);
}

#[test]
fn gravity_sums_in_ascending_index_order() {
    let state = scattered_state(9);
    let acc = NewtonianGravity::new().accelerations(0.0, &state);

    for i in 0..state.len() {
        let mut expected = NVec3::zeros();
        for j in 0..state.len() {
            if j == i {
                continue;
            }
            let r = state[j].pos - state[i].pos;
            expected += (state[j].mu / r.norm().powi(3)) * r;
        }
        assert_eq!(acc[i], expected, "body {i} differs from the ascending sum");
    }
}

#[test]
fn gravity_coincident_bodies_are_singular() {
    let p = NVec3::new(1.0, 2.0, 3.0);
    let state = vec![Body::new(p, NVec3::zeros(), 1.0), Body::new(p, NVec3::zeros(), 1.0)];
    let acc = NewtonianGravity::new().accelerations(0.0, &state);

    assert!(acc.iter().all(|a| a.iter().any(|c| !c.is_finite())));
}

#[test]
fn gravity_min_separation_keeps_coincident_bodies_finite() {
    let p = NVec3::new(1.0, 2.0, 3.0);
    let state = vec![Body::new(p, NVec3::zeros(), 1.0), Body::new(p, NVec3::zeros(), 1.0)];
    let acc = NewtonianGravity::with_min_separation(0.1).accelerations(0.0, &state);

    assert_eq!(acc, vec![NVec3::zeros(), NVec3::zeros()]);
}

#[test]
fn gravity_min_separation_only_acts_below_the_floor() {
    let floored = NewtonianGravity::with_min_separation(1.0);

    // d = 0.5 < 1: a = mu * r / floor^3 = 0.5
    let close = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), 0.0),
        Body::new(NVec3::new(0.5, 0.0, 0.0), NVec3::zeros(), 1.0),
    ];
    assert_eq!(floored.accelerations(0.0, &close)[0], NVec3::new(0.5, 0.0, 0.0));

    // d = 2 > 1: unchanged from the unguarded model
    let far = two_body_state(2.0, 1.0, 1.0);
    assert_eq!(
        floored.accelerations(0.0, &far),
        NewtonianGravity::new().accelerations(0.0, &far)
    );
}

#[test]
fn force_set_sums_terms() {
    let state = two_body_state(2.0, 1.0, 1.0);
    let push = NVec3::new(0.0, 0.0, 1.0);
    let set = ForceSet::new()
        .with(NewtonianGravity::new())
        .with(uniform_field(push));
    assert_eq!(set.len(), 2);

    let gravity_only = NewtonianGravity::new().accelerations(0.0, &state);
    let combined = set.accelerations(0.0, &state);

    for (c, g) in combined.iter().zip(gravity_only.iter()) {
        assert_eq!(*c, *g + push);
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn euler_history_length_is_steps_plus_one() {
    let gravity = NewtonianGravity::new();
    for steps in [0, 1, 2, 17] {
        let history = ForwardEuler::new(0.1, steps, scattered_state(4), &gravity).run();
        assert_eq!(history.len(), steps + 1);
        assert_eq!(history.dt, 0.1);
    }
}

#[test]
fn euler_zero_steps_returns_only_initial_state() {
    let gravity = NewtonianGravity::new();
    let initial = probe_and_primary();
    let history = ForwardEuler::new(1.0, 0, initial.clone(), &gravity).run();

    assert_eq!(history.states, vec![initial]);
}

#[test]
fn euler_history_head_is_initial_conditions() {
    let gravity = NewtonianGravity::new();
    let initial = scattered_state(5);
    let history = ForwardEuler::new(0.25, 10, initial.clone(), &gravity).run();

    assert_eq!(history[0], initial);
}

#[test]
fn euler_single_step_arithmetic() {
    let gravity = NewtonianGravity::new();
    let history = ForwardEuler::new(1.0, 1, probe_and_primary(), &gravity).run();

    let probe = &history[1][0];
    assert_eq!(probe.vel, NVec3::new(1.0, 0.0, 0.0));
    // position moves with the old (zero) velocity
    assert_eq!(probe.pos, NVec3::zeros());

    let primary = &history[1][1];
    assert_eq!(primary.vel, NVec3::zeros());
    assert_eq!(primary.pos, NVec3::new(1.0, 0.0, 0.0));
}

#[test]
fn euler_position_uses_previous_velocity() {
    let field = uniform_field(NVec3::new(0.0, 2.0, 0.0));
    let initial = vec![Body::new(NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0), 0.0)];
    let history = ForwardEuler::new(0.5, 2, initial, &field).run();

    assert_eq!(history[1][0].pos, NVec3::new(0.5, 0.0, 0.0));
    assert_eq!(history[1][0].vel, NVec3::new(1.0, 1.0, 0.0));
    assert_eq!(history[2][0].pos, NVec3::new(1.0, 0.5, 0.0));
    assert_eq!(history[2][0].vel, NVec3::new(1.0, 2.0, 0.0));
}

#[test]
fn euler_carries_name_and_mu_through() {
    let gravity = NewtonianGravity::new();
    let history = ForwardEuler::new(0.01, 5, probe_and_primary(), &gravity).run();

    for state in &history {
        assert_eq!(state[0].name.as_deref(), Some("probe"));
        assert_eq!(state[0].mu, 0.0);
        assert_eq!(state[1].name.as_deref(), Some("primary"));
        assert_eq!(state[1].mu, 1.0);
    }
}

#[test]
fn euler_runs_are_bit_identical() {
    let gravity = NewtonianGravity::new();
    let euler = ForwardEuler::new(0.01, 50, scattered_state(6), &gravity);

    let first = euler.run();
    let second = euler.run();
    assert!(first.bitwise_eq(&second));

    let fresh = ForwardEuler::new(0.01, 50, scattered_state(6), &gravity).run();
    assert!(first.bitwise_eq(&fresh));
}

#[test]
fn euler_keeps_body_order_with_equal_values() {
    let gravity = NewtonianGravity::new();
    let p = NVec3::new(1.0, 0.0, 0.0);
    let initial = vec![
        Body::named("first", p, NVec3::zeros(), 0.0),
        Body::named("second", p, NVec3::zeros(), 0.0),
        Body::named("third", NVec3::zeros(), NVec3::zeros(), 2.0),
    ];
    let history = ForwardEuler::new(0.1, 4, initial, &gravity).run();

    for state in &history {
        let names: Vec<_> = state.iter().map(|b| b.name.as_deref().unwrap_or("")).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }
}

#[test]
fn euler_singularity_propagates_from_first_step() {
    let gravity = NewtonianGravity::new();
    let p = NVec3::new(0.0, 1.0, 0.0);
    let initial = vec![Body::new(p, NVec3::zeros(), 1.0), Body::new(p, NVec3::zeros(), 1.0)];
    let history = ForwardEuler::new(0.1, 3, initial, &gravity).run();

    assert_eq!(history.len(), 4);
    assert!(history[0].iter().all(Body::is_finite));
    assert!(history[1].iter().all(|b| !b.is_finite()));
    assert_eq!(history.first_non_finite(), Some(1));
    assert!(!history.is_finite());
}

#[test]
fn euler_singular_runs_are_still_bit_identical() {
    let gravity = NewtonianGravity::new();
    let p = NVec3::new(0.0, 1.0, 0.0);
    let initial = vec![Body::new(p, NVec3::zeros(), 1.0), Body::new(p, NVec3::zeros(), 1.0)];
    let euler = ForwardEuler::new(0.1, 3, initial, &gravity);

    let first = euler.run();
    let second = euler.run();

    // NaN never compares equal, the raw bits do
    assert_ne!(first, second);
    assert!(first.bitwise_eq(&second));
}

#[test]
fn history_bitwise_eq_spots_differences() {
    let gravity = NewtonianGravity::new();
    let base = ForwardEuler::new(0.1, 3, scattered_state(3), &gravity).run();

    let mut nudged = base.clone();
    nudged.states[2][1].vel.x = f64::from_bits(nudged.states[2][1].vel.x.to_bits() + 1);
    assert!(!base.bitwise_eq(&nudged));

    let mut renamed = base.clone();
    renamed.states[0][0].name = Some("other".to_string());
    assert!(!base.bitwise_eq(&renamed));

    let shorter = ForwardEuler::new(0.1, 2, scattered_state(3), &gravity).run();
    assert!(!base.bitwise_eq(&shorter));
}

#[test]
fn euler_empty_state_gives_empty_states() {
    let gravity = NewtonianGravity::new();
    let history = ForwardEuler::new(1.0, 3, Vec::new(), &gravity).run();

    assert_eq!(history.len(), 4);
    assert!(history.iter().all(|state| state.is_empty()));
    assert!(history.is_finite());
}

#[test]
fn euler_zero_dt_is_constant() {
    let gravity = NewtonianGravity::new();
    let initial = scattered_state(3);
    let history = ForwardEuler::new(0.0, 5, initial.clone(), &gravity).run();

    assert!(history.iter().all(|state| *state == initial));
}

#[test]
fn euler_evaluates_forces_at_previous_state_time() {
    let seen = RefCell::new(Vec::new());
    let recorder = ForceFn(|t: f64, state: &[Body]| {
        seen.borrow_mut().push(t);
        vec![NVec3::zeros(); state.len()]
    });

    let history = ForwardEuler::new(0.5, 3, probe_and_primary(), &recorder).run();

    assert_eq!(*seen.borrow(), vec![0.0, 0.5, 1.0]);
    assert_eq!(history.time_at(3), 1.5);
}

#[test]
fn euler_circular_orbit_drifts_outward() {
    // forward Euler gains energy every step, so the orbit spirals out
    let gravity = NewtonianGravity::new();
    let initial = vec![
        Body::new(NVec3::new(1.0, 0.0, 0.0), NVec3::new(0.0, 1.0, 0.0), 0.0),
        Body::new(NVec3::zeros(), NVec3::zeros(), 1.0),
    ];
    let history = ForwardEuler::new(0.01, 1000, initial, &gravity).run();

    let last = history.last().expect("history is never empty");
    let r_final = (last[0].pos - last[1].pos).norm();
    assert!(r_final > 1.0, "radius did not grow: {r_final}");
}

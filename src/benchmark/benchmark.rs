use std::time::Instant;

use crate::simulation::forces::{ForceModel, ForceSet, NewtonianGravity};
use crate::simulation::integrator::ForwardEuler;
use crate::simulation::states::{Body, NVec3, State};

/// Time a single direct gravity evaluation, unguarded and with a distance floor
pub fn bench_gravity() {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let state = make_state(n);

        let direct = NewtonianGravity::new();
        let floored = NewtonianGravity::with_min_separation(1e-3);

        // Warm up
        let _ = direct.accelerations(0.0, &state);
        let _ = floored.accelerations(0.0, &state);

        let t0 = Instant::now();
        let _ = direct.accelerations(0.0, &state);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let _ = floored.accelerations(0.0, &state);
        let dt_floored = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {:8.6} s, floored = {:8.6} s", dt_direct, dt_floored);
    }
}

/// Time forward Euler runs, reporting seconds per step
pub fn bench_euler() {
    let ns = [200, 400, 800, 1600, 3200];
    let steps = 4; // number of integrator steps per model

    for n in ns {
        let forces = ForceSet::new().with(NewtonianGravity::new());
        let euler = ForwardEuler::new(1e-3, steps, make_state(n), &forces);

        // Warm-up
        let _ = euler.step(&euler.initial_conditions, 0.0);

        let t0 = Instant::now();
        let history = euler.run();
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!(
            "N = {:5}, euler step = {:8.6} s ({} states)",
            n,
            per_step,
            history.len()
        );
    }
}

/// One Euler step for a range of n, printed as CSV for graphing
pub fn bench_euler_curve() {
    println!("N,step_ms");

    for n in (200..=6400).step_by(200) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 800 { 5 } else { 1 };

        let forces = ForceSet::new().with(NewtonianGravity::new());
        let euler = ForwardEuler::new(1e-3, steps, make_state(n), &forces);

        let t0 = Instant::now();
        let _ = euler.run();
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
}

/// Deterministic state of size `n`, no rand needed
fn make_state(n: usize) -> State {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let pos = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            Body::new(pos, NVec3::zeros(), 0.1)
        })
        .collect()
}

pub mod simulation;
pub mod configuration;
pub mod output;
pub mod session;
pub mod logging;
pub mod benchmark;

pub use simulation::states::{Body, State, History, NVec3};
pub use simulation::forces::{ForceModel, ForceFn, ForceSet, NewtonianGravity};
pub use simulation::integrator::ForwardEuler;
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, ParametersConfig, BodyConfig, load_scenario};

pub use output::csv::{write_history, save_to_file};
pub use session::Session;

pub use benchmark::benchmark::{bench_gravity, bench_euler, bench_euler_curve};

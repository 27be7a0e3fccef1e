use orbsim::{load_scenario, save_to_file, Scenario, Session};
use orbsim::configuration::config::{bundled_scenarios_dir, resolve_scenario};
use orbsim::{bench_gravity, bench_euler, bench_euler_curve};
use orbsim::logging;

use clap::{Parser, ValueEnum};
use anyhow::Result;
use log::info;

use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(about = "N-body orbital simulator")]
struct Args {
    /// Scenario YAML to run; without it an interactive session starts
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// CSV destination, overrides the scenario's `output`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run a timing benchmark instead of a simulation
    #[arg(long, value_enum)]
    bench: Option<Bench>,

    /// More logging, repeat for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Bench {
    Gravity,
    Euler,
    Curve,
}

fn run_scenario(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let path = resolve_scenario(file, &bundled_scenarios_dir());
    info!("loading scenario {}", path.display());
    let scenario = Scenario::build_scenario(load_scenario(&path)?);

    let history = scenario.run();

    save_to_file(&scenario.output_path(output), &history)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(logging::level_from_verbosity(args.verbose, args.quiet));

    if let Some(bench) = args.bench {
        match bench {
            Bench::Gravity => bench_gravity(),
            Bench::Euler => bench_euler(),
            Bench::Curve => bench_euler_curve(),
        }
        return Ok(());
    }

    match args.file {
        Some(file) => run_scenario(&file, args.output),
        None => {
            let stdin = io::stdin();
            let mut session = Session::new(stdin.lock(), io::stdout());
            if let Some(out) = args.output {
                session.file_name = out.display().to_string();
            }
            session.run()
        }
    }
}

//! Interactive, menu-driven front end
//!
//! A [`Session`] owns the body list being edited, the run settings and the
//! output filename. It reads whitespace separated words from any `BufRead`
//! and writes prompts and reports to any `Write`, so it runs the same on a
//! terminal and in tests. End of input ends the session.

pub mod commands;

use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use log::{error, info};

use crate::output::csv::save_to_file;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, NVec3, State};
use commands::{Command, HELP};

pub const DEFAULT_FILE_NAME: &str = crate::output::csv::DEFAULT_OUTPUT;

/// dt used when a negative step is entered
const FALLBACK_DT: f64 = 0.01;

/// Raised when input runs out in the middle of a prompt
#[derive(Debug)]
struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input closed")
    }
}

impl std::error::Error for InputClosed {}

pub struct Session<R, W> {
    input: R,
    out: W,
    pending: VecDeque<String>, // words read but not consumed yet
    pub bodies: State,
    pub parameters: Parameters,
    pub file_name: String,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            pending: VecDeque::new(),
            bodies: Vec::new(),
            parameters: Parameters::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Read and execute commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "Orbital Dynamics Simulator\nType `help` for a list of commands."
        )?;

        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is::<InputClosed>() => break,
                Err(e) => return Err(e),
            }
        }

        self.out.flush()?;
        Ok(())
    }

    /// Prompt for one command and execute it, `false` once the session ends
    fn step(&mut self) -> Result<bool> {
        write!(self.out, "[cmd]: ")?;
        self.out.flush()?;
        let word = self.word()?;

        match Command::parse(&word) {
            Command::Invalid => writeln!(
                self.out,
                "Command unrecognized. Type `help` for a list of commands."
            )?,
            Command::Quit => return Ok(false),
            Command::Help => self.help()?,
            Command::ListBodies => self.list_bodies()?,
            Command::AddBody => self.add_body()?,
            Command::DelBody => self.del_body()?,
            Command::ClearBodies => self.clear_bodies()?,
            Command::SetDt => self.set_dt()?,
            Command::SetSteps => self.set_steps()?,
            Command::SetMinSeparation => self.set_min_separation()?,
            Command::Run => self.run_simulation()?,
            Command::ChangeName => {
                write!(self.out, "[string] name: ")?;
                self.out.flush()?;
                self.file_name = self.word()?;
            }
        }

        Ok(true)
    }

    fn help(&mut self) -> Result<()> {
        for (name, text) in HELP {
            writeln!(self.out, "{name:<10} {text}")?;
        }
        Ok(())
    }

    fn list_bodies(&mut self) -> Result<()> {
        if self.bodies.is_empty() {
            writeln!(self.out, "There are currently no bodies to be simulated.")?;
            return Ok(());
        }

        for (i, b) in self.bodies.iter().enumerate() {
            writeln!(self.out, "{i}:")?;
            writeln!(self.out, "  name: {}", b.name.as_deref().unwrap_or(""))?;
            writeln!(self.out, "  pos: <{}, {}, {}>", b.pos.x, b.pos.y, b.pos.z)?;
            writeln!(self.out, "  vel: <{}, {}, {}>", b.vel.x, b.vel.y, b.vel.z)?;
            writeln!(self.out, "  mu: {}", b.mu)?;
        }
        Ok(())
    }

    fn add_body(&mut self) -> Result<()> {
        writeln!(self.out, "Adding body {}.", self.bodies.len())?;
        write!(self.out, "[string] name: ")?;
        self.out.flush()?;
        let name = self.word()?;

        let pos = NVec3::new(
            self.input_double(" x")?,
            self.input_double(" y")?,
            self.input_double(" z")?,
        );
        let vel = NVec3::new(
            self.input_double(" x'")?,
            self.input_double(" y'")?,
            self.input_double(" z'")?,
        );
        let mu = self.input_mu()?;

        self.bodies.push(Body::named(name, pos, vel, mu));
        writeln!(self.out, "Added body {}.", self.bodies.len() - 1)?;
        Ok(())
    }

    fn del_body(&mut self) -> Result<()> {
        if self.bodies.is_empty() {
            writeln!(self.out, "There are no bodies to delete.")?;
            return Ok(());
        }

        writeln!(self.out, "What index to delete?")?;
        let i = self.input_int(" index")?;
        let last = self.bodies.len() - 1;
        match usize::try_from(i) {
            Ok(idx) if idx <= last => {
                self.bodies.remove(idx);
                writeln!(self.out, "Deleted body {idx}.")?;
            }
            _ => {
                writeln!(self.out, "{i} out of range [0..{last}].")?;
                writeln!(self.out, "No bodies deleted.")?;
            }
        }
        Ok(())
    }

    fn clear_bodies(&mut self) -> Result<()> {
        writeln!(self.out, "Are you sure you want to erase all body data?")?;
        if self.input_y_n()? {
            self.bodies.clear();
            writeln!(self.out, "All bodies deleted.")?;
        } else {
            writeln!(self.out, "No bodies deleted.")?;
        }
        Ok(())
    }

    fn set_dt(&mut self) -> Result<()> {
        let dt = self.input_double(" dt")?;
        if !dt.is_finite() || dt == 0.0 {
            writeln!(
                self.out,
                "dt must be a non-zero finite number; keeping {}.",
                self.parameters.dt
            )?;
        } else if dt < 0.0 {
            writeln!(self.out, "Negative dt, using {FALLBACK_DT}.")?;
            self.parameters.dt = FALLBACK_DT;
        } else {
            self.parameters.dt = dt;
        }
        Ok(())
    }

    fn set_steps(&mut self) -> Result<()> {
        let steps = self.input_int(" steps")?;
        self.parameters.steps = usize::try_from(steps.max(1)).unwrap_or(1);
        Ok(())
    }

    fn set_min_separation(&mut self) -> Result<()> {
        let sep = self.input_double(" min separation")?;
        if sep.is_finite() && sep > 0.0 {
            self.parameters.min_separation = Some(sep);
            writeln!(self.out, "Minimum separation set to {sep}.")?;
        } else {
            self.parameters.min_separation = None;
            writeln!(self.out, "Minimum separation disabled.")?;
        }
        Ok(())
    }

    fn run_simulation(&mut self) -> Result<()> {
        writeln!(self.out, "Simulation Settings:")?;
        writeln!(self.out, "  dt: {}", self.parameters.dt)?;
        writeln!(self.out, "  steps: {}", self.parameters.steps)?;
        if let Some(sep) = self.parameters.min_separation {
            writeln!(self.out, "  min separation: {sep}")?;
        }
        writeln!(self.out, "  filename: {}", self.file_name)?;
        writeln!(self.out, "Do you want to start the simulation?")?;
        if !self.input_y_n()? {
            writeln!(self.out, "Simulation Aborted.")?;
            return Ok(());
        }

        let scenario = Scenario::new(self.parameters.clone(), self.bodies.clone());
        let history = scenario.run();
        writeln!(self.out, "Simulation complete!")?;

        match save_to_file(Path::new(&self.file_name), &history) {
            Ok(()) => writeln!(self.out, "Data saved to {}", self.file_name)?,
            Err(e) => {
                error!("{e:#}");
                writeln!(self.out, "Could not save data to {}.", self.file_name)?;
            }
        }
        Ok(())
    }

    /// Next whitespace separated word, reading more lines as needed
    fn word(&mut self) -> Result<String> {
        loop {
            if let Some(w) = self.pending.pop_front() {
                return Ok(w);
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                info!("input closed, ending session");
                return Err(InputClosed.into());
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Keep prompting until a valid double is entered
    fn input_double(&mut self, label: &str) -> Result<f64> {
        loop {
            write!(self.out, "[double]{label}: ")?;
            self.out.flush()?;
            let w = self.word()?;
            match w.parse::<f64>() {
                Ok(v) => return Ok(v),
                Err(_) => writeln!(self.out, "`{w}` is not a double.")?,
            }
        }
    }

    /// Keep prompting until a non-negative finite mu is entered, the same
    /// rule the scenario loader applies
    fn input_mu(&mut self) -> Result<f64> {
        loop {
            let mu = self.input_double(" mu")?;
            if mu.is_finite() && mu >= 0.0 {
                return Ok(mu);
            }
            writeln!(self.out, "mu must be a non-negative finite number, got {mu}.")?;
        }
    }

    /// Keep prompting until a valid int is entered
    fn input_int(&mut self, label: &str) -> Result<i64> {
        loop {
            write!(self.out, "[int]{label}: ")?;
            self.out.flush()?;
            let w = self.word()?;
            match w.parse::<i64>() {
                Ok(v) => return Ok(v),
                Err(_) => writeln!(self.out, "`{w}` is not an int.")?,
            }
        }
    }

    /// Yes/no question where anything but `y...` means no
    fn input_y_n(&mut self) -> Result<bool> {
        write!(self.out, "[y/N]: ")?;
        self.out.flush()?;
        let w = self.word()?;
        Ok(w.starts_with(['y', 'Y']))
    }

    /// Hand back the output writer, used by tests to inspect the transcript
    pub fn into_output(self) -> W {
        self.out
    }
}

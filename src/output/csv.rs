//! Trajectory output as CSV
//!
//! One header line, then one row per state:
//!
//! ```text
//! time,earth x,earth y,earth z,earth x',earth y',earth z',
//! 0,0,0,0,0,0,0,
//! ```
//!
//! Every field is followed by a comma, including the last one on a line.
//! Time is reconstructed as `n * dt`. Finite numbers use the shortest form
//! that reads back to the same `f64`; non-finite ones are written `nan`,
//! `inf` and `-inf`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::simulation::states::History;

/// Destination used when neither the command line nor the scenario names one
pub const DEFAULT_OUTPUT: &str = "output.csv";

/// Write `history` to `w`
pub fn write_history<W: Write>(w: &mut W, history: &History) -> Result<()> {
    write!(w, "time,")?;
    if let Some(initial) = history.initial() {
        for (i, body) in initial.iter().enumerate() {
            let label = body.label(i);
            for axis in ["x", "y", "z", "x'", "y'", "z'"] {
                write!(w, "{label} {axis},")?;
            }
        }
    }
    writeln!(w)?;

    for (n, state) in history.iter().enumerate() {
        write!(w, "{},", history.time_at(n))?;
        for body in state {
            for c in body.pos.iter().chain(body.vel.iter()) {
                write_field(w, *c)?;
            }
        }
        writeln!(w)?;
    }

    Ok(())
}

fn write_field<W: Write>(w: &mut W, c: f64) -> Result<()> {
    if c.is_nan() {
        write!(w, "nan,")?;
    } else if c.is_infinite() {
        write!(w, "{},", if c > 0.0 { "inf" } else { "-inf" })?;
    } else {
        write!(w, "{c},")?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write `history` to it
pub fn save_to_file(path: &Path, history: &History) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_history(&mut w, history)
        .with_context(|| format!("failed to write {}", path.display()))?;
    w.flush()?;

    info!("wrote {} states to {}", history.len(), path.display());
    Ok(())
}

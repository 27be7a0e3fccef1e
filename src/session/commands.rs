//! Command words understood by the interactive session

/// All commands the session can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Invalid,
    Quit,
    Help,
    ListBodies,
    AddBody,
    DelBody,
    ClearBodies,
    SetDt,
    SetSteps,
    SetMinSeparation,
    Run,
    ChangeName,
}

impl Command {
    /// Map one input word (and its short alias) onto a command
    pub fn parse(word: &str) -> Self {
        match word {
            "quit" | "q" => Command::Quit,
            "help" | "?" => Command::Help,
            "list" | "ls" => Command::ListBodies,
            "add" | "a" => Command::AddBody,
            "del" | "d" => Command::DelBody,
            "del_all" => Command::ClearBodies,
            "set_dt" => Command::SetDt,
            "set_steps" => Command::SetSteps,
            "mu_sep" => Command::SetMinSeparation,
            "run" => Command::Run,
            "filename" => Command::ChangeName,
            _ => Command::Invalid,
        }
    }
}

pub const HELP: &[(&str, &str)] = &[
    ("quit", "quits the program"),
    ("help", "displays this page"),
    ("list", "displays all bodies for simulation"),
    ("add", "adds a new body to be simulated"),
    ("del", "deletes a body at an index"),
    ("del_all", "deletes all the bodies"),
    ("set_dt", "sets the timestep for the simulation"),
    ("set_steps", "sets the number of timesteps to simulate"),
    ("mu_sep", "sets the minimum separation used by gravity (<= 0 disables)"),
    ("run", "runs the simulation and outputs the data to the file"),
    ("filename", "changes the output file name"),
];

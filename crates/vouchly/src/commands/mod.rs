//! Command dispatch: bridges CLI args -> coordinator operations -> output.

pub mod options_cmd;
pub mod vouchers;
pub mod watch;

use std::io::{self, BufRead, Write};

use vouchly_core::Coordinator;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List { all } => vouchers::list(coordinator, all, global),
        Command::Create {
            number,
            quota,
            duration,
            usage_quota,
        } => vouchers::create(coordinator, number, quota, duration, usage_quota, global).await,
        Command::Delete { id } => vouchers::delete(coordinator, id, global).await,
        Command::Watch { interval: _ } => watch::handle(coordinator, global).await,
        // Options is handled before dispatch (no connection needed)
        Command::Options => unreachable!(),
    }
}

/// Prompt for confirmation on stdin, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }

    let mut stderr = io::stderr().lock();
    write!(stderr, "{message} [y/N] ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

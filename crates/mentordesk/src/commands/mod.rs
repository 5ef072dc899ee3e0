//! Command dispatch: routes parsed CLI commands to resource handlers.

pub mod announcements;
pub mod config_cmd;
pub mod mentees;
pub mod resource;
pub mod session;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::console::Console;
use crate::error::CliError;

/// Dispatch a parsed command to the appropriate handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Session(args) => session::handle(console, args, global).await,
        Command::Mentees(args) => mentees::handle(console, args, global).await,
        Command::Announcements(args) => announcements::handle(console, args, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before dispatch"),
    }
}

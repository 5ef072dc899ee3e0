//! Session subcommand handlers.

use serde::Serialize;

use mentordesk_core::AuthState;

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::console::Console;
use crate::error::CliError;
use crate::output;

/// Flattened view of a resolved session.
#[derive(Debug, Serialize)]
struct SessionView {
    signed_in: bool,
    role: Option<String>,
    user_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

impl From<&AuthState> for SessionView {
    fn from(state: &AuthState) -> Self {
        let user = state.user.as_ref();
        Self {
            signed_in: state.is_authenticated,
            role: state.role.map(|r| r.to_string()),
            user_id: user.map(|u| u.id.to_string()),
            name: user.and_then(|u| u.name()).map(str::to_owned),
            email: user.and_then(|u| u.email()).map(str::to_owned),
        }
    }
}

fn detail(view: &SessionView) -> String {
    if !view.signed_in {
        return "Not signed in".into();
    }
    [
        format!("Role:    {}", view.role.as_deref().unwrap_or("-")),
        format!("User ID: {}", view.user_id.as_deref().unwrap_or("-")),
        format!("Name:    {}", view.name.as_deref().unwrap_or("-")),
        format!("Email:   {}", view.email.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn handle(console: &Console, args: SessionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SessionCommand::Status => {
            let state = console.resolver().resolve().await;
            let view = SessionView::from(&state);
            let out = output::render_single(&global.output, &view, detail, |v| {
                v.role.clone().unwrap_or_else(|| "signed_out".into())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionCommand::Logout => {
            console.resolver().logout()?;
            console.notifier().info("Signed out");
            Ok(())
        }
    }
}

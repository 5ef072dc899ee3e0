//! Mentee command handlers.

use std::sync::Arc;

use tabled::Tabled;

use mentordesk_core::{
    Criteria, ListSettings, Mentee, MenteeSource, ProtectedRoute, ResourceController, Role,
};

use crate::cli::{GlobalOpts, MenteeListArgs, MenteesArgs, MenteesCommand};
use crate::console::Console;
use crate::error::CliError;

use super::{resource, util};

/// The mentee screens are for program staff only.
fn route() -> ProtectedRoute {
    ProtectedRoute::new("/admin/mentees", [Role::SuperAdmin, Role::Admin])
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MenteeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Gender")]
    gender: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Mentor")]
    mentor: String,
    #[tabled(rename = "Joined")]
    joined: String,
}

impl From<&Mentee> for MenteeRow {
    fn from(m: &Mentee) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name.clone(),
            email: util::or_dash(m.email.as_deref()),
            gender: util::or_dash(m.gender.as_deref()),
            status: util::or_dash(m.status.as_deref()),
            mentor: util::or_dash(m.mentor_name.as_deref()),
            joined: util::format_time(m.created_at.as_ref()),
        }
    }
}

fn criteria(args: &MenteeListArgs) -> Criteria {
    let mut criteria = Criteria::default();
    if let Some(gender) = &args.gender {
        criteria = criteria.with_filter("gender", gender);
    }
    if let Some(status) = &args.status {
        criteria = criteria.with_filter("status", status);
    }
    if let Some(mentor_id) = args.mentor_id {
        criteria = criteria.with_filter("mentor_id", mentor_id.to_string());
    }
    if let Some(search) = &args.page.search {
        criteria = criteria.with_search(search);
    }
    criteria
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: MenteesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    console.authorize(&route()).await?;

    let admin = console.admin_config(global)?;
    let source = Arc::new(MenteeSource::new(console.client(&admin)?));
    let controller = ResourceController::new(
        source,
        ListSettings::from(&admin),
        console.notifier().clone(),
    );

    match args.command {
        MenteesCommand::List(list) => {
            resource::list(
                &controller,
                criteria(&list),
                list.page.page,
                global,
                |m| MenteeRow::from(m),
            )
            .await
        }
        MenteesCommand::Stats => resource::stats(&controller, global).await,
        MenteesCommand::Delete(delete) => {
            resource::delete(&controller, &delete.ids, delete.page, global).await
        }
    }
}

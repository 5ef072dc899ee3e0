//! Announcement command handlers.
//!
//! Every role may read announcements; only staff may delete them.

use std::sync::Arc;

use tabled::Tabled;

use mentordesk_core::{
    Announcement, AnnouncementSource, Criteria, ListSettings, ProtectedRoute, ResourceController,
    Role,
};

use crate::cli::{AnnouncementListArgs, AnnouncementsArgs, AnnouncementsCommand, GlobalOpts};
use crate::console::Console;
use crate::error::CliError;

use super::{resource, util};

const TITLE_WIDTH: usize = 48;

fn view_route() -> ProtectedRoute {
    ProtectedRoute::new("/announcements", [])
}

fn manage_route() -> ProtectedRoute {
    ProtectedRoute::new("/admin/announcements", [Role::SuperAdmin, Role::Admin])
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AnnouncementRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Published")]
    published: String,
}

impl From<&Announcement> for AnnouncementRow {
    fn from(a: &Announcement) -> Self {
        Self {
            id: a.id.to_string(),
            title: truncate(&a.title, TITLE_WIDTH),
            category: util::or_dash(a.category.as_deref()),
            status: util::or_dash(a.status.as_deref()),
            published: util::format_time(a.published_at.as_ref()),
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{cut}…")
}

fn criteria(args: &AnnouncementListArgs) -> Criteria {
    let mut criteria = Criteria::default();
    if let Some(category) = &args.category {
        criteria = criteria.with_filter("category", category);
    }
    if let Some(status) = &args.status {
        criteria = criteria.with_filter("status", status);
    }
    if let Some(search) = &args.page.search {
        criteria = criteria.with_search(search);
    }
    criteria
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: AnnouncementsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let route = match args.command {
        AnnouncementsCommand::Delete(_) => manage_route(),
        AnnouncementsCommand::List(_) | AnnouncementsCommand::Stats => view_route(),
    };
    console.authorize(&route).await?;

    let admin = console.admin_config(global)?;
    let source = Arc::new(AnnouncementSource::new(console.client(&admin)?));
    let controller = ResourceController::new(
        source,
        ListSettings::from(&admin),
        console.notifier().clone(),
    );

    match args.command {
        AnnouncementsCommand::List(list) => {
            resource::list(
                &controller,
                criteria(&list),
                list.page.page,
                global,
                |a| AnnouncementRow::from(a),
            )
            .await
        }
        AnnouncementsCommand::Stats => resource::stats(&controller, global).await,
        AnnouncementsCommand::Delete(delete) => {
            resource::delete(&controller, &delete.ids, delete.page, global).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_titles_are_cut_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééé", 4), "ééé…");
    }

    #[test]
    fn any_role_reads_but_only_staff_delete() {
        assert!(view_route().allows(Role::Mentor));
        assert!(!manage_route().allows(Role::Mentor));
        assert!(manage_route().allows(Role::SuperAdmin));
    }
}

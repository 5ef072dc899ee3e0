//! List, stats and delete flows shared by the resource commands.
//!
//! Each flow drives one `ResourceController` the way a list screen would:
//! navigate to the requested page, read the state, render, tear down.

use serde::Serialize;
use tabled::Tabled;

use mentordesk_core::{
    BatchReport, CategoryCount, Criteria, EntityId, FetchOutcome, Resource, ResourceController,
    ResourceSource, StatsOutcome, StatsSummary,
};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Rows ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total")]
    total: u64,
    #[tabled(rename = "Active")]
    active: u64,
}

#[derive(Tabled)]
struct DeleteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn stats_detail(stats: &StatsSummary) -> String {
    let mut rows = vec![CategoryRow {
        category: "all".into(),
        total: stats.total,
        active: stats.active,
    }];
    rows.extend(stats.by_category.iter().map(|(name, CategoryCount { total, active })| {
        CategoryRow {
            category: name.clone(),
            total: *total,
            active: *active,
        }
    }));
    output::render_table(&rows)
}

fn report_rows(report: &BatchReport) -> Vec<DeleteRow> {
    let ok = report.succeeded.iter().map(|id| DeleteRow {
        id: id.to_string(),
        result: "deleted".into(),
        error: String::new(),
    });
    let failed = report.failed.iter().map(|(id, reason)| DeleteRow {
        id: id.to_string(),
        result: "failed".into(),
        error: reason.clone(),
    });
    ok.chain(failed).collect()
}

// ── Flows ───────────────────────────────────────────────────────────

/// Map a fetch outcome to the CLI's view: only an applied page is a success.
fn applied(outcome: FetchOutcome) -> Result<Vec<EntityId>, CliError> {
    match outcome {
        FetchOutcome::Applied { ids } => Ok(ids),
        FetchOutcome::Failed(e) => Err(e.into()),
        FetchOutcome::Stale | FetchOutcome::Cancelled => {
            Err(CliError::Internal("page load was superseded".into()))
        }
    }
}

/// Show one page of `S::Item` matching `criteria`.
pub async fn list<S, R>(
    controller: &ResourceController<S>,
    criteria: Criteria,
    page: u32,
    global: &GlobalOpts,
    to_row: impl Fn(&S::Item) -> R,
) -> Result<(), CliError>
where
    S: ResourceSource,
    S::Item: Serialize,
    R: Tabled,
{
    let outcome = controller.navigate(criteria, page).await;
    controller.teardown();
    applied(outcome?)?;

    let state = controller.state();
    let out = output::render_list(&global.output, state.items.as_slice(), to_row, |item| {
        item.id().to_string()
    })?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        let p = state.pagination;
        eprintln!(
            "Page {} of {} ({} {} total)",
            p.current_page(),
            p.last_page(),
            p.total(),
            <S::Item as Resource>::KIND
        );
    }
    Ok(())
}

/// Show the statistics summary, falling back to derived counts.
pub async fn stats<S: ResourceSource>(
    controller: &ResourceController<S>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let outcome = controller.refresh_stats().await;
    controller.teardown();
    match outcome {
        StatsOutcome::Fresh(origin) => {
            tracing::debug!(?origin, "statistics loaded");
        }
        StatsOutcome::Stale => {
            tracing::debug!("statistics superseded by a newer refresh");
        }
        StatsOutcome::Unavailable | StatsOutcome::Cancelled => {
            return Err(CliError::StatsUnavailable {
                resource: <S::Item as Resource>::KIND.into(),
            });
        }
    }

    let summary = controller.stats();
    let out = output::render_single(&global.output, &summary, stats_detail, |s| {
        s.total.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Select `ids` on `page` and delete them as one batch.
pub async fn delete<S: ResourceSource>(
    controller: &ResourceController<S>,
    ids: &[u64],
    page: u32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = <S::Item as Resource>::KIND;
    applied(controller.navigate(Criteria::default(), page).await?)?;

    let mut missing = Vec::new();
    for id in ids.iter().map(|id| EntityId::from(*id)) {
        if controller.selected().contains(&id) {
            continue;
        }
        // toggle() ignores ids that are not on the loaded page
        if !controller.toggle(&id) {
            missing.push(id.to_string());
        }
    }
    if !missing.is_empty() {
        controller.teardown();
        return Err(CliError::NotFound {
            resource_type: kind.into(),
            identifier: missing.join(", "),
            list_command: format!("{kind} list --page {page}"),
        });
    }

    let selected = controller.selected();
    let prompt = format!("Delete {} {kind}?", selected.len());
    if !util::confirm(&prompt, global.yes, &format!("{kind} delete"))? {
        controller.teardown();
        return Ok(());
    }

    let report = controller.delete_selected().await;
    controller.teardown();
    let report = report?;

    let out = output::render_single(
        &global.output,
        &report,
        |r| output::render_table(&report_rows(r)),
        |r| {
            r.succeeded
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);

    if report.is_complete_success() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            failed: report.failed.len(),
            attempted: selected.len(),
        })
    }
}

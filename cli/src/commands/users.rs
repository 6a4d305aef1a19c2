//! `users` subcommands: list a page and run bulk moderation actions.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use inquire::{MultiSelect, Select};
use tracing::{info, instrument, warn};
use tube_admin_business::users::{
    BulkActionKind, BulkActionOutcome, ConfirmGate, USER_LIST_TABLE_ID, UserListController,
};
use tube_admin_business::{ROWS_PER_PAGE_OPTIONS, Sort, TableState};

use crate::cli::{BulkArgs, ListArgs};
use crate::config::Config;
use crate::context::{AdminContext, build_user_list};
use crate::output::Output;
use crate::prompts::{AutoConfirm, InquireConfirm};
use crate::render::{render_users, row_label};

/// Page size used to find the users a bulk command names.
const BULK_LOOKUP_PAGE_SIZE: u32 = 100;

fn print_page(out: &Output, controller: &UserListController) {
    let view = controller.view();
    if view.rows.is_empty() {
        out.dim("No users found.");
        return;
    }

    let labels: Vec<(&'static str, &'static str)> = controller
        .columns()
        .visible_columns()
        .map(|column| (column.id, column.label))
        .collect();
    out.newline();
    out.print(render_users(&view, &labels));
    out.page_summary(view.pagination.start, view.rows.len(), view.total);
}

/// Apply `--count` and `--sort` on top of the remembered table state.
/// Returns the new state when the arguments changed it.
fn table_state_from_args(
    current: TableState,
    count: Option<u32>,
    sort: Option<&str>,
) -> Result<Option<TableState>> {
    if count.is_none() && sort.is_none() {
        return Ok(None);
    }

    let mut state = current;
    if let Some(count) = count {
        if !ROWS_PER_PAGE_OPTIONS.contains(&count) {
            bail!("Page size must be one of {ROWS_PER_PAGE_OPTIONS:?}, got {count}");
        }
        state.rows_per_page = count;
    }
    if let Some(sort) = sort {
        state.sort = Sort::parse(sort).with_context(|| format!("Invalid sort: {sort:?}"))?;
    }
    Ok(Some(state))
}

fn apply_columns(controller: &mut UserListController, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }

    let unknown: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|id| controller.columns().get(id).is_none())
        .collect();
    if !unknown.is_empty() {
        let known: Vec<&str> = controller
            .columns()
            .columns()
            .iter()
            .map(|c| c.id)
            .collect();
        bail!(
            "Unknown column(s): {}. Available: {}",
            unknown.join(", "),
            known.join(", ")
        );
    }

    let ids: Vec<&str> = columns.iter().map(String::as_str).collect();
    controller.set_visible_columns(&ids);
    Ok(())
}

/// Run a bulk action on the current selection, then apply any change raised
/// by the ban dialog.
async fn run_action(controller: &mut UserListController, kind: BulkActionKind) -> ExitCode {
    let outcome = controller.run_bulk_action(kind).await;
    info!(action = kind.label(), ?outcome, "Bulk action finished");

    let reloads = controller.process_user_changed_events().await;
    if reloads > 0 {
        info!(reloads, "Reloaded after user changes");
    }
    controller.settle().await;

    if matches!(
        outcome,
        BulkActionOutcome::Declined | BulkActionOutcome::NothingSelected
    ) {
        Output::stderr().dim("Nothing was changed.");
    }
    if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[instrument(skip_all, name = "users_list", fields(start = args.start, interactive = args.interactive))]
pub async fn run_list(ctx: &AdminContext, config: &mut Config, args: ListArgs) -> Result<ExitCode> {
    let out = Arc::new(Output::new());

    let mut controller = build_user_list(
        ctx,
        config,
        Arc::new(InquireConfirm),
        out.clone(),
        None,
    );

    let changed_state =
        table_state_from_args(controller.table_state(), args.count, args.sort.as_deref())?;
    if let Some(state) = changed_state {
        controller.restore_table_state(state);
        config.set_table_state(USER_LIST_TABLE_ID, state);
        if let Err(e) = config.save() {
            warn!("Failed to remember table settings: {e:#}");
        }
    }
    apply_columns(&mut controller, &args.columns)?;
    controller.set_highlight_banned_users(args.highlight_banned);
    controller.preset_query(args.start, args.search.as_deref());

    controller.initialize().await;
    controller.settle().await;
    print_page(&out, &controller);

    if !args.interactive {
        return Ok(ExitCode::SUCCESS);
    }
    run_interactive(&out, &mut controller).await
}

async fn run_interactive(out: &Output, controller: &mut UserListController) -> Result<ExitCode> {
    let rows = controller.rows().to_vec();
    if rows.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let options: Vec<String> = rows.iter().map(row_label).collect();
    let picked = MultiSelect::new("Select users:", options.clone())
        .with_help_message("Space to select, Enter to confirm")
        .prompt_skippable()
        .context("Failed to select users")?;
    let Some(picked) = picked else {
        return Ok(ExitCode::SUCCESS);
    };

    for label in &picked {
        if let Some(index) = options.iter().position(|o| o == label) {
            controller.select(rows[index].user.id);
        }
    }

    let view = controller.view();
    let actions: Vec<_> = view.displayed_bulk_actions().copied().collect();
    if actions.is_empty() {
        out.warning("No action applies to the whole selection.");
        return Ok(ExitCode::SUCCESS);
    }

    let action_labels: Vec<&str> = actions.iter().map(|a| a.label).collect();
    let choice = Select::new("Action:", action_labels)
        .with_help_message("Esc to cancel")
        .prompt_skippable()
        .context("Failed to select an action")?;
    let Some(choice) = choice else {
        return Ok(ExitCode::SUCCESS);
    };
    let Some(entry) = actions.iter().find(|a| a.label == choice) else {
        return Ok(ExitCode::SUCCESS);
    };

    let code = run_action(controller, entry.kind).await;
    print_page(out, controller);
    Ok(code)
}

/// Search used to find the named users: explicit `--search`, otherwise the
/// username itself when only one is named.
fn lookup_search(args: &BulkArgs) -> Option<&str> {
    match (args.search.as_deref(), args.usernames.as_slice()) {
        (Some(search), _) => Some(search),
        (None, [single]) => Some(single.as_str()),
        (None, _) => None,
    }
}

#[instrument(skip_all, name = "users_bulk", fields(action = kind.label(), users = args.usernames.len()))]
pub async fn run_bulk(
    ctx: &AdminContext,
    config: &Config,
    kind: BulkActionKind,
    args: BulkArgs,
) -> Result<ExitCode> {
    let out = Arc::new(Output::new());

    if args.reason.is_some() && kind != BulkActionKind::Ban {
        out.warning("--reason only applies to ban, ignoring it.");
    }
    let confirm: Arc<dyn ConfirmGate> = if args.yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(InquireConfirm)
    };
    let reason = (kind == BulkActionKind::Ban)
        .then(|| args.reason.clone())
        .flatten();

    let mut controller = build_user_list(ctx, config, confirm, out.clone(), reason);
    let state = TableState {
        rows_per_page: BULK_LOOKUP_PAGE_SIZE,
        ..controller.table_state()
    };
    controller.restore_table_state(state);
    controller.preset_query(0, lookup_search(&args));

    controller.initialize().await;
    controller.settle().await;

    let mut missing = Vec::new();
    for name in &args.usernames {
        let id = controller
            .rows()
            .iter()
            .find(|row| row.user.username == name.as_str())
            .map(|row| row.user.id);
        match id {
            Some(id) => controller.select(id),
            None => missing.push(name.as_str()),
        }
    }
    if !missing.is_empty() {
        bail!(
            "User(s) not found: {}. Narrow the lookup with --search.",
            missing.join(", ")
        );
    }

    Ok(run_action(&mut controller, kind).await)
}

#[cfg(test)]
mod tests {
    use tube_admin_business::SortOrder;

    use super::*;

    fn current() -> TableState {
        TableState {
            sort: Sort::new("createdAt", SortOrder::Ascending),
            rows_per_page: 10,
        }
    }

    fn bulk_args(usernames: &[&str], search: Option<&str>) -> BulkArgs {
        BulkArgs {
            usernames: usernames.iter().map(|&u| u.to_owned()).collect(),
            search: search.map(str::to_owned),
            yes: true,
            reason: None,
        }
    }

    #[test]
    fn test_no_table_args_keeps_state() {
        assert!(table_state_from_args(current(), None, None).unwrap().is_none());
    }

    #[test]
    fn test_table_args_override_state() {
        let state = table_state_from_args(current(), Some(50), Some("-username"))
            .unwrap()
            .unwrap();
        assert_eq!(state.rows_per_page, 50);
        assert_eq!(state.sort, Sort::new("username", SortOrder::Descending));
    }

    #[test]
    fn test_page_size_outside_options_is_rejected() {
        assert!(table_state_from_args(current(), Some(25), None).is_err());
    }

    #[test]
    fn test_lookup_search() {
        assert_eq!(lookup_search(&bulk_args(&["alice"], None)), Some("alice"));
        assert_eq!(lookup_search(&bulk_args(&["alice", "bob"], None)), None);
        assert_eq!(
            lookup_search(&bulk_args(&["alice", "bob"], Some("example"))),
            Some("example")
        );
    }
}

mod cli;
mod prompts;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use inquire::{InquireError, Select};
use log::debug;
use std::fmt;

use tracker_core::{Dashboard, ProjectField, TrackerConfig, TrackerError, XlsxSheetWriter};

use crate::cli::Cli;

/// Menu entries of the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddProject,
    ChangeStatus,
    ChangeApproval,
    AdvanceStage,
    AttachBrd,
    EditBrdNotes,
    CycleUat,
    ToggleSelection,
    ToggleSelectAll,
    Export,
    SwitchRole,
    Quit,
}

impl Action {
    fn available(is_admin: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        if is_admin {
            actions.extend([Action::AddProject, Action::ChangeStatus, Action::ChangeApproval]);
        }
        actions.extend([
            Action::AdvanceStage,
            Action::AttachBrd,
            Action::EditBrdNotes,
            Action::CycleUat,
            Action::ToggleSelection,
            Action::ToggleSelectAll,
            Action::Export,
            Action::SwitchRole,
            Action::Quit,
        ]);
        actions
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::AddProject => "Add new project",
            Action::ChangeStatus => "Change status",
            Action::ChangeApproval => "Change approval",
            Action::AdvanceStage => "Move project stage",
            Action::AttachBrd => "Attach BRD file",
            Action::EditBrdNotes => "Edit BRD notes",
            Action::CycleUat => "UAT sign in / sign off",
            Action::ToggleSelection => "Select / deselect project",
            Action::ToggleSelectAll => "Select all",
            Action::Export => "Export selected",
            Action::SwitchRole => "Switch role",
            Action::Quit => "Quit",
        };
        write!(f, "{}", label)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut config = TrackerConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    debug!("Session config: {:?}", config);

    let mut dashboard = Dashboard::new(config);
    run_session(&mut dashboard)
}

fn run_session(dashboard: &mut Dashboard) -> Result<()> {
    loop {
        render::render_dashboard(dashboard);

        let actions = Action::available(dashboard.role().is_admin());
        let action = match Select::new("Action:", actions).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                break
            }
            Err(e) => return Err(e.into()),
        };

        if action == Action::Quit {
            break;
        }

        if let Err(err) = handle_action(dashboard, action) {
            if is_prompt_interrupt(&err) {
                break;
            }
            if is_prompt_cancel(&err) {
                continue;
            }
            match err.downcast_ref::<TrackerError>() {
                Some(
                    TrackerError::EmptySelection
                    | TrackerError::AdminRequired(_)
                    | TrackerError::UnsupportedBrdFile(_),
                ) => println!("{}", err.to_string().yellow()),
                _ => println!("{} {:#}", "Error:".red(), err),
            }
        }
    }

    Ok(())
}

fn is_prompt_cancel(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled)
    )
}

/// Ctrl-C inside any prompt ends the session
fn is_prompt_interrupt(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationInterrupted)
    )
}

fn handle_action(dashboard: &mut Dashboard, action: Action) -> Result<()> {
    match action {
        Action::AddProject => add_project(dashboard)?,
        Action::SwitchRole => {
            let role = dashboard.switch_role();
            println!("Switched to {} view", role);
        }
        Action::ToggleSelectAll => dashboard.toggle_select_all(),
        Action::Export => export_selected(dashboard)?,
        Action::Quit => {}
        _ => {
            let Some(id) = prompts::prompt_select_project(dashboard.store())? else {
                println!("{}", "No projects to choose from.".dimmed());
                return Ok(());
            };
            let Some(project) = dashboard.store().get(id).cloned() else {
                return Ok(());
            };

            match action {
                Action::ChangeStatus => {
                    let status = prompts::prompt_status(project.status)?;
                    dashboard.update_field(id, ProjectField::Status(status))?;
                }
                Action::ChangeApproval => {
                    let approval = prompts::prompt_approval(project.approval_status)?;
                    dashboard.update_field(id, ProjectField::ApprovalStatus(approval))?;
                }
                Action::AdvanceStage => {
                    let stage = prompts::prompt_stage(project.current_stage)?;
                    dashboard.advance_stage(id, stage);
                }
                Action::AttachBrd => {
                    let file = prompts::prompt_brd_file()?;
                    let name = file.name.clone();
                    dashboard.upload_brd_file(id, file)?;
                    println!("{} {}", "Attached".green(), name);
                }
                Action::EditBrdNotes => {
                    let notes = prompts::prompt_brd_notes(&project.brd_notes)?;
                    dashboard.update_field(id, ProjectField::BrdNotes(notes))?;
                }
                Action::CycleUat => {
                    dashboard.cycle_uat_status(id);
                }
                Action::ToggleSelection => {
                    dashboard.toggle_selection(id);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn add_project(dashboard: &mut Dashboard) -> Result<()> {
    let fields = prompts::prompt_draft_fields(dashboard.store().draft())?;
    for field in fields {
        dashboard.update_draft(field)?;
    }

    match dashboard.add_project()? {
        Some(id) => println!("{} #{}", "Project added successfully!".green(), id),
        None => {
            let missing = dashboard.store().draft().missing_required_fields();
            println!(
                "{} {}",
                "Project not added, missing:".yellow(),
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn export_selected(dashboard: &Dashboard) -> Result<()> {
    let rows = dashboard.export_selected(&mut XlsxSheetWriter)?;
    println!(
        "{} {} project(s) to {}",
        "Exported".green(),
        rows,
        dashboard.config().export_file.display()
    );
    Ok(())
}

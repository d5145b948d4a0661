use colored::{ColoredString, Colorize};

use tracker_core::{ColorCode, Dashboard, Project, UatPhase};

fn color_dot(code: ColorCode) -> ColoredString {
    let dot = "●";
    match code {
        ColorCode::Red => dot.red(),
        ColorCode::Green => dot.green(),
        ColorCode::Grey => dot.bright_black(),
        ColorCode::Yellow => dot.yellow(),
        ColorCode::Orange => dot.truecolor(255, 165, 0),
    }
}

/// Stage lights: green when reached, red otherwise
pub fn stage_lights(project: &Project) -> String {
    project
        .stages()
        .iter()
        .map(|(stage, reached)| {
            let light = if reached { "●".green() } else { "●".red() };
            format!("{} {}", light, stage)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn uat_button(phase: UatPhase) -> ColoredString {
    let label = format!("[{}]", phase.action_label());
    match phase {
        UatPhase::NotStarted => label.blue(),
        UatPhase::SignedIn => label.yellow(),
        UatPhase::Completed => label.green(),
    }
}

/// One project as a block of lines
pub fn project_block(project: &Project) -> String {
    let checkbox = if project.selected { "[x]" } else { "[ ]" };
    let brd_file = project
        .brd_file
        .as_ref()
        .map(|f| format!(" ({})", f.name))
        .unwrap_or_default();

    let mut lines = vec![
        format!(
            "{} {} {}  {}",
            checkbox,
            color_dot(project.color_code),
            project.name.bold(),
            format!("#{}", project.id).dimmed()
        ),
        format!(
            "      {}  assigned {}  deadline {}  {}",
            project.email,
            project.assigned_date.format("%Y-%m-%d"),
            project.deadline.format("%Y-%m-%d"),
            project.color_code.label().dimmed()
        ),
        format!(
            "      Status: {}  Approval: {}  UAT: {}",
            project.status,
            project.approval_status,
            uat_button(project.uat)
        ),
        format!("      Stages: {}", stage_lights(project)),
        format!("      BRD: {}{}", project.brd_requirement.as_str(), brd_file),
    ];
    if !project.brd_notes.is_empty() {
        lines.push(format!("      Notes: {}", project.brd_notes));
    }
    lines.join("\n")
}

/// Prints the whole dashboard
pub fn render_dashboard(dashboard: &Dashboard) {
    let store = dashboard.store();
    println!();
    println!(
        "{}  ({} view)",
        "Project Dashboard".bold().underline(),
        dashboard.role()
    );
    println!(
        "{} select all    {} of {} selected",
        if store.select_all() { "[x]" } else { "[ ]" },
        store.selected_count(),
        store.projects().len()
    );
    println!();

    if store.projects().is_empty() {
        println!("{}", "No projects yet.".dimmed());
        return;
    }

    for project in store.projects() {
        println!("{}", project_block(project));
        println!();
    }
}

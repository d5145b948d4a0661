use anyhow::{Context, Result};
use chrono::NaiveDate;
use inquire::{CustomType, Editor, Select, Text};
use std::fs;
use std::path::PathBuf;

use tracker_core::{
    ApprovalStatus, BrdFile, BrdRequirement, ColorCode, ProjectDraft, ProjectField, ProjectId,
    ProjectStatus, ProjectStore, Stage,
};

/// Prompts for every field of the new-project form, starting from the current draft
pub fn prompt_draft_fields(draft: &ProjectDraft) -> Result<Vec<ProjectField>> {
    let mut fields = Vec::new();

    let name = Text::new("Project name:")
        .with_initial_value(&draft.name)
        .prompt()?;
    fields.push(ProjectField::Name(name));

    let email = Text::new("Project manager email:")
        .with_initial_value(&draft.email)
        .prompt()?;
    fields.push(ProjectField::Email(email));

    let mut deadline_prompt = CustomType::<NaiveDate>::new("Deadline (YYYY-MM-DD):")
        .with_error_message("Please enter a date as YYYY-MM-DD")
        .with_help_message("Esc to leave empty");
    if let Some(deadline) = draft.deadline {
        deadline_prompt = deadline_prompt.with_default(deadline);
    }
    if let Some(deadline) = deadline_prompt.prompt_skippable()? {
        fields.push(ProjectField::Deadline(deadline));
    }

    fields.push(ProjectField::ColorCode(prompt_color_code(draft.color_code)?));
    fields.push(ProjectField::BrdRequirement(prompt_brd_requirement(
        draft.brd_requirement,
    )?));

    let notes = Text::new("BRD notes:")
        .with_initial_value(&draft.brd_notes)
        .prompt()?;
    fields.push(ProjectField::BrdNotes(notes));

    Ok(fields)
}

fn position_of<T: PartialEq>(options: &[T], current: &T) -> usize {
    options.iter().position(|o| o == current).unwrap_or(0)
}

pub fn prompt_color_code(current: ColorCode) -> Result<ColorCode> {
    let options = ColorCode::ALL.to_vec();
    let cursor = position_of(&options, &current);
    Ok(Select::new("Color code:", options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

pub fn prompt_brd_requirement(current: BrdRequirement) -> Result<BrdRequirement> {
    let options = BrdRequirement::ALL.to_vec();
    let cursor = position_of(&options, &current);
    Ok(Select::new("BRD requirement:", options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

pub fn prompt_status(current: ProjectStatus) -> Result<ProjectStatus> {
    let options = ProjectStatus::ALL.to_vec();
    let cursor = position_of(&options, &current);
    Ok(Select::new("Status:", options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

pub fn prompt_approval(current: ApprovalStatus) -> Result<ApprovalStatus> {
    let options = ApprovalStatus::ALL.to_vec();
    let cursor = position_of(&options, &current);
    Ok(Select::new("Approval:", options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

pub fn prompt_stage(current: Option<Stage>) -> Result<Stage> {
    let options = Stage::ALL.to_vec();
    let cursor = current.map(|s| s.position()).unwrap_or(0);
    Ok(Select::new("Move to stage:", options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

pub fn prompt_brd_notes(current: &str) -> Result<String> {
    let notes = Editor::new("BRD notes:")
        .with_predefined_text(current)
        .prompt()?;
    Ok(notes.trim_end().to_string())
}

/// Prompts the user to select a project from the list
pub fn prompt_select_project(store: &ProjectStore) -> Result<Option<ProjectId>> {
    if store.projects().is_empty() {
        return Ok(None);
    }

    let options: Vec<String> = store
        .projects()
        .iter()
        .map(|p| format!("{} (#{})", p.name, p.id))
        .collect();

    let choice = Select::new("Select a project:", options).raw_prompt()?;
    Ok(store.projects().get(choice.index).map(|p| p.id))
}

/// Asks for a file path and reads the file as a BRD attachment
pub fn prompt_brd_file() -> Result<BrdFile> {
    let input = Text::new("Path to BRD file (.pdf, .jpg, .xlsx, .xls):").prompt()?;
    read_brd_file(PathBuf::from(input.trim()))
}

pub fn read_brd_file(path: PathBuf) -> Result<BrdFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {:?}", path))?;
    let content = fs::read(&path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(BrdFile::new(name, content))
}

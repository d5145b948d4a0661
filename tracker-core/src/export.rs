//! Spreadsheet export of selected projects.
//!
//! Projects are flattened into `ExportRecord`s, laid out as a `Sheet`, and
//! handed to a `SheetWriter`. The default writer produces an `.xlsx` workbook.

use chrono::NaiveDate;
use log::info;
use rust_xlsxwriter::Workbook;
use std::path::Path;

use crate::error::Result;
use crate::models::{Project, Stage};

/// Column headers, in export order
pub const EXPORT_HEADERS: [&str; 17] = [
    "id",
    "name",
    "email",
    "assignedDate",
    "deadline",
    "status",
    "approvalStatus",
    "colorCode",
    "brdRequirement",
    "brdNotes",
    "uatSignIn",
    "uatSignOff",
    "BRD",
    "Develop",
    "Testing",
    "UAT",
    "GoLive",
];

/// Flat copy of a project, without the selection flag and the BRD file payload
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub assigned_date: NaiveDate,
    pub deadline: NaiveDate,
    pub status: &'static str,
    pub approval_status: &'static str,
    pub color_code: &'static str,
    pub brd_requirement: &'static str,
    pub brd_notes: String,
    pub uat_sign_in: bool,
    pub uat_sign_off: bool,
    /// One flag per stage, in stage order
    pub stages: [bool; 5],
}

impl From<&Project> for ExportRecord {
    fn from(project: &Project) -> Self {
        let flags = project.stages();
        let mut stages = [false; 5];
        for stage in Stage::ALL {
            stages[stage.position()] = flags.get(stage);
        }

        Self {
            id: project.id.as_u64(),
            name: project.name.clone(),
            email: project.email.clone(),
            assigned_date: project.assigned_date,
            deadline: project.deadline,
            status: project.status.as_str(),
            approval_status: project.approval_status.as_str(),
            color_code: project.color_code.as_str(),
            brd_requirement: project.brd_requirement.as_str(),
            brd_notes: project.brd_notes.clone(),
            uat_sign_in: project.uat_sign_in(),
            uat_sign_off: project.uat_sign_off(),
            stages,
        }
    }
}

impl ExportRecord {
    /// Cells in `EXPORT_HEADERS` order
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::Number(self.id as f64),
            Cell::Text(self.name.clone()),
            Cell::Text(self.email.clone()),
            Cell::Text(self.assigned_date.format("%Y-%m-%d").to_string()),
            Cell::Text(self.deadline.format("%Y-%m-%d").to_string()),
            Cell::Text(self.status.to_string()),
            Cell::Text(self.approval_status.to_string()),
            Cell::Text(self.color_code.to_string()),
            Cell::Text(self.brd_requirement.to_string()),
            Cell::Text(self.brd_notes.clone()),
            Cell::Bool(self.uat_sign_in),
            Cell::Bool(self.uat_sign_off),
        ];
        cells.extend(self.stages.iter().map(|s| Cell::Bool(*s)));
        cells
    }
}

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

/// One named sheet: a header row plus data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn from_records(name: &str, records: &[ExportRecord]) -> Self {
        Self {
            name: name.to_string(),
            headers: EXPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: records.iter().map(ExportRecord::cells).collect(),
        }
    }
}

/// Writes a sheet to a file
pub trait SheetWriter {
    fn write_sheet(&mut self, sheet: &Sheet, path: &Path) -> Result<()>;
}

/// Writes `.xlsx` workbooks with a single worksheet
#[derive(Debug, Default)]
pub struct XlsxSheetWriter;

impl SheetWriter for XlsxSheetWriter {
    fn write_sheet(&mut self, sheet: &Sheet, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => worksheet.write_string(row_num, col, s)?,
                    Cell::Number(n) => worksheet.write_number(row_num, col, *n)?,
                    Cell::Bool(b) => worksheet.write_boolean(row_num, col, *b)?,
                };
            }
        }

        workbook.save(path)?;

        info!(
            "Exported {} project(s) to {}",
            sheet.rows.len(),
            path.display()
        );
        Ok(())
    }
}

//! A dashboard session: the project store seen through the current role.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::export::SheetWriter;
use crate::models::{BrdFile, ProjectField, ProjectId, Stage};
use crate::store::ProjectStore;

/// Who is using the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::User,
            Role::User => Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::User => write!(f, "User"),
        }
    }
}

/// Owns the store for the lifetime of a session.
///
/// Users may move stages, attach BRDs, edit notes, cycle UAT, select and
/// export. Creating projects and changing any other field need an admin.
#[derive(Debug)]
pub struct Dashboard {
    store: ProjectStore,
    role: Role,
    config: TrackerConfig,
}

impl Dashboard {
    pub fn new(config: TrackerConfig) -> Self {
        let store = if config.seed_sample_project {
            ProjectStore::with_sample()
        } else {
            ProjectStore::new()
        };
        Self {
            store,
            role: config.default_role,
            config,
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Switches between admin and user view, returning the new role
    pub fn switch_role(&mut self) -> Role {
        self.role = self.role.toggled();
        info!("Switched to {} view", self.role);
        self.role
    }

    fn require_admin(&self, action: &'static str) -> Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            warn!("Refused '{}' for non-admin", action);
            Err(TrackerError::AdminRequired(action))
        }
    }

    pub fn update_draft(&mut self, field: ProjectField) -> Result<()> {
        self.require_admin("edit the new project form")?;
        self.store.update_draft(field);
        Ok(())
    }

    /// Adds the draft as a project. `Ok(None)` means the draft was incomplete.
    pub fn add_project(&mut self) -> Result<Option<ProjectId>> {
        self.require_admin("add projects")?;
        Ok(self.store.add_project())
    }

    pub fn update_field(&mut self, id: ProjectId, field: ProjectField) -> Result<bool> {
        if field.is_admin_only() {
            self.require_admin("change project details")?;
        }
        Ok(self.store.update_field(id, field))
    }

    pub fn advance_stage(&mut self, id: ProjectId, stage: Stage) -> bool {
        self.store.advance_stage(id, stage)
    }

    /// Attaches a BRD file if its extension is accepted
    pub fn upload_brd_file(&mut self, id: ProjectId, file: BrdFile) -> Result<bool> {
        if !file.is_accepted(&self.config.brd_extensions) {
            return Err(TrackerError::UnsupportedBrdFile(file.name));
        }
        Ok(self.store.upload_brd_file(id, file))
    }

    pub fn cycle_uat_status(&mut self, id: ProjectId) -> bool {
        self.store.cycle_uat_status(id)
    }

    pub fn toggle_select_all(&mut self) {
        self.store.toggle_select_all();
    }

    pub fn toggle_selection(&mut self, id: ProjectId) -> bool {
        self.store.toggle_selection(id)
    }

    /// Exports the selection to the configured file and sheet
    pub fn export_selected<W: SheetWriter>(&self, writer: &mut W) -> Result<usize> {
        self.store
            .export_selected(writer, &self.config.sheet_name, &self.config.export_file)
    }
}
